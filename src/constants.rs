//! Shared constants/defaults for things
//!

/// Number of panels in every comic.
pub const PANEL_COUNT: usize = 4;

/// Default model used to write the story.
pub const DEFAULT_STORY_MODEL: &str = "gpt-4o";

/// Default model used to pull a dialogue line out of each panel.
pub const DEFAULT_CAPTION_MODEL: &str = "gpt-4o-mini";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Every panel image is rendered at this size.
pub const IMAGE_SIZE: &str = "1024x1024";

/// Default OpenAI-compatible API base.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Wall-clock budget for a whole `/generate_comic` request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Pause between consecutive image generation calls, in milliseconds.
pub const DEFAULT_PANEL_PAUSE_MS: u64 = 1000;

/// Origins allowed to call the API from a browser.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001"];

/// `detail` text returned when a request runs out of time.
pub const TIMEOUT_DETAIL: &str = "Request timeout";
