//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::time::Duration;

use crate::config::PipelineSettings;
use crate::constants::{
    DEFAULT_ALLOWED_ORIGINS, DEFAULT_CAPTION_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_PANEL_PAUSE_MS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STORY_MODEL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "COMICGEN_DEBUG")]
    /// Enable debug logging. Env: COMICGEN_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8000", env = "COMICGEN_PORT")]
    /// http listener, defaults to `8000`.
    /// Env: COMICGEN_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "COMICGEN_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: COMICGEN_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(
        long,
        value_delimiter = ',',
        default_values = DEFAULT_ALLOWED_ORIGINS,
        env = "COMICGEN_ALLOWED_ORIGINS"
    )]
    /// Comma separated list of origins allowed by CORS.
    /// Env: COMICGEN_ALLOWED_ORIGINS
    pub allowed_origins: Vec<String>,

    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "COMICGEN_REQUEST_TIMEOUT_SECS")]
    /// Total time budget for one comic request, in seconds.
    /// Env: COMICGEN_REQUEST_TIMEOUT_SECS
    pub request_timeout_secs: u64,

    #[clap(long, default_value_t = DEFAULT_PANEL_PAUSE_MS, env = "COMICGEN_PANEL_PAUSE_MS")]
    /// Pause between image generation calls, in milliseconds.
    /// Env: COMICGEN_PANEL_PAUSE_MS
    pub panel_pause_ms: u64,

    #[clap(long, required = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    /// OpenAI API key. Env: OPENAI_API_KEY
    pub openai_api_key: String,

    #[clap(long, default_value = DEFAULT_OPENAI_BASE_URL, env = "OPENAI_BASE_URL")]
    /// Base URL of the OpenAI-compatible API. Env: OPENAI_BASE_URL
    pub openai_base_url: String,

    #[clap(long, default_value = DEFAULT_STORY_MODEL, env = "COMICGEN_STORY_MODEL")]
    /// Text model that writes the story
    pub story_model: String,

    #[clap(long, default_value = DEFAULT_CAPTION_MODEL, env = "COMICGEN_CAPTION_MODEL")]
    /// Text model that writes each panel's dialogue
    pub caption_model: String,

    #[clap(long, default_value = DEFAULT_IMAGE_MODEL, env = "COMICGEN_IMAGE_MODEL")]
    /// Image model
    pub image_model: String,
}

impl CliOptions {
    /// Wall-clock budget for a whole request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pipeline settings derived from the options.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            story_model: self.story_model.clone(),
            caption_model: self.caption_model.clone(),
            image_model: self.image_model.clone(),
            panel_pause: Duration::from_millis(self.panel_pause_ms),
        }
    }
}
