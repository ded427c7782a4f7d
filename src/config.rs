//! Config handling

use std::path::Path;
use std::time::Duration;

use tracing::log::LevelFilter;

use crate::constants::{
    DEFAULT_CAPTION_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_PANEL_PAUSE_MS, DEFAULT_STORY_MODEL,
};

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Loads `.env` from the working directory, if there is one.
///
/// A missing file is fine; a malformed one is an error.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::dotenv().map(|_| ()))
}

/// Loads environment variables from the file at `path`, if it exists.
pub fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::from_path(path))
}

fn ignore_missing(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(err) if err.not_found() => Ok(()),
        other => other,
    }
}

/// Models and pacing used by the comic pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineSettings {
    /// Text model that writes the four-beat story.
    pub story_model: String,
    /// Text model asked for each panel's dialogue.
    pub caption_model: String,
    /// Image model used for every panel.
    pub image_model: String,
    /// Pause between consecutive image calls.
    pub panel_pause: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            story_model: DEFAULT_STORY_MODEL.to_string(),
            caption_model: DEFAULT_CAPTION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            panel_pause: Duration::from_millis(DEFAULT_PANEL_PAUSE_MS),
        }
    }
}
