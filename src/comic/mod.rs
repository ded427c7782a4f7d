//! The four-panel comic pipeline.
//!
//! One request runs strictly in order: story, panel split, images 1 to 4,
//! captions 1 to 4. Nothing is shared between requests.

mod captions;
mod images;
mod panels;
mod story;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use captions::{caption_prompt, extract_caption, parse_caption};
pub use images::{generate_panel_image, generate_panel_images, panel_image_prompt};
pub use panels::split_panels;
pub use story::{generate_story, story_prompt};

use crate::config::PipelineSettings;
use crate::constants::PANEL_COUNT;
use crate::error::ComicError;
use crate::openai::{ImageGenerator, TextGenerator};

/// What the comic is about.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ProductInfo {
    /// Product name.
    pub product_name: String,
    /// Free-form product description.
    pub product_description: String,
}

/// A finished comic; index `i` of both arrays belongs to panel `i + 1`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ComicResult {
    /// Panel image URLs.
    pub image_urls: [String; PANEL_COUNT],
    /// Panel dialogue lines.
    pub texts: [String; PANEL_COUNT],
}

/// Runs the whole comic pipeline against the injected services.
#[derive(Clone, Debug)]
pub struct ComicPipeline {
    text: Arc<dyn TextGenerator>,
    images: Arc<dyn ImageGenerator>,
    settings: PipelineSettings,
}

impl ComicPipeline {
    /// Builds a pipeline over the given text and image services.
    pub fn new(
        text: Arc<dyn TextGenerator>,
        images: Arc<dyn ImageGenerator>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            text,
            images,
            settings,
        }
    }

    /// Produces four images and four dialogue lines for `product`.
    ///
    /// Any upstream failure aborts the whole comic; there are no partial results.
    pub async fn generate(&self, product: &ProductInfo) -> Result<ComicResult, ComicError> {
        info!("Generating comic for {:?}", product.product_name);

        let story = generate_story(self.text.as_ref(), &self.settings.story_model, product).await?;
        info!("Story generated");

        let panel_prompts = split_panels(&story);
        let image_urls = generate_panel_images(
            self.images.as_ref(),
            &self.settings.image_model,
            &story,
            &panel_prompts,
            self.settings.panel_pause,
        )
        .await?;
        info!("Images generated");

        let mut texts: [String; PANEL_COUNT] = Default::default();
        for (index, text) in texts.iter_mut().enumerate() {
            *text = extract_caption(
                self.text.as_ref(),
                &self.settings.caption_model,
                &story,
                &image_urls,
                index + 1,
            )
            .await?;
        }
        info!("Captions extracted");

        Ok(ComicResult { image_urls, texts })
    }
}
