//! Panel image generation.

use std::time::Duration;

use tracing::{debug, info};

use crate::constants::{IMAGE_SIZE, PANEL_COUNT};
use crate::error::ComicError;
use crate::openai::{ImageGenerator, ImageRequest};

/// Wraps a panel prompt so the image model draws a single bubble-free scene.
///
/// The whole story is repeated for context; `panel_prompt` names the scene.
pub fn panel_image_prompt(story: &str, panel_prompt: &str, panel_number: usize) -> String {
    format!(
        "Here is the overall flow of a full-color comic:\n{story}\n\n\
         Panel {panel_number} shows: {panel_prompt}\n\n\
         From the flow above, render only the scene for panel {panel_number} as a single image. \
         Do not include multiple panels; depict just that one scene in a comic style. \
         Do not include any speech bubbles."
    )
}

/// Generates the image for one panel and returns its URL.
pub async fn generate_panel_image(
    images: &dyn ImageGenerator,
    model: &str,
    story: &str,
    panel_prompt: &str,
    panel_number: usize,
) -> Result<String, ComicError> {
    let prompt = panel_image_prompt(story, panel_prompt, panel_number);
    let request = ImageRequest {
        model,
        prompt: &prompt,
        n: 1,
        size: IMAGE_SIZE,
    };
    images
        .generate(&request)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ComicError::Upstream(format!("No image returned for panel {panel_number}")))
}

/// Generates all four panels in order, pausing between consecutive calls.
///
/// The first failure aborts the rest.
pub async fn generate_panel_images(
    images: &dyn ImageGenerator,
    model: &str,
    story: &str,
    panel_prompts: &[String; PANEL_COUNT],
    pause: Duration,
) -> Result<[String; PANEL_COUNT], ComicError> {
    let mut urls: [String; PANEL_COUNT] = Default::default();
    for (index, (url, panel_prompt)) in urls.iter_mut().zip(panel_prompts).enumerate() {
        let panel_number = index + 1;
        if index > 0 {
            tokio::time::sleep(pause).await;
        }
        debug!("panel {} prompt: {}", panel_number, panel_prompt);
        *url = generate_panel_image(images, model, story, panel_prompt, panel_number).await?;
        info!("Generated image for panel {}", panel_number);
    }
    Ok(urls)
}
