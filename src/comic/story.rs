//! Story generation: one text call producing the four-beat narrative.

use tracing::debug;

use super::ProductInfo;
use crate::error::ComicError;
use crate::openai::{ChatMessage, ChatRequest, TextGenerator};

/// Instruction asking for a four-beat comic story about the product.
pub fn story_prompt(product: &ProductInfo) -> String {
    format!(
        "I want to make a four-panel comic featuring the product \"{}\". \
         Write the flow of the four panels as setup, development, twist and conclusion. \
         Product description: {}. \
         If any people appear, describe each person's characteristics in detail.",
        product.product_name, product.product_description
    )
}

/// Asks the text service for the story and returns it verbatim.
pub async fn generate_story(
    text: &dyn TextGenerator,
    model: &str,
    product: &ProductInfo,
) -> Result<String, ComicError> {
    let request = ChatRequest::new(model, vec![ChatMessage::user(story_prompt(product))]);
    let story = text.complete(&request).await?;
    if story.trim().is_empty() {
        return Err(ComicError::Upstream(
            "Story generation returned no content".to_string(),
        ));
    }
    debug!("Story: {story}");
    Ok(story)
}
