//! Dialogue extraction for each generated panel.

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::PANEL_COUNT;
use crate::error::ComicError;
use crate::openai::{ChatMessage, ChatRequest, TextGenerator};

const CODE_FENCE: &str = "```";

const CAPTION_SYSTEM_PROMPT: &str = "You are an assistant that always returns pure JSON. \
    Your output must be one valid JSON object with no code blocks and no additional prose. \
    The output must also always contain the string 'JSON'.";

/// User prompt asking for one panel's dialogue as a JSON object.
pub fn caption_prompt(story: &str, image_url: &str, panel_number: usize) -> String {
    format!(
        "The image for panel {panel_number} ({image_url}) of the four-panel comic story \"{story}\" has been generated.\n\
         Return a line of dialogue that suits this image in the following JSON format:\n\n\
         {{\n    \"panel\": <number>,\n    \"dialogue\": \"<dialogue>\"\n}}\n\n\
         Always return pure JSON. Do not put Markdown code blocks (```) or any extra text in the output. \
         Always include the string \"JSON\" as well."
    )
}

/// Asks the text service for the dialogue of `panel_number` (1-based).
///
/// Structured JSON mode is tried first; if the service does not support it the
/// same request is sent once more without it.
pub async fn extract_caption(
    text: &dyn TextGenerator,
    model: &str,
    story: &str,
    image_urls: &[String; PANEL_COUNT],
    panel_number: usize,
) -> Result<String, ComicError> {
    let image_url = panel_number
        .checked_sub(1)
        .and_then(|index| image_urls.get(index))
        .ok_or_else(|| ComicError::Upstream(format!("Panel {panel_number} is out of range")))?;

    let request = ChatRequest::new(
        model,
        vec![
            ChatMessage::system(CAPTION_SYSTEM_PROMPT),
            ChatMessage::user(caption_prompt(story, image_url, panel_number)),
        ],
    );

    let reply = match text.complete(&request.clone().json_object()).await {
        Ok(reply) => reply,
        Err(ComicError::UnsupportedResponseFormat(reason)) => {
            warn!("JSON mode unavailable for panel {panel_number}, retrying without it: {reason}");
            text.complete(&request).await?
        }
        Err(err) => return Err(err),
    };
    debug!("panel {} caption reply: {}", panel_number, reply);
    Ok(parse_caption(&reply))
}

/// Turns a caption reply into the dialogue line.
///
/// A JSON object yields its trimmed `dialogue` (empty when missing); anything
/// else is returned as-is once surrounding fences are removed.
pub fn parse_caption(reply: &str) -> String {
    let text = strip_code_fence(reply.trim());
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => match fields.get("dialogue") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(dialogue)) => dialogue.trim().to_string(),
            Some(other) => other.to_string(),
        },
        _ => {
            warn!("Caption reply is not a JSON object, using the raw text");
            text.to_string()
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    if text.len() < 2 * CODE_FENCE.len()
        || !text.starts_with(CODE_FENCE)
        || !text.ends_with(CODE_FENCE)
    {
        return text;
    }
    let inner = text.trim_matches('`');
    let inner = match inner.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag) => rest,
        _ => inner,
    };
    inner.trim()
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
