//! Scripted stand-ins for the remote services.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ComicError;
use crate::openai::{ChatRequest, ImageGenerator, ImageRequest, TextGenerator};

/// Replies with queued results, in order, and remembers every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedText {
    replies: Mutex<VecDeque<Result<String, ComicError>>>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl ScriptedText {
    pub(crate) fn new(replies: Vec<Result<String, ComicError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::default(),
        }
    }

    /// A story with four lines followed by one JSON caption per panel.
    pub(crate) fn happy_path() -> Self {
        let mut replies = vec![Ok("Setup\nDevelopment\nTwist\nConclusion".to_string())];
        replies.extend(
            (1..=4).map(|panel| Ok(format!(r#"{{"panel": {panel}, "dialogue": "line {panel}"}}"#))),
        );
        Self::new(replies)
    }

    pub(crate) fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ComicError> {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ComicError::Upstream("no scripted reply left".to_string())))
    }
}

/// One recorded image call.
#[derive(Clone, Debug)]
pub(crate) struct ImageCall {
    pub(crate) at: Instant,
    pub(crate) model: String,
    pub(crate) prompt: String,
    pub(crate) n: u8,
    pub(crate) size: String,
}

/// Hands out `https://images.example/panel-<n>.png` for the n-th call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedImages {
    fail_on_call: Option<usize>,
    delay: Option<Duration>,
    calls: Mutex<Vec<ImageCall>>,
}

impl ScriptedImages {
    pub(crate) fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<ImageCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImages {
    async fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<String>, ComicError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(ImageCall {
                at: Instant::now(),
                model: request.model.to_string(),
                prompt: request.prompt.to_string(),
                n: request.n,
                size: request.size.to_string(),
            });
            calls.len()
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(ComicError::Upstream(format!(
                "Your request was rejected by the safety system (call {call})"
            )));
        }
        Ok(vec![format!("https://images.example/panel-{call}.png")])
    }
}
