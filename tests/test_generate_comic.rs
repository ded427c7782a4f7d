use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
use comicgen::comic::{ComicPipeline, ComicResult};
use comicgen::config::PipelineSettings;
use comicgen::error::ComicError;
use comicgen::openai::{ChatRequest, ImageGenerator, ImageRequest, TextGenerator};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Answers story requests with a fixed story and caption requests with fenced JSON.
#[derive(Debug, Default)]
struct FakeText {
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ComicError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        if request.messages.len() == 1 {
            return Ok("Opening\nRising\nTurn\nEnding".to_string());
        }
        if request.response_format.is_some() {
            return Err(ComicError::UnsupportedResponseFormat(
                "json_object is not supported".to_string(),
            ));
        }
        Ok(format!(
            "```json\n{{\"panel\": {}, \"dialogue\": \"caption {}\"}}\n```",
            requests.len(),
            requests.len()
        ))
    }
}

#[derive(Debug, Default)]
struct FakeImages {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<String>, ComicError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(request.prompt.to_string());
        Ok(vec![format!("https://cdn.example/{}.png", prompts.len())])
    }
}

#[tokio::test(start_paused = true)]
async fn test_generate_comic_end_to_end() {
    let text = Arc::new(FakeText::default());
    let images = Arc::new(FakeImages::default());
    let pipeline = ComicPipeline::new(text.clone(), images.clone(), PipelineSettings::default());
    let app = comicgen::web::create_router(
        pipeline,
        Duration::from_secs(300),
        &["http://localhost:3000".to_string()],
    )
    .expect("router");

    let request = Request::builder()
        .method("POST")
        .uri("/generate_comic")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"product_name": "Glow Mug", "product_description": "Changes colour with heat"}"#,
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let comic: ComicResult = serde_json::from_slice(&bytes).expect("comic json");

    assert_eq!(
        comic.image_urls,
        [1, 2, 3, 4].map(|n| format!("https://cdn.example/{n}.png"))
    );
    // each caption needs a rejected structured call plus a plain retry
    assert_eq!(
        comic.texts,
        [3, 5, 7, 9].map(|n| format!("caption {n}"))
    );
    assert_eq!(text.requests.lock().unwrap().len(), 9);

    let prompts = images.prompts.lock().unwrap();
    assert!(
        prompts
            .iter()
            .all(|prompt| prompt.contains("Opening\nRising\nTurn\nEnding"))
    );
    assert!(prompts[0].contains("Opening"));
    assert!(prompts[1].contains("Rising"));
    assert!(prompts[2].contains("Turn"));
    assert!(prompts[3].contains("Ending"));
}
