use std::sync::Arc;

use clap::Parser;
use comicgen::comic::ComicPipeline;
use comicgen::config::{load_dotenv, setup_logging};
use comicgen::openai::OpenAiClient;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // logging is not up yet
    if let Err(err) = load_dotenv() {
        eprintln!("Failed to load .env: {}", err);
        return;
    }

    let cli = comicgen::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let client = match OpenAiClient::new(&cli.openai_api_key, &cli.openai_base_url) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            error!("Failed to set up OpenAI client: {}", err);
            return;
        }
    };

    let pipeline = ComicPipeline::new(client.clone(), client, cli.pipeline_settings());

    let app = match comicgen::web::create_router(
        pipeline,
        cli.request_timeout(),
        &cli.allowed_origins,
    ) {
        Ok(app) => app,
        Err(err) => {
            error!("Failed to build router: {}", err);
            return;
        }
    };

    if let Err(err) = comicgen::web::setup_server(&cli.listen_address, cli.port, app).await {
        error!("Application error: {}", err);
    }
}
