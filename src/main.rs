use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use art_evaluator::classifier::Classifier;
use art_evaluator::config::Config;
use art_evaluator::fetch::ImageFetcher;
use art_evaluator::handlers::{self, AppState};
use art_evaluator::provision;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.verbose);

    info!("Starting Art Evaluator");

    // The server is not started unless the model is ready.
    let model = provision::provision(&config.model_source())
        .await
        .context("failed to provision model")?;
    let model: Arc<dyn Classifier> = Arc::new(model);

    let fetcher =
        ImageFetcher::new(config.fetch_timeout()).context("failed to build HTTP client")?;

    let state = web::Data::new(AppState {
        model: Some(model),
        fetcher,
        platform: config.platform.clone(),
    });

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("art_evaluator=debug,actix_web=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("art_evaluator=info,actix_web=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
