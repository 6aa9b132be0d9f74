use std::sync::Arc;

use object_store::local::LocalFileSystem;

use piserve_core::index;
use piserve_server::config::Config;
use piserve_server::{router, AppState};
use piserve_storage::{ObjectBucket, Service};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env();
    tracing::info!(
        addr = %config.http_addr,
        bucket = %config.bucket,
        max_digits = config.max_digits,
        local = config.local_storage.is_some(),
        "starting piserve"
    );

    let service = match &config.local_storage {
        Some(path) => {
            let store = LocalFileSystem::new_with_prefix(path)?;
            Service::new(Arc::new(ObjectBucket::new(Arc::new(store))))
        }
        None => Service::connect(&config.bucket)?,
    };

    let state = Arc::new(AppState {
        service,
        decimal: index::decimal(),
        hexadecimal: index::hexadecimal(),
        max_digits: config.max_digits,
    });

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}
