mod anomaly;
mod api;
mod emit;
mod error;
mod extract;
#[cfg(test)]
mod fixture_corpus;
mod mapper;
mod models;
mod pipeline;
mod validate;

use crate::api::create_router;
use std::{env, net::SocketAddr};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "testcase_core_rs=info,tower_http=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let app = create_router()
    .layer(CorsLayer::very_permissive())
    .layer(TraceLayer::new_for_http());

  let port = env::var("PORT")
    .ok()
    .and_then(|value| value.parse::<u16>().ok())
    .unwrap_or(8790);
  let address = SocketAddr::from(([0, 0, 0, 0], port));
  let listener = tokio::net::TcpListener::bind(address).await?;
  tracing::info!("Test case conversion API listening on {}", listener.local_addr()?);

  axum::serve(listener, app).await?;
  Ok(())
}
