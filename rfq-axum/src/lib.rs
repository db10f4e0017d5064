#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod bid_routes;
mod party_routes;
mod request_routes;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json};
use headers::{Authorization, authorization::Bearer};
use rfq_core::ports::{Application, Repository};
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::Display, sync::Arc};
use tower_http::cors::CorsLayer;

mod error;
pub use error::{ApiError, ErrorBody};

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct a full API router with the given state and config
pub fn router<T: ApiApplication>(state: T, config: AxumConfig) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/bid-request", request_routes::router())
        .nest("/bid", bid_routes::router())
        .nest("/party", party_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api))) // Arc is very important here or you will face massive memory and performance issues
        .layer(Extension(Arc::new(config)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app, config);
    axum::serve(listener, service).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place. If a function takes a generic `T: ApiApplication`, then
/// everything one might reasonably want to do should work.
pub trait ApiApplication:
    Clone
    + Send
    + Sync
    + 'static
    + Application<
        Context = Authorization<Bearer>,
        Repository: Clone
                        + Send
                        + Sync
                        + 'static
                        + Repository<
            DateTime: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            PartyId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            BidRequestId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            BidId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
        >,
    >
{
}

// this is the blanket implementation
impl<T: Clone + Send + Sync + 'static> ApiApplication for T where
    T: Application<
            Context = Authorization<Bearer>,
            Repository: Clone
                            + Send
                            + Sync
                            + 'static
                            + Repository<
                DateTime: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
                PartyId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
                BidRequestId: Clone
                                  + Display
                                  + Serialize
                                  + DeserializeOwned
                                  + JsonSchema
                                  + Send
                                  + Sync,
                BidId: Clone + Display + Serialize + DeserializeOwned + JsonSchema + Send + Sync,
            >,
        >
{
}
