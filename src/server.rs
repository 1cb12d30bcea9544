use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::{
    api,
    core::workflow::ProfileService,
    domain::ports::{CacheNotifier, CrmClient},
    utils::error::Result,
};

pub fn router<C, N>(service: Arc<ProfileService<C, N>>) -> Router
where
    C: CrmClient + 'static,
    N: CacheNotifier + 'static,
{
    Router::new()
        .route("/health", get(api::health))
        .route("/create", post(api::create::<C, N>))
        .with_state(service)
}

pub async fn start_api_server<C, N>(addr: &str, service: Arc<ProfileService<C, N>>) -> Result<()>
where
    C: CrmClient + 'static,
    N: CacheNotifier + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Create profile server listening on {}", listener.local_addr()?);
    serve(listener, service).await
}

pub async fn serve<C, N>(listener: TcpListener, service: Arc<ProfileService<C, N>>) -> Result<()>
where
    C: CrmClient + 'static,
    N: CacheNotifier + 'static,
{
    axum::serve(listener, router(service)).await?;
    Ok(())
}
