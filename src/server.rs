use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Error, Res, api, types::CallbackState};

/// Serves the OAuth redirect target until the task is aborted.
pub async fn start_api_server(
    addr: SocketAddr,
    callback_path: String,
    state: Arc<Mutex<CallbackState>>,
) -> Res<()> {
    let app = Router::new().route(&callback_path, get(api::callback).layer(Extension(state)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Login(format!("cannot listen on {}: {}", addr, e)))?;
    log::debug!("callback server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
