use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{types::CallbackState, warning};

/// Handles the redirect back from Spotify's authorize page.
///
/// Records the authorization code, or the reason there is none, in the shared
/// state for the waiting login. A `state` that does not match the one sent
/// with the authorize request is treated as a failed login.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<CallbackState>>>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;

    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        state.outcome = Some(Err(format!("authorization denied: {}", error)));
        return Html("<h4>Login failed.</h4>");
    }

    if params.get("state") != Some(&state.expected_state) {
        state.outcome = Some(Err("state parameter mismatch".to_string()));
        return Html("<h4>Login failed: state mismatch.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            state.outcome = Some(Ok(code.clone()));
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => {
            state.outcome = Some(Err("callback carried no authorization code".to_string()));
            Html("<h4>Missing authorization code.</h4>")
        }
    }
}
