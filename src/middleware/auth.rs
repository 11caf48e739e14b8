use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticate the caller and make sure a local user exists for it.
///
/// On success the [`AuthSubject`](crate::auth::AuthSubject) is available to
/// handlers as a request extension.
pub async fn require_subject(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let subject = match state.authenticator.authenticate(request.headers()).await {
        Ok(subject) => subject,
        Err(e) => {
            tracing::warn!("Authentication failed on {}: {}", request.uri().path(), e);
            return Err(e.into());
        }
    };

    state
        .users()
        .ensure(&subject.subject, subject.name.as_deref())
        .await?;

    request.extensions_mut().insert(subject);
    Ok(next.run(request).await)
}
