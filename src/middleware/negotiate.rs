use axum::{
    extract::Request,
    http::header::ACCEPT,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Reject requests whose `Accept` header rules out JSON
pub async fn require_json_accept(request: Request, next: Next) -> Result<Response, ApiError> {
    if let Some(accept) = request.headers().get(ACCEPT) {
        let acceptable = accept.to_str().map(accepts_json).unwrap_or(false);
        if !acceptable {
            return Err(ApiError::NotAcceptable);
        }
    }
    Ok(next.run(request).await)
}

fn accepts_json(accept: &str) -> bool {
    if accept.trim().is_empty() {
        return true;
    }
    accept.split(',').any(|range| {
        let mut params = range.split(';');
        let media = params.next().unwrap_or("").trim().to_ascii_lowercase();
        let refused = params.any(|p| matches!(p.trim().split_once('='), Some(("q", q)) if q.trim().parse::<f32>() == Ok(0.0)));
        !refused && matches!(media.as_str(), "application/json" | "application/*" | "*/*")
    })
}
