//! Cross-origin allow-list.
//!
//! `CorsLayer` only decides which response headers to emit; a browser is left to
//! enforce them. [`origin_allowlist_middleware`] additionally refuses any request
//! carrying an `Origin` that is not on the list, so handlers never run for it.
//! Requests without an `Origin` header (curl, server-to-server) pass through.

use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Arc<Vec<HeaderValue>>,
}

impl AllowedOrigins {
    /// Build the list, dropping entries that are not valid header values.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .filter_map(|o| {
                let o = o.as_ref().trim().trim_end_matches('/');
                if o.is_empty() {
                    return None;
                }
                match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// CORS response policy for the listed origins: GET/POST/OPTIONS with `Content-Type`.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

pub async fn origin_allowlist_middleware(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allowed.is_allowed(origin) {
            warn!(
                origin = ?origin,
                method = %request.method(),
                path = %request.uri().path(),
                "Rejecting request from disallowed origin"
            );
            return Err(AppError::Forbidden(anyhow::anyhow!("Not allowed by CORS")));
        }
    }

    Ok(next.run(request).await)
}
