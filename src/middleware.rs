use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Times the request, logs its outcome and stamps `X-Process-Time` in milliseconds.
pub async fn process_time(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = tracing::info_span!("request", method = %method, route = %route);

    async move {
        let mut response = next.run(req).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let status = response.status().as_u16();

        match HeaderValue::from_str(&format!("{elapsed_ms:.3}")) {
            Ok(value) => {
                response.headers_mut().insert(PROCESS_TIME_HEADER, value);
            }
            Err(err) => warn!(error = %err, "invalid process time header"),
        }

        info!(status, elapsed_ms, "request completed");
        response
    }
    .instrument(span)
    .await
}
