use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Prefix of JSON API routes. Everything else is the frontend bundle.
const API_PREFIX: &str = "/api/";

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let is_api_route = req.uri().path().starts_with(API_PREFIX);

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );

    // The bundle pulls scripts and styles the API never serves, so the
    // lockdown applies to JSON routes only.
    if is_api_route {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        );
        headers.insert(
            header::X_FRAME_OPTIONS,
            header::HeaderValue::from_static("DENY"),
        );
    }

    response
}
