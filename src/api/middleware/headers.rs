//! Response header middleware

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

const X_UA_COMPATIBLE: &str = "x-ua-compatible";
const X_UA_COMPATIBLE_VALUE: &str = "IE=Edge,chrome=1";
const PAGE_CACHE_CONTROL: &str = "public, max-age=600";

/// Paths served as cacheable pages
const PAGE_PATHS: &[&str] = &["/", "/about/", "/robots.txt"];

/// Forces the latest IE rendering engine on every response and lets
/// clients cache pages for ten minutes
pub async fn response_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let is_page = is_page_path(request.uri().path());
    let mut response = next.run(request).await;
    let cacheable = is_page && response.status().is_success();
    let headers = response.headers_mut();

    headers.insert(X_UA_COMPATIBLE, HeaderValue::from_static(X_UA_COMPATIBLE_VALUE));

    if cacheable {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(PAGE_CACHE_CONTROL));
    }

    response
}

fn is_page_path(path: &str) -> bool {
    PAGE_PATHS.contains(&path)
}
