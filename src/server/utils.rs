//! Request helpers

use crate::core::rate_limiter::ClientHeaders;
use actix_web::HttpRequest;

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Caller address from `x-forwarded-for` (first hop) or `x-real-ip`
pub fn client_address(req: &HttpRequest) -> Option<String> {
    header_value(req, "x-forwarded-for")
        .and_then(|list| {
            list.split(',')
                .next()
                .map(str::trim)
                .filter(|first| !first.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(req, "x-real-ip"))
}

/// Headers the client identity is derived from
pub fn client_headers(req: &HttpRequest) -> ClientHeaders {
    ClientHeaders::new(client_address(req), header_value(req, "user-agent"))
}
