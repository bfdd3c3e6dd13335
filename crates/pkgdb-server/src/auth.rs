use axum::{
    extract::Request,
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::error::login_redirect;

/// Header naming the authenticated caller, set by the fronting proxy.
pub const USER_HEADER: &str = "x-pkgdb-user";

/// The username taken from [`USER_HEADER`], stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub String);

/// Gate every mutating request behind a caller name.
///
/// Reads are public. A write without a non-empty [`USER_HEADER`] is redirected
/// to the login page before it reaches a handler; otherwise the name is
/// attached as a [`Caller`] extension and resolved by the handler.
pub async fn caller_middleware(mut req: Request, next: Next) -> Response {
    let caller = caller_from(req.headers());

    if req.method() == Method::GET || req.method() == Method::HEAD {
        if let Some(caller) = caller {
            req.extensions_mut().insert(caller);
        }
        return next.run(req).await;
    }

    match caller {
        Some(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "anonymous write redirected to login");
            login_redirect()
        }
    }
}

fn caller_from(headers: &HeaderMap) -> Option<Caller> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| Caller(v.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
