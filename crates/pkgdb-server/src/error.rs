use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use pkgdb_core::error::PkgdbError;

pub const LOGIN_PATH: &str = "/login";

pub const INVALID_INPUT: &str = "Invalid input submitted";

/// 302 to the login page; what anonymous and under-privileged callers get.
pub fn login_redirect() -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, LOGIN_PATH)
        .body(Body::empty())
        .expect("infallible: all header values are valid ASCII")
}

/// `"error"` is a bare string for a single message and a list otherwise.
pub fn error_value(errors: &[String]) -> serde_json::Value {
    match errors {
        [one] => serde_json::Value::String(one.clone()),
        many => serde_json::json!(many),
    }
}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<PkgdbError>() {
            match e {
                PkgdbError::Unauthorized { .. } | PkgdbError::UnknownUser(_) => {
                    return login_redirect();
                }
                PkgdbError::NotInitialized => StatusCode::BAD_REQUEST,
                PkgdbError::PackageNotFound(_) | PkgdbError::NoListingOnBranches(_) => {
                    StatusCode::NOT_FOUND
                }
                PkgdbError::InvalidStatus(_)
                | PkgdbError::InvalidCategory(_)
                | PkgdbError::InvalidCollectionStatus(_)
                | PkgdbError::InvalidAcl(_)
                | PkgdbError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
                // Form errors share the batch failure status.
                PkgdbError::InvalidRequest(_)
                | PkgdbError::DuplicateListing { .. }
                | PkgdbError::Io(_)
                | PkgdbError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }

        let body = match self.0.downcast_ref::<PkgdbError>() {
            Some(PkgdbError::InvalidRequest(detail)) => serde_json::json!({
                "output": "notok",
                "error": INVALID_INPUT,
                "error_detail": detail,
            }),
            _ => serde_json::json!({
                "output": "notok",
                "error": self.0.to_string(),
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_redirects_to_login() {
        let err = AppError(
            PkgdbError::Unauthorized {
                user: "mclasen".into(),
                operation: "orphan packages".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }

    #[test]
    fn unknown_user_redirects_to_login() {
        let err = AppError(PkgdbError::UnknownUser("ghost".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::FOUND);
    }

    #[test]
    fn package_not_found_maps_to_404() {
        let err = AppError(PkgdbError::PackageNotFound("guake".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(PkgdbError::NotInitialized.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_request_lists_fields_in_error_detail() {
        use http_body_util::BodyExt;

        let err = AppError(
            PkgdbError::InvalidRequest(vec![
                "pkgnames: This field is required.".into(),
                "branches: This field is required.".into(),
            ])
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "output": "notok",
                "error": "Invalid input submitted",
                "error_detail": [
                    "pkgnames: This field is required.",
                    "branches: This field is required.",
                ],
            })
        );
    }

    #[test]
    fn non_pkgdb_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn single_error_renders_as_string() {
        assert_eq!(error_value(&["boom".to_string()]), serde_json::json!("boom"));
        assert_eq!(
            error_value(&["a".to_string(), "b".to_string()]),
            serde_json::json!(["a", "b"])
        );
    }
}
