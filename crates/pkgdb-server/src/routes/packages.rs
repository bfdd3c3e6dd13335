use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use pkgdb_core::batch::{self, BatchRequest, BatchResult};
use pkgdb_core::repository::{Repository, YamlRepository};
use pkgdb_core::types::TransitionKind;
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::{error_value, AppError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Form fields that accept either `"guake"` or `["guake", "geany"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TransitionBody {
    #[serde(default)]
    pub pkgnames: OneOrMany,
    #[serde(default)]
    pub branches: OneOrMany,
    #[serde(default)]
    pub poc: Option<String>,
    #[serde(default)]
    pub critpath: Option<bool>,
}

impl TransitionBody {
    /// Read a JSON body without regard to its content type. An empty or
    /// unreadable body counts as a form with no fields filled in, so the
    /// caller still goes through the entry check before validation fails.
    fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(bytes).unwrap_or_else(|e| {
            tracing::debug!("unreadable transition body: {e}");
            Self::default()
        })
    }

    fn into_request(self, kind: TransitionKind) -> BatchRequest {
        let mut request = BatchRequest::new(kind, self.pkgnames.into_vec(), self.branches.into_vec());
        request.poc = self.poc;
        request.critpath = self.critpath;
        request
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// POST /api/package/orphan/: give up ownership of listings.
pub async fn orphan(
    State(app): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Response, AppError> {
    apply(app, caller, &body, TransitionKind::Orphan).await
}

/// POST /api/package/unorphan/: claim orphaned listings for `poc`.
pub async fn unorphan(
    State(app): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Response, AppError> {
    apply(app, caller, &body, TransitionKind::Unorphan).await
}

/// POST /api/package/retire/: mark listings dead.
pub async fn retire(
    State(app): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Response, AppError> {
    apply(app, caller, &body, TransitionKind::Retire).await
}

/// POST /api/package/unretire/: bring retired listings back (admin only).
pub async fn unretire(
    State(app): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Bytes,
) -> Result<Response, AppError> {
    apply(app, caller, &body, TransitionKind::Unretire).await
}

async fn apply(
    app: AppState,
    caller: Caller,
    body: &[u8],
    kind: TransitionKind,
) -> Result<Response, AppError> {
    let root = app.root.clone();
    let request = TransitionBody::parse(body).into_request(kind);
    let result = tokio::task::spawn_blocking(move || batch::apply_at(&root, &caller.0, &request))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(batch_response(&result))
}

fn batch_response(result: &BatchResult) -> Response {
    if !result.committed {
        let body = serde_json::json!({
            "output": "notok",
            "error": error_value(&result.errors),
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    let mut body = serde_json::json!({
        "output": "ok",
        "messages": result.messages,
    });
    if !result.errors.is_empty() {
        body["error"] = error_value(&result.errors);
    }
    (StatusCode::OK, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Info
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    /// Comma-separated branch filter, e.g. `f18,master`.
    #[serde(default)]
    pub branches: Option<String>,
}

/// GET /api/package/{name}/: a package and its listings.
pub async fn get_package(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let branches: Vec<String> = query
        .branches
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect();

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let db = YamlRepository::new(&root).snapshot()?;
        let info = pkgdb_core::info::package_info(&db, &name, &branches)?;

        Ok::<_, pkgdb_core::PkgdbError>(serde_json::json!({
            "output": "ok",
            "package": info.package,
            "listings": info.listings,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
