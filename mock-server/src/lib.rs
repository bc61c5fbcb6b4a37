//! In-memory stand-in for the NocoDB v2 table API.
//!
//! Serves `/api/v2/tables/{table_id}/records` with token auth, integer `Id`
//! assignment, `where`/`limit`/`offset` on list, partial PATCH, and
//! `{ "error", "message" }` error bodies. Tables are created on first use.
//! Paths outside the table routes answer with a plain-text 404, as NocoDB's
//! HTTP layer does.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::{Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const TOKEN_HEADER: &str = "xc-token";
pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 1000;

pub type Record = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Record>,
}

impl Table {
    fn insert(&mut self, mut fields: Record) -> Record {
        self.next_id += 1;
        fields.insert("Id".to_string(), Value::from(self.next_id));
        self.rows.insert(self.next_id, fields.clone());
        fields
    }
}

pub type Db = Arc<RwLock<HashMap<String, Table>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    token: Arc<str>,
}

/// Error body in NocoDB's shape.
#[derive(Debug)]
pub struct RemoteError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl RemoteError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(id: i64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "RECORD_NOT_FOUND",
            format!("Record '{id}' not found"),
        )
    }

    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }
}

impl From<JsonRejection> for RemoteError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "INVALID_BODY", rejection.body_text())
    }
}

impl From<PathRejection> for RemoteError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), "INVALID_PK_VALUE", rejection.body_text())
    }
}

impl From<QueryRejection> for RemoteError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), "INVALID_QUERY", rejection.body_text())
    }
}

impl IntoResponse for RemoteError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.code, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

pub fn app(token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        token: Arc::from(token),
    };
    Router::new()
        .route(
            "/api/v2/tables/{table_id}/records",
            get(list_records).post(create_record).patch(update_record),
        )
        .route(
            "/api/v2/tables/{table_id}/records/{id}",
            get(get_record).delete(delete_record),
        )
        .fallback(unknown_route)
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn unknown_route(method: Method, uri: Uri) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Cannot {method} {}", uri.path()))
}

async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented != Some(&*state.token) {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid token");
        return RemoteError::new(
            StatusCode::UNAUTHORIZED,
            "AUTHENTICATION_REQUIRED",
            "Authentication required - Invalid token",
        )
        .into_response();
    }
    next.run(request).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "where")]
    pub filter: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

async fn list_records(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, RemoteError> {
    let Path(table_id) = path?;
    let Query(query) = query?;
    let clauses = match query.filter.as_deref() {
        Some(raw) => parse_where(raw)?,
        None => Vec::new(),
    };
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let db = state.db.read().await;
    let matching: Vec<&Record> = db
        .get(&table_id)
        .map(|t| {
            t.rows
                .values()
                .filter(|r| clauses.iter().all(|c| c.matches(r)))
                .collect()
        })
        .unwrap_or_default();

    let total = matching.len();
    let list: Vec<Value> = matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|r| Value::Object(r.clone()))
        .collect();
    tracing::debug!(table_id = %table_id, total, returned = list.len(), "list records");

    Ok(Json(json!({
        "list": list,
        "pageInfo": {
            "totalRows": total,
            "page": offset / limit + 1,
            "pageSize": limit,
            "isFirstPage": offset == 0,
            "isLastPage": offset.saturating_add(limit) >= total,
        }
    })))
}

async fn create_record(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, RemoteError> {
    let Path(table_id) = path?;
    let Json(body) = body?;
    let Value::Object(mut fields) = body else {
        return Err(RemoteError::bad_request(
            "INVALID_BODY",
            "Request body must be a JSON object",
        ));
    };
    fields.remove("Id");

    let mut db = state.db.write().await;
    let record = db.entry(table_id.clone()).or_default().insert(fields);
    tracing::info!(table_id = %table_id, id = ?record.get("Id"), "created record");
    Ok(Json(record))
}

async fn update_record(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, RemoteError> {
    let Path(table_id) = path?;
    let Json(body) = body?;
    let Value::Object(mut fields) = body else {
        return Err(RemoteError::bad_request(
            "INVALID_BODY",
            "Request body must be a JSON object",
        ));
    };
    let id = fields
        .remove("Id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| {
            RemoteError::bad_request("INVALID_PK_VALUE", "Primary key 'Id' is required")
        })?;

    let mut db = state.db.write().await;
    let row = db
        .get_mut(&table_id)
        .and_then(|t| t.rows.get_mut(&id))
        .ok_or_else(|| RemoteError::not_found(id))?;
    for (key, value) in fields {
        row.insert(key, value);
    }
    Ok(Json(row.clone()))
}

async fn get_record(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<Record>, RemoteError> {
    let Path((table_id, id)) = path?;
    let db = state.db.read().await;
    db.get(&table_id)
        .and_then(|t| t.rows.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(|| RemoteError::not_found(id))
}

async fn delete_record(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<Value>, RemoteError> {
    let Path((table_id, id)) = path?;
    let mut db = state.db.write().await;
    db.get_mut(&table_id)
        .and_then(|t| t.rows.remove(&id))
        .ok_or_else(|| RemoteError::not_found(id))?;
    tracing::info!(table_id = %table_id, id, "deleted record");
    Ok(Json(json!({ "Id": id })))
}

/// One `(field,op,value)` condition of a `where` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: String,
    pub negate: bool,
    pub value: String,
}

impl Clause {
    fn matches(&self, record: &Record) -> bool {
        let equal = match record.get(&self.field) {
            Some(Value::String(s)) => *s == self.value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        };
        equal != self.negate
    }
}

/// Parse `(a,eq,1)~and(b,neq,x)`.
pub fn parse_where(raw: &str) -> Result<Vec<Clause>, RemoteError> {
    raw.split("~and")
        .map(|part| {
            let invalid = || {
                RemoteError::bad_request(
                    "INVALID_FILTER",
                    format!("Invalid filter expression: {part}"),
                )
            };
            let inner = part
                .trim()
                .strip_prefix('(')
                .and_then(|p| p.strip_suffix(')'))
                .ok_or_else(invalid)?;
            let mut pieces = inner.splitn(3, ',');
            let (Some(field), Some(op), Some(value)) =
                (pieces.next(), pieces.next(), pieces.next())
            else {
                return Err(invalid());
            };
            let negate = match op.trim() {
                "eq" => false,
                "neq" => true,
                _ => return Err(invalid()),
            };
            Ok(Clause {
                field: field.trim().to_string(),
                negate,
                value: value.trim().to_string(),
            })
        })
        .collect()
}
