use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const FRIEND1: &str = include_str!("../../fixtures/friend1.json");
pub const FRIEND2: &str = include_str!("../../fixtures/friend2.json");
pub const FRIEND3: &str = include_str!("../../fixtures/friend3.json");
pub const FRIEND4: &str = include_str!("../../fixtures/friend4.json");
pub const MAN: &str = include_str!("../../fixtures/man.json");

/// What the server answers for one fixture path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

impl Fixture {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }
}

#[derive(Default)]
pub struct Fixtures {
    files: HashMap<String, Fixture>,
    requests: Vec<String>,
}

pub type Db = Arc<RwLock<Fixtures>>;

/// The bundled fixture files, keyed by file name.
pub fn default_fixtures() -> HashMap<String, Fixture> {
    [
        ("friend1.json", FRIEND1),
        ("friend2.json", FRIEND2),
        ("friend3.json", FRIEND3),
        ("friend4.json", FRIEND4),
        ("man.json", MAN),
    ]
    .into_iter()
    .map(|(name, body)| (name.to_string(), Fixture::ok(body)))
    .collect()
}

pub fn app() -> Router {
    app_with(default_fixtures())
}

pub fn app_with(files: HashMap<String, Fixture>) -> Router {
    let db: Db = Arc::new(RwLock::new(Fixtures {
        files,
        requests: Vec::new(),
    }));
    Router::new()
        .route("/__requests", get(list_requests))
        .route("/__fixtures/{file}", put(put_fixture))
        .route("/{file}", get(get_fixture))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "serving fixtures");
    }
    axum::serve(listener, app()).await
}

async fn get_fixture(State(db): State<Db>, Path(file): Path<String>) -> Response {
    let mut fixtures = db.write().await;
    fixtures.requests.push(format!("/{file}"));
    let Some(fixture) = fixtures.files.get(&file).cloned() else {
        debug!(file, "unknown fixture");
        return StatusCode::NOT_FOUND.into_response();
    };
    drop(fixtures);

    let status = StatusCode::from_u16(fixture.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        fixture.body,
    )
        .into_response()
}

async fn put_fixture(
    State(db): State<Db>,
    Path(file): Path<String>,
    Json(fixture): Json<Fixture>,
) -> Result<StatusCode, StatusCode> {
    if StatusCode::from_u16(fixture.status).is_err() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    debug!(file, status = fixture.status, "fixture overridden");
    db.write().await.files.insert(file, fixture);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_requests(State(db): State<Db>) -> Json<Vec<String>> {
    Json(db.read().await.requests.clone())
}
