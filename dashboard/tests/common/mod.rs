//! In-process catalog server for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use nebula_dashboard::app::Executor;
use nebula_dashboard::client::CatalogClient;
use nebula_dashboard::config::ApiConfig;
use nebula_dashboard::controller::{Command, Dashboard};
use serde_json::{Value, json};

/// Scripted state of the mock catalog.
pub struct Mock {
    /// `"METHOD /path"` for every request, in arrival order
    pub log: Mutex<Vec<String>>,
    /// JSON bodies of POST and PATCH requests
    pub bodies: Mutex<Vec<Value>>,
    /// Developer record, or `None` for 404
    pub developer: Mutex<Option<Value>>,
    /// Status and raw body for the stats endpoint
    pub stats: Mutex<(StatusCode, String)>,
    /// Status returned by mutating endpoints instead of success
    pub fail_mutations: Mutex<Option<StatusCode>>,
}

impl Mock {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn set_stats(&self, status: StatusCode, body: &str) {
        *self.stats.lock().unwrap() = (status, body.to_string());
    }
}

pub fn developer_json(apps: Value) -> Value {
    json!({
        "id": "42",
        "registrationDate": "2024-01-01",
        "starsBalance": 10,
        "referralCode": "R1",
        "apps": apps
    })
}

/// A running mock catalog.
pub struct MockCatalog {
    pub base_url: String,
    pub state: Arc<Mock>,
}

impl MockCatalog {
    /// Serve on `127.0.0.1` with an ephemeral port, on a thread of its own.
    pub fn start(developer: Option<Value>) -> Self {
        let state = Arc::new(Mock {
            log: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
            developer: Mutex::new(developer),
            stats: Mutex::new((StatusCode::OK, "[]".to_string())),
            fail_mutations: Mutex::new(None),
        });

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let router = router(Arc::clone(&state));
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, router).await.unwrap();
            });
        });

        Self { base_url, state }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        }
    }

    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.api_config()).unwrap()
    }

    pub fn executor(&self) -> Executor {
        Executor::new(self.client(), Arc::new(|| {})).unwrap()
    }
}

fn router(state: Arc<Mock>) -> Router {
    Router::new()
        .route("/api/developer/{user_id}", get(get_developer))
        .route("/api/developer/{user_id}/stats", get(get_stats))
        .route("/api/developer/{user_id}/apps", post(create_app))
        .route("/api/developer/{user_id}/apps/{app_id}", patch(update_app))
        .route("/api/developer/{user_id}/promote", post(promote))
        .with_state(state)
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn failure(mock: &Mock) -> Option<Response> {
    let status = (*mock.fail_mutations.lock().unwrap())?;
    Some((status, Json(json!({ "error": "Сервис недоступен" }))).into_response())
}

async fn get_developer(State(mock): State<Arc<Mock>>, Path(user_id): Path<String>) -> Response {
    mock.record(format!("GET /api/developer/{}", user_id));
    match mock.developer.lock().unwrap().clone() {
        Some(developer) => Json(developer).into_response(),
        None => not_found("Developer not found"),
    }
}

async fn get_stats(State(mock): State<Arc<Mock>>, Path(user_id): Path<String>) -> Response {
    mock.record(format!("GET /api/developer/{}/stats", user_id));
    let (status, body) = mock.stats.lock().unwrap().clone();
    (status, [("content-type", "application/json")], body).into_response()
}

async fn create_app(
    State(mock): State<Arc<Mock>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(format!("POST /api/developer/{}/apps", user_id));
    mock.bodies.lock().unwrap().push(body.clone());
    if let Some(response) = failure(&mock) {
        return response;
    }

    let mut app = body;
    app["id"] = json!("new-1");
    app["status"] = json!("onModeration");
    app["editCount"] = json!(0);
    if let Some(developer) = mock.developer.lock().unwrap().as_mut() {
        if let Some(apps) = developer["apps"].as_array_mut() {
            apps.push(app.clone());
        }
    }
    (StatusCode::CREATED, Json(app)).into_response()
}

async fn update_app(
    State(mock): State<Arc<Mock>>,
    Path((user_id, app_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(format!("PATCH /api/developer/{}/apps/{}", user_id, app_id));
    mock.bodies.lock().unwrap().push(body.clone());
    if let Some(response) = failure(&mock) {
        return response;
    }

    let mut app = body;
    app["id"] = json!(app_id);
    app["status"] = json!("onModeration");
    app["editCount"] = json!(1);
    Json(app).into_response()
}

async fn promote(
    State(mock): State<Arc<Mock>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    mock.record(format!("POST /api/developer/{}/promote", user_id));
    mock.bodies.lock().unwrap().push(body.clone());
    if let Some(response) = failure(&mock) {
        return response;
    }

    let app_id = body["appId"].as_str().unwrap_or_default().to_string();
    let mut guard = mock.developer.lock().unwrap();
    let Some(app) = guard
        .as_mut()
        .and_then(|developer| developer["apps"].as_array_mut())
        .and_then(|apps| apps.iter_mut().find(|app| app["id"] == app_id.as_str()))
    else {
        return not_found("App not found");
    };
    let (start, finish) = match body["type"].as_str() {
        Some("category") => ("startPromoCategory", "finishPromoCategory"),
        _ => ("startPromoCatalog", "finishPromoCatalog"),
    };
    app[start] = json!("2025-01-01T00:00:00Z");
    app[finish] = json!("2025-01-04T00:00:00Z");

    Json(json!({ "message": "Продвижение успешно активировано" })).into_response()
}

/// Run commands and every follow-up until the controller goes quiet.
pub fn drive(dashboard: &mut Dashboard, executor: &Executor, commands: Vec<Command>) {
    let mut pending = commands.len();
    executor.submit(commands);
    while pending > 0 {
        let completion = executor
            .recv_timeout(Duration::from_secs(10))
            .expect("request did not complete");
        pending -= 1;
        let follow_up = dashboard.complete(completion);
        pending += follow_up.len();
        executor.submit(follow_up);
    }
}
