// REST API over a single shared ledger store (axum)

use crate::error::LedgerError;
use crate::friend::{BalanceStatus, Friend, FriendId};
use crate::history::LedgerEvent;
use crate::ids::UuidGenerator;
use crate::split::Payer;
use crate::store::{FriendLedgerStore, LedgerState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<FriendLedgerStore>>,
}

impl AppState {
    pub fn new(store: FriendLedgerStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    // A poisoned lock still holds a consistent ledger: operations are all-or-nothing
    fn lock(&self) -> MutexGuard<'_, FriendLedgerStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

#[derive(Serialize)]
pub struct ApiError {
    code: &'static str,
    message: String,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn error_response(err: LedgerError) -> Response {
    let status = match err {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NoSelection => StatusCode::CONFLICT,
        LedgerError::InvalidReference(_) => StatusCode::NOT_FOUND,
    };
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(ApiError {
            code: err.code(),
            message: err.to_string(),
        }),
    };
    (status, Json(body)).into_response()
}

/// Friend as seen by clients, with the derived balance fields
#[derive(Serialize)]
pub struct FriendResponse {
    id: FriendId,
    name: String,
    image_url: String,
    balance: f64,
    status: BalanceStatus,
    label: String,
    selected: bool,
}

#[derive(Serialize)]
pub struct StateResponse {
    friends: Vec<FriendResponse>,
    selected_friend_id: Option<FriendId>,
    is_add_panel_open: bool,
}

impl FriendResponse {
    fn new(friend: &Friend, selected: bool) -> Self {
        Self {
            id: friend.id().clone(),
            name: friend.name().to_string(),
            image_url: friend.image_url().to_string(),
            balance: friend.balance(),
            status: friend.status(),
            label: friend.balance_label(),
            selected,
        }
    }
}

impl From<&LedgerState> for StateResponse {
    fn from(state: &LedgerState) -> Self {
        Self {
            friends: state
                .friends()
                .iter()
                .map(|f| FriendResponse::new(f, state.is_selected(f.id())))
                .collect(),
            selected_friend_id: state.selected_friend_id().cloned(),
            is_add_panel_open: state.is_add_panel_open(),
        }
    }
}

#[derive(Deserialize)]
pub struct AddFriendRequest {
    name: String,
    image_url: String,
}

#[derive(Deserialize)]
pub struct SplitBillRequest {
    paid_by: Payer,
    bill_total: f64,
    user_expense: f64,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/state - Current ledger snapshot
async fn get_state(State(state): State<AppState>) -> Response {
    let store = state.lock();
    ApiResponse::ok(StateResponse::from(store.state()))
}

/// GET /api/history - Activity log, oldest first
async fn get_history(State(state): State<AppState>) -> Response {
    let store = state.lock();
    let events: Vec<LedgerEvent> = store.history().to_vec();
    ApiResponse::ok(events)
}

/// POST /api/add-panel/toggle
async fn toggle_add_panel(State(state): State<AppState>) -> Response {
    let mut store = state.lock();
    store.toggle_add_panel();
    ApiResponse::ok(StateResponse::from(store.state()))
}

/// POST /api/friends - Add a friend (id is generated server-side)
async fn add_friend(
    State(state): State<AppState>,
    Json(request): Json<AddFriendRequest>,
) -> Response {
    let mut store = state.lock();
    match store.add_friend(&request.name, &request.image_url, &mut UuidGenerator) {
        Ok(_) => ApiResponse::ok(StateResponse::from(store.state())),
        Err(e) => error_response(e),
    }
}

/// POST /api/friends/:id/select - Toggle-select a friend
async fn select_friend(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.lock();
    match store.select_friend(&FriendId::from(id)) {
        Ok(_) => ApiResponse::ok(StateResponse::from(store.state())),
        Err(e) => error_response(e),
    }
}

/// POST /api/split - Split a bill with the selected friend
async fn split_bill(
    State(state): State<AppState>,
    Json(request): Json<SplitBillRequest>,
) -> Response {
    let mut store = state.lock();
    match store.split_bill(request.paid_by, request.bill_total, request.user_expense) {
        Ok(_) => ApiResponse::ok(StateResponse::from(store.state())),
        Err(e) => error_response(e),
    }
}

/// Build the full router; the binary only binds and serves it
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/state", get(get_state))
        .route("/history", get(get_history))
        .route("/add-panel/toggle", post(toggle_add_panel))
        .route("/friends", post(add_friend))
        .route("/friends/:id/select", post(select_friend))
        .route("/split", post(split_bill))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(FriendLedgerStore::new()))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_and_state() {
        let app = app();

        let (status, body) = call(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");

        let (status, body) = call(&app, "GET", "/api/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["friends"].as_array().unwrap().len(), 3);
        assert_eq!(body["data"]["friends"][0]["label"], "You owe Clark $7");
        assert_eq!(body["data"]["friends"][1]["status"], "owes_you");
    }

    #[tokio::test]
    async fn test_select_and_split() {
        let app = app();

        let (status, body) = call(&app, "POST", "/api/friends/118836/select", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["selected_friend_id"], "118836");

        let split = json!({ "paid_by": "user", "bill_total": 100.0, "user_expense": 40.0 });
        let (status, body) = call(&app, "POST", "/api/split", Some(split)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["friends"][0]["balance"], 53.0);
        assert_eq!(body["data"]["selected_friend_id"], Value::Null);

        let (_, body) = call(&app, "GET", "/api/history", None).await;
        let events = body["data"].as_array().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["type"], "bill_split");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app();

        let split = json!({ "paid_by": "friend", "bill_total": 10.0, "user_expense": 5.0 });
        let (status, body) = call(&app, "POST", "/api/split", Some(split)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "no_selection");

        let (status, _) = call(&app, "POST", "/api/friends/nope/select", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        call(&app, "POST", "/api/friends/933372/select", None).await;
        let split = json!({ "paid_by": "friend", "bill_total": 10.0, "user_expense": 50.0 });
        let (status, body) = call(&app, "POST", "/api/split", Some(split)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation");
    }

    #[tokio::test]
    async fn test_add_friend() {
        let app = app();

        let (_, body) = call(&app, "POST", "/api/add-panel/toggle", None).await;
        assert_eq!(body["data"]["is_add_panel_open"], true);

        let friend = json!({ "name": "Dana", "image_url": "http://x" });
        let (status, body) = call(&app, "POST", "/api/friends", Some(friend)).await;
        assert_eq!(status, StatusCode::OK);
        let friends = body["data"]["friends"].as_array().unwrap();
        assert_eq!(friends.len(), 4);
        assert_eq!(friends[3]["name"], "Dana");
        assert_eq!(friends[3]["balance"], 0.0);
        assert_eq!(body["data"]["is_add_panel_open"], false);

        let blank = json!({ "name": "", "image_url": "http://x" });
        let (status, _) = call(&app, "POST", "/api/friends", Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
