// ============================================================================
// HRNav API - Menu Handlers
// File: crates/hrnav-api/src/handlers/menu.rs
// ============================================================================
//! Stateless menu endpoints. The client sends its role snapshot, current route,
//! and expansion state; each request rebuilds a session from the shared tree.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use hrnav_core::services::{MenuIntent, MenuSession, RenderMenu, ViewSelection};
use hrnav_core::{
    AccessContext, ActiveSelection, ExpansionState, ExpansionStateMachine, Level, MenuError, NodeId,
    RoleSnapshot,
};

use crate::response::{failure, ApiFailure, ApiResponse};
use crate::state::AppState;

/// Named view picked from level-1 items of the master menu.
#[derive(Debug, Deserialize, Validate)]
pub struct ViewDto {
    #[validate(length(min = 1, max = 100, message = "View name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 64, message = "A view holds at most 64 items"))]
    pub items: Vec<NodeId>,
}

/// View request payload - role snapshot fields sit at the top level.
#[derive(Debug, Deserialize, Validate)]
pub struct ViewRequest {
    #[serde(flatten)]
    pub access: RoleSnapshot,
    #[validate(length(max = 2048, message = "Path too long"))]
    pub path: String,
    pub viewport_width: Option<u32>,
    #[validate(nested)]
    pub view: Option<ViewDto>,
}

/// Toggle request payload
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub state: ExpansionState,
    pub level: u8,
    pub id: NodeId,
}

/// Activate request payload
#[derive(Debug, Deserialize, Validate)]
pub struct ActivateRequest {
    #[serde(flatten)]
    pub access: RoleSnapshot,
    #[validate(length(max = 2048, message = "Path too long"))]
    pub path: String,
    #[serde(default)]
    pub state: ExpansionState,
    #[validate(length(min = 1, max = 4, message = "Level path must hold 1 to 4 ids"))]
    pub level_path: Vec<NodeId>,
    pub viewport_width: Option<u32>,
    #[validate(nested)]
    pub view: Option<ViewDto>,
}

#[derive(Debug, Serialize)]
pub struct MenuView {
    pub selection: ActiveSelection,
    pub state: ExpansionState,
    pub menu: RenderMenu,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub intents: Vec<MenuIntent>,
    pub selection: ActiveSelection,
    pub state: ExpansionState,
    pub menu: RenderMenu,
}

/// View handler - POST /api/v1/menu/view
pub async fn view(
    State(state): State<AppState>,
    Json(payload): Json<ViewRequest>,
) -> Result<Json<ApiResponse<MenuView>>, ApiFailure> {
    payload.validate().map_err(|e| failure(MenuError::from(e)))?;

    let mut session = open_session(&state, &payload.access, payload.view, payload.viewport_width);
    session.on_route_change(&payload.path);

    Ok(Json(ApiResponse::success(MenuView {
        selection: session.selection().clone(),
        state: session.expansion().clone(),
        menu: session.render(),
    })))
}

/// Toggle handler - POST /api/v1/menu/toggle
pub async fn toggle(Json(payload): Json<ToggleRequest>) -> Result<Json<ApiResponse<ExpansionState>>, ApiFailure> {
    let level = Level::try_from(payload.level).map_err(failure)?;

    let mut machine = ExpansionStateMachine::default();
    machine.restore(payload.state);
    machine.toggle(level, payload.id);

    Ok(Json(ApiResponse::success(machine.state().clone())))
}

/// Activate handler - POST /api/v1/menu/activate
pub async fn activate(
    State(state): State<AppState>,
    Json(payload): Json<ActivateRequest>,
) -> Result<Json<ApiResponse<ActivateResponse>>, ApiFailure> {
    payload.validate().map_err(|e| failure(MenuError::from(e)))?;

    let mut session = open_session(&state, &payload.access, payload.view, payload.viewport_width);
    session.on_route_change(&payload.path);
    session.restore_expansion(payload.state);

    let intents = session.click(&payload.level_path);
    for intent in &intents {
        if let MenuIntent::Navigate { path } = intent {
            session.on_route_change(path);
        }
    }
    debug!("Activate produced {} intents", intents.len());

    Ok(Json(ApiResponse::success(ActivateResponse {
        intents,
        selection: session.selection().clone(),
        state: session.expansion().clone(),
        menu: session.render(),
    })))
}

fn open_session(
    state: &AppState,
    snapshot: &RoleSnapshot,
    view: Option<ViewDto>,
    viewport_width: Option<u32>,
) -> MenuSession {
    let mut session = MenuSession::new(state.tree.clone(), state.settings);
    if let Some(view) = view {
        session = session.with_view(ViewSelection::new(&view.name, view.items));
    }
    session.set_access(AccessContext::from_snapshot(snapshot));
    if let Some(width) = viewport_width {
        session.set_viewport_width(width);
    }
    session
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use hrnav_core::services::SessionSettings;
    use hrnav_core::MenuTree;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::router;
    use crate::state::AppState;

    fn app() -> Router {
        router(AppState {
            tree: Arc::new(MenuTree::hr_dashboard().unwrap()),
            settings: SessionSettings::default(),
        })
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_view_for_employee() {
        let (status, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "employee", "path": "/hrm/leaves" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["selection"]["level1"], "leaves");
        assert_eq!(data["selection"]["level2"], "1");
        assert_eq!(data["state"]["open"], json!(["leaves", "1", null, null]));

        let names: Vec<&str> = data["menu"]["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Main", "HRM", "Work"]);
    }

    #[tokio::test]
    async fn test_view_hidden_route_resolves_to_nothing() {
        let (status, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "manager", "path": "/admin/companies" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["selection"]["level1"], Value::Null);
        assert_eq!(body["data"]["state"]["open"], json!([null, null, null, null]));
    }

    #[tokio::test]
    async fn test_view_while_loading_is_restricted() {
        let (_, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "super-admin", "is_loading": true, "path": "/admin/companies" }),
        )
        .await;
        assert_eq!(body["data"]["selection"]["level1"], Value::Null);
    }

    #[tokio::test]
    async fn test_view_on_compact_viewport_is_collapsed() {
        let (_, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "admin", "path": "/dashboard", "viewport_width": 480 }),
        )
        .await;
        assert_eq!(body["data"]["menu"]["collapsed"], true);
        assert_eq!(body["data"]["state"]["collapsed_globally"], true);
    }

    #[tokio::test]
    async fn test_view_rejects_empty_view_name() {
        let (status, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "admin", "path": "/", "view": { "name": "", "items": [] } }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_view_rejects_oversized_view() {
        let items: Vec<u32> = (1..=65).collect();
        let (status, body) = post(
            "/api/v1/menu/view",
            json!({ "role": "admin", "path": "/", "view": { "name": "Everything", "items": items } }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_view_repeated_items_render_once() {
        let (status, body) = post(
            "/api/v1/menu/view",
            json!({
                "role": "employee",
                "path": "/hrm/leaves",
                "view": { "name": "Self Service", "items": ["leaves", "payroll", "leaves"] }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let items = body["data"]["menu"]["categories"][0]["items"].as_array().unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["leaves", "payroll"]);
        let open: Vec<bool> = items.iter().map(|i| i["open"].as_bool().unwrap()).collect();
        assert_eq!(open, vec![true, false]);
    }

    #[tokio::test]
    async fn test_toggle_replaces_open_branch() {
        let (status, body) = post(
            "/api/v1/menu/toggle",
            json!({
                "state": { "open": ["leaves", "1", null, null], "collapsed_globally": false },
                "level": 1,
                "id": "payroll"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["open"], json!(["payroll", null, null, null]));
    }

    #[tokio::test]
    async fn test_toggle_rejects_invalid_level() {
        let (status, body) = post("/api/v1/menu/toggle", json!({ "level": 7, "id": 1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_activate_leaf_navigates_and_reseeds() {
        let (status, body) = post(
            "/api/v1/menu/activate",
            json!({
                "role": "employee",
                "path": "/dashboard",
                "state": { "open": ["leaves", null, null, null] },
                "level_path": ["leaves", 1]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["intents"], json!([{ "type": "navigate", "path": "/hrm/leaves" }]));
        assert_eq!(data["selection"]["level2"], "1");
        assert_eq!(data["state"]["open"], json!(["leaves", "1", null, null]));
    }

    #[tokio::test]
    async fn test_activate_group_toggles() {
        let (_, body) = post(
            "/api/v1/menu/activate",
            json!({
                "role": "admin",
                "path": "/dashboard",
                "level_path": ["payroll"]
            }),
        )
        .await;

        let data = &body["data"];
        assert_eq!(data["intents"], json!([{ "type": "toggle", "level": 1, "id": "payroll" }]));
        assert_eq!(data["state"]["open"], json!(["payroll", null, null, null]));
    }

    #[tokio::test]
    async fn test_activate_requires_level_path() {
        let (status, _) = post(
            "/api/v1/menu/activate",
            json!({ "role": "admin", "path": "/dashboard", "level_path": [] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
