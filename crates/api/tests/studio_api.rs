//! HTTP-level integration tests for Design Studio editor sessions.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_empty, post_json, put_json, session_uri, FixedCopy, STORE};
use serde_json::{json, Value};
use studio_core::store::PageStore;

fn block_ids(session: &Value) -> Vec<String> {
    let active = session["active_page_id"].as_str().unwrap();
    let page = session["pages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == active)
        .unwrap();
    page["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

fn toast_messages(session: &Value) -> Vec<String> {
    session["toasts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["message"].as_str().unwrap().to_string())
        .collect()
}

async fn command(app: &axum::Router, sid: &str, body: Value) -> (StatusCode, Value) {
    let response = post_json(app.clone(), &session_uri(sid, "/commands"), body).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Opening and viewing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_open_session_starts_on_home_page() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;

    let response = post_json(
        t.app,
        &format!("/api/v1/stores/{STORE}/studio/sessions"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["store_id"], STORE);
    assert_eq!(data["tab"], "design");
    assert_eq!(data["active_page_id"], "home");
    assert_eq!(data["dirty"], false);
    assert_eq!(data["can_undo"], false);
    assert_eq!(data["history_len"], 1);
    assert_eq!(data["config"]["name"], "My Store");
    assert_eq!(data["onboarding"]["seen_welcome"], false);
    assert_eq!(block_ids(data), ["hero", "grid"]);
}

#[tokio::test]
async fn test_open_session_on_requested_page() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;

    let response = post_json(
        t.app,
        &format!("/api/v1/stores/{STORE}/studio/sessions"),
        json!({"page_id": "about"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["active_page_id"], "about");
}

#[tokio::test]
async fn test_session_is_scoped_to_its_store() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let response = get(t.app.clone(), &session_uri(&sid, "")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        t.app.clone(),
        &format!("/api/v1/stores/other/studio/sessions/{sid}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(t.app, &session_uri("missing", "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Commands and history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_add_delete_undo_redo() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let (status, json) = command(
        &t.app,
        &sid,
        json!({"command": "add_block", "block": {"type": "system-promo"}, "after": "hero"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let promo = json["data"]["outcome"]["block_id"].as_str().unwrap().to_string();
    let session = &json["data"]["session"];
    assert_eq!(block_ids(session), ["hero", promo.as_str(), "grid"]);
    assert_eq!(session["selected_block_id"], promo.as_str());
    assert_eq!(session["dirty"], true);
    assert_eq!(session["history_len"], 2);

    let (_, json) = command(&t.app, &sid, json!({"command": "delete_block", "block_id": "hero"})).await;
    assert_eq!(block_ids(&json["data"]["session"]), [promo.as_str(), "grid"]);

    let (_, json) = command(&t.app, &sid, json!({"command": "undo"})).await;
    let session = &json["data"]["session"];
    assert_eq!(block_ids(session), ["hero", promo.as_str(), "grid"]);
    assert_eq!(toast_messages(session), ["Undone"]);

    let (_, json) = command(&t.app, &sid, json!({"command": "undo"})).await;
    let session = &json["data"]["session"];
    assert_eq!(block_ids(session), ["hero", "grid"]);
    assert_eq!(session["can_undo"], false);
    assert_eq!(session["can_redo"], true);

    let (_, json) = command(&t.app, &sid, json!({"command": "redo"})).await;
    let session = &json["data"]["session"];
    assert_eq!(block_ids(session), ["hero", promo.as_str(), "grid"]);
    assert_eq!(toast_messages(session), ["Redone"]);
}

#[tokio::test]
async fn test_undo_at_start_is_a_no_op() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let (status, json) = command(&t.app, &sid, json!({"command": "undo"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outcome"]["changed"], false);
    assert_eq!(block_ids(&json["data"]["session"]), ["hero", "grid"]);
}

#[tokio::test]
async fn test_locked_block_cannot_be_deleted() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "toggle_locked", "block_id": "hero"})).await;
    let (status, json) = command(&t.app, &sid, json!({"command": "delete_block", "block_id": "hero"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn test_unknown_block_returns_404() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let (status, _) = command(&t.app, &sid, json!({"command": "toggle_hidden", "block_id": "nope"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_command_is_rejected() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let (status, _) = command(&t.app, &sid, json!({"command": "explode"})).await;
    assert!(status.is_client_error());
}

// ---------------------------------------------------------------------------
// Keyboard shortcuts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ctrl_z_undoes_and_ctrl_s_saves() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "rename_block", "block_id": "hero", "name": "Banner"})).await;

    let response = post_json(t.app.clone(), &session_uri(&sid, "/keys"), json!({"key": "z", "ctrl": true})).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "undo");
    assert!(json["data"].get("save").is_none());

    let response = post_json(t.app.clone(), &session_uri(&sid, "/keys"), json!({"key": "z", "meta": true, "shift": true})).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "redo");

    let response = post_json(t.app.clone(), &session_uri(&sid, "/keys"), json!({"key": "s", "meta": true})).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "save");
    assert_eq!(json["data"]["save"]["status"], "saved");
    assert_eq!(json["data"]["session"]["dirty"], false);

    let pages = t.store.list_pages(STORE).await.unwrap();
    assert_eq!(pages[0].blocks[0].name, "Banner");
}

#[tokio::test]
async fn test_plain_key_does_nothing() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let response = post_json(t.app, &session_uri(&sid, "/keys"), json!({"key": "z"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["action"], Value::Null);
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_manual_save_persists_draft() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "reorder_block", "from": 1, "to": 0})).await;

    let response = post_empty(t.app.clone(), &session_uri(&sid, "/save")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["save"]["status"], "saved");
    assert_eq!(json["data"]["save"]["pages"], 1);
    assert_eq!(json["data"]["session"]["dirty"], false);
    assert_eq!(toast_messages(&json["data"]["session"]), ["All changes saved"]);

    let pages = t.store.list_pages(STORE).await.unwrap();
    let ids: Vec<_> = pages[0].blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["grid", "hero"]);
}

#[tokio::test]
async fn test_saving_a_clean_session_writes_nothing() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let json = body_json(post_empty(t.app, &session_uri(&sid, "/save")).await).await;
    assert_eq!(json["data"]["save"]["status"], "saved");
    assert_eq!(json["data"]["save"]["pages"], 0);
    assert!(toast_messages(&json["data"]["session"]).is_empty());
    assert_eq!(t.store.update_count(), 0);
}

#[tokio::test]
async fn test_failed_save_keeps_draft_dirty() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;
    let mut rx = t.state.event_bus.subscribe();

    command(&t.app, &sid, json!({"command": "toggle_hidden", "block_id": "grid"})).await;
    t.store.set_fail_updates(true);

    let json = body_json(post_empty(t.app.clone(), &session_uri(&sid, "/save")).await).await;
    assert_eq!(json["data"]["save"]["status"], "failed");
    let session = &json["data"]["session"];
    assert_eq!(session["dirty"], true);
    assert_eq!(session["toasts"][0]["level"], "error");
    assert!(session["toasts"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("Save failed"));

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, "page.save_failed");

    t.store.set_fail_updates(false);
    let json = body_json(post_empty(t.app, &session_uri(&sid, "/save")).await).await;
    assert_eq!(json["data"]["save"]["status"], "saved");
    assert_eq!(json["data"]["session"]["dirty"], false);
    assert!(t.store.list_pages(STORE).await.unwrap()[0].blocks[1].hidden);
}

#[tokio::test]
async fn test_close_session_saves_pending_changes() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "rename_block", "block_id": "grid", "name": "Shop"})).await;

    let response = delete(t.app.clone(), &session_uri(&sid, "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["save"]["status"], "saved");

    assert_eq!(t.store.list_pages(STORE).await.unwrap()[0].blocks[1].name, "Shop");
    assert_eq!(t.state.sessions.count().await, 0);

    let response = get(t.app, &session_uri(&sid, "")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Keeping sessions in step with the store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_is_dropped_while_dirty() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "rename_block", "block_id": "hero", "name": "Local"})).await;
    put_json(
        t.app.clone(),
        &format!("/api/v1/stores/{STORE}/pages/home"),
        json!({"title": "Landing"}),
    )
    .await;

    let json = body_json(post_empty(t.app.clone(), &session_uri(&sid, "/refresh")).await).await;
    assert_eq!(json["data"]["applied"], false);
    assert_eq!(json["data"]["session"]["pages"][0]["title"], "Home");
    assert_eq!(json["data"]["session"]["pages"][0]["blocks"][0]["name"], "Local");
}

#[tokio::test]
async fn test_direct_page_edits_reach_clean_sessions() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    put_json(
        t.app.clone(),
        &format!("/api/v1/stores/{STORE}/pages/home"),
        json!({"title": "Landing"}),
    )
    .await;
    post_json(
        t.app.clone(),
        &format!("/api/v1/stores/{STORE}/pages"),
        json!({"title": "Lookbook", "slug": "/lookbook", "display_order": 5}),
    )
    .await;

    let json = body_json(get(t.app, &session_uri(&sid, "")).await).await;
    let titles: Vec<_> = json["data"]["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["Landing", "About", "Lookbook"]);
    assert_eq!(json["data"]["dirty"], false);
}

#[tokio::test]
async fn test_deleting_active_page_moves_session() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    command(&t.app, &sid, json!({"command": "set_active_page", "page_id": "about"})).await;
    delete(
        t.app.clone(),
        &format!("/api/v1/stores/{STORE}/pages/about?confirm=true"),
    )
    .await;

    let json = body_json(get(t.app, &session_uri(&sid, "")).await).await;
    assert_eq!(json["data"]["active_page_id"], "home");
    assert_eq!(json["data"]["pages"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Copy generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_generate_copy_fills_field() {
    let t = common::build_test_app_with(Arc::new(FixedCopy("  Built for the long haul ")));
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let response = post_json(
        t.app,
        &session_uri(&sid, "/blocks/hero/generate-copy"),
        json!({"field": "heading", "prompt": "Rugged outdoor gear"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["generated"], true);
    let session = &json["data"]["session"];
    assert_eq!(session["pages"][0]["blocks"][0]["data"]["heading"], "Built for the long haul");
    assert_eq!(session["dirty"], true);
    assert_eq!(session["can_undo"], true);
}

#[tokio::test]
async fn test_generate_copy_failure_leaves_block_unchanged() {
    let t = common::build_test_app();
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let response = post_json(
        t.app,
        &session_uri(&sid, "/blocks/hero/generate-copy"),
        json!({"field": "heading", "prompt": "Anything"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["generated"], false);
    let session = &json["data"]["session"];
    assert!(session["pages"][0]["blocks"][0]["data"].get("heading").is_none());
    assert_eq!(session["dirty"], false);
}

#[tokio::test]
async fn test_generate_copy_for_block_off_page_returns_404() {
    let t = common::build_test_app_with(Arc::new(FixedCopy("Hi")));
    common::seed_store(&t.store).await;
    let sid = common::open_session(&t.app).await;

    let response = post_json(
        t.app,
        &session_uri(&sid, "/blocks/intro/generate-copy"),
        json!({"field": "heading", "prompt": "Anything"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
