mod common;

use axum::{body::Body, http::{Request, StatusCode}};
use serde_json::json;
use tower::ServiceExt;

use turncoat_commerce::api::router;
use turncoat_commerce::api::webhooks::WEBHOOK_BODY_LIMIT;

fn webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/sumup")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn acknowledges_status_change_and_looks_up_checkout() {
    let fake = common::FakeSumUp::start().await;
    fake.insert_checkout(json!({"id": "chk_9", "status": "PAID"}));
    let (state, _) = common::app_state(fake.provider());

    let res = router(state)
        .oneshot(webhook(r#"{"event_type":"CHECKOUT_STATUS_CHANGED","id":"chk_9"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::body_json(res).await, json!({"success": true, "message": "Webhook received and processed"}));

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v0.1/checkouts/chk_9");
}

#[tokio::test]
async fn acknowledges_other_events_without_lookup() {
    let fake = common::FakeSumUp::start().await;
    let (state, _) = common::app_state(fake.provider());

    let res = router(state).oneshot(webhook(r#"{"event_type":"PAYOUT_SENT","id":"po_1"}"#)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::body_json(res).await["success"], true);
    assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn acknowledges_when_upstream_lookup_fails() {
    let (state, _) = common::app_state(common::unreachable_provider());
    let res = router(state)
        .oneshot(webhook(r#"{"event_type":"CHECKOUT_STATUS_CHANGED","id":"chk_1"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::body_json(res).await["success"], true);
}

#[tokio::test]
async fn acknowledges_malformed_payloads() {
    for body in ["not json", "[1,2,3]", "", r#"{"event_type": 42}"#] {
        let (state, _) = common::app_state(common::unreachable_provider());
        let res = router(state).oneshot(webhook(body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "body {:?}", body);
        assert_eq!(
            common::body_json(res).await,
            json!({"success": false, "message": "Webhook received but processing failed"})
        );
    }
}

#[tokio::test]
async fn acknowledges_oversize_payloads() {
    let (state, _) = common::app_state(common::unreachable_provider());
    let padding = "x".repeat(3 * 1024 * 1024);
    let body = json!({"event_type": "CHECKOUT_STATUS_CHANGED", "id": "chk_1", "padding": padding}).to_string();
    assert!(body.len() > WEBHOOK_BODY_LIMIT);

    let res = router(state).oneshot(webhook(&body)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(res).await,
        json!({"success": false, "message": "Webhook received but processing failed"})
    );
}

#[tokio::test]
async fn accepts_large_payloads_within_bound() {
    let fake = common::FakeSumUp::start().await;
    let (state, _) = common::app_state(fake.provider());
    let padding = "x".repeat(WEBHOOK_BODY_LIMIT / 2);
    let body = json!({"event_type": "PAYOUT_SENT", "id": "po_1", "padding": padding}).to_string();

    let res = router(state).oneshot(webhook(&body)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::body_json(res).await["success"], true);
}
