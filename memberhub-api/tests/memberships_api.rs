//! HTTP tests for `/api/membership`

mod common;

use axum::http::StatusCode;
use common::{date_in_days, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_member_membership_lifecycle() {
    let ctx = TestContext::new();

    let member_id = ctx.create_member("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .post(
            &format!("/api/membership/{}", member_id),
            json!({ "startDate": date_in_days(0), "endDate": date_in_days(365) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Membership registered successfully");
    assert_eq!(body["newMembership"]["memberId"], member_id);
    assert_eq!(body["newMembership"]["member"]["name"], "Ada");
    let membership_id = body["newMembership"]["id"].as_i64().unwrap();

    let (status, body) = ctx
        .get(&format!("/api/membership/{}", membership_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Membership fetched successfully");
    assert_eq!(body["membership"]["member"]["id"], member_id);
    assert!(body["membership"]["startDate"].is_string());
    assert!(body["membership"]["endDate"].is_string());

    let (status, _) = ctx.delete(&format!("/api/member/{}", member_id)).await;
    assert_eq!(status, StatusCode::OK);

    // Memberships go with their member
    let (status, body) = ctx
        .get(&format!("/api/membership/{}", membership_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        format!("Membership with ID {} not found.", membership_id)
    );
}

#[tokio::test]
async fn test_add_membership_missing_fields() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;

    for (uri, payload) in [
        (
            format!("/api/membership/{}", member_id),
            json!({ "startDate": date_in_days(1) }),
        ),
        (
            format!("/api/membership/{}", member_id),
            json!({ "startDate": "", "endDate": date_in_days(2) }),
        ),
        (
            "/api/membership/abc".to_string(),
            json!({ "startDate": date_in_days(1), "endDate": date_in_days(2) }),
        ),
        (
            "/api/membership/0".to_string(),
            json!({ "startDate": date_in_days(1), "endDate": date_in_days(2) }),
        ),
    ] {
        let (status, body) = ctx.post(&uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "fields missing or invalid.");
    }
}

#[tokio::test]
async fn test_add_membership_invalid_dates() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;
    let uri = format!("/api/membership/{}", member_id);

    for payload in [
        json!({ "startDate": date_in_days(-1), "endDate": date_in_days(10) }),
        json!({ "startDate": date_in_days(1), "endDate": "next week" }),
        json!({ "startDate": "2030/01/01", "endDate": date_in_days(10) }),
        json!({ "startDate": 20300101, "endDate": date_in_days(10) }),
        json!({ "startDate": date_in_days(1), "endDate": true }),
    ] {
        let (status, body) = ctx.post(&uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Invalid date format. Expected format: YYYY-MM-DD"
        );
    }

    let (_, body) = ctx.get("/api/membership").await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_add_membership_unknown_member() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/api/membership/77",
            json!({ "startDate": date_in_days(1), "endDate": date_in_days(2) }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member with ID 77 not found.");
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_list_memberships() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;

    let late = ctx
        .create_membership(member_id, &date_in_days(1), &date_in_days(90))
        .await;
    let early = ctx
        .create_membership(member_id, &date_in_days(5), &date_in_days(30))
        .await;

    // Default sort is endDate ascending
    let (status, body) = ctx.get("/api/membership").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Membership/s fetched successfully");
    assert_eq!(body["pageDetails"], json!({ "page": 1, "pageSize": 10 }));
    let memberships = body["memberships"].as_array().unwrap();
    assert_eq!(memberships.len(), 2);
    assert_eq!(memberships[0]["id"], early);
    assert_eq!(memberships[1]["id"], late);
    assert_eq!(memberships[0]["member"]["id"], member_id);

    let (_, body) = ctx.get("/api/membership?sortBy=startDate").await;
    assert_eq!(body["memberships"][0]["id"], late);

    let (_, body) = ctx.get("/api/membership?sortBy=startDate&order=desc").await;
    assert_eq!(body["memberships"][0]["id"], early);

    let (_, body) = ctx.get("/api/membership?page=1&pageSize=1").await;
    assert_eq!(body["memberships"].as_array().unwrap().len(), 1);
    assert_eq!(body["pageDetails"], json!({ "page": 1, "pageSize": 1 }));
}

#[tokio::test]
async fn test_list_memberships_empty() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/membership").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "memberships empty");
    assert!(body.get("memberships").is_none());
}

#[tokio::test]
async fn test_update_membership() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;
    let membership_id = ctx
        .create_membership(member_id, &date_in_days(1), &date_in_days(30))
        .await;

    let (_, before) = ctx
        .get(&format!("/api/membership/{}", membership_id))
        .await;

    let (status, body) = ctx
        .put(
            &format!("/api/membership/{}", membership_id),
            json!({ "endDate": date_in_days(60) }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Membership updated successfully");
    let updated = &body["updatedMembership"];
    assert_eq!(updated["startDate"], before["membership"]["startDate"]);
    assert_ne!(updated["endDate"], before["membership"]["endDate"]);
    assert_eq!(updated["member"]["id"], member_id);

    // An empty object leaves the membership unchanged
    let (status, body) = ctx
        .put(&format!("/api/membership/{}", membership_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedMembership"]["endDate"], updated["endDate"]);
}

#[tokio::test]
async fn test_update_membership_validation() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;
    let membership_id = ctx
        .create_membership(member_id, &date_in_days(1), &date_in_days(30))
        .await;
    let uri = format!("/api/membership/{}", membership_id);

    let (status, body) = ctx
        .put(&uri, json!({ "startDate": date_in_days(-3) }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid startDate format. Expected format: YYYY-MM-DD"
    );

    let (status, body) = ctx.put(&uri, json!({ "endDate": "31-12-2030" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid endDate format. Expected format: YYYY-MM-DD"
    );

    let (status, body) = ctx.put(&uri, json!({ "startDate": 20300101 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid startDate format. Expected format: YYYY-MM-DD"
    );

    let (status, body) = ctx
        .put("/api/membership/xyz", json!({ "endDate": date_in_days(5) }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "membershipId is missing or invalid.");

    let (status, body) = ctx
        .put("/api/membership/404", json!({ "endDate": date_in_days(5) }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Membership with ID 404 not found.");
}

#[tokio::test]
async fn test_delete_membership() {
    let ctx = TestContext::new();
    let member_id = ctx.create_member("Ada", "ada@example.com").await;
    let membership_id = ctx
        .create_membership(member_id, &date_in_days(1), &date_in_days(30))
        .await;

    let (status, body) = ctx
        .delete(&format!("/api/membership/{}", membership_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Membership deleted successfully");
    assert_eq!(body["deletedMembership"]["id"], membership_id);
    assert_eq!(body["deletedMembership"]["member"]["id"], member_id);

    // The member stays
    let (status, body) = ctx.get(&format!("/api/member/{}", member_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["member"]["memberships"].as_array().unwrap().is_empty());

    let (status, _) = ctx
        .delete(&format!("/api/membership/{}", membership_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
