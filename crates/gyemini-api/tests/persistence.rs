mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, authed, get, identity, json, send};

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let resp = send(&app, get("/api/health")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn identity_scoped_routes_need_a_token() {
    let app = app();

    let resp = send(&app, get("/api/ddays")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["error"], "Unauthorized");

    let resp = send(&app, authed("GET", "/api/ddays", "not-a-jwt")).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = send(&app, json("POST", "/api/posts", None, json!({ "title": "t", "content": "c" }))).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn identities_are_distinct() {
    let app = app();
    let (a, _) = identity(&app).await;
    let (b, _) = identity(&app).await;
    assert!(a.starts_with("user_"));
    assert_ne!(a, b);
}

#[tokio::test]
async fn dday_lifecycle() {
    let app = app();
    let (user_id, token) = identity(&app).await;
    let (_, other) = identity(&app).await;

    let resp = send(
        &app,
        json(
            "POST",
            "/api/ddays",
            Some(&token),
            json!({ "name": "수능", "targetDate": "2026-11-19", "goalAmount": 500000 }),
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["success"], true);
    let created = &resp.body["data"];
    assert_eq!(created["user_id"], user_id.as_str());
    assert_eq!(created["target_date"], "2026-11-19");
    assert_eq!(created["goal_amount"], 500000.0);
    let id = created["id"].as_str().unwrap().to_string();

    let resp = send(&app, authed("GET", "/api/ddays", &token)).await;
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);

    // Other identities see nothing and cannot delete
    let resp = send(&app, authed("GET", "/api/ddays", &other)).await;
    assert!(resp.body["data"].as_array().unwrap().is_empty());
    let resp = send(&app, authed("DELETE", &format!("/api/ddays/{}", id), &other)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = send(&app, authed("DELETE", &format!("/api/ddays/{}", id), &token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "success": true }));

    let resp = send(&app, authed("DELETE", &format!("/api/ddays/{}", id), &token)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dday_validation() {
    let app = app();
    let (_, token) = identity(&app).await;

    for body in [
        json!({ "name": "  ", "targetDate": "2026-01-01" }),
        json!({ "name": "x", "targetDate": "2026-13-01" }),
        json!({ "name": "x", "targetDate": "2026-01-01", "goalAmount": -1 }),
    ] {
        let resp = send(&app, json("POST", "/api/ddays", Some(&token), body)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(resp.body["error"].is_string());
    }
}

#[tokio::test]
async fn board_flow() {
    let app = app();
    let (author, token) = identity(&app).await;
    let (_, stranger) = identity(&app).await;

    let resp = send(
        &app,
        json("POST", "/api/posts", Some(&token), json!({ "title": "첫 글", "content": "안녕하세요" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["author_name"], "익명");
    assert_eq!(resp.body["user_id"], author.as_str());
    assert_eq!(resp.body["views"], 0);
    let id = resp.body["id"].as_i64().unwrap();

    let resp = send(&app, get(&format!("/api/posts/{}", id))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["views"], 1);
    assert_eq!(resp.body["content"], "안녕하세요");

    let update = json!({ "title": "수정", "content": "본문" });
    let resp = send(&app, json("PUT", &format!("/api/posts/{}", id), Some(&stranger), update.clone())).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = send(&app, json("PUT", &format!("/api/posts/{}", id), Some(&token), json!({ "title": "", "content": "x" }))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = send(&app, json("PUT", &format!("/api/posts/{}", id), Some(&token), update)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["title"], "수정");

    let resp = send(&app, authed("DELETE", &format!("/api/posts/{}", id), &stranger)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = send(&app, authed("DELETE", &format!("/api/posts/{}", id), &token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Post deleted");

    let resp = send(&app, get(&format!("/api/posts/{}", id))).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body["error"], "Post not found");
}

#[tokio::test]
async fn post_listing_paginates() {
    let app = app();
    let (_, token) = identity(&app).await;

    for i in 0..12 {
        let body = json!({ "title": format!("글 {}", i), "content": "c", "author_name": "철수" });
        let resp = send(&app, json("POST", "/api/posts", Some(&token), body)).await;
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    let resp = send(&app, get("/api/posts")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["posts"].as_array().unwrap().len(), 10);
    assert_eq!(resp.body["posts"][0]["title"], "글 11");
    assert_eq!(resp.body["posts"][0]["author_name"], "철수");
    assert!(resp.body["posts"][0].get("content").is_none());
    assert_eq!(
        resp.body["pagination"],
        json!({ "page": 1, "limit": 10, "total": 12, "totalPages": 2 })
    );

    let resp = send(&app, get("/api/posts?page=2&limit=10")).await;
    assert_eq!(resp.body["posts"].as_array().unwrap().len(), 2);

    let resp = send(&app, get("/api/posts?limit=500")).await;
    assert_eq!(resp.body["pagination"]["limit"], 100);

    let resp = send(&app, get("/api/posts?page=abc")).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn contact_requests() {
    let app = app();

    let resp = send(
        &app,
        json("POST", "/api/requests", None, json!({ "name": "홍길동", "email": "hong@example.com", "subject": "" , "message": "m" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "All fields are required");

    let resp = send(
        &app,
        json("POST", "/api/requests", None, json!({ "name": "홍길동", "email": "hong.example.com", "subject": "s", "message": "m" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Invalid email format");

    let resp = send(
        &app,
        json("POST", "/api/requests", None, json!({ "name": "홍길동", "email": "hong@example.com", "subject": "계산기 추가", "message": "대출 계산기 부탁드려요" })),
    )
    .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["message"], "Request submitted successfully");
    assert_eq!(resp.body["data"]["status"], "pending");

    let resp = send(&app, get("/api/requests?status=all")).await;
    assert_eq!(resp.body["requests"].as_array().unwrap().len(), 1);
    assert_eq!(resp.body["pagination"]["total"], 1);

    let resp = send(&app, get("/api/requests?status=resolved")).await;
    assert!(resp.body["requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn calculator_clicks() {
    let app = app();

    let resp = send(&app, get("/api/calculator-stats")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["calculators"].as_array().unwrap().len(), 8);

    let resp = send(&app, json("POST", "/api/calculator-stats", None, json!({ "calculator_id": "exchange" }))).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["id"], "exchange");
    assert_eq!(resp.body["click_count"], 1);
    assert!(resp.body["last_clicked_at"].is_string());

    let resp = send(&app, get("/api/calculator-stats")).await;
    assert_eq!(resp.body["calculators"][0]["id"], "exchange");

    let resp = send(&app, json("POST", "/api/calculator-stats", None, json!({}))).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = send(&app, json("POST", "/api/calculator-stats", None, json!({ "calculator_id": "loan" }))).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
