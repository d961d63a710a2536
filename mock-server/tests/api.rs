use axum::http::{self, Request, StatusCode};
use axum::{body::Body, Router};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockOptions, DEFAULT_TOKEN};
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "mock-test-boundary";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {DEFAULT_TOKEN}"))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    request(method, uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<String> {
    request(method, uri).body(String::new()).unwrap()
}

/// Multipart body with one part per `(field, file name, content type)`.
fn multipart_request(uri: &str, parts: &[(&str, &str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, file_name, content_type) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    request("POST", uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn new_user(email: &str, kind: &str) -> Value {
    json!({
        "email": email,
        "password": "password123",
        "name": "Test User",
        "type": kind,
        "status": "pending",
        "emailVerified": false
    })
}

async fn create(app: &Router, email: &str, kind: &str) -> Value {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/admin/users", new_user(email, kind)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/admin/users")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "Not authenticated"}));
}

#[tokio::test]
async fn custom_token_is_enforced() {
    let app = app_with(MockOptions {
        token: "other".into(),
        ..Default::default()
    });
    let resp = app.oneshot(empty("GET", "/admin/users")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- users ---

#[tokio::test]
async fn create_user_answers_snake_case() {
    let app = app();
    let user = create(&app, "creator@example.com", "creator").await;
    assert_eq!(user["type"], "creator");
    assert_eq!(user["email_verified"], false);
    assert!(user.get("created_at").is_some());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn duplicate_email_is_409() {
    let app = app();
    create(&app, "dup@example.com", "hotel").await;
    let resp = app
        .oneshot(json_request(
            "POST",
            "/admin/users",
            new_user("DUP@example.com", "hotel"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_user_lists_field_errors() {
    let mut body = new_user("not-an-email", "creator");
    body["password"] = json!("short");
    let resp = app()
        .oneshot(json_request("POST", "/admin/users", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail = body_json(resp).await["detail"].clone();
    let fields: Vec<&str> = detail
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["loc"][1].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let app = app();
    for i in 0..3 {
        create(&app, &format!("hotel{i}@example.com"), "hotel").await;
    }
    create(&app, "creator@example.com", "creator").await;

    let resp = app
        .clone()
        .oneshot(empty("GET", "/admin/users?type=hotel&page=2&page_size=2"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["users"].as_array().unwrap().len(), 1);

    let resp = app
        .oneshot(empty("GET", "/admin/users?search=CREATOR"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["users"][0]["email"], "creator@example.com");
}

#[tokio::test]
async fn detail_embeds_profile_by_type() {
    let app = app();
    let user = create(&app, "hotel@example.com", "hotel").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .oneshot(empty("GET", &format!("/admin/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let detail = body_json(resp).await;
    assert_eq!(detail["type"], "hotel");
    assert_eq!(detail["profile"]["name"], "Test User");
    assert_eq!(detail["profile"]["listings"], json!([]));
}

#[tokio::test]
async fn unknown_user_is_404() {
    let resp = app()
        .oneshot(empty(
            "GET",
            "/admin/users/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["detail"], "User not found");
}

#[tokio::test]
async fn update_user_touches_only_given_fields() {
    let app = app();
    let user = create(&app, "u@example.com", "creator").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/admin/users/{id}"),
            json!({"status": "verified"}),
        ))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["status"], "verified");
    assert_eq!(updated["name"], "Test User");
}

#[tokio::test]
async fn delete_cascades_and_admin_is_protected() {
    let app = app();
    let user = create(&app, "gone@example.com", "hotel").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(empty("DELETE", &format!("/admin/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["deleted_user"]["id"], user["id"]);

    let resp = app
        .clone()
        .oneshot(empty("GET", &format!("/admin/users/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(empty("GET", "/admin/users?type=admin"))
        .await
        .unwrap();
    let admin_id = body_json(resp).await["users"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let resp = app
        .oneshot(empty("DELETE", &format!("/admin/users/{admin_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- profiles and listings ---

#[tokio::test]
async fn creator_profile_update_replaces_platforms() {
    let app = app();
    let user = create(&app, "c@example.com", "creator").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/admin/users/{id}/profile/creator"),
            json!({
                "location": "Lisbon",
                "platforms": [{
                    "name": "Instagram",
                    "handle": "@c",
                    "followers": 1000,
                    "engagementRate": 2.5,
                    "topAgeGroups": [{"ageRange": "18-24"}]
                }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = body_json(resp).await;
    assert_eq!(profile["location"], "Lisbon");
    assert_eq!(profile["platforms"][0]["engagement_rate"], 2.5);
    assert_eq!(profile["platforms"][0]["top_age_groups"][0]["age_range"], "18-24");
}

#[tokio::test]
async fn listings_only_for_hotels() {
    let app = app();
    let creator = create(&app, "c@example.com", "creator").await;
    let id = creator["id"].as_str().unwrap();
    let resp = app
        .oneshot(json_request(
            "POST",
            &format!("/admin/users/{id}/listings"),
            json!({"name": "Room", "location": "X", "description": "Y"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_create_and_update() {
    let app = app();
    let hotel = create(&app, "h@example.com", "hotel").await;
    let id = hotel["id"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/users/{id}/listings"),
            json!({
                "name": "Suite",
                "location": "Nice",
                "description": "Sea view",
                "images": ["https://cdn/a.jpg"],
                "collaborationOfferings": [{
                    "collaborationType": "Paid",
                    "paidMaxAmount": 300.0,
                    "availabilityMonths": ["June"],
                    "platforms": ["TikTok"]
                }],
                "creatorRequirements": {"targetAgeMin": 25, "targetAgeMax": 100}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let listing = body_json(resp).await;
    assert_eq!(listing["collaboration_offerings"][0]["paid_max_amount"], 300.0);
    assert_eq!(listing["creator_requirements"]["target_age_max"], 100);
    let listing_id = listing["id"].as_str().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/admin/users/{id}/listings/{listing_id}"),
            json!({"images": []}),
        ))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["images"], json!([]));
    assert_eq!(updated["name"], "Suite");

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/admin/users/{id}/listings/00000000-0000-0000-0000-000000000000"),
            json!({"name": "X"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- marketplace preview ---

#[tokio::test]
async fn marketplace_listings_carry_hotel_and_age_groups() {
    let app = app();
    let hotel = create(&app, "h@example.com", "hotel").await;
    let id = hotel["id"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/users/{id}/listings"),
            json!({
                "name": "Suite",
                "location": "Nice",
                "description": "Sea view",
                "collaborationOfferings": [{
                    "collaborationType": "Discount",
                    "discountPercentage": 15.0
                }],
                "creatorRequirements": {
                    "platforms": ["Instagram"],
                    "minFollowers": 2000,
                    "targetAgeMin": 25,
                    "targetAgeMax": 44
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(empty("GET", "/marketplace/listings"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listings = body_json(resp).await;
    assert_eq!(listings.as_array().unwrap().len(), 1);
    assert_eq!(listings[0]["hotel_name"], "Test User");
    assert_eq!(
        listings[0]["collaboration_offerings"][0]["discount_percentage"],
        15.0
    );
    assert_eq!(
        listings[0]["creator_requirements"]["target_age_groups"],
        json!(["25-34", "35-44"])
    );
}

#[tokio::test]
async fn marketplace_creators_sum_followers() {
    let app = app();
    let mut body = new_user("c@example.com", "creator");
    body["creatorProfile"] = json!({
        "location": "Lisbon",
        "platforms": [
            {"name": "Instagram", "handle": "@c", "followers": 1000, "engagementRate": 2.0},
            {"name": "YouTube", "handle": "@c", "followers": 500, "engagementRate": 1.0}
        ]
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/admin/users", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    create(&app, "h@example.com", "hotel").await;

    let resp = app
        .oneshot(empty("GET", "/marketplace/creators"))
        .await
        .unwrap();
    let creators = body_json(resp).await;
    assert_eq!(creators.as_array().unwrap().len(), 1);
    assert_eq!(creators[0]["audience_size"], 1500);
    assert_eq!(creators[0]["total_reviews"], 0);
    assert_eq!(creators[0]["platforms"][1]["name"], "YouTube");
}

#[tokio::test]
async fn marketplace_needs_a_token() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/marketplace/listings")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- uploads ---

#[tokio::test]
async fn listing_upload_returns_one_image_per_part() {
    let app = app();
    let hotel = create(&app, "h@example.com", "hotel").await;
    let id = hotel["id"].as_str().unwrap();
    let resp = app
        .oneshot(multipart_request(
            &format!("/upload/images/listing?target_user_id={id}"),
            &[
                ("files", "a.jpg", "image/jpeg"),
                ("files", "b.png", "image/png"),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert!(images[0]["key"]
        .as_str()
        .unwrap()
        .starts_with(&format!("listings/{id}/")));
    assert_eq!(images[1]["format"], "png");
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = app();
    let user = create(&app, "c@example.com", "creator").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .oneshot(multipart_request(
            &format!("/upload/image/creator-profile?target_user_id={id}"),
            &[("file", "cv.pdf", "application/pdf")],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failing_storage_answers_500() {
    let app = app_with(MockOptions {
        fail_uploads: true,
        ..Default::default()
    });
    let user = create(&app, "c@example.com", "creator").await;
    let id = user["id"].as_str().unwrap();
    let resp = app
        .oneshot(multipart_request(
            &format!("/upload/image/creator-profile?target_user_id={id}"),
            &[("file", "me.jpg", "image/jpeg")],
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn hotel_prefix_upload() {
    let app = app();
    let hotel = create(&app, "h@example.com", "hotel").await;
    let id = hotel["id"].as_str().unwrap();
    let resp = app
        .oneshot(multipart_request(
            &format!("/upload/images?target_user_id={id}&prefix=hotels"),
            &[("files", "front.jpg", "image/jpeg")],
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(body["images"][0]["url"]
        .as_str()
        .unwrap()
        .contains("/hotels/"));
}
