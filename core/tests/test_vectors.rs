//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use admin_core::draft::{ListingDraft, UserDraft};
use admin_core::payloads::UserQuery;
use admin_core::types::{OfferingTerms, UsersPage};
use admin_core::{
    describe, Action, AdminClient, ApiError, HttpMethod, HttpRequest, HttpResponse, User,
    UserStatus, UserType,
};
use serde_json::Value;
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8000";

fn client() -> AdminClient {
    AdminClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Compare method, path, headers and JSON body against `expected_request`.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );
    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let pair = h.as_array().unwrap();
                (
                    pair[0].as_str().unwrap().to_string(),
                    pair[1].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }
    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body_text().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

/// Check the error variant and the message shown for `action`.
fn check_error(name: &str, case: &Value, err: &ApiError, action: Action) {
    let matched = match case["expected_error"].as_str().unwrap() {
        "NotFound" => matches!(err, ApiError::NotFound { .. }),
        "Unauthorized" => matches!(err, ApiError::Unauthorized { .. }),
        "Validation" => matches!(err, ApiError::Validation { .. }),
        "Conflict" => matches!(err, ApiError::Conflict { .. }),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(matched, "{name}: got {err:?}");
    if let Some(message) = case.get("expected_message") {
        assert_eq!(describe(err, action), message.as_str().unwrap(), "{name}: message");
    }
}

#[test]
fn list_users_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_users.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let query = UserQuery {
            user_type: input
                .get("type")
                .map(|t| serde_json::from_value::<UserType>(t.clone()).unwrap()),
            status: input
                .get("status")
                .map(|s| serde_json::from_value::<UserStatus>(s.clone()).unwrap()),
            search: input["search"].as_str().map(str::to_string),
            page: input["page"].as_u64().map(|p| p as u32),
            page_size: input["page_size"].as_u64().map(|p| p as u32),
        };

        let req = c.build_list_users(&query);
        check_request(name, &req, &case["expected_request"]);

        let page: UsersPage = c.parse_list_users(simulated(&case)).unwrap();
        let expected = &case["expected_result"];
        assert_eq!(page.total, expected["total"].as_u64().unwrap(), "{name}: total");
        let users: Vec<User> = serde_json::from_value(expected["users"].clone()).unwrap();
        assert_eq!(page.users, users, "{name}: users");
    }
}

#[test]
fn create_user_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_user.json")) {
        let name = case["name"].as_str().unwrap();
        let draft: UserDraft = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_user(&draft.to_new_user()).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_user(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, &result.unwrap_err(), Action::CreateUser);
        } else {
            let expected: User = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

#[test]
fn get_user_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get_user.json")) {
        let name = case["name"].as_str().unwrap();
        let id: Uuid = case["input_id"].as_str().unwrap().parse().unwrap();

        let req = c.build_get_user(id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_user(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, &result.unwrap_err(), Action::LoadUser);
            continue;
        }
        let detail = result.unwrap();
        let expected = &case["expected_result"];
        assert_eq!(detail.user_type.as_str(), expected["type"], "{name}: type");
        let hotel = detail.hotel_profile().unwrap();
        assert_eq!(hotel.name, expected["profile_name"], "{name}: profile");
        assert_eq!(
            hotel.listings.len() as u64,
            expected["listing_count"].as_u64().unwrap()
        );
        let listing = &hotel.listings[0];
        assert_eq!(
            listing.collaboration_offerings[0].terms,
            OfferingTerms::Discount {
                percentage: expected["discount_percentage"].as_f64()
            }
        );
        let requirements = listing.creator_requirements.as_ref().unwrap();
        assert_eq!(
            requirements.target_age_min.map(u64::from),
            expected["target_age_min"].as_u64()
        );
        assert_eq!(
            requirements.target_age_max.map(u64::from),
            expected["target_age_max"].as_u64()
        );
    }
}

#[test]
fn delete_user_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete_user.json")) {
        let name = case["name"].as_str().unwrap();
        let id: Uuid = case["input_id"].as_str().unwrap().parse().unwrap();

        let req = c.build_delete_user(id);
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_user(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, &result.unwrap_err(), Action::DeleteUser);
            continue;
        }
        let deleted = result.unwrap();
        let expected = &case["expected_result"];
        assert_eq!(deleted.message, expected["message"], "{name}: message");
        assert_eq!(
            deleted.deleted_user.id.to_string(),
            expected["deleted_id"].as_str().unwrap()
        );
    }
}

#[test]
fn create_listing_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_listing.json")) {
        let name = case["name"].as_str().unwrap();
        let id: Uuid = case["input_id"].as_str().unwrap().parse().unwrap();
        let draft: ListingDraft = serde_json::from_value(case["input"].clone()).unwrap();
        let images: Vec<String> = serde_json::from_value(case["images"].clone()).unwrap();

        let (payload, range) = draft.to_payload(images);
        assert!(range.unwrap().contiguous, "{name}: contiguous");
        let req = c.build_create_listing(id, &payload).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_listing(simulated(&case));
        if case.get("expected_error").is_some() {
            check_error(name, &case, &result.unwrap_err(), Action::SaveListing);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
