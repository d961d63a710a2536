//! Stateless HTTP request builder and response parser for the admin API.
//!
//! # Design
//! `AdminClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Every successful body is camelized before typed deserialization.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::case::camelize;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payloads::{
    CreatorProfileUpdate, HotelProfileUpdate, ListingUpdate, NewListing, NewUser, UserQuery,
    UserUpdate,
};
use crate::types::{
    CreatorProfile, DeletedUser, HotelProfile, Listing, User, UserDetail, UsersPage,
};

/// Synchronous, stateless client for the admin API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    pub(crate) fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_list_users(&self, query: &UserQuery) -> HttpRequest {
        self.get(self.url("/admin/users", &query.to_pairs()))
    }

    pub fn build_get_user(&self, id: Uuid) -> HttpRequest {
        self.get(self.url(&format!("/admin/users/{id}"), &[]))
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, self.url("/admin/users", &[]), input)
    }

    pub fn build_update_user(&self, id: Uuid, input: &UserUpdate) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Put, self.url(&format!("/admin/users/{id}"), &[]), input)
    }

    pub fn build_update_creator_profile(
        &self,
        id: Uuid,
        input: &CreatorProfileUpdate,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(&format!("/admin/users/{id}/profile/creator"), &[]);
        self.json(HttpMethod::Put, path, input)
    }

    pub fn build_update_hotel_profile(
        &self,
        id: Uuid,
        input: &HotelProfileUpdate,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(&format!("/admin/users/{id}/profile/hotel"), &[]);
        self.json(HttpMethod::Put, path, input)
    }

    pub fn build_create_listing(
        &self,
        hotel_user_id: Uuid,
        input: &NewListing,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(&format!("/admin/users/{hotel_user_id}/listings"), &[]);
        self.json(HttpMethod::Post, path, input)
    }

    pub fn build_update_listing(
        &self,
        hotel_user_id: Uuid,
        listing_id: Uuid,
        input: &ListingUpdate,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(
            &format!("/admin/users/{hotel_user_id}/listings/{listing_id}"),
            &[],
        );
        self.json(HttpMethod::Put, path, input)
    }

    pub fn build_delete_user(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(&format!("/admin/users/{id}"), &[]),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<UsersPage, ApiError> {
        parse_body(response)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<UserDetail, ApiError> {
        parse_body(response)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_creator_profile(
        &self,
        response: HttpResponse,
    ) -> Result<CreatorProfile, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_hotel_profile(
        &self,
        response: HttpResponse,
    ) -> Result<HotelProfile, ApiError> {
        parse_body(response)
    }

    pub fn parse_create_listing(&self, response: HttpResponse) -> Result<Listing, ApiError> {
        parse_body(response)
    }

    pub fn parse_update_listing(&self, response: HttpResponse) -> Result<Listing, ApiError> {
        parse_body(response)
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<DeletedUser, ApiError> {
        parse_body(response)
    }
}

/// Map non-2xx responses to `ApiError`.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response))
}

/// Check the status, camelize the JSON body, then deserialize into `T`.
pub(crate) fn parse_body<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let raw: serde_json::Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    serde_json::from_value(camelize(raw)).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{UserStatus, UserType};

    fn client() -> AdminClient {
        AdminClient::new("http://localhost:8000")
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const USER_ROW: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","email":"a@b.co","name":"A","type":"creator","status":"pending","email_verified":false,"avatar":null,"created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-01T00:00:00Z"}"#;

    #[test]
    fn build_list_users_without_filters() {
        let req = client().build_list_users(&UserQuery::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/admin/users");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_list_users_encodes_query() {
        let query = UserQuery {
            user_type: Some(UserType::Creator),
            status: Some(UserStatus::Verified),
            search: Some("ana maria&co".into()),
            page: Some(1),
            page_size: Some(20),
        };
        let req = client().build_list_users(&query);
        assert_eq!(
            req.path,
            "http://localhost:8000/admin/users?page=1&page_size=20&type=creator&status=verified&search=ana+maria%26co"
        );
    }

    #[test]
    fn build_update_user_sends_only_named_fields() {
        let id = Uuid::nil();
        let req = client()
            .build_update_user(
                id,
                &UserUpdate {
                    status: Some(UserStatus::Suspended),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.path,
            "http://localhost:8000/admin/users/00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body_text().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"status": "suspended"}));
    }

    #[test]
    fn build_profile_and_listing_paths() {
        let id = Uuid::nil();
        let c = client();
        let creator = c
            .build_update_creator_profile(id, &CreatorProfileUpdate::default())
            .unwrap();
        assert!(creator.path.ends_with("/profile/creator"));
        let hotel = c
            .build_update_hotel_profile(id, &HotelProfileUpdate::default())
            .unwrap();
        assert!(hotel.path.ends_with("/profile/hotel"));
        let listing = c
            .build_update_listing(id, Uuid::from_u128(u128::MAX), &ListingUpdate::default())
            .unwrap();
        assert!(listing
            .path
            .ends_with("/listings/ffffffff-ffff-ffff-ffff-ffffffffffff"));
    }

    #[test]
    fn build_delete_user_has_no_body() {
        let req = client().build_delete_user(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_create_user_camelizes_response() {
        let user = client().parse_create_user(ok(201, USER_ROW)).unwrap();
        assert_eq!(user.user_type, UserType::Creator);
        assert_eq!(user.created_at, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn parse_list_users_success() {
        let body = format!(r#"{{"users":[{USER_ROW}],"total":45}}"#);
        let page = client().parse_list_users(ok(200, &body)).unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.total, 45);
    }

    #[test]
    fn parse_get_user_not_found() {
        let err = client()
            .parse_get_user(ok(404, r#"{"detail":"User not found"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn parse_bad_json_is_deserialization_error() {
        let err = client().parse_list_users(ok(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_delete_user_returns_deleted_record() {
        let body = format!(r#"{{"message":"User deleted","deleted_user":{USER_ROW}}}"#);
        let deleted = client().parse_delete_user(ok(200, &body)).unwrap();
        assert_eq!(deleted.deleted_user.email, "a@b.co");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = AdminClient::new("http://localhost:8000/");
        let req = client.build_get_user(Uuid::nil());
        assert!(req.path.starts_with("http://localhost:8000/admin/users/"));
    }
}
