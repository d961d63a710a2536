//! Service interfaces over the admin API and their HTTP implementation.
//!
//! Workflows depend on the [`UsersApi`], [`UploadApi`] and [`MarketplaceApi`]
//! traits rather than on the transport, so tests can substitute in-memory
//! fakes.

use uuid::Uuid;

use crate::client::AdminClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::marketplace::{MarketplaceCreator, MarketplaceListing};
use crate::payloads::{
    CreatorProfileUpdate, HotelProfileUpdate, ListingUpdate, NewListing, NewUser, UserQuery,
    UserUpdate,
};
use crate::token::TokenStore;
use crate::types::{
    CreatorProfile, DeletedUser, HotelProfile, Listing, UploadedImage, User, UserDetail,
    UsersPage,
};
use crate::upload::{ImageFile, MultipartForm};

/// User, profile and listing operations.
pub trait UsersApi {
    fn list_users(&self, query: &UserQuery) -> Result<UsersPage, ApiError>;
    fn get_user(&self, id: Uuid) -> Result<UserDetail, ApiError>;
    fn create_user(&self, input: &NewUser) -> Result<User, ApiError>;
    fn update_user(&self, id: Uuid, input: &UserUpdate) -> Result<User, ApiError>;
    fn update_creator_profile(
        &self,
        id: Uuid,
        input: &CreatorProfileUpdate,
    ) -> Result<CreatorProfile, ApiError>;
    fn update_hotel_profile(
        &self,
        id: Uuid,
        input: &HotelProfileUpdate,
    ) -> Result<HotelProfile, ApiError>;
    fn create_listing(&self, hotel_user_id: Uuid, input: &NewListing) -> Result<Listing, ApiError>;
    fn update_listing(
        &self,
        hotel_user_id: Uuid,
        listing_id: Uuid,
        input: &ListingUpdate,
    ) -> Result<Listing, ApiError>;
    fn delete_user(&self, id: Uuid) -> Result<DeletedUser, ApiError>;
}

/// Image uploads. The target user id decides the storage path.
pub trait UploadApi {
    fn upload_creator_profile_image(
        &self,
        target_user_id: Uuid,
        file: &ImageFile,
    ) -> Result<UploadedImage, ApiError>;

    fn upload_listing_images(
        &self,
        target_user_id: Uuid,
        files: &[ImageFile],
    ) -> Result<Vec<UploadedImage>, ApiError>;

    /// Hotel pictures go through the generic multi-image endpoint; the first
    /// result is the picture.
    fn upload_hotel_profile_image(
        &self,
        target_user_id: Uuid,
        file: &ImageFile,
    ) -> Result<UploadedImage, ApiError>;
}

/// Marketplace preview reads.
pub trait MarketplaceApi {
    fn marketplace_listings(&self) -> Result<Vec<MarketplaceListing>, ApiError>;
    fn marketplace_creators(&self) -> Result<Vec<MarketplaceCreator>, ApiError>;
}

/// The service interfaces over a transport and a token store.
#[derive(Debug, Clone)]
pub struct AdminService<T, S> {
    client: AdminClient,
    transport: T,
    tokens: S,
}

impl<T: Transport, S: TokenStore> AdminService<T, S> {
    pub fn new(client: AdminClient, transport: T, tokens: S) -> Self {
        Self {
            client,
            transport,
            tokens,
        }
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    /// Attach the current token and execute. The token is looked up per call.
    fn send(&self, request: HttpRequest) -> Result<crate::http::HttpResponse, ApiError> {
        let token = self.tokens.access_token();
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            authenticated = token.is_some(),
            "admin api call"
        );
        self.transport
            .execute(request.with_bearer(token.as_deref()))
    }
}

impl<T: Transport, S: TokenStore> UsersApi for AdminService<T, S> {
    fn list_users(&self, query: &UserQuery) -> Result<UsersPage, ApiError> {
        let response = self.send(self.client.build_list_users(query))?;
        self.client.parse_list_users(response)
    }

    fn get_user(&self, id: Uuid) -> Result<UserDetail, ApiError> {
        let response = self.send(self.client.build_get_user(id))?;
        self.client.parse_get_user(response)
    }

    fn create_user(&self, input: &NewUser) -> Result<User, ApiError> {
        let response = self.send(self.client.build_create_user(input)?)?;
        self.client.parse_create_user(response)
    }

    fn update_user(&self, id: Uuid, input: &UserUpdate) -> Result<User, ApiError> {
        let response = self.send(self.client.build_update_user(id, input)?)?;
        self.client.parse_update_user(response)
    }

    fn update_creator_profile(
        &self,
        id: Uuid,
        input: &CreatorProfileUpdate,
    ) -> Result<CreatorProfile, ApiError> {
        let response = self.send(self.client.build_update_creator_profile(id, input)?)?;
        self.client.parse_update_creator_profile(response)
    }

    fn update_hotel_profile(
        &self,
        id: Uuid,
        input: &HotelProfileUpdate,
    ) -> Result<HotelProfile, ApiError> {
        let response = self.send(self.client.build_update_hotel_profile(id, input)?)?;
        self.client.parse_update_hotel_profile(response)
    }

    fn create_listing(&self, hotel_user_id: Uuid, input: &NewListing) -> Result<Listing, ApiError> {
        let response = self.send(self.client.build_create_listing(hotel_user_id, input)?)?;
        self.client.parse_create_listing(response)
    }

    fn update_listing(
        &self,
        hotel_user_id: Uuid,
        listing_id: Uuid,
        input: &ListingUpdate,
    ) -> Result<Listing, ApiError> {
        let request = self
            .client
            .build_update_listing(hotel_user_id, listing_id, input)?;
        let response = self.send(request)?;
        self.client.parse_update_listing(response)
    }

    fn delete_user(&self, id: Uuid) -> Result<DeletedUser, ApiError> {
        let response = self.send(self.client.build_delete_user(id))?;
        self.client.parse_delete_user(response)
    }
}

impl<T: Transport, S: TokenStore> UploadApi for AdminService<T, S> {
    fn upload_creator_profile_image(
        &self,
        target_user_id: Uuid,
        file: &ImageFile,
    ) -> Result<UploadedImage, ApiError> {
        let request = self.client.build_upload_creator_profile_image(
            target_user_id,
            file,
            MultipartForm::new(),
        )?;
        let response = self.send(request)?;
        self.client.parse_uploaded_image(response)
    }

    fn upload_listing_images(
        &self,
        target_user_id: Uuid,
        files: &[ImageFile],
    ) -> Result<Vec<UploadedImage>, ApiError> {
        let request =
            self.client
                .build_upload_listing_images(target_user_id, files, MultipartForm::new())?;
        let response = self.send(request)?;
        Ok(self.client.parse_uploaded_images(response)?.images)
    }

    fn upload_hotel_profile_image(
        &self,
        target_user_id: Uuid,
        file: &ImageFile,
    ) -> Result<UploadedImage, ApiError> {
        let request = self.client.build_upload_images(
            target_user_id,
            "hotels",
            std::slice::from_ref(file),
            MultipartForm::new(),
        )?;
        let response = self.send(request)?;
        self.client
            .parse_uploaded_images(response)?
            .images
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Deserialization("upload returned no images".to_string()))
    }
}

impl<T: Transport, S: TokenStore> MarketplaceApi for AdminService<T, S> {
    fn marketplace_listings(&self) -> Result<Vec<MarketplaceListing>, ApiError> {
        let response = self.send(self.client.build_marketplace_listings())?;
        self.client.parse_marketplace_listings(response)
    }

    fn marketplace_creators(&self) -> Result<Vec<MarketplaceCreator>, ApiError> {
        let response = self.send(self.client.build_marketplace_creators())?;
        self.client.parse_marketplace_creators(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::HttpResponse;
    use crate::token::StaticToken;

    /// Records requests and answers with a canned response.
    struct Recorder {
        requests: RefCell<Vec<HttpRequest>>,
        response: HttpResponse,
    }

    impl Transport for Recorder {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            Ok(self.response.clone())
        }
    }

    fn recorder(status: u16, body: &str) -> Recorder {
        Recorder {
            requests: RefCell::new(Vec::new()),
            response: HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            },
        }
    }

    #[test]
    fn requests_carry_the_current_token() {
        let transport = recorder(200, r#"{"users":[],"total":0}"#);
        let service = AdminService::new(
            AdminClient::new("http://api"),
            &transport,
            StaticToken::new("secret"),
        );
        let page = service.list_users(&UserQuery::default()).unwrap();
        assert_eq!(page.total, 0);
        let requests = transport.requests.borrow();
        assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
    }

    #[test]
    fn missing_token_sends_no_header() {
        let transport = recorder(401, r#"{"detail":"Not authenticated"}"#);
        let service = AdminService::new(
            AdminClient::new("http://api"),
            &transport,
            StaticToken::default(),
        );
        let err = service.get_user(Uuid::nil()).unwrap_err();
        assert!(err.requires_logout());
        assert!(transport.requests.borrow()[0].header("authorization").is_none());
    }

    #[test]
    fn hotel_picture_takes_first_uploaded_image() {
        let transport = recorder(
            200,
            r#"{"images":[{"url":"https://cdn/hotels/a.jpg"},{"url":"https://cdn/hotels/b.jpg"}]}"#,
        );
        let service = AdminService::new(
            AdminClient::new("http://api"),
            &transport,
            StaticToken::new("t"),
        );
        let file = ImageFile::new("a.jpg", "image/jpeg", vec![1, 2, 3]);
        let image = service.upload_hotel_profile_image(Uuid::nil(), &file).unwrap();
        assert_eq!(image.url, "https://cdn/hotels/a.jpg");
        assert!(transport.requests.borrow()[0].path.contains("prefix=hotels"));
    }

    #[test]
    fn marketplace_reads_are_authenticated() {
        let transport = recorder(200, "[]");
        let service = AdminService::new(
            AdminClient::new("http://api"),
            &transport,
            StaticToken::new("t"),
        );
        assert!(service.marketplace_creators().unwrap().is_empty());
        let requests = transport.requests.borrow();
        assert_eq!(requests[0].path, "http://api/marketplace/creators");
        assert_eq!(requests[0].header("authorization"), Some("Bearer t"));
    }

    #[test]
    fn invalid_image_never_reaches_transport() {
        let transport = recorder(200, "{}");
        let service = AdminService::new(
            AdminClient::new("http://api"),
            &transport,
            StaticToken::new("t"),
        );
        let file = ImageFile::new("a.pdf", "application/pdf", vec![1]);
        let err = service
            .upload_creator_profile_image(Uuid::nil(), &file)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidImage(_)));
        assert!(transport.requests.borrow().is_empty());
    }
}
