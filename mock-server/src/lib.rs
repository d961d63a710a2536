//! In-memory stand-in for the marketplace admin backend.
//!
//! Serves the admin REST surface and the marketplace preview reads over an
//! in-memory store. Requests need a bearer token; responses are snake_case
//! and errors use the `{"detail": ...}` shape. Uploads return generated CDN
//! URLs and deletes cascade.

pub mod model;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use model::{
    now, CreateListing, CreateUser, CreatorProfileRecord, DeletedUser, HotelProfileRecord,
    ListParams, ListingRecord, MarketplaceCreator, MarketplaceListing, PlatformRecord,
    UpdateCreatorProfile, UpdateHotelProfile, UpdateListing, UpdateUser, UploadParams,
    UploadedImage, UserDetail, UserRecord, UsersPage,
};

pub const DEFAULT_TOKEN: &str = "admin-token";
pub const ADMIN_EMAIL: &str = "admin@marketplace.local";
pub const CDN_BASE: &str = "https://cdn.marketplace.local";
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_PAGE_SIZE: u32 = 20;
const USER_TYPES: [&str; 3] = ["hotel", "creator", "admin"];
const USER_STATUSES: [&str; 4] = ["pending", "verified", "rejected", "suspended"];

#[derive(Clone, Debug)]
pub struct MockOptions {
    /// Bearer token every request must carry.
    pub token: String,
    /// Answer every upload with a 500.
    pub fail_uploads: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            fail_uploads: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Account {
    pub user: UserRecord,
    pub creator: Option<CreatorProfileRecord>,
    pub hotel: Option<HotelProfileRecord>,
}

impl Account {
    fn detail(&self) -> UserDetail {
        let profile = match (&self.creator, &self.hotel) {
            (Some(c), _) => json!(c),
            (_, Some(h)) => json!(h),
            _ => Value::Null,
        };
        UserDetail {
            user: self.user.clone(),
            profile,
        }
    }
}

/// Accounts in creation order. The first one is the seeded admin that owns
/// the token.
#[derive(Debug)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub admin_id: Uuid,
}

impl Store {
    fn seeded() -> Self {
        let at = now();
        let admin = UserRecord {
            id: Uuid::new_v4(),
            email: ADMIN_EMAIL.to_string(),
            name: "Admin".to_string(),
            user_type: "admin".to_string(),
            status: "verified".to_string(),
            email_verified: true,
            avatar: None,
            created_at: at.clone(),
            updated_at: at,
        };
        Self {
            admin_id: admin.id,
            accounts: vec![Account {
                user: admin,
                creator: None,
                hotel: None,
            }],
        }
    }

    fn account(&self, id: Uuid) -> Result<&Account, ApiError> {
        self.accounts
            .iter()
            .find(|a| a.user.id == id)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    fn account_mut(&mut self, id: Uuid) -> Result<&mut Account, ApiError> {
        self.accounts
            .iter_mut()
            .find(|a| a.user.id == id)
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub options: Arc<MockOptions>,
}

/// Error body in the backend's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: Value,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            detail: Value::String(message.to_string()),
        }
    }

    fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Field-level errors: `[{"loc": ["body", field], "msg": ...}]`.
    fn fields(errors: Vec<(&str, &str)>) -> Self {
        let detail = errors
            .into_iter()
            .map(|(field, msg)| json!({"loc": ["body", field], "msg": msg}))
            .collect();
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: Value::Array(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_json<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        detail: Value::String(e.to_string()),
    })
}

pub fn app() -> Router {
    app_with(MockOptions::default())
}

pub fn app_with(options: MockOptions) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::seeded())),
        options: Arc::new(options),
    };
    let uploads = Router::new()
        .route("/upload/image/creator-profile", post(upload_creator_profile))
        .route("/upload/images/listing", post(upload_listing_images))
        .route("/upload/images", post(upload_images))
        .layer(DefaultBodyLimit::max(4 * MAX_UPLOAD_BYTES));

    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route(
            "/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/admin/users/{id}/profile/creator", put(update_creator_profile))
        .route("/admin/users/{id}/profile/hotel", put(update_hotel_profile))
        .route("/admin/users/{id}/listings", post(create_listing))
        .route("/admin/users/{id}/listings/{listing_id}", put(update_listing))
        .route("/marketplace/listings", get(marketplace_listings))
        .route("/marketplace/creators", get(marketplace_creators))
        .merge(uploads)
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockOptions::default()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.options.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejected request without valid token");
        return ApiError::new(StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    next.run(request).await
}

// --- users ---

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<UsersPage> {
    let store = state.db.read().await;
    let search = params.search.as_deref().unwrap_or_default().to_lowercase();
    let matching: Vec<&UserRecord> = store
        .accounts
        .iter()
        .rev()
        .map(|a| &a.user)
        .filter(|u| params.user_type.as_deref().map_or(true, |t| u.user_type == t))
        .filter(|u| params.status.as_deref().map_or(true, |s| u.status == s))
        .filter(|u| {
            search.is_empty()
                || u.name.to_lowercase().contains(&search)
                || u.email.to_lowercase().contains(&search)
        })
        .collect();

    let page = params.page.unwrap_or(1).max(1) as usize;
    let size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1) as usize;
    Json(UsersPage {
        total: matching.len() as u64,
        users: matching
            .into_iter()
            .skip((page - 1) * size)
            .take(size)
            .cloned()
            .collect(),
    })
}

async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<UserDetail>> {
    let store = state.db.read().await;
    Ok(Json(store.account(id)?.detail()))
}

fn validate_new_user(input: &CreateUser) -> ApiResult<()> {
    let mut errors = Vec::new();
    if !input.email.contains('@') {
        errors.push(("email", "value is not a valid email address"));
    }
    if input.password.chars().count() < 8 {
        errors.push(("password", "String should have at least 8 characters"));
    }
    if input.name.trim().is_empty() {
        errors.push(("name", "Field required"));
    }
    if !USER_TYPES.contains(&input.user_type.as_str()) {
        errors.push(("type", "Input should be 'hotel', 'creator' or 'admin'"));
    }
    if input
        .status
        .as_deref()
        .is_some_and(|s| !USER_STATUSES.contains(&s))
    {
        errors.push(("status", "Invalid status"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::fields(errors))
    }
}

async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UserRecord>)> {
    let input: CreateUser = parse_json(&body)?;
    validate_new_user(&input)?;

    let mut store = state.db.write().await;
    if store
        .accounts
        .iter()
        .any(|a| a.user.email.eq_ignore_ascii_case(&input.email))
    {
        return Err(ApiError::new(StatusCode::CONFLICT, "Email already registered"));
    }

    let at = now();
    let user = UserRecord {
        id: Uuid::new_v4(),
        email: input.email,
        name: input.name,
        user_type: input.user_type,
        status: input.status.unwrap_or_else(|| "pending".to_string()),
        email_verified: input.email_verified,
        avatar: input.avatar,
        created_at: at.clone(),
        updated_at: at.clone(),
    };

    let creator = (user.user_type == "creator").then(|| {
        let input = input.creator_profile.unwrap_or_default();
        let mut profile = CreatorProfileRecord {
            id: Uuid::new_v4(),
            user_id: user.id,
            location: input.location,
            short_description: input.short_description,
            portfolio_link: input.portfolio_link,
            phone: input.phone,
            profile_picture: input.profile_picture,
            profile_complete: false,
            profile_completed_at: None,
            created_at: at.clone(),
            updated_at: at.clone(),
            platforms: input.platforms.into_iter().map(PlatformRecord::from).collect(),
        };
        profile.refresh_completion();
        profile
    });

    let hotel = (user.user_type == "hotel").then(|| {
        let input = input.hotel_profile.unwrap_or_default();
        HotelProfileRecord {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: input.name.unwrap_or_else(|| user.name.clone()),
            category: None,
            location: input.location.unwrap_or_default(),
            picture: None,
            website: input.website,
            about: input.about,
            email: user.email.clone(),
            phone: input.phone,
            status: "pending".to_string(),
            created_at: at.clone(),
            updated_at: at.clone(),
            listings: Vec::new(),
        }
    });

    tracing::info!(user_id = %user.id, user_type = %user.user_type, "user created");
    store.accounts.push(Account {
        user: user.clone(),
        creator,
        hotel,
    });
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Json<UserRecord>> {
    let input: UpdateUser = parse_json(&body)?;
    if input
        .status
        .as_deref()
        .is_some_and(|s| !USER_STATUSES.contains(&s))
    {
        return Err(ApiError::fields(vec![("status", "Invalid status")]));
    }

    let mut store = state.db.write().await;
    if let Some(email) = &input.email {
        if store
            .accounts
            .iter()
            .any(|a| a.user.id != id && a.user.email.eq_ignore_ascii_case(email))
        {
            return Err(ApiError::new(StatusCode::CONFLICT, "Email already registered"));
        }
    }
    let account = store.account_mut(id)?;
    let user = &mut account.user;
    if let Some(status) = input.status {
        user.status = status;
    }
    if let Some(verified) = input.email_verified {
        user.email_verified = verified;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(name) = input.name {
        user.name = name;
    }
    user.updated_at = now();
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedUser>> {
    let mut store = state.db.write().await;
    if id == store.admin_id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }
    let index = store
        .accounts
        .iter()
        .position(|a| a.user.id == id)
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    // Profiles, listings, offerings and requirements live inside the account.
    let removed = store.accounts.remove(index);
    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(DeletedUser {
        message: "User deleted successfully".to_string(),
        deleted_user: removed.user,
    }))
}

// --- profiles ---

async fn update_creator_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Json<CreatorProfileRecord>> {
    let input: UpdateCreatorProfile = parse_json(&body)?;
    let mut store = state.db.write().await;
    let account = store.account_mut(id)?;
    if let Some(name) = input.name {
        account.user.name = name;
    }
    let profile = account
        .creator
        .as_mut()
        .ok_or_else(|| ApiError::bad_request("User is not a creator"))?;
    if input.profile_picture.is_some() {
        profile.profile_picture = input.profile_picture;
    }
    if input.location.is_some() {
        profile.location = input.location;
    }
    if input.short_description.is_some() {
        profile.short_description = input.short_description;
    }
    if input.portfolio_link.is_some() {
        profile.portfolio_link = input.portfolio_link;
    }
    if input.phone.is_some() {
        profile.phone = input.phone;
    }
    if let Some(platforms) = input.platforms {
        profile.platforms = platforms.into_iter().map(PlatformRecord::from).collect();
    }
    profile.updated_at = now();
    profile.refresh_completion();
    Ok(Json(profile.clone()))
}

async fn update_hotel_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<Json<HotelProfileRecord>> {
    let input: UpdateHotelProfile = parse_json(&body)?;
    let mut store = state.db.write().await;
    let profile = store
        .account_mut(id)?
        .hotel
        .as_mut()
        .ok_or_else(|| ApiError::bad_request("User is not a hotel"))?;
    if let Some(name) = input.name {
        profile.name = name;
    }
    if let Some(location) = input.location {
        profile.location = location;
    }
    if let Some(email) = input.email {
        profile.email = email;
    }
    if input.about.is_some() {
        profile.about = input.about;
    }
    if input.website.is_some() {
        profile.website = input.website;
    }
    if input.phone.is_some() {
        profile.phone = input.phone;
    }
    if input.picture.is_some() {
        profile.picture = input.picture;
    }
    profile.updated_at = now();
    Ok(Json(profile.clone()))
}

// --- listings ---

async fn create_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ListingRecord>)> {
    let input: CreateListing = parse_json(&body)?;
    let mut store = state.db.write().await;
    let profile = store
        .account_mut(id)?
        .hotel
        .as_mut()
        .ok_or_else(|| ApiError::bad_request("Listings can only be created for hotel users"))?;

    let mut errors = Vec::new();
    for (field, value) in [
        ("name", &input.name),
        ("location", &input.location),
        ("description", &input.description),
    ] {
        if value.trim().is_empty() {
            errors.push((field, "Field required"));
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::fields(errors));
    }

    let at = now();
    let listing_id = Uuid::new_v4();
    let listing = ListingRecord {
        id: listing_id,
        hotel_profile_id: profile.id,
        name: input.name,
        location: input.location,
        description: input.description,
        accommodation_type: input.accommodation_type,
        images: input.images,
        status: "pending".to_string(),
        created_at: at.clone(),
        updated_at: at,
        collaboration_offerings: input
            .collaboration_offerings
            .into_iter()
            .map(|o| o.into_record(listing_id))
            .collect(),
        creator_requirements: input
            .creator_requirements
            .map(|r| r.into_record(listing_id)),
    };
    profile.listings.push(listing.clone());
    tracing::info!(user_id = %id, %listing_id, "listing created");
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn update_listing(
    State(state): State<AppState>,
    Path((id, listing_id)): Path<(Uuid, Uuid)>,
    body: Bytes,
) -> ApiResult<Json<ListingRecord>> {
    let input: UpdateListing = parse_json(&body)?;
    let mut store = state.db.write().await;
    let listing = store
        .account_mut(id)?
        .hotel
        .as_mut()
        .and_then(|h| h.listings.iter_mut().find(|l| l.id == listing_id))
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    if let Some(name) = input.name {
        listing.name = name;
    }
    if let Some(location) = input.location {
        listing.location = location;
    }
    if let Some(description) = input.description {
        listing.description = description;
    }
    if input.accommodation_type.is_some() {
        listing.accommodation_type = input.accommodation_type;
    }
    if let Some(images) = input.images {
        listing.images = images;
    }
    if let Some(offerings) = input.collaboration_offerings {
        listing.collaboration_offerings = offerings
            .into_iter()
            .map(|o| o.into_record(listing_id))
            .collect();
    }
    if let Some(requirements) = input.creator_requirements {
        listing.creator_requirements = Some(requirements.into_record(listing_id));
    }
    listing.updated_at = now();
    Ok(Json(listing.clone()))
}

// --- marketplace preview ---

/// Every hotel's listings, newest hotel first.
async fn marketplace_listings(State(state): State<AppState>) -> Json<Vec<MarketplaceListing>> {
    let store = state.db.read().await;
    Json(
        store
            .accounts
            .iter()
            .rev()
            .filter_map(|a| a.hotel.as_ref())
            .flat_map(|h| h.listings.iter().map(move |l| MarketplaceListing::new(h, l)))
            .collect(),
    )
}

/// Every creator with a profile, newest first.
async fn marketplace_creators(State(state): State<AppState>) -> Json<Vec<MarketplaceCreator>> {
    let store = state.db.read().await;
    Json(
        store
            .accounts
            .iter()
            .rev()
            .filter_map(|a| a.creator.as_ref().map(|c| MarketplaceCreator::new(&a.user, c)))
            .collect(),
    )
}

// --- uploads ---

struct Part {
    content_type: String,
    file_name: String,
    len: usize,
}

/// Read every part named `field`, rejecting non-images and oversized files.
async fn read_parts(mut multipart: Multipart, field: &str) -> ApiResult<Vec<Part>> {
    let mut parts = Vec::new();
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(&e.body_text()))?
    {
        if part.name() != Some(field) {
            continue;
        }
        let content_type = part.content_type().unwrap_or_default().to_string();
        let file_name = part.file_name().unwrap_or("upload").to_string();
        let data = part
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(&e.body_text()))?;
        if !content_type.starts_with("image/") {
            return Err(ApiError::bad_request("File must be an image"));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::bad_request("File size must be less than 5MB"));
        }
        parts.push(Part {
            content_type,
            file_name,
            len: data.len(),
        });
    }
    if parts.is_empty() {
        return Err(ApiError::fields(vec![(field, "Field required")]));
    }
    Ok(parts)
}

fn stored_image(prefix: &str, owner: Uuid, part: &Part) -> UploadedImage {
    let format = part
        .content_type
        .strip_prefix("image/")
        .unwrap_or("jpeg")
        .to_string();
    let key = format!("{prefix}/{owner}/{}.{format}", Uuid::new_v4());
    tracing::debug!(%key, file_name = %part.file_name, "stored upload");
    UploadedImage {
        url: format!("{CDN_BASE}/{key}"),
        thumbnail_url: Some(format!("{CDN_BASE}/thumbnails/{key}")),
        key,
        width: None,
        height: None,
        size_bytes: part.len as u64,
        format,
    }
}

async fn check_upload_target(state: &AppState, target: Uuid) -> ApiResult<()> {
    if state.options.fail_uploads {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Image storage unavailable",
        ));
    }
    state.db.read().await.account(target).map(|_| ())
}

async fn upload_creator_profile(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> ApiResult<Json<UploadedImage>> {
    check_upload_target(&state, params.target_user_id).await?;
    let parts = read_parts(multipart, "file").await?;
    Ok(Json(stored_image(
        "creators",
        params.target_user_id,
        &parts[0],
    )))
}

async fn upload_listing_images(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    check_upload_target(&state, params.target_user_id).await?;
    let parts = read_parts(multipart, "files").await?;
    let images: Vec<UploadedImage> = parts
        .iter()
        .map(|p| stored_image("listings", params.target_user_id, p))
        .collect();
    Ok(Json(json!({ "images": images })))
}

async fn upload_images(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    check_upload_target(&state, params.target_user_id).await?;
    let prefix = params.prefix.clone().unwrap_or_else(|| "images".to_string());
    let parts = read_parts(multipart, "files").await?;
    let images: Vec<UploadedImage> = parts
        .iter()
        .map(|p| stored_image(&prefix, params.target_user_id, p))
        .collect();
    Ok(Json(json!({ "images": images })))
}
