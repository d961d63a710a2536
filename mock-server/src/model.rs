//! Stored records and request bodies.
//!
//! Records serialize with snake_case keys the way the real backend answers.
//! Request bodies arrive camelCase. Types used in both directions carry
//! separate serialize/deserialize renames.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: String,
    pub status: String,
    pub email_verified: bool,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    pub country: String,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "snake_case", deserialize = "camelCase"))]
pub struct AgeGroupShare {
    pub age_range: String,
    #[serde(default)]
    pub percentage: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenderSplit {
    pub male: f64,
    pub female: f64,
    #[serde(default)]
    pub other: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInput {
    pub name: String,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    #[serde(default)]
    pub top_countries: Option<Vec<CountryShare>>,
    #[serde(default)]
    pub top_age_groups: Option<Vec<AgeGroupShare>>,
    #[serde(default)]
    pub gender_split: Option<GenderSplit>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub id: Uuid,
    pub name: String,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub top_countries: Option<Vec<CountryShare>>,
    pub top_age_groups: Option<Vec<AgeGroupShare>>,
    pub gender_split: Option<GenderSplit>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlatformInput> for PlatformRecord {
    fn from(input: PlatformInput) -> Self {
        let at = now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            handle: input.handle,
            followers: input.followers,
            engagement_rate: input.engagement_rate,
            top_countries: input.top_countries,
            top_age_groups: input.top_age_groups,
            gender_split: input.gender_split,
            created_at: at.clone(),
            updated_at: at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatorProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location: Option<String>,
    pub short_description: Option<String>,
    pub portfolio_link: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub profile_complete: bool,
    pub profile_completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub platforms: Vec<PlatformRecord>,
}

impl CreatorProfileRecord {
    pub fn refresh_completion(&mut self) {
        let complete = self.location.is_some()
            && self.short_description.is_some()
            && !self.platforms.is_empty();
        if complete && !self.profile_complete {
            self.profile_completed_at = Some(now());
        }
        self.profile_complete = complete;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfferingRecord {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub collaboration_type: String,
    pub availability_months: Vec<String>,
    pub platforms: Vec<String>,
    pub free_stay_min_nights: Option<u32>,
    pub free_stay_max_nights: Option<u32>,
    pub paid_max_amount: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequirementsRecord {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub platforms: Vec<String>,
    pub min_followers: Option<u64>,
    pub target_countries: Vec<String>,
    pub target_age_min: Option<u8>,
    pub target_age_max: Option<u8>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: Uuid,
    pub hotel_profile_id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    pub accommodation_type: Option<String>,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub collaboration_offerings: Vec<OfferingRecord>,
    pub creator_requirements: Option<RequirementsRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HotelProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub location: String,
    pub picture: Option<String>,
    pub website: Option<String>,
    pub about: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub listings: Vec<ListingRecord>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorProfileInput {
    pub location: Option<String>,
    pub short_description: Option<String>,
    pub portfolio_link: Option<String>,
    pub phone: Option<String>,
    pub profile_picture: Option<String>,
    pub platforms: Vec<PlatformInput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelProfileInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub creator_profile: Option<CreatorProfileInput>,
    #[serde(default)]
    pub hotel_profile: Option<HotelProfileInput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUser {
    pub status: Option<String>,
    pub email_verified: Option<bool>,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCreatorProfile {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub short_description: Option<String>,
    pub portfolio_link: Option<String>,
    pub phone: Option<String>,
    pub platforms: Option<Vec<PlatformInput>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateHotelProfile {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub picture: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingInput {
    pub collaboration_type: String,
    #[serde(default)]
    pub availability_months: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub free_stay_min_nights: Option<u32>,
    #[serde(default)]
    pub free_stay_max_nights: Option<u32>,
    #[serde(default)]
    pub paid_max_amount: Option<f64>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
}

impl OfferingInput {
    pub fn into_record(self, listing_id: Uuid) -> OfferingRecord {
        let at = now();
        OfferingRecord {
            id: Uuid::new_v4(),
            listing_id,
            collaboration_type: self.collaboration_type,
            availability_months: self.availability_months,
            platforms: self.platforms,
            free_stay_min_nights: self.free_stay_min_nights,
            free_stay_max_nights: self.free_stay_max_nights,
            paid_max_amount: self.paid_max_amount,
            discount_percentage: self.discount_percentage,
            created_at: at.clone(),
            updated_at: at,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementsInput {
    pub platforms: Vec<String>,
    pub min_followers: Option<u64>,
    pub target_countries: Vec<String>,
    pub target_age_min: Option<u8>,
    pub target_age_max: Option<u8>,
}

impl RequirementsInput {
    pub fn into_record(self, listing_id: Uuid) -> RequirementsRecord {
        let at = now();
        RequirementsRecord {
            id: Uuid::new_v4(),
            listing_id,
            platforms: self.platforms,
            min_followers: self.min_followers,
            target_countries: self.target_countries,
            target_age_min: self.target_age_min,
            target_age_max: self.target_age_max,
            created_at: at.clone(),
            updated_at: at,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    pub name: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub accommodation_type: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub collaboration_offerings: Vec<OfferingInput>,
    #[serde(default)]
    pub creator_requirements: Option<RequirementsInput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateListing {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub accommodation_type: Option<String>,
    pub images: Option<Vec<String>>,
    pub collaboration_offerings: Option<Vec<OfferingInput>>,
    pub creator_requirements: Option<RequirementsInput>,
}

/// `GET /admin/users` query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadParams {
    pub target_user_id: Uuid,
    pub prefix: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub key: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_bytes: u64,
    pub format: String,
}

/// Full user graph of `GET /admin/users/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserRecord,
    pub profile: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsersPage {
    pub users: Vec<UserRecord>,
    pub total: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedUser {
    pub message: String,
    pub deleted_user: UserRecord,
}

/// Age buckets as `(label, lowest, highest)`.
const AGE_BUCKETS: [(&str, u8, u8); 5] = [
    ("18-24", 18, 24),
    ("25-34", 25, 34),
    ("35-44", 35, 44),
    ("45-54", 45, 54),
    ("55+", 55, 100),
];

impl RequirementsRecord {
    /// Labels of the buckets that lie inside the stored range.
    pub fn age_groups(&self) -> Vec<String> {
        if self.target_age_min.is_none() && self.target_age_max.is_none() {
            return Vec::new();
        }
        let min = self.target_age_min.unwrap_or(0);
        let max = self.target_age_max.unwrap_or(u8::MAX);
        AGE_BUCKETS
            .iter()
            .filter(|(_, lo, hi)| *lo >= min && *hi <= max)
            .map(|(label, _, _)| label.to_string())
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MarketplaceRequirements {
    pub platforms: Vec<String>,
    pub min_followers: Option<u64>,
    pub target_countries: Vec<String>,
    pub target_age_groups: Vec<String>,
}

impl From<&RequirementsRecord> for MarketplaceRequirements {
    fn from(record: &RequirementsRecord) -> Self {
        Self {
            platforms: record.platforms.clone(),
            min_followers: record.min_followers,
            target_countries: record.target_countries.clone(),
            target_age_groups: record.age_groups(),
        }
    }
}

/// A listing as the marketplace shows it, with its hotel's name and picture.
#[derive(Clone, Debug, Serialize)]
pub struct MarketplaceListing {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub hotel_picture: Option<String>,
    pub name: String,
    pub location: String,
    pub description: String,
    pub accommodation_type: Option<String>,
    pub images: Vec<String>,
    pub collaboration_offerings: Vec<OfferingRecord>,
    pub creator_requirements: Option<MarketplaceRequirements>,
}

impl MarketplaceListing {
    pub fn new(hotel: &HotelProfileRecord, listing: &ListingRecord) -> Self {
        Self {
            id: listing.id,
            hotel_id: hotel.id,
            hotel_name: hotel.name.clone(),
            hotel_picture: hotel.picture.clone(),
            name: listing.name.clone(),
            location: listing.location.clone(),
            description: listing.description.clone(),
            accommodation_type: listing.accommodation_type.clone(),
            images: listing.images.clone(),
            collaboration_offerings: listing.collaboration_offerings.clone(),
            creator_requirements: listing
                .creator_requirements
                .as_ref()
                .map(MarketplaceRequirements::from),
        }
    }
}

/// A creator as hotels browse them. Reviews are not stored, so every
/// creator reports zero.
#[derive(Clone, Debug, Serialize)]
pub struct MarketplaceCreator {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub short_description: Option<String>,
    pub portfolio_link: Option<String>,
    pub profile_picture: Option<String>,
    pub platforms: Vec<PlatformRecord>,
    pub audience_size: u64,
    pub average_rating: f64,
    pub total_reviews: u32,
}

impl MarketplaceCreator {
    pub fn new(user: &UserRecord, profile: &CreatorProfileRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            location: profile.location.clone(),
            short_description: profile.short_description.clone(),
            portfolio_link: profile.portfolio_link.clone(),
            profile_picture: profile.profile_picture.clone(),
            platforms: profile.platforms.clone(),
            audience_size: profile.platforms.iter().map(|p| p.followers).sum(),
            average_rating: 0.0,
            total_reviews: 0,
        }
    }
}
