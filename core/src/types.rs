//! Domain models returned by the admin API.
//!
//! # Design
//! These types mirror the backend schema after key camelization (see
//! `case.rs`). They are defined independently from the mock-server crate;
//! integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Hotel,
    Creator,
    Admin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Hotel => "hotel",
            UserType::Creator => "creator",
            UserType::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Verified => "verified",
            UserStatus::Rejected => "rejected",
            UserStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformName {
    #[default]
    Instagram,
    TikTok,
    YouTube,
    Facebook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollaborationType {
    #[default]
    #[serde(rename = "Free Stay")]
    FreeStay,
    Paid,
    Discount,
}

/// A user row as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub status: UserStatus,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub total: u64,
}

/// Response of the cascading delete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUser {
    pub message: String,
    pub deleted_user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    pub country: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupShare {
    pub age_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderSplit {
    pub male: f64,
    pub female: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: Uuid,
    pub name: PlatformName,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    #[serde(default)]
    pub top_countries: Option<Vec<CountryShare>>,
    #[serde(default)]
    pub top_age_groups: Option<Vec<AgeGroupShare>>,
    #[serde(default)]
    pub gender_split: Option<GenderSplit>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub portfolio_link: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub profile_complete: bool,
    #[serde(default)]
    pub profile_completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub location: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Deal terms of a collaboration offering. Exactly one group of the flat
/// wire fields is populated, selected by `collaborationType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TermsWire", into = "TermsWire")]
pub enum OfferingTerms {
    FreeStay {
        min_nights: Option<u32>,
        max_nights: Option<u32>,
    },
    Paid {
        max_amount: Option<f64>,
    },
    Discount {
        percentage: Option<f64>,
    },
}

impl OfferingTerms {
    pub fn collaboration_type(&self) -> CollaborationType {
        match self {
            OfferingTerms::FreeStay { .. } => CollaborationType::FreeStay,
            OfferingTerms::Paid { .. } => CollaborationType::Paid,
            OfferingTerms::Discount { .. } => CollaborationType::Discount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TermsWire {
    collaboration_type: CollaborationType,
    #[serde(default)]
    free_stay_min_nights: Option<u32>,
    #[serde(default)]
    free_stay_max_nights: Option<u32>,
    #[serde(default)]
    paid_max_amount: Option<f64>,
    #[serde(default)]
    discount_percentage: Option<f64>,
}

impl From<TermsWire> for OfferingTerms {
    fn from(wire: TermsWire) -> Self {
        match wire.collaboration_type {
            CollaborationType::FreeStay => OfferingTerms::FreeStay {
                min_nights: wire.free_stay_min_nights,
                max_nights: wire.free_stay_max_nights,
            },
            CollaborationType::Paid => OfferingTerms::Paid {
                max_amount: wire.paid_max_amount,
            },
            CollaborationType::Discount => OfferingTerms::Discount {
                percentage: wire.discount_percentage,
            },
        }
    }
}

impl From<OfferingTerms> for TermsWire {
    fn from(terms: OfferingTerms) -> Self {
        let mut wire = TermsWire {
            collaboration_type: terms.collaboration_type(),
            free_stay_min_nights: None,
            free_stay_max_nights: None,
            paid_max_amount: None,
            discount_percentage: None,
        };
        match terms {
            OfferingTerms::FreeStay {
                min_nights,
                max_nights,
            } => {
                wire.free_stay_min_nights = min_nights;
                wire.free_stay_max_nights = max_nights;
            }
            OfferingTerms::Paid { max_amount } => wire.paid_max_amount = max_amount,
            OfferingTerms::Discount { percentage } => wire.discount_percentage = percentage,
        }
        wire
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationOffering {
    pub id: Uuid,
    pub listing_id: Uuid,
    #[serde(flatten)]
    pub terms: OfferingTerms,
    #[serde(default)]
    pub availability_months: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<PlatformName>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorRequirements {
    pub id: Uuid,
    pub listing_id: Uuid,
    #[serde(default)]
    pub platforms: Vec<PlatformName>,
    #[serde(default)]
    pub min_followers: Option<u64>,
    #[serde(default)]
    pub target_countries: Vec<String>,
    #[serde(default)]
    pub target_age_min: Option<u8>,
    #[serde(default)]
    pub target_age_max: Option<u8>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub hotel_profile_id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub accommodation_type: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub collaboration_offerings: Vec<CollaborationOffering>,
    #[serde(default)]
    pub creator_requirements: Option<CreatorRequirements>,
}

/// The profile owned by a user, selected by the user's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Creator(CreatorProfile),
    Hotel(HotelProfile),
}

/// Full user graph from `GET /admin/users/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawUserDetail")]
pub struct UserDetail {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
    pub status: UserStatus,
    pub email_verified: bool,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub profile: Option<Profile>,
}

impl UserDetail {
    pub fn creator_profile(&self) -> Option<&CreatorProfile> {
        match &self.profile {
            Some(Profile::Creator(p)) => Some(p),
            _ => None,
        }
    }

    pub fn hotel_profile(&self) -> Option<&HotelProfile> {
        match &self.profile {
            Some(Profile::Hotel(p)) => Some(p),
            _ => None,
        }
    }

    pub fn listing(&self, listing_id: Uuid) -> Option<&Listing> {
        self.hotel_profile()?
            .listings
            .iter()
            .find(|l| l.id == listing_id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUserDetail {
    id: Uuid,
    email: String,
    name: String,
    #[serde(rename = "type")]
    user_type: UserType,
    status: UserStatus,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    avatar: Option<String>,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    profile: Value,
}

impl TryFrom<RawUserDetail> for UserDetail {
    type Error = serde_json::Error;

    fn try_from(raw: RawUserDetail) -> Result<Self, Self::Error> {
        let profile = match (raw.user_type, raw.profile) {
            (_, Value::Null) | (UserType::Admin, _) => None,
            (UserType::Creator, value) => Some(Profile::Creator(serde_json::from_value(value)?)),
            (UserType::Hotel, value) => Some(Profile::Hotel(serde_json::from_value(value)?)),
        };
        Ok(UserDetail {
            id: raw.id,
            email: raw.email,
            name: raw.name,
            user_type: raw.user_type,
            status: raw.status,
            email_verified: raw.email_verified,
            avatar: raw.avatar,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            profile,
        })
    }
}

/// Result of an image upload. Processing happens server-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadedImages {
    pub images: Vec<UploadedImage>,
}

impl UploadedImages {
    pub fn urls(&self) -> Vec<String> {
        self.images.iter().map(|i| i.url.clone()).collect()
    }
}
