//! Request payloads sent to the admin API.
//!
//! Bodies are camelCase. Optional fields are omitted when `None`, so an
//! update only touches the fields it names; the server keeps the rest.

use serde::Serialize;

use crate::types::{
    AgeGroupShare, CountryShare, GenderSplit, OfferingTerms, PlatformName, UserStatus, UserType,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatform {
    pub name: PlatformName,
    pub handle: String,
    pub followers: u64,
    pub engagement_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_countries: Option<Vec<CountryShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_age_groups: Option<Vec<AgeGroupShare>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_split: Option<GenderSplit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreatorProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<NewPlatform>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotelProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub status: UserStatus,
    pub email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_profile: Option<NewCreatorProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_profile: Option<NewHotelProfile>,
}

/// Account fields of `PUT /admin/users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<NewPlatform>>,
}

impl CreatorProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl HotelProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffering {
    #[serde(flatten)]
    pub terms: OfferingTerms,
    pub availability_months: Vec<String>,
    pub platforms: Vec<PlatformName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequirements {
    pub platforms: Vec<PlatformName>,
    pub min_followers: Option<u64>,
    pub target_countries: Vec<String>,
    pub target_age_min: Option<u8>,
    pub target_age_max: Option<u8>,
}

/// Body of `POST /admin/users/{id}/listings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub name: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<String>,
    pub images: Vec<String>,
    pub collaboration_offerings: Vec<NewOffering>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_requirements: Option<NewRequirements>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaboration_offerings: Option<Vec<NewOffering>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_requirements: Option<NewRequirements>,
}

impl ListingUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filters and paging for `GET /admin/users`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub user_type: Option<UserType>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl UserQuery {
    /// Query pairs in the order the dashboard sends them. Empty searches and
    /// zero page numbers are dropped.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            pairs.push(("page_size", size.to_string()));
        }
        if let Some(t) = self.user_type {
            pairs.push(("type", t.as_str().to_string()));
        }
        if let Some(s) = self.status {
            pairs.push(("status", s.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_update_omits_unset_fields() {
        let patch = UserUpdate {
            email_verified: Some(true),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"emailVerified": true}));
        assert!(!patch.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn new_user_nests_creator_profile() {
        let user = NewUser {
            email: "c@x.io".into(),
            password: "password1".into(),
            name: "C".into(),
            user_type: UserType::Creator,
            status: UserStatus::Pending,
            email_verified: false,
            avatar: None,
            creator_profile: Some(NewCreatorProfile {
                location: Some("Rome".into()),
                ..Default::default()
            }),
            hotel_profile: None,
        };
        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(body["type"], "creator");
        assert_eq!(body["creatorProfile"], json!({"location": "Rome"}));
        assert!(body.get("hotelProfile").is_none());
    }

    #[test]
    fn new_offering_flattens_terms() {
        let offering = NewOffering {
            terms: OfferingTerms::Paid {
                max_amount: Some(500.0),
            },
            availability_months: vec!["May".into()],
            platforms: vec![PlatformName::TikTok],
        };
        let body = serde_json::to_value(&offering).unwrap();
        assert_eq!(body["collaborationType"], "Paid");
        assert_eq!(body["paidMaxAmount"], 500.0);
        assert_eq!(body["platforms"], json!(["TikTok"]));
    }

    #[test]
    fn query_pairs_skip_missing_values() {
        let query = UserQuery {
            user_type: Some(UserType::Hotel),
            search: Some(String::new()),
            page: Some(2),
            page_size: Some(20),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("type", "hotel".to_string()),
            ]
        );
    }
}
