//! Read-only marketplace preview: listings as creators browse them and
//! creators as hotels browse them.
//!
//! Preview models are flatter than the admin graph. A listing carries its
//! hotel's name and picture, and requirements list age groups by label
//! instead of a numeric range.

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::client::{parse_body, AdminClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::service::MarketplaceApi;
use crate::types::{AgeGroupShare, CountryShare, GenderSplit, OfferingTerms, PlatformName};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceOffering {
    pub id: Uuid,
    #[serde(flatten)]
    pub terms: OfferingTerms,
    #[serde(default)]
    pub availability_months: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<PlatformName>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketplaceRequirements {
    pub platforms: Vec<PlatformName>,
    pub min_followers: Option<u64>,
    pub target_countries: Vec<String>,
    /// Bucket labels such as `25-34`.
    pub target_age_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListing {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub hotel_name: String,
    #[serde(default)]
    pub hotel_picture: Option<String>,
    pub name: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub accommodation_type: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub collaboration_offerings: Vec<MarketplaceOffering>,
    #[serde(default)]
    pub creator_requirements: Option<MarketplaceRequirements>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplacePlatform {
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
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceCreator {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub portfolio_link: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub platforms: Vec<MarketplacePlatform>,
    /// Followers summed over every platform.
    #[serde(default)]
    pub audience_size: u64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
}

impl MarketplaceCreator {
    /// The rating is meaningless until someone has reviewed the creator.
    pub fn rating(&self) -> Option<f64> {
        (self.total_reviews > 0).then_some(self.average_rating)
    }
}

impl AdminClient {
    pub fn build_marketplace_listings(&self) -> HttpRequest {
        self.get(self.url("/marketplace/listings", &[]))
    }

    pub fn parse_marketplace_listings(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MarketplaceListing>, ApiError> {
        parse_body(response)
    }

    pub fn build_marketplace_creators(&self) -> HttpRequest {
        self.get(self.url("/marketplace/creators", &[]))
    }

    pub fn parse_marketplace_creators(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MarketplaceCreator>, ApiError> {
        parse_body(response)
    }
}

/// Both halves of the preview. Each half loads on its own, so a failing
/// listings request still shows the creators and the other way round.
#[derive(Debug)]
pub struct MarketplacePreview {
    pub listings: Result<Vec<MarketplaceListing>, ApiError>,
    pub creators: Result<Vec<MarketplaceCreator>, ApiError>,
}

impl MarketplacePreview {
    pub fn load<A: MarketplaceApi>(api: &A) -> Self {
        let listings = api.marketplace_listings();
        if let Err(err) = &listings {
            warn!(error = %err, "marketplace listings failed to load");
        }
        let creators = api.marketplace_creators();
        if let Err(err) = &creators {
            warn!(error = %err, "marketplace creators failed to load");
        }
        Self { listings, creators }
    }

    /// First failure of the two, for a single banner above the preview.
    pub fn error(&self) -> Option<&ApiError> {
        self.listings
            .as_ref()
            .err()
            .or_else(|| self.creators.as_ref().err())
    }
}
