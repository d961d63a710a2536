//! Staged form state for the create-user flow.
//!
//! # Design
//! Drafts hold what the operator typed, as typed: numeric inputs stay text
//! until conversion, images stay in memory until the workflow has a user id
//! to upload them under. Conversion to request payloads drops incomplete
//! entries instead of failing, the way the create form does.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::age::{age_range, AgeGroup, AgeRange};
use crate::error::ApiError;
use crate::payloads::{
    NewCreatorProfile, NewHotelProfile, NewListing, NewOffering, NewPlatform, NewRequirements,
    NewUser,
};
use crate::types::{
    AgeGroupShare, CollaborationType, CountryShare, GenderSplit, OfferingTerms, PlatformName,
    UserStatus, UserType,
};
use crate::upload::ImageFile;

/// Limit on selected countries and age groups per multi-select.
pub const MAX_SELECTIONS: usize = 3;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Argentina", "Australia", "Austria",
    "Bangladesh", "Belgium", "Brazil", "Bulgaria", "Canada", "Chile", "China",
    "Colombia", "Croatia", "Czech Republic", "Denmark", "Egypt", "Finland",
    "France", "Germany", "Greece", "Hungary", "India", "Indonesia", "Iran",
    "Ireland", "Israel", "Italy", "Japan", "Kenya", "Malaysia", "Mexico",
    "Morocco", "Netherlands", "New Zealand", "Nigeria", "Norway", "Pakistan",
    "Philippines", "Poland", "Portugal", "Romania", "Russia", "Saudi Arabia",
    "Singapore", "South Africa", "South Korea", "Spain", "Sweden", "Switzerland",
    "Thailand", "Turkey", "Ukraine", "United Arab Emirates", "United Kingdom",
    "United States", "Vietnam",
];

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Email, password, and name are required")]
    MissingAccountFields,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Listing name, location, and description are required")]
    IncompleteListing,
}

/// Countries containing `query` (case-insensitive), minus those in `exclude`.
pub fn search_countries(query: &str, exclude: &[String]) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    COUNTRIES
        .iter()
        .copied()
        .filter(|c| c.to_lowercase().contains(&query))
        .filter(|c| !exclude.iter().any(|e| e == c))
        .collect()
}

/// Leading-integer parse: "1200 followers" → 1200, garbage → 0. Values too
/// large for `u64` saturate.
fn lenient_u64(input: &str) -> u64 {
    let digits: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

fn lenient_u32(input: &str) -> u32 {
    u32::try_from(lenient_u64(input)).unwrap_or(u32::MAX)
}

/// Leading-decimal parse: "4.5%" → 4.5, garbage → 0.
fn lenient_f64(input: &str) -> f64 {
    let trimmed = input.trim();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}

fn optional_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| lenient_f64(trimmed))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Toggle `item` in `list`, refusing additions past `limit`. Returns whether
/// the list changed.
fn toggle_limited<T: PartialEq>(list: &mut Vec<T>, item: T, limit: usize) -> bool {
    if let Some(index) = list.iter().position(|x| *x == item) {
        list.remove(index);
        return true;
    }
    if list.len() >= limit {
        return false;
    }
    list.push(item);
    true
}

fn toggle<T: PartialEq>(list: &mut Vec<T>, item: T) {
    toggle_limited(list, item, usize::MAX);
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountDraft {
    pub email: String,
    pub password: String,
    pub name: String,
    pub status: UserStatus,
    pub email_verified: bool,
}

impl AccountDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.email.is_empty() || self.password.is_empty() || self.name.is_empty() {
            return Err(DraftError::MissingAccountFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DraftError::PasswordTooShort);
        }
        if !EMAIL.is_match(&self.email) {
            return Err(DraftError::InvalidEmail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountryDraft {
    pub country: String,
    pub percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenderDraft {
    pub male: String,
    pub female: String,
}

/// One social platform row of the creator form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformDraft {
    pub name: PlatformName,
    pub handle: String,
    pub followers: String,
    pub engagement_rate: String,
    pub top_countries: Vec<CountryDraft>,
    pub top_age_groups: Vec<AgeGroup>,
    pub gender_split: GenderDraft,
}

impl PlatformDraft {
    /// Add a top country. Duplicates and a fourth country are ignored.
    pub fn select_country(&mut self, country: &str) -> bool {
        if self.top_countries.len() >= MAX_SELECTIONS
            || self.top_countries.iter().any(|c| c.country == country)
        {
            return false;
        }
        self.top_countries.push(CountryDraft {
            country: country.to_string(),
            percentage: String::new(),
        });
        true
    }

    pub fn remove_country(&mut self, country: &str) {
        self.top_countries.retain(|c| c.country != country);
    }

    pub fn set_country_percentage(&mut self, country: &str, percentage: &str) {
        if let Some(entry) = self.top_countries.iter_mut().find(|c| c.country == country) {
            entry.percentage = percentage.to_string();
        }
    }

    /// Countries matching `query` that are not selected yet.
    pub fn country_suggestions(&self, query: &str) -> Vec<&'static str> {
        let selected: Vec<String> = self.top_countries.iter().map(|c| c.country.clone()).collect();
        search_countries(query, &selected)
    }

    pub fn toggle_age_group(&mut self, group: AgeGroup) -> bool {
        toggle_limited(&mut self.top_age_groups, group, MAX_SELECTIONS)
    }

    pub fn is_complete(&self) -> bool {
        !self.handle.trim().is_empty()
            && !self.followers.trim().is_empty()
            && !self.engagement_rate.trim().is_empty()
    }

    /// `None` when handle, followers or engagement rate is missing.
    pub fn to_payload(&self) -> Option<NewPlatform> {
        if !self.is_complete() {
            return None;
        }
        let countries: Vec<CountryShare> = self
            .top_countries
            .iter()
            .filter(|c| !c.country.is_empty() && !c.percentage.trim().is_empty())
            .map(|c| CountryShare {
                country: c.country.clone(),
                percentage: lenient_f64(&c.percentage),
            })
            .collect();
        let age_groups: Vec<AgeGroupShare> = self
            .top_age_groups
            .iter()
            .map(|g| AgeGroupShare {
                age_range: g.label().to_string(),
                percentage: None,
            })
            .collect();
        let male = optional_number(&self.gender_split.male);
        let female = optional_number(&self.gender_split.female);
        let gender_split = (male.is_some() || female.is_some()).then(|| GenderSplit {
            male: male.unwrap_or(0.0),
            female: female.unwrap_or(0.0),
            other: None,
        });

        Some(NewPlatform {
            name: self.name,
            handle: self.handle.trim().to_string(),
            followers: lenient_u64(&self.followers),
            engagement_rate: lenient_f64(&self.engagement_rate),
            top_countries: (!countries.is_empty()).then_some(countries),
            top_age_groups: (!age_groups.is_empty()).then_some(age_groups),
            gender_split,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatorDraft {
    pub location: String,
    pub short_description: String,
    pub portfolio_link: String,
    pub phone: String,
    #[serde(skip)]
    pub profile_picture: Option<ImageFile>,
    pub platforms: Vec<PlatformDraft>,
}

impl CreatorDraft {
    /// Stage a picture for upload once the user exists.
    pub fn stage_profile_picture(&mut self, file: ImageFile) -> Result<(), ApiError> {
        file.validate()?;
        self.profile_picture = Some(file);
        Ok(())
    }

    pub fn clear_profile_picture(&mut self) {
        self.profile_picture = None;
    }

    pub fn add_platform(&mut self) -> &mut PlatformDraft {
        self.platforms.push(PlatformDraft::default());
        let last = self.platforms.len() - 1;
        &mut self.platforms[last]
    }

    pub fn remove_platform(&mut self, index: usize) {
        if index < self.platforms.len() {
            self.platforms.remove(index);
        }
    }

    /// Profile attributes for the create call. The picture is never included.
    pub fn to_payload(&self) -> NewCreatorProfile {
        NewCreatorProfile {
            location: non_empty(&self.location),
            short_description: non_empty(&self.short_description),
            portfolio_link: non_empty(&self.portfolio_link),
            phone: non_empty(&self.phone),
            profile_picture: None,
            platforms: self
                .platforms
                .iter()
                .filter_map(PlatformDraft::to_payload)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferingDraft {
    pub collaboration_type: CollaborationType,
    pub availability_months: Vec<String>,
    pub platforms: Vec<PlatformName>,
    pub free_stay_min_nights: String,
    pub free_stay_max_nights: String,
    pub paid_max_amount: String,
    pub discount_percentage: String,
}

impl OfferingDraft {
    pub fn toggle_month(&mut self, month: &str) {
        toggle(&mut self.availability_months, month.to_string());
    }

    pub fn toggle_platform(&mut self, platform: PlatformName) {
        toggle(&mut self.platforms, platform);
    }

    /// Only the field group of the selected type is carried over.
    pub fn to_payload(&self) -> NewOffering {
        let nights = |s: &str| non_empty(s).map(|v| lenient_u32(&v));
        let terms = match self.collaboration_type {
            CollaborationType::FreeStay => OfferingTerms::FreeStay {
                min_nights: nights(&self.free_stay_min_nights),
                max_nights: nights(&self.free_stay_max_nights),
            },
            CollaborationType::Paid => OfferingTerms::Paid {
                max_amount: optional_number(&self.paid_max_amount),
            },
            CollaborationType::Discount => OfferingTerms::Discount {
                percentage: optional_number(&self.discount_percentage),
            },
        };
        NewOffering {
            terms,
            availability_months: self.availability_months.clone(),
            platforms: self.platforms.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementsDraft {
    pub platforms: Vec<PlatformName>,
    pub min_followers: String,
    pub target_countries: Vec<String>,
    pub age_groups: Vec<AgeGroup>,
}

impl RequirementsDraft {
    pub fn toggle_platform(&mut self, platform: PlatformName) {
        toggle(&mut self.platforms, platform);
    }

    pub fn select_country(&mut self, country: &str) -> bool {
        if self.target_countries.iter().any(|c| c == country) {
            return false;
        }
        toggle_limited(&mut self.target_countries, country.to_string(), MAX_SELECTIONS)
    }

    pub fn remove_country(&mut self, country: &str) {
        self.target_countries.retain(|c| c != country);
    }

    pub fn toggle_age_group(&mut self, group: AgeGroup) {
        toggle(&mut self.age_groups, group);
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
            && self.min_followers.trim().is_empty()
            && self.target_countries.is_empty()
            && self.age_groups.is_empty()
    }

    /// Requirements payload plus the age range it was reduced from.
    pub fn to_payload(&self) -> (NewRequirements, AgeRange) {
        let range = age_range(&self.age_groups);
        let payload = NewRequirements {
            platforms: self.platforms.clone(),
            min_followers: non_empty(&self.min_followers).map(|v| lenient_u64(&v)),
            target_countries: self.target_countries.clone(),
            target_age_min: range.min,
            target_age_max: range.max,
        };
        (payload, range)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingDraft {
    pub name: String,
    pub location: String,
    pub description: String,
    pub accommodation_type: String,
    #[serde(skip)]
    pub images: Vec<ImageFile>,
    pub offerings: Vec<OfferingDraft>,
    pub requirements: RequirementsDraft,
}

impl ListingDraft {
    pub fn stage_image(&mut self, file: ImageFile) -> Result<(), ApiError> {
        file.validate()?;
        self.images.push(file);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    pub fn add_offering(&mut self, collaboration_type: CollaborationType) -> &mut OfferingDraft {
        self.offerings.push(OfferingDraft {
            collaboration_type,
            ..Default::default()
        });
        let last = self.offerings.len() - 1;
        &mut self.offerings[last]
    }

    pub fn remove_offering(&mut self, index: usize) {
        if index < self.offerings.len() {
            self.offerings.remove(index);
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty()
            || self.location.trim().is_empty()
            || self.description.trim().is_empty()
        {
            return Err(DraftError::IncompleteListing);
        }
        Ok(())
    }

    /// Listing payload with already-uploaded image URLs, plus the reduced
    /// age range (`None` when no requirements were entered).
    pub fn to_payload(&self, images: Vec<String>) -> (NewListing, Option<AgeRange>) {
        let (requirements, range) = if self.requirements.is_empty() {
            (None, None)
        } else {
            let (payload, range) = self.requirements.to_payload();
            (Some(payload), Some(range))
        };
        let listing = NewListing {
            name: self.name.trim().to_string(),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            accommodation_type: non_empty(&self.accommodation_type),
            images,
            collaboration_offerings: self.offerings.iter().map(OfferingDraft::to_payload).collect(),
            creator_requirements: requirements,
        };
        (listing, range)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelDraft {
    pub name: String,
    pub location: String,
    pub about: String,
    pub website: String,
    pub phone: String,
    #[serde(skip)]
    pub picture: Option<ImageFile>,
    pub listings: Vec<ListingDraft>,
}

impl HotelDraft {
    pub fn stage_picture(&mut self, file: ImageFile) -> Result<(), ApiError> {
        file.validate()?;
        self.picture = Some(file);
        Ok(())
    }

    pub fn add_listing(&mut self) -> &mut ListingDraft {
        self.listings.push(ListingDraft::default());
        let last = self.listings.len() - 1;
        &mut self.listings[last]
    }

    pub fn remove_listing(&mut self, index: usize) {
        if index < self.listings.len() {
            self.listings.remove(index);
        }
    }

    pub fn to_payload(&self) -> NewHotelProfile {
        NewHotelProfile {
            name: non_empty(&self.name),
            location: non_empty(&self.location),
            about: non_empty(&self.about),
            website: non_empty(&self.website),
            phone: non_empty(&self.phone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProfileDraft {
    Creator(CreatorDraft),
    Hotel(HotelDraft),
}

/// Everything the create page collects before submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserDraft {
    pub account: AccountDraft,
    pub profile: ProfileDraft,
}

impl UserDraft {
    pub fn creator(account: AccountDraft) -> Self {
        Self {
            account,
            profile: ProfileDraft::Creator(CreatorDraft::default()),
        }
    }

    pub fn hotel(account: AccountDraft) -> Self {
        Self {
            account,
            profile: ProfileDraft::Hotel(HotelDraft::default()),
        }
    }

    pub fn user_type(&self) -> UserType {
        match self.profile {
            ProfileDraft::Creator(_) => UserType::Creator,
            ProfileDraft::Hotel(_) => UserType::Hotel,
        }
    }

    pub fn creator_mut(&mut self) -> Option<&mut CreatorDraft> {
        match &mut self.profile {
            ProfileDraft::Creator(c) => Some(c),
            ProfileDraft::Hotel(_) => None,
        }
    }

    pub fn hotel_mut(&mut self) -> Option<&mut HotelDraft> {
        match &mut self.profile {
            ProfileDraft::Hotel(h) => Some(h),
            ProfileDraft::Creator(_) => None,
        }
    }

    /// Body of the first creation step. Staged images and listings are not
    /// part of it.
    pub fn to_new_user(&self) -> NewUser {
        let (creator_profile, hotel_profile) = match &self.profile {
            ProfileDraft::Creator(c) => (Some(c.to_payload()), None),
            ProfileDraft::Hotel(h) => (None, Some(h.to_payload())),
        };
        NewUser {
            email: self.account.email.trim().to_string(),
            password: self.account.password.clone(),
            name: self.account.name.trim().to_string(),
            user_type: self.user_type(),
            status: self.account.status,
            email_verified: self.account.email_verified,
            avatar: None,
            creator_profile,
            hotel_profile,
        }
    }
}
