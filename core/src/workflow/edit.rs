//! Edit sessions over a loaded user graph.
//!
//! # Design
//! The session fetches the user once and keeps the result as the snapshot.
//! Buffers start as copies of the snapshot; saving sends only the fields
//! that differ, then re-fetches. There is no version check, so concurrent
//! edits resolve as last write wins.

use tracing::{info, warn};
use uuid::Uuid;

use crate::age::AgeGroup;
use crate::draft::{CountryDraft, GenderDraft, OfferingDraft, PlatformDraft, RequirementsDraft};
use crate::error::{ApiError, ErrorDetail};
use crate::payloads::{
    CreatorProfileUpdate, HotelProfileUpdate, ListingUpdate, NewRequirements, UserUpdate,
};
use crate::service::{UploadApi, UsersApi};
use crate::types::{
    CollaborationOffering, CreatorProfile, CreatorRequirements, DeletedUser, HotelProfile,
    Listing, OfferingTerms, Platform, UserDetail, UserStatus, UserType,
};
use crate::upload::ImageFile;

fn changed(current: &str, original: Option<&str>) -> Option<String> {
    (current != original.unwrap_or_default()).then(|| current.to_string())
}

fn number_text<N: ToString>(value: Option<N>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountBuffer {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub email_verified: bool,
}

impl AccountBuffer {
    pub fn from_snapshot(user: &UserDetail) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            status: user.status,
            email_verified: user.email_verified,
        }
    }

    pub fn diff(&self, user: &UserDetail) -> UserUpdate {
        UserUpdate {
            name: changed(&self.name, Some(user.name.as_str())),
            email: changed(&self.email, Some(user.email.as_str())),
            status: (self.status != user.status).then_some(self.status),
            email_verified: (self.email_verified != user.email_verified)
                .then_some(self.email_verified),
        }
    }
}

fn platform_draft(platform: &Platform) -> PlatformDraft {
    PlatformDraft {
        name: platform.name,
        handle: platform.handle.clone(),
        followers: platform.followers.to_string(),
        engagement_rate: platform.engagement_rate.to_string(),
        top_countries: platform
            .top_countries
            .iter()
            .flatten()
            .map(|c| CountryDraft {
                country: c.country.clone(),
                percentage: c.percentage.to_string(),
            })
            .collect(),
        top_age_groups: platform
            .top_age_groups
            .iter()
            .flatten()
            .filter_map(|g| g.age_range.parse().ok())
            .collect(),
        gender_split: platform
            .gender_split
            .as_ref()
            .map(|g| GenderDraft {
                male: g.male.to_string(),
                female: g.female.to_string(),
            })
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatorProfileBuffer {
    pub location: String,
    pub short_description: String,
    pub portfolio_link: String,
    pub phone: String,
    pub platforms: Vec<PlatformDraft>,
}

impl CreatorProfileBuffer {
    pub fn from_snapshot(profile: &CreatorProfile) -> Self {
        Self {
            location: profile.location.clone().unwrap_or_default(),
            short_description: profile.short_description.clone().unwrap_or_default(),
            portfolio_link: profile.portfolio_link.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            platforms: profile.platforms.iter().map(platform_draft).collect(),
        }
    }

    /// Platforms are replaced as a whole when any row changed.
    pub fn diff(&self, profile: &CreatorProfile) -> CreatorProfileUpdate {
        let original: Vec<PlatformDraft> = profile.platforms.iter().map(platform_draft).collect();
        let platforms = (self.platforms != original).then(|| {
            self.platforms
                .iter()
                .filter_map(PlatformDraft::to_payload)
                .collect()
        });
        CreatorProfileUpdate {
            location: changed(&self.location, profile.location.as_deref()),
            short_description: changed(
                &self.short_description,
                profile.short_description.as_deref(),
            ),
            portfolio_link: changed(&self.portfolio_link, profile.portfolio_link.as_deref()),
            phone: changed(&self.phone, profile.phone.as_deref()),
            platforms,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelProfileBuffer {
    pub name: String,
    pub location: String,
    pub email: String,
    pub about: String,
    pub website: String,
    pub phone: String,
}

impl HotelProfileBuffer {
    pub fn from_snapshot(profile: &HotelProfile) -> Self {
        Self {
            name: profile.name.clone(),
            location: profile.location.clone(),
            email: profile.email.clone(),
            about: profile.about.clone().unwrap_or_default(),
            website: profile.website.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
        }
    }

    pub fn diff(&self, profile: &HotelProfile) -> HotelProfileUpdate {
        HotelProfileUpdate {
            name: changed(&self.name, Some(profile.name.as_str())),
            location: changed(&self.location, Some(profile.location.as_str())),
            email: changed(&self.email, Some(profile.email.as_str())),
            about: changed(&self.about, profile.about.as_deref()),
            website: changed(&self.website, profile.website.as_deref()),
            phone: changed(&self.phone, profile.phone.as_deref()),
            picture: None,
        }
    }
}

/// Existing image URLs minus removals, plus staged new files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageEdit {
    kept: Vec<String>,
    added: Vec<ImageFile>,
}

impl ImageEdit {
    pub fn new(existing: &[String]) -> Self {
        Self {
            kept: existing.to_vec(),
            added: Vec::new(),
        }
    }

    pub fn kept(&self) -> &[String] {
        &self.kept
    }

    pub fn added(&self) -> &[ImageFile] {
        &self.added
    }

    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.kept.len();
        self.kept.retain(|u| u != url);
        self.kept.len() != before
    }

    pub fn add(&mut self, file: ImageFile) -> Result<(), ApiError> {
        file.validate()?;
        self.added.push(file);
        Ok(())
    }

    /// Kept URLs followed by freshly uploaded ones.
    pub fn resolve(&self, uploaded: Vec<String>) -> Vec<String> {
        let mut urls = self.kept.clone();
        urls.extend(uploaded);
        urls
    }
}

fn offering_draft(offering: &CollaborationOffering) -> OfferingDraft {
    let mut draft = OfferingDraft {
        collaboration_type: offering.terms.collaboration_type(),
        availability_months: offering.availability_months.clone(),
        platforms: offering.platforms.clone(),
        ..Default::default()
    };
    match offering.terms {
        OfferingTerms::FreeStay {
            min_nights,
            max_nights,
        } => {
            draft.free_stay_min_nights = number_text(min_nights);
            draft.free_stay_max_nights = number_text(max_nights);
        }
        OfferingTerms::Paid { max_amount } => draft.paid_max_amount = number_text(max_amount),
        OfferingTerms::Discount { percentage } => {
            draft.discount_percentage = number_text(percentage)
        }
    }
    draft
}

/// Buckets lying inside the stored age range.
fn requirements_draft(requirements: Option<&CreatorRequirements>) -> RequirementsDraft {
    let Some(r) = requirements else {
        return RequirementsDraft::default();
    };
    let age_groups = match (r.target_age_min, r.target_age_max) {
        (None, None) => Vec::new(),
        (min, max) => AgeGroup::ALL
            .into_iter()
            .filter(|g| {
                let (lo, hi) = g.bounds();
                lo >= min.unwrap_or(0) && hi <= max.unwrap_or(u8::MAX)
            })
            .collect(),
    };
    RequirementsDraft {
        platforms: r.platforms.clone(),
        min_followers: number_text(r.min_followers),
        target_countries: r.target_countries.clone(),
        age_groups,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingBuffer {
    pub listing_id: Uuid,
    pub name: String,
    pub location: String,
    pub description: String,
    pub accommodation_type: String,
    pub images: ImageEdit,
    pub offerings: Vec<OfferingDraft>,
    pub requirements: RequirementsDraft,
}

impl ListingBuffer {
    pub fn from_snapshot(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id,
            name: listing.name.clone(),
            location: listing.location.clone(),
            description: listing.description.clone(),
            accommodation_type: listing.accommodation_type.clone().unwrap_or_default(),
            images: ImageEdit::new(&listing.images),
            offerings: listing
                .collaboration_offerings
                .iter()
                .map(offering_draft)
                .collect(),
            requirements: requirements_draft(listing.creator_requirements.as_ref()),
        }
    }

    /// `images` is the final URL list after uploads; it is patched only when
    /// it differs from the stored sequence.
    pub fn diff(&self, listing: &Listing, images: Vec<String>) -> ListingUpdate {
        let offerings: Vec<OfferingDraft> = listing
            .collaboration_offerings
            .iter()
            .map(offering_draft)
            .collect();
        let requirements = requirements_draft(listing.creator_requirements.as_ref());
        ListingUpdate {
            name: changed(&self.name, Some(listing.name.as_str())),
            location: changed(&self.location, Some(listing.location.as_str())),
            description: changed(&self.description, Some(listing.description.as_str())),
            accommodation_type: changed(
                &self.accommodation_type,
                listing.accommodation_type.as_deref(),
            ),
            images: (images != listing.images).then_some(images),
            collaboration_offerings: (self.offerings != offerings)
                .then(|| self.offerings.iter().map(OfferingDraft::to_payload).collect()),
            creator_requirements: (self.requirements != requirements)
                .then(|| requirements_patch(&self.requirements, &requirements, listing)),
        }
    }
}

/// The stored age range survives unless the age-group selection changed;
/// ranges that are not bucket aligned would not round-trip.
fn requirements_patch(
    edited: &RequirementsDraft,
    stored: &RequirementsDraft,
    listing: &Listing,
) -> NewRequirements {
    let mut payload = edited.to_payload().0;
    if edited.age_groups == stored.age_groups {
        if let Some(r) = &listing.creator_requirements {
            payload.target_age_min = r.target_age_min;
            payload.target_age_max = r.target_age_max;
        }
    }
    payload
}

/// A loaded user plus the operations of the edit page.
pub struct EditSession<'a, A> {
    api: &'a A,
    snapshot: UserDetail,
}

impl<'a, A: UsersApi + UploadApi> EditSession<'a, A> {
    pub fn load(api: &'a A, user_id: Uuid) -> Result<Self, ApiError> {
        let snapshot = api.get_user(user_id)?;
        Ok(Self { api, snapshot })
    }

    pub fn snapshot(&self) -> &UserDetail {
        &self.snapshot
    }

    pub fn user_id(&self) -> Uuid {
        self.snapshot.id
    }

    pub fn refresh(&mut self) -> Result<(), ApiError> {
        self.snapshot = self.api.get_user(self.snapshot.id)?;
        Ok(())
    }

    /// A failed re-fetch does not undo a save that already landed; the
    /// snapshot stays as it was and the next save diffs against it.
    fn refresh_after_save(&mut self) {
        if let Err(err) = self.refresh() {
            warn!(user_id = %self.snapshot.id, error = %err, "saved, but reloading the user failed");
        }
    }

    pub fn account_buffer(&self) -> AccountBuffer {
        AccountBuffer::from_snapshot(&self.snapshot)
    }

    pub fn creator_buffer(&self) -> Option<CreatorProfileBuffer> {
        self.snapshot
            .creator_profile()
            .map(CreatorProfileBuffer::from_snapshot)
    }

    pub fn hotel_buffer(&self) -> Option<HotelProfileBuffer> {
        self.snapshot
            .hotel_profile()
            .map(HotelProfileBuffer::from_snapshot)
    }

    pub fn listing_buffer(&self, listing_id: Uuid) -> Option<ListingBuffer> {
        self.snapshot
            .listing(listing_id)
            .map(ListingBuffer::from_snapshot)
    }

    /// Returns whether an update was sent.
    pub fn save_account(&mut self, buffer: &AccountBuffer) -> Result<bool, ApiError> {
        let patch = buffer.diff(&self.snapshot);
        if patch.is_empty() {
            return Ok(false);
        }
        self.api.update_user(self.snapshot.id, &patch)?;
        info!(user_id = %self.snapshot.id, "account saved");
        self.refresh_after_save();
        Ok(true)
    }

    pub fn save_creator_profile(&mut self, buffer: &CreatorProfileBuffer) -> Result<bool, ApiError> {
        let Some(profile) = self.snapshot.creator_profile() else {
            return Ok(false);
        };
        let patch = buffer.diff(profile);
        if patch.is_empty() {
            return Ok(false);
        }
        self.api.update_creator_profile(self.snapshot.id, &patch)?;
        info!(user_id = %self.snapshot.id, "creator profile saved");
        self.refresh_after_save();
        Ok(true)
    }

    pub fn save_hotel_profile(&mut self, buffer: &HotelProfileBuffer) -> Result<bool, ApiError> {
        let Some(profile) = self.snapshot.hotel_profile() else {
            return Ok(false);
        };
        let patch = buffer.diff(profile);
        if patch.is_empty() {
            return Ok(false);
        }
        self.api.update_hotel_profile(self.snapshot.id, &patch)?;
        info!(user_id = %self.snapshot.id, "hotel profile saved");
        self.refresh_after_save();
        Ok(true)
    }

    /// Uploads staged images first, then patches the changed fields.
    pub fn save_listing(&mut self, buffer: &ListingBuffer) -> Result<bool, ApiError> {
        let user_id = self.snapshot.id;
        let Some(listing) = self.snapshot.listing(buffer.listing_id) else {
            return Err(ApiError::NotFound {
                detail: ErrorDetail::Message("Listing not found".to_string()),
            });
        };
        let uploaded = if buffer.images.added().is_empty() {
            Vec::new()
        } else {
            self.api
                .upload_listing_images(user_id, buffer.images.added())?
                .into_iter()
                .map(|i| i.url)
                .collect()
        };
        let patch = buffer.diff(listing, buffer.images.resolve(uploaded));
        if patch.is_empty() {
            return Ok(false);
        }
        self.api.update_listing(user_id, buffer.listing_id, &patch)?;
        info!(%user_id, listing_id = %buffer.listing_id, "listing saved");
        self.refresh_after_save();
        Ok(true)
    }

    /// Upload a new profile picture and point the profile at it.
    pub fn replace_profile_picture(&mut self, file: &ImageFile) -> Result<String, ApiError> {
        let user_id = self.snapshot.id;
        let url = match self.snapshot.user_type {
            UserType::Creator => {
                let url = self.api.upload_creator_profile_image(user_id, file)?.url;
                let patch = CreatorProfileUpdate {
                    profile_picture: Some(url.clone()),
                    ..Default::default()
                };
                self.api.update_creator_profile(user_id, &patch)?;
                url
            }
            UserType::Hotel => {
                let url = self.api.upload_hotel_profile_image(user_id, file)?.url;
                let patch = HotelProfileUpdate {
                    picture: Some(url.clone()),
                    ..Default::default()
                };
                self.api.update_hotel_profile(user_id, &patch)?;
                url
            }
            UserType::Admin => {
                return Err(ApiError::InvalidImage(
                    "Admin accounts have no profile picture".to_string(),
                ))
            }
        };
        info!(%user_id, %url, "profile picture replaced");
        self.refresh_after_save();
        Ok(url)
    }

    /// Cascading delete; the session is consumed.
    pub fn delete_user(self) -> Result<DeletedUser, ApiError> {
        let deleted = self.api.delete_user(self.snapshot.id)?;
        info!(user_id = %self.snapshot.id, "user deleted");
        Ok(deleted)
    }
}
