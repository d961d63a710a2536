//! Staged creation of a user with its profile picture and listings.
//!
//! # Design
//! Steps run strictly in order because each needs the id produced by the
//! first. Only the first step is fatal: once the user exists, nothing is
//! rolled back and later failures become warnings in the report.

use tracing::{info, warn};
use uuid::Uuid;

use super::WorkflowError;
use crate::age::AgeRange;
use crate::draft::{DraftError, ListingDraft, ProfileDraft, UserDraft};
use crate::error::ApiError;
use crate::payloads::{CreatorProfileUpdate, HotelProfileUpdate};
use crate::service::{UploadApi, UsersApi};
use crate::types::{Listing, User};
use crate::upload::ImageFile;

pub const PICTURE_UPLOAD_WARNING: &str =
    "User created successfully, but profile picture upload failed. You can update it later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Ok,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PictureOutcome {
    NotStaged,
    Uploaded(String),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingResult {
    Created(Listing),
    /// Created after the image upload failed.
    CreatedWithoutImages(Listing),
    Skipped(DraftError),
    Failed(String),
    /// An earlier listing failed to create, so this one was never sent.
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingOutcome {
    /// Position in the draft, 0-based.
    pub index: usize,
    pub name: String,
    pub result: ListingResult,
}

impl ListingOutcome {
    pub fn status(&self) -> OutcomeStatus {
        match self.result {
            ListingResult::Created(_) => OutcomeStatus::Ok,
            ListingResult::CreatedWithoutImages(_) => OutcomeStatus::Partial,
            _ => OutcomeStatus::Failed,
        }
    }

    pub fn listing(&self) -> Option<&Listing> {
        match &self.result {
            ListingResult::Created(l) | ListingResult::CreatedWithoutImages(l) => Some(l),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreationReport {
    pub user: User,
    pub profile_picture: PictureOutcome,
    pub listings: Vec<ListingOutcome>,
    pub warnings: Vec<String>,
}

impl CreationReport {
    pub fn status(&self) -> OutcomeStatus {
        let degraded = self.profile_picture == PictureOutcome::Failed
            || !self.warnings.is_empty()
            || self.listings.iter().any(|l| l.status() != OutcomeStatus::Ok);
        if degraded {
            OutcomeStatus::Partial
        } else {
            OutcomeStatus::Ok
        }
    }

    pub fn created_listings(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter().filter_map(ListingOutcome::listing)
    }
}

pub struct CreationWorkflow<'a, A> {
    api: &'a A,
}

impl<'a, A: UsersApi + UploadApi> CreationWorkflow<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub fn run(&self, draft: &UserDraft) -> Result<CreationReport, WorkflowError> {
        draft.account.validate()?;

        let user = self.api.create_user(&draft.to_new_user())?;
        info!(user_id = %user.id, user_type = user.user_type.as_str(), "user created");

        let mut report = CreationReport {
            user,
            profile_picture: PictureOutcome::NotStaged,
            listings: Vec::new(),
            warnings: Vec::new(),
        };
        let user_id = report.user.id;

        match &draft.profile {
            ProfileDraft::Creator(creator) => {
                if let Some(file) = &creator.profile_picture {
                    report.profile_picture = self.attach_picture(user_id, file, false);
                }
            }
            ProfileDraft::Hotel(hotel) => {
                if let Some(file) = &hotel.picture {
                    report.profile_picture = self.attach_picture(user_id, file, true);
                }
                report.listings = self.create_listings(user_id, &hotel.listings, &mut report.warnings);
            }
        }
        if report.profile_picture == PictureOutcome::Failed {
            report.warnings.insert(0, PICTURE_UPLOAD_WARNING.to_string());
        }

        Ok(report)
    }

    /// Upload the staged picture and patch the profile with its URL.
    fn attach_picture(&self, user_id: Uuid, file: &ImageFile, hotel: bool) -> PictureOutcome {
        let result = if hotel {
            self.api
                .upload_hotel_profile_image(user_id, file)
                .and_then(|image| {
                    let patch = HotelProfileUpdate {
                        picture: Some(image.url.clone()),
                        ..Default::default()
                    };
                    self.api.update_hotel_profile(user_id, &patch).map(|_| image.url)
                })
        } else {
            self.api
                .upload_creator_profile_image(user_id, file)
                .and_then(|image| {
                    let patch = CreatorProfileUpdate {
                        profile_picture: Some(image.url.clone()),
                        ..Default::default()
                    };
                    self.api.update_creator_profile(user_id, &patch).map(|_| image.url)
                })
        };
        match result {
            Ok(url) => {
                info!(%user_id, %url, "profile picture attached");
                PictureOutcome::Uploaded(url)
            }
            Err(err) => {
                warn!(%user_id, error = %err, "profile picture upload failed");
                PictureOutcome::Failed
            }
        }
    }

    fn create_listings(
        &self,
        user_id: Uuid,
        drafts: &[ListingDraft],
        warnings: &mut Vec<String>,
    ) -> Vec<ListingOutcome> {
        let mut outcomes = Vec::with_capacity(drafts.len());
        let mut halted = false;

        for (index, draft) in drafts.iter().enumerate() {
            let name = draft.name.trim().to_string();
            let result = if halted {
                ListingResult::NotAttempted
            } else {
                match self.create_listing(user_id, index, draft, warnings) {
                    Ok(result) => result,
                    Err(err) => {
                        halted = true;
                        warn!(%user_id, index, error = %err, "listing creation failed");
                        warnings.push(format!(
                            "Failed to create listing \"{name}\": {}. Remaining listings were not created.",
                            err.detail().map(|d| d.display_text()).unwrap_or_else(|| err.to_string())
                        ));
                        ListingResult::Failed(err.to_string())
                    }
                }
            };
            outcomes.push(ListingOutcome {
                index,
                name,
                result,
            });
        }
        outcomes
    }

    fn create_listing(
        &self,
        user_id: Uuid,
        index: usize,
        draft: &ListingDraft,
        warnings: &mut Vec<String>,
    ) -> Result<ListingResult, ApiError> {
        if let Err(err) = draft.validate() {
            warn!(%user_id, index, "skipping incomplete listing");
            warnings.push(format!("Listing {} skipped: {err}", index + 1));
            return Ok(ListingResult::Skipped(err));
        }
        let name = draft.name.trim();

        let mut images_failed = false;
        let images = if draft.images.is_empty() {
            Vec::new()
        } else {
            match self.api.upload_listing_images(user_id, &draft.images) {
                Ok(uploaded) => uploaded.into_iter().map(|i| i.url).collect(),
                Err(err) => {
                    warn!(%user_id, index, error = %err, "listing image upload failed");
                    warnings.push(format!(
                        "Images for listing \"{name}\" failed to upload. The listing was created without images."
                    ));
                    images_failed = true;
                    Vec::new()
                }
            }
        };

        let (payload, range) = draft.to_payload(images);
        if let Some(range) = range.filter(|r| !r.contiguous) {
            warnings.push(gap_warning(name, range));
        }

        let listing = self.api.create_listing(user_id, &payload)?;
        info!(%user_id, listing_id = %listing.id, "listing created");
        Ok(if images_failed {
            ListingResult::CreatedWithoutImages(listing)
        } else {
            ListingResult::Created(listing)
        })
    }
}

fn gap_warning(name: &str, range: AgeRange) -> String {
    let bound = |b: Option<u8>| b.map(|v| v.to_string()).unwrap_or_default();
    format!(
        "Listing \"{name}\": selected age groups are not adjacent, targeting ages {} to {}.",
        bound(range.min),
        bound(range.max)
    )
}
