//! JSON manifest for `users create`.
//!
//! A manifest is a user draft plus the paths of the images to stage. Paths
//! are resolved relative to the manifest's directory.
//!
//! ```json
//! {
//!   "account": { "email": "casa@example.com", "password": "password123", "name": "Casa" },
//!   "profile": { "type": "hotel", "name": "Casa Azul", "listings": [ ... ] },
//!   "profilePicture": "front.jpg",
//!   "listingImages": [["suite-1.jpg", "suite-2.jpg"], []]
//! }
//! ```

use std::path::{Path, PathBuf};

use admin_core::{ImageFile, UserDraft};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(flatten)]
    pub draft: UserDraft,
    #[serde(default)]
    pub profile_picture: Option<PathBuf>,
    /// One entry per listing, in listing order.
    #[serde(default)]
    pub listing_images: Vec<Vec<PathBuf>>,
}

fn read_image(base: &Path, path: &Path) -> Result<ImageFile> {
    let full = base.join(path);
    ImageFile::read(&full).with_context(|| format!("reading image {}", full.display()))
}

impl Manifest {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid manifest")
    }

    /// Read every referenced image and stage it on the draft.
    pub fn into_draft(self, base: &Path) -> Result<UserDraft> {
        let mut draft = self.draft;

        if let Some(path) = &self.profile_picture {
            let file = read_image(base, path)?;
            if let Some(creator) = draft.creator_mut() {
                creator.stage_profile_picture(file)?;
            } else if let Some(hotel) = draft.hotel_mut() {
                hotel.stage_picture(file)?;
            }
        }

        if self.listing_images.iter().any(|paths| !paths.is_empty()) {
            let Some(hotel) = draft.hotel_mut() else {
                bail!("listingImages is only valid for hotel users");
            };
            if self.listing_images.len() > hotel.listings.len() {
                bail!(
                    "listingImages has {} entries but the draft has {} listings",
                    self.listing_images.len(),
                    hotel.listings.len()
                );
            }
            for (listing, paths) in hotel.listings.iter_mut().zip(&self.listing_images) {
                for path in paths {
                    listing.stage_image(read_image(base, path)?)?;
                }
            }
        }

        Ok(draft)
    }
}

pub fn load(path: &Path) -> Result<UserDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Manifest::parse(&raw)?.into_draft(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_core::UserType;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("marketplace-admin-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_hotel_manifest() {
        let manifest = Manifest::parse(
            r#"{
                "account": {"email": "a@b.co", "password": "password123", "name": "A"},
                "profile": {"type": "hotel", "name": "Casa", "listings": [{"name": "Suite"}]},
                "listingImages": [["suite.jpg"]]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.draft.user_type(), UserType::Hotel);
        assert_eq!(manifest.listing_images, vec![vec![PathBuf::from("suite.jpg")]]);
        assert!(manifest.profile_picture.is_none());
    }

    #[test]
    fn stages_images_relative_to_manifest() {
        let dir = temp_dir("stage");
        std::fs::write(dir.join("me.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let path = dir.join("creator.json");
        std::fs::write(
            &path,
            r#"{
                "account": {"email": "a@b.co", "password": "password123", "name": "A"},
                "profile": {"type": "creator"},
                "profilePicture": "me.png"
            }"#,
        )
        .unwrap();

        let mut draft = load(&path).unwrap();
        let picture = draft.creator_mut().unwrap().profile_picture.clone().unwrap();
        assert_eq!(picture.file_name, "me.png");
        assert_eq!(picture.content_type, "image/png");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn listing_images_need_a_hotel() {
        let manifest = Manifest::parse(
            r#"{
                "account": {"email": "a@b.co", "password": "password123", "name": "A"},
                "profile": {"type": "creator"},
                "listingImages": [["x.jpg"]]
            }"#,
        )
        .unwrap();
        assert!(manifest.into_draft(Path::new(".")).is_err());
    }
}
