//! Image staging and multipart upload requests.
//!
//! # Design
//! Uploads follow the same build/parse split as the JSON endpoints. The
//! multipart body is assembled here so the transport only moves bytes.
//! Images are validated when staged, before any request is built.

use std::path::Path;

use uuid::Uuid;

use crate::client::{parse_body, AdminClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{UploadedImage, UploadedImages};

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image held in memory until the workflow uploads it.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Read a file from disk, taking the content type from its extension.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }

    /// Reject non-image content types and files over [`MAX_IMAGE_BYTES`].
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.content_type.starts_with("image/") {
            return Err(ApiError::InvalidImage(
                "Please select an image file".to_string(),
            ));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::InvalidImage(
                "Image size must be less than 5MB".to_string(),
            ));
        }
        Ok(())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Percent-encode the characters that would end the quoted header value.
fn quoted_file_name(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// A `multipart/form-data` body made of file parts.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(&format!("admin-core-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: &str) -> Self {
        Self {
            boundary: boundary.to_string(),
            body: Vec::new(),
        }
    }

    pub fn file(mut self, field: &str, file: &ImageFile) -> Self {
        let file_name = quoted_file_name(&file.file_name);
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        self.body.extend_from_slice(&file.bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (self.content_type(), self.body)
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminClient {
    fn multipart(&self, path: String, form: MultipartForm) -> HttpRequest {
        let (content_type, body) = form.finish();
        HttpRequest {
            method: HttpMethod::Post,
            path,
            headers: vec![("content-type".to_string(), content_type)],
            body: Some(body),
        }
    }

    /// `POST /upload/image/creator-profile`, single `file` part.
    pub fn build_upload_creator_profile_image(
        &self,
        target_user_id: Uuid,
        file: &ImageFile,
        form: MultipartForm,
    ) -> Result<HttpRequest, ApiError> {
        file.validate()?;
        let path = self.url(
            "/upload/image/creator-profile",
            &[("target_user_id", target_user_id.to_string())],
        );
        Ok(self.multipart(path, form.file("file", file)))
    }

    /// `POST /upload/images/listing`, one `files` part per image.
    pub fn build_upload_listing_images(
        &self,
        target_user_id: Uuid,
        files: &[ImageFile],
        form: MultipartForm,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(
            "/upload/images/listing",
            &[("target_user_id", target_user_id.to_string())],
        );
        self.build_multi_upload(path, files, form)
    }

    /// `POST /upload/images` under a storage prefix such as `hotels`.
    pub fn build_upload_images(
        &self,
        target_user_id: Uuid,
        prefix: &str,
        files: &[ImageFile],
        form: MultipartForm,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.url(
            "/upload/images",
            &[
                ("target_user_id", target_user_id.to_string()),
                ("prefix", prefix.to_string()),
            ],
        );
        self.build_multi_upload(path, files, form)
    }

    fn build_multi_upload(
        &self,
        path: String,
        files: &[ImageFile],
        form: MultipartForm,
    ) -> Result<HttpRequest, ApiError> {
        if files.is_empty() {
            return Err(ApiError::InvalidImage("No images selected".to_string()));
        }
        let mut form = form;
        for file in files {
            file.validate()?;
            form = form.file("files", file);
        }
        Ok(self.multipart(path, form))
    }

    pub fn parse_uploaded_image(&self, response: HttpResponse) -> Result<UploadedImage, ApiError> {
        parse_body(response)
    }

    pub fn parse_uploaded_images(
        &self,
        response: HttpResponse,
    ) -> Result<UploadedImages, ApiError> {
        parse_body(response)
    }
}
