//! Synchronous client core for the marketplace admin API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A [`Transport`] executes the
//! round-trip; [`UreqTransport`] is the blocking implementation the CLI uses.
//!
//! # Design
//! - `AdminClient` is stateless. It holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and every request can be checked without a server.
//! - [`AdminService`] joins client, transport and token store behind the
//!   [`UsersApi`], [`UploadApi`] and [`MarketplaceApi`] traits; workflows
//!   only see the traits.
//! - Response keys are camelized before deserialization, so models use
//!   camelCase field names regardless of what the backend sends.

pub mod age;
pub mod case;
pub mod client;
pub mod draft;
pub mod error;
pub mod http;
pub mod marketplace;
pub mod messages;
pub mod paging;
pub mod payloads;
pub mod service;
pub mod token;
pub mod types;
pub mod upload;
pub mod workflow;

pub use age::{age_range, AgeGroup, AgeRange};
pub use client::AdminClient;
pub use draft::{
    AccountDraft, CreatorDraft, DraftError, HotelDraft, ListingDraft, OfferingDraft,
    PlatformDraft, ProfileDraft, RequirementsDraft, UserDraft,
};
pub use error::{ApiError, ErrorDetail, FieldError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use messages::{describe, field_errors, Action};
pub use paging::{Pagination, DEFAULT_PAGE_SIZE};
pub use marketplace::{MarketplaceCreator, MarketplaceListing, MarketplacePreview};
pub use service::{AdminService, MarketplaceApi, UploadApi, UsersApi};
pub use token::{FileTokenStore, StaticToken, StoredToken, TokenStore};
pub use types::{User, UserDetail, UserStatus, UserType};
pub use upload::ImageFile;
pub use workflow::create::{CreationReport, CreationWorkflow, OutcomeStatus};
pub use workflow::edit::EditSession;
pub use workflow::WorkflowError;
