//! Multi-step operations over the service traits.
//!
//! [`create`] runs the staged creation of a user, its images and listings.
//! [`edit`] loads a user graph once and saves per-section diffs against it.

pub mod create;
pub mod edit;

use crate::draft::DraftError;
use crate::error::ApiError;

/// Fatal failure of a workflow. Degraded steps are reported as data instead.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl WorkflowError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            WorkflowError::Api(err) => Some(err),
            WorkflowError::Draft(_) => None,
        }
    }
}
