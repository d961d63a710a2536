//! Inline messages for failed user actions.
//!
//! Errors are caught where the operator acted and turned into a line of
//! text; nothing is rethrown past that point.

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    LoadUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    SaveProfile,
    SaveListing,
    UploadImage,
    LoadMarketplace,
    Register,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::ListUsers => "load users",
            Action::LoadUser => "load user details",
            Action::CreateUser => "create user",
            Action::UpdateUser => "update user",
            Action::DeleteUser => "delete user",
            Action::SaveProfile => "save profile",
            Action::SaveListing => "save listing",
            Action::UploadImage => "upload image",
            Action::LoadMarketplace => "load marketplace",
            Action::Register => "register",
        }
    }
}

const AUTH_FAILED: &str = "Authentication failed. Please login again.";
const ACCESS_DENIED: &str = "Access denied. Admin privileges required.";

fn detail_or(err: &ApiError, fallback: String) -> String {
    err.detail()
        .map(|d| d.display_text())
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback)
}

/// Message shown next to the control that triggered `action`.
pub fn describe(err: &ApiError, action: Action) -> String {
    match (err, action) {
        (ApiError::Unauthorized { .. }, _) => AUTH_FAILED.to_string(),
        (ApiError::Forbidden { .. }, _) => ACCESS_DENIED.to_string(),
        (ApiError::NotFound { .. }, Action::ListUsers) => {
            "Backend endpoint /admin/users not found. Please ensure the backend API is running and the endpoint is configured.".to_string()
        }
        (ApiError::NotFound { .. }, Action::DeleteUser) => "User not found.".to_string(),
        (ApiError::NotFound { .. }, Action::LoadUser | Action::UpdateUser) => {
            "User not found".to_string()
        }
        (ApiError::Validation { status: 400, .. }, Action::DeleteUser) => {
            "Cannot delete your own account.".to_string()
        }
        (ApiError::Validation { .. }, _) => detail_or(err, "Validation error".to_string()),
        (ApiError::Conflict { .. }, Action::Register | Action::CreateUser) => {
            "This email is already registered".to_string()
        }
        (ApiError::Transport(_), _) => format!(
            "Failed to {}. Please check your connection and try again.",
            action.verb()
        ),
        (ApiError::InvalidImage(msg), _) => msg.clone(),
        _ => detail_or(err, format!("Failed to {}", action.verb())),
    }
}

/// Field-level messages keyed by the last `loc` element, for forms that
/// show errors next to each input.
pub fn field_errors(err: &ApiError) -> Vec<(String, String)> {
    err.detail()
        .map(|d| {
            d.fields()
                .iter()
                .map(|f| (f.field().unwrap_or_default(), f.msg.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorDetail, FieldError};
    use serde_json::json;

    fn message(text: &str) -> ErrorDetail {
        ErrorDetail::Message(text.to_string())
    }

    #[test]
    fn auth_errors_are_the_same_everywhere() {
        let err = ApiError::Unauthorized {
            detail: message("expired"),
        };
        assert_eq!(describe(&err, Action::ListUsers), AUTH_FAILED);
        assert_eq!(describe(&err, Action::SaveListing), AUTH_FAILED);
        let err = ApiError::Forbidden {
            detail: message("no"),
        };
        assert_eq!(describe(&err, Action::DeleteUser), ACCESS_DENIED);
    }

    #[test]
    fn not_found_depends_on_action() {
        let err = ApiError::NotFound {
            detail: message("x"),
        };
        assert_eq!(describe(&err, Action::LoadUser), "User not found");
        assert_eq!(describe(&err, Action::DeleteUser), "User not found.");
        assert!(describe(&err, Action::ListUsers).starts_with("Backend endpoint"));
    }

    #[test]
    fn deleting_yourself_is_a_400() {
        let err = ApiError::Validation {
            status: 400,
            detail: message("self"),
        };
        assert_eq!(
            describe(&err, Action::DeleteUser),
            "Cannot delete your own account."
        );
    }

    #[test]
    fn validation_fields_are_joined() {
        let err = ApiError::Validation {
            status: 422,
            detail: ErrorDetail::Fields(vec![
                FieldError {
                    loc: vec![json!("body"), json!("email")],
                    msg: "bad email".into(),
                },
                FieldError {
                    loc: vec![json!("body"), json!("password")],
                    msg: "too short".into(),
                },
            ]),
        };
        assert_eq!(describe(&err, Action::CreateUser), "bad email, too short");
        assert_eq!(
            field_errors(&err),
            vec![
                ("email".to_string(), "bad email".to_string()),
                ("password".to_string(), "too short".to_string()),
            ]
        );
    }

    #[test]
    fn empty_validation_detail_falls_back() {
        let err = ApiError::Validation {
            status: 400,
            detail: message(""),
        };
        assert_eq!(describe(&err, Action::CreateUser), "Validation error");
    }

    #[test]
    fn transport_and_generic_fallbacks() {
        let err = ApiError::Transport("refused".into());
        assert_eq!(
            describe(&err, Action::ListUsers),
            "Failed to load users. Please check your connection and try again."
        );
        let err = ApiError::Http {
            status: 500,
            detail: message(""),
        };
        assert_eq!(describe(&err, Action::DeleteUser), "Failed to delete user");
        let err = ApiError::Conflict {
            detail: message("dup"),
        };
        assert_eq!(
            describe(&err, Action::Register),
            "This email is already registered"
        );
    }
}
