//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::NewUser;

/// Maximum accepted length for names and emails
pub const MAX_FIELD_LENGTH: usize = 256;

/// Request body for POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        if name.len() > MAX_FIELD_LENGTH || email.len() > MAX_FIELD_LENGTH {
            return Some(format!(
                "Fields cannot exceed {} characters",
                MAX_FIELD_LENGTH
            ));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => None,
            _ => Some("Email must be a valid address".to_string()),
        }
    }

    /// Trimmed fields ready for the data source.
    pub fn into_new_user(self) -> NewUser {
        NewUser::new(self.name.trim(), self.email.trim())
    }
}
