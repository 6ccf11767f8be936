use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("user email cannot be empty")]
    EmptyEmail,
}

/// The signed-in identity handed to the progress layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    full_name: Option<String>,
}

impl User {
    /// Creates a user identity.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyEmail` if the email is blank.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        full_name: Option<String>,
    ) -> Result<Self, UserError> {
        let email = email.into().trim().to_owned();
        if email.is_empty() {
            return Err(UserError::EmptyEmail);
        }
        let full_name = full_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        Ok(Self {
            id,
            email,
            full_name,
        })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Name shown in the dashboard greeting: full name, else email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name().unwrap_or(&self.email)
    }
}
