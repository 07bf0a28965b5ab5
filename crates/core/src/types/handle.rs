//! URL-safe handle type for products and categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Handle`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The input string is empty.
    #[error("handle cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("handle must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not already in normalized form.
    #[error("handle is not normalized (expected '{expected}')")]
    NotNormalized {
        /// What the input normalizes to.
        expected: String,
    },
}

/// A URL-safe slug identifying a product or category.
///
/// ## Normalization
///
/// - Lower-cased
/// - Every run of non-alphanumeric characters becomes a single `-`
/// - Leading and trailing hyphens are trimmed
///
/// ## Examples
///
/// ```
/// use tradeyard_core::Handle;
///
/// assert_eq!(Handle::normalize("Industrial Safety & PPE"), "industrial-safety-ppe");
/// assert_eq!(Handle::normalize("  --Packaging--  "), "packaging");
///
/// assert!(Handle::parse("pallet-wrap").is_ok());
/// assert!(Handle::parse("Pallet Wrap").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Maximum length of a handle.
    pub const MAX_LENGTH: usize = 255;

    /// Normalize arbitrary display text into handle form.
    ///
    /// Only ASCII alphanumerics are kept; everything else is a separator.
    #[must_use]
    pub fn normalize(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut pending_hyphen = false;

        for c in input.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        out
    }

    /// Build a handle from a display name (e.g. a category title).
    ///
    /// # Errors
    ///
    /// Returns an error if the name normalizes to an empty or over-long handle.
    pub fn from_name(name: &str) -> Result<Self, HandleError> {
        let normalized = Self::normalize(name);
        Self::check_length(&normalized)?;
        Ok(Self(normalized))
    }

    /// Parse a handle that must already be in normalized form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or not normalized.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        Self::check_length(s)?;
        let expected = Self::normalize(s);
        if expected != s {
            return Err(HandleError::NotNormalized { expected });
        }
        Ok(Self(s.to_owned()))
    }

    fn check_length(s: &str) -> Result<(), HandleError> {
        if s.is_empty() {
            return Err(HandleError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
