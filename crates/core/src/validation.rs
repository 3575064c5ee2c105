//! Form validation errors

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

/// A single failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fewer characters than required.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Wire name of the field.
        field: &'static str,
        /// Minimum length.
        min: usize,
    },

    /// Length differs from the fixed length the field requires.
    #[error("{field} must be exactly {len} characters")]
    WrongLength {
        /// Wire name of the field.
        field: &'static str,
        /// Required length.
        len: usize,
    },

    /// Not a well-formed e-mail address.
    #[error("{field} is not a valid e-mail address")]
    InvalidEmail {
        /// Wire name of the field.
        field: &'static str,
    },

    /// Below zero.
    #[error("{field} can't be negative")]
    Negative {
        /// Wire name of the field.
        field: &'static str,
    },

    /// Not a decimal number.
    #[error("{field} is not a number")]
    NotANumber {
        /// Wire name of the field.
        field: &'static str,
    },
}

impl ValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TooShort { field, .. }
            | Self::WrongLength { field, .. }
            | Self::InvalidEmail { field }
            | Self::Negative { field }
            | Self::NotANumber { field } => *field,
        }
    }
}

/// Every check a form failed, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(SmallVec<[ValidationError; 4]>);

impl ValidationErrors {
    pub(crate) fn new(errors: SmallVec<[ValidationError; 4]>) -> Self {
        Self(errors)
    }

    /// Failed checks.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// First failure for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|error| error.field() == field)
    }

    /// Consumes the collection.
    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.0.iter();

        if let Some(first) = errors.next() {
            write!(f, "{first}")?;
        }

        for error in errors {
            write!(f, "; {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Character count of `value` after trimming.
pub(crate) fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Loose structural e-mail check: one `@`, non-empty local part, a dotted domain, no whitespace.
pub(crate) fn is_email(value: &str) -> bool {
    let value = value.trim();

    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_email("ana@example.com"));
        assert!(is_email(" luis.perez@correo.ec "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for value in ["", "ana", "ana@", "@example.com", "ana@example", "a b@c.d", "a@b@c.d", "a@.com"] {
            assert!(!is_email(value), "{value:?} should be rejected");
        }
    }

    #[test]
    fn display_joins_every_failure() {
        let errors = ValidationErrors::new(smallvec![
            ValidationError::TooShort { field: "nombre", min: 2 },
            ValidationError::InvalidEmail { field: "email" },
        ]);

        assert_eq!(
            errors.to_string(),
            "nombre must be at least 2 characters; email is not a valid e-mail address"
        );
        assert_eq!(
            errors.for_field("email"),
            Some(&ValidationError::InvalidEmail { field: "email" })
        );
    }
}
