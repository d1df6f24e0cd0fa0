//! Input validation for registration requests.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while validating caller input. Nothing has been written
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("value is not a valid email address: {reason}")]
    InvalidEmail { reason: &'static str },
}

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 63;

/// A syntactically valid email address.
///
/// Internationalized addresses are accepted: non-ASCII letters and digits
/// may appear in the local part and in domain labels. The local part is
/// kept as given; the domain is lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if raw.len() > MAX_ADDRESS_LEN {
            return Err(invalid("address is too long"));
        }

        let Some((local, domain)) = raw.rsplit_once('@') else {
            return Err(invalid("missing @"));
        };
        validate_local_part(local)?;
        validate_domain(domain)?;

        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn invalid(reason: &'static str) -> ValidationError {
    ValidationError::InvalidEmail { reason }
}

fn validate_local_part(local: &str) -> Result<(), ValidationError> {
    if local.is_empty() {
        return Err(invalid("empty local part"));
    }
    if local.len() > MAX_LOCAL_LEN {
        return Err(invalid("local part is too long"));
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(invalid("misplaced dot in local part"));
    }
    let allowed = |c: char| {
        c.is_ascii_alphanumeric()
            || "!#$%&'*+/=?^_`{|}~.-".contains(c)
            || (!c.is_ascii() && c.is_alphanumeric())
    };
    if !local.chars().all(allowed) {
        return Err(invalid("invalid character in local part"));
    }
    Ok(())
}

fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if domain.is_empty() {
        return Err(invalid("empty domain"));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("domain must contain a dot"));
    }
    for label in &labels {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(invalid("invalid domain label"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("domain label starts or ends with a hyphen"));
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(invalid("invalid character in domain"));
        }
    }
    let tld = labels.last().copied().unwrap_or_default();
    if tld.chars().count() < 2 || tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("invalid top-level domain"));
    }
    Ok(())
}

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim `value` and reject it if nothing is left.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}
