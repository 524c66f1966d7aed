//! Email address precondition
//!
//! The scheduler uses the submitter's address for logging and job
//! notifications, so every request must carry a plausible one.

use crate::error::{Error, Result};
use crate::form::{FormState, fields};

/// Example address from the documentation; treated as unset
pub const PLACEHOLDER_EMAIL: &str = "youraddress@goeshere";

/// Check the `Email_Address` field of a form
pub fn check(form: &FormState) -> Result<()> {
    let source = form.get(fields::EMAIL_ADDRESS).ok_or_else(|| {
        Error::Validation("Email_Address must be specified".to_string())
    })?;

    let address = source.as_text().ok_or_else(|| {
        Error::Validation("Email_Address must be a text value".to_string())
    })?;

    if address.is_empty() {
        return Err(Error::Validation("Email_Address is empty".to_string()));
    }
    if address == PLACEHOLDER_EMAIL {
        return Err(Error::Validation(format!(
            "{address} is not a valid email address; set Email_Address to your own address"
        )));
    }
    if !is_well_formed(address) {
        return Err(Error::Validation(format!(
            "{address} is not a well-formed email address"
        )));
    }
    Ok(())
}

/// Whether the form's email field passes [`check`]
pub fn is_valid(form: &FormState) -> bool {
    check(form).is_ok()
}

/// `@` after at least one character, then a `.` somewhere after the `@`
fn is_well_formed(address: &str) -> bool {
    let Some(first) = address.chars().next() else {
        return false;
    };
    let local_start = first.len_utf8();
    let Some(at) = address[local_start..].find('@') else {
        return false;
    };
    address[local_start + at + 1..].contains('.')
}
