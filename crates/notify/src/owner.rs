//! Owner address resolution.
//!
//! Names are assumed to be "Last, First". The derived `first.last@domain`
//! address is never checked against a directory, so it may not exist.

use crate::model::HostRecord;

/// Resolve the address to notify for `record`, or `None` if it has neither an
/// explicit email nor an owner name with at least two tokens.
pub fn resolve_owner_email(record: &HostRecord, domain: &str) -> Option<String> {
    if let Some(email) = record.vdi_owner_email.as_deref().map(str::trim) {
        if !email.is_empty() {
            return Some(email.to_string());
        }
    }
    record
        .vdi_owner_name
        .as_deref()
        .and_then(|name| email_from_name(name, domain))
}

/// "Doe, John" -> "john.doe@domain". Tokens past the second are ignored.
pub fn email_from_name(name: &str, domain: &str) -> Option<String> {
    let cleaned = name.trim().replace(',', "");
    let mut parts = cleaned.split_whitespace();
    let last = parts.next()?;
    let first = parts.next()?;
    Some(format!(
        "{}.{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        domain.trim()
    ))
}
