//! Session gates for privileged actions.

use domains::{DomainError, Result, Session};

/// Any authenticated caller.
pub fn require_session<'a>(session: Option<&'a Session>, action: &str) -> Result<&'a Session> {
    session.ok_or_else(|| {
        tracing::info!(action, "rejected anonymous caller");
        DomainError::Unauthenticated(format!("you must be signed in to {action}"))
    })
}

/// An authenticated caller whose email address is verified.
pub fn require_verified<'a>(session: Option<&'a Session>, action: &str) -> Result<&'a Session> {
    let session = require_session(session, action)?;
    if !session.email_verified {
        tracing::info!(user_id = %session.user_id, action, "rejected unverified caller");
        return Err(DomainError::EmailNotVerified(format!(
            "verify your email address to {action}"
        )));
    }
    Ok(session)
}
