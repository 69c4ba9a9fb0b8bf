//! Account rules: registration checks, sign-in error messages and the route guard.

use std::fmt;

use super::entities::Identity;
use super::errors::DomainError;

/// Failures reported by the identity provider, with their user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    EmailInUse,
    EmailNotVerified,
    Other(String),
}

impl IdentityError {
    pub fn message(&self) -> &str {
        match self {
            IdentityError::UserNotFound => "User not found. Create an account before signing in.",
            IdentityError::WrongPassword => "Wrong password. Try again.",
            IdentityError::InvalidEmail => "Invalid e-mail.",
            IdentityError::EmailInUse => "This e-mail is already registered.",
            IdentityError::EmailNotVerified => {
                "Your e-mail has not been verified yet. Check your inbox."
            }
            IdentityError::Other(m) if m.is_empty() => "Failed to sign in.",
            IdentityError::Other(m) => m.as_str(),
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Check a registration form before contacting the identity provider.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), DomainError> {
    if [name, email, password, confirm_password]
        .iter()
        .any(|f| f.is_empty())
    {
        return Err(DomainError::Validation(
            "Please fill in all fields.".to_string(),
        ));
    }
    if password != confirm_password {
        return Err(DomainError::Validation(
            "Passwords do not match.".to_string(),
        ));
    }
    Ok(())
}

/// Minimal shape check; the provider is the final judge.
pub fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin { return_url: String },
}

/// Signed in with a verified e-mail → allow; anything else → back to login.
pub fn guard(identity: Option<&Identity>, return_url: &str) -> AccessDecision {
    match identity {
        Some(id) if id.email_verified => AccessDecision::Allow,
        _ => AccessDecision::RedirectToLogin {
            return_url: return_url.to_string(),
        },
    }
}
