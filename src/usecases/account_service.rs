//! Account use cases: registration, e-mail verification, sign-in, password reset and the guard.
//!
//! Credentials live behind IdentityPort; profiles behind UserRepoPort, keyed by identity uid.

use crate::domain::account::{guard, validate_registration};
use crate::domain::{AccessDecision, DomainError, Identity, IdentityError, User, UserRole};
use crate::ports::{IdentityPort, UserRepoPort};
use std::sync::Arc;
use tracing::{info, warn};

/// Registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct AccountService {
    identity: Arc<dyn IdentityPort>,
    users: Arc<dyn UserRepoPort>,
}

impl AccountService {
    pub fn new(identity: Arc<dyn IdentityPort>, users: Arc<dyn UserRepoPort>) -> Self {
        Self { identity, users }
    }

    /// Create credentials and the profile `{name, email, role: user}`.
    pub async fn register(&self, form: Registration) -> Result<User, DomainError> {
        validate_registration(
            &form.name,
            &form.email,
            &form.password,
            &form.confirm_password,
        )?;

        let identity = self
            .identity
            .create_account(&form.email, &form.password)
            .await?;
        let user = User {
            id: identity.uid.clone(),
            name: form.name,
            email: identity.email,
            role: UserRole::User,
        };
        self.users.save_user(&user).await?;
        info!(uid = %user.id, "user registered");
        Ok(user)
    }

    /// Consume the token sent to the address at registration.
    pub async fn verify_email(&self, token: &str) -> Result<(), DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::MissingParameter("token"));
        }
        match self.identity.confirm_email(token).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(
                "This verification link is invalid or has already been used.".to_string(),
            )),
        }
    }

    /// Sign in. Unverified e-mails are rejected. A missing profile is recreated.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Please fill in all fields.".to_string(),
            ));
        }

        let identity = self.identity.sign_in(email, password).await.inspect_err(|e| {
            warn!(error = %e, "sign-in failed");
        })?;
        if !identity.email_verified {
            return Err(IdentityError::EmailNotVerified.into());
        }

        let user = self.ensure_profile(&identity).await?;
        info!(uid = %user.id, "user signed in");
        Ok(user)
    }

    async fn ensure_profile(&self, identity: &Identity) -> Result<User, DomainError> {
        if let Some(user) = self.users.get_user(&identity.uid).await? {
            return Ok(user);
        }
        let user = User {
            id: identity.uid.clone(),
            name: String::new(),
            email: identity.email.clone(),
            role: UserRole::User,
        };
        self.users.save_user(&user).await?;
        info!(uid = %user.id, "profile recreated on sign-in");
        Ok(user)
    }

    /// Ask the provider to send a reset e-mail. Failures are logged, never returned.
    pub async fn request_password_reset(&self, email: &str) {
        if let Err(e) = self.identity.send_password_reset(email).await {
            warn!(error = %e, "password reset failed");
        }
    }

    /// Route guard. `uid` is the caller's claimed identity, if any.
    pub async fn authorize(
        &self,
        uid: Option<&str>,
        return_url: &str,
    ) -> Result<Identity, DomainError> {
        let identity = match uid {
            Some(uid) if !uid.is_empty() => self.identity.get_identity(uid).await?,
            _ => None,
        };
        match (guard(identity.as_ref(), return_url), identity) {
            (AccessDecision::Allow, Some(identity)) => Ok(identity),
            _ => Err(DomainError::Unauthorized {
                return_url: if return_url.is_empty() { "/" } else { return_url }.to_string(),
            }),
        }
    }

    pub async fn profile(&self, uid: &str) -> Result<User, DomainError> {
        self.users
            .get_user(uid)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found.", uid)))
    }
}
