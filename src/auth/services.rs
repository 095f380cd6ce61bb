use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    claims::TokenKind,
    dto::{ChangePasswordRequest, LoginRequest, RegisterRequest},
    errors::AuthError,
    jwt::{TokenError, TokenIssuer},
    password::PasswordHasher,
    repo::UserStore,
    repo_types::User,
};
use crate::{
    api::validation::{check, normalize_email},
    store::{Repository, StoreError},
};

lazy_static! {
    /// Verified against when the email is unknown so both login failures cost
    /// one hash comparison.
    static ref DUMMY_HASH: String = PasswordHasher
        .hash("dummy-password-for-timing")
        .unwrap_or_default();
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registration, login, refresh, identity resolution and password changes.
///
/// Holds no per-request state; everything it owns is read-only after startup.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self {
            users,
            tokens,
            hasher: PasswordHasher,
        }
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        let req = RegisterRequest {
            username: req.username.trim().to_string(),
            email: normalize_email(&req.email),
            password: req.password,
        };
        check(&req).map_err(AuthError::Validation)?;
        let email = req.email;

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let hash = self.hasher.hash(&req.password)?;
        let user = User::new(req.username, email, hash);
        let user = match self.users.create(user).await {
            Ok(u) => u,
            // Lost the race against a concurrent registration.
            Err(StoreError::Conflict(_)) => return Err(AuthError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, req))]
    pub async fn login(&self, req: LoginRequest) -> Result<TokenPair, AuthError> {
        let email = normalize_email(&req.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            let _ = self.hasher.verify(&req.password, &DUMMY_HASH);
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(&req.password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = TokenPair {
            access_token: self.issue(user.id, TokenKind::Access)?,
            refresh_token: self.issue(user.id, TokenKind::Refresh)?,
        };
        info!(user_id = %user.id, "user logged in");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new access token for the same subject.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user_id = self
            .tokens
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                warn!(error = %e, "refresh token rejected");
                AuthError::InvalidToken(e)
            })?;
        let access = self.issue(user_id, TokenKind::Access)?;
        info!(user_id = %user_id, "access token refreshed");
        Ok(access)
    }

    #[instrument(skip_all)]
    pub async fn current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let user_id = self
            .tokens
            .validate(access_token, TokenKind::Access)
            .map_err(|e| {
                warn!(error = %e, "access token rejected");
                match e {
                    TokenError::Expired => AuthError::Unauthorized("token has expired"),
                    _ => AuthError::Unauthorized("invalid token"),
                }
            })?;

        self.users.fetch(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "token subject no longer exists");
            AuthError::Unauthorized("user not found")
        })
    }

    /// Previously issued tokens stay valid until they expire.
    #[instrument(skip(self, req))]
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        check(&req).map_err(AuthError::Validation)?;

        let user = self
            .users
            .fetch(user_id)
            .await?
            .ok_or(AuthError::Unauthorized("user not found"))?;

        if !self.hasher.verify(&req.old_password, &user.password_hash)? {
            warn!(user_id = %user_id, "change password with wrong old password");
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = self.hasher.hash(&req.new_password)?;
        let now = time::OffsetDateTime::now_utc();
        if !self.users.set_password_hash(user_id, &password_hash, now).await? {
            return Err(AuthError::Unauthorized("user not found"));
        }
        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String, AuthError> {
        let token = match kind {
            TokenKind::Access => self.tokens.issue_access_token(user_id),
            TokenKind::Refresh => self.tokens.issue_refresh_token(user_id),
        };
        token.map_err(|e| AuthError::Internal(e.to_string()))
    }
}
