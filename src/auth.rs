//! Identity provider adapter and the signup/profile flows built on top of it.
//!
//! Authentication itself is delegated to an external auth service; this module
//! only wraps its HTTP API and keeps the local profile rows in step with it.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::db::Database;
use crate::error::PlatformError;
use crate::models::{Role, UserProfileDetail};
use crate::schema::{AdvertiserSignup, InfluencerSignup, SignupBase};

/// Credentials plus the profile metadata the provider stores alongside the
/// identity record.
#[derive(Debug, Clone, Serialize)]
pub struct IdentitySignup {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

impl IdentitySignup {
    fn from_base(base: &SignupBase, role: Role) -> Self {
        Self {
            email: base.email.clone(),
            password: base.password.clone(),
            name: base.name.clone(),
            phone: base.phone.clone(),
            role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider understood the request and said no (duplicate email, weak
    /// password, bad credentials, expired token).
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    /// The provider could not be reached or answered garbage.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

pub trait IdentityProvider {
    fn sign_up(&self, req: &IdentitySignup) -> Result<Uuid, IdentityError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, IdentityError>;
    fn current_user(&self, access_token: &str) -> Result<Uuid, IdentityError>;
}

// --- HTTP identity provider ---

const AUTH_URL_ENV: &str = "REACH_AUTH_URL";
const DEFAULT_AUTH_URL: &str = "http://localhost:9999";

#[derive(Debug, Serialize)]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignupMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct SignupMetadata<'a> {
    name: &'a str,
    phone: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    user_id: Uuid,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
}

/// Talks to the external auth service over its JSON API.
#[derive(Debug)]
pub struct HttpIdentityProvider {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Base URL from the flag if given, else `REACH_AUTH_URL`, else localhost.
    pub fn resolve(flag: Option<String>) -> Self {
        let base_url = flag
            .or_else(|| env::var(AUTH_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        Self::new(base_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_up(&self, req: &IdentitySignup) -> Result<Uuid, IdentityError> {
        let body = SignupBody {
            email: &req.email,
            password: &req.password,
            data: SignupMetadata {
                name: &req.name,
                phone: &req.phone,
                role: req.role.as_str(),
            },
        };
        let response = self
            .client
            .post(self.endpoint("/signup"))
            .json(&body)
            .send()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(IdentityError::Rejected(format!("{status}: {text}")));
        }

        let parsed: SignupResponse = response
            .json()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(parsed.user_id)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, IdentityError> {
        let response = self
            .client
            .post(self.endpoint("/token?grant_type=password"))
            .json(&PasswordGrant { email, password })
            .send()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(IdentityError::Rejected(format!("{status}: {text}")));
        }

        response
            .json()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))
    }

    fn current_user(&self, access_token: &str) -> Result<Uuid, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("/user"))
            .bearer_auth(access_token)
            .send()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(IdentityError::Rejected(format!("{status}: {text}")));
        }

        let parsed: UserResponse = response
            .json()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(parsed.id)
    }
}

// --- Signup & profile service ---

#[derive(Debug, Clone, Serialize)]
pub struct SignupOutcome {
    pub user_id: Uuid,
}

pub struct AuthService<'a> {
    db: &'a Database,
    identity: &'a dyn IdentityProvider,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database, identity: &'a dyn IdentityProvider) -> Self {
        Self { db, identity }
    }

    /// Creates the identity record, then the user profile, then the advertiser
    /// profile. If a profile insert fails after the identity was created, the
    /// identity is left behind (there is no compensating delete) and the
    /// failure is reported as `ProfileCreateFailed`.
    #[tracing::instrument(skip(self, req), fields(email = %req.base.email))]
    pub fn signup_advertiser(&self, req: &AdvertiserSignup) -> Result<SignupOutcome, PlatformError> {
        req.validate().map_err(PlatformError::Validation)?;

        let user_id = self
            .identity
            .sign_up(&IdentitySignup::from_base(&req.base, Role::Advertiser))
            .map_err(|e| {
                // Provider detail stays in the log; clients get the generic message.
                error!(error = %e, "advertiser signup rejected by identity provider");
                PlatformError::SignupFailed
            })?;

        self.db
            .insert_user(user_id, &req.base, Role::Advertiser)
            .map_err(|e| {
                error!(%user_id, error = %e, "failed to create user profile");
                PlatformError::ProfileCreateFailed
            })?;

        self.db
            .insert_advertiser_profile(user_id, &req.advertiser_profile)
            .map_err(|e| {
                error!(%user_id, error = %e, "failed to create advertiser profile");
                PlatformError::ProfileCreateFailed
            })?;

        Ok(SignupOutcome { user_id })
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.base.email))]
    pub fn signup_influencer(&self, req: &InfluencerSignup) -> Result<SignupOutcome, PlatformError> {
        req.validate().map_err(PlatformError::Validation)?;

        let user_id = self
            .identity
            .sign_up(&IdentitySignup::from_base(&req.base, Role::Influencer))
            .map_err(|e| {
                error!(error = %e, "influencer signup rejected by identity provider");
                PlatformError::SignupFailed
            })?;

        self.db
            .insert_user(user_id, &req.base, Role::Influencer)
            .map_err(|e| {
                error!(%user_id, error = %e, "failed to create user profile");
                PlatformError::ProfileCreateFailed
            })?;

        self.db
            .insert_influencer_profile(user_id, &req.influencer_profile)
            .map_err(|e| {
                error!(%user_id, error = %e, "failed to create influencer profile");
                PlatformError::ProfileCreateFailed
            })?;

        Ok(SignupOutcome { user_id })
    }

    #[tracing::instrument(skip(self))]
    pub fn get_profile(&self, user_id: Uuid) -> Result<UserProfileDetail, PlatformError> {
        let user = self
            .db
            .get_user(user_id)
            .map_err(|e| {
                error!(%user_id, error = %e, "failed to fetch user profile");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::UserNotFound)?;

        let mut detail = UserProfileDetail {
            user,
            advertiser_profile: None,
            influencer_profile: None,
        };
        match detail.user.role {
            Role::Advertiser => {
                detail.advertiser_profile =
                    self.db.get_advertiser_profile(user_id).map_err(|e| {
                        error!(%user_id, error = %e, "failed to fetch advertiser profile");
                        PlatformError::FetchFailed
                    })?;
            }
            Role::Influencer => {
                detail.influencer_profile =
                    self.db.get_influencer_profile(user_id).map_err(|e| {
                        error!(%user_id, error = %e, "failed to fetch influencer profile");
                        PlatformError::FetchFailed
                    })?;
            }
        }
        if detail.advertiser_profile.is_none() && detail.influencer_profile.is_none() {
            // A user row without its role profile means a signup died halfway.
            warn!(%user_id, role = %detail.user.role, "user profile has no role profile attached");
        }
        Ok(detail)
    }
}
