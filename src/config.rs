// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (issuer host) | Required |
//! | `AUTH0_AUDIENCE` | Expected JWT audience claim | Required |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `JWKS_CACHE_TTL_SECS` | How long fetched signing keys are trusted | `600` |
//! | `JWKS_REQUESTS_PER_MINUTE` | Upper bound on JWKS fetches | `5` |
//! | `UNKNOWN_IDENTITY_POLICY` | `placeholder` or `reject` | `placeholder` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::num::NonZeroU32;
use std::time::Duration;

use url::Url;

use crate::auth::jwks::{DEFAULT_CACHE_TTL, DEFAULT_REQUESTS_PER_MINUTE};
use crate::identity::UnknownIdentityPolicy;

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_REQUESTS_PER_MINUTE_ENV: &str = "JWKS_REQUESTS_PER_MINUTE";
pub const UNKNOWN_IDENTITY_POLICY_ENV: &str = "UNKNOWN_IDENTITY_POLICY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("'{0}' is not a valid Auth0 domain")]
    InvalidDomain(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Issuer-side settings derived from the Auth0 tenant domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub audience: String,
    /// `https://<domain>/`
    pub issuer: String,
    /// `https://<domain>/.well-known/jwks.json`
    pub jwks_url: Url,
}

impl AuthSettings {
    pub fn from_domain(domain: &str, audience: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.trim().trim_end_matches('/');
        if domain.is_empty() || domain.contains("://") || domain.contains('/') {
            return Err(ConfigError::InvalidDomain(domain.to_string()));
        }

        let base = Url::parse(&format!("https://{domain}/"))
            .map_err(|_| ConfigError::InvalidDomain(domain.to_string()))?;
        if base.host_str().is_none() || base.query().is_some() || !base.username().is_empty() {
            return Err(ConfigError::InvalidDomain(domain.to_string()));
        }

        let jwks_url = base
            .join(".well-known/jwks.json")
            .map_err(|_| ConfigError::InvalidDomain(domain.to_string()))?;

        Ok(Self {
            audience: audience.into(),
            issuer: base.to_string(),
            jwks_url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub auth: AuthSettings,
    pub jwks_cache_ttl: Duration,
    pub jwks_requests_per_minute: NonZeroU32,
    pub unknown_identity_policy: UnknownIdentityPolicy,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let domain = var(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = var(AUTH0_AUDIENCE_ENV).ok_or(ConfigError::Missing(AUTH0_AUDIENCE_ENV))?;
        let auth = AuthSettings::from_domain(&domain, audience)?;

        let port = match var(PORT_ENV) {
            Some(v) => parse(PORT_ENV, &v)?,
            None => DEFAULT_PORT,
        };

        let jwks_cache_ttl = match var(JWKS_CACHE_TTL_ENV) {
            Some(v) => Duration::from_secs(parse(JWKS_CACHE_TTL_ENV, &v)?),
            None => DEFAULT_CACHE_TTL,
        };

        let jwks_requests_per_minute = match var(JWKS_REQUESTS_PER_MINUTE_ENV) {
            Some(v) => parse(JWKS_REQUESTS_PER_MINUTE_ENV, &v)?,
            None => DEFAULT_REQUESTS_PER_MINUTE,
        };

        let unknown_identity_policy = match var(UNKNOWN_IDENTITY_POLICY_ENV) {
            Some(v) => parse(UNKNOWN_IDENTITY_POLICY_ENV, &v)?,
            None => UnknownIdentityPolicy::default(),
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref().map(str::to_ascii_lowercase) {
            Some(f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            auth,
            jwks_cache_ttl,
            jwks_requests_per_minute,
            unknown_identity_policy,
            log_format,
        })
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}
