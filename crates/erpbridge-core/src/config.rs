//! Gateway configuration.
//!
//! Loaded from TOML or from `ERPBRIDGE_*` environment variables. Secrets are
//! never stored in configuration; the auth section names the environment
//! variables that hold them.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::adapter::{AdapterSettings, ErpAdapter};
use crate::adapters::adapter_for;
use crate::field_map::{ConfigurableFieldMapper, FieldMapper, FieldMappingConfig, IdentityFieldMapper};
use crate::http_client::HttpAuth;
use crate::{validate_currency_code, CoreError, ErpId, ValidationError};

const ENV_PREFIX: &str = "ERPBRIDGE_";

/// What the gateway does with a failed call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    #[default]
    Rethrow,
    /// Log the error and yield no result.
    Suppress,
}

impl FromStr for ErrorPolicy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rethrow" => Ok(Self::Rethrow),
            "suppress" => Ok(Self::Suppress),
            _ => Err(ValidationError::InvalidErrorPolicy {
                value: value.to_owned(),
            }),
        }
    }
}

/// Authentication scheme; every credential is read from the named variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    None,
    Bearer {
        token_env: String,
    },
    Basic {
        username_env: String,
        password_env: String,
    },
    /// Session cookie header value, e.g. a SAP B1 `B1SESSION=...` login.
    Session {
        cookie_env: String,
    },
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::None => Ok(()),
            Self::Bearer { token_env } => validate_env_name(token_env),
            Self::Basic {
                username_env,
                password_env,
            } => {
                validate_env_name(username_env)?;
                validate_env_name(password_env)
            }
            Self::Session { cookie_env } => validate_env_name(cookie_env),
        }
    }

    /// Reads the credentials from the process environment.
    pub fn resolve(&self) -> Result<HttpAuth, ValidationError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<HttpAuth, ValidationError> {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ValidationError::MissingEnv {
                    name: name.to_owned(),
                })
        };

        Ok(match self {
            Self::None => HttpAuth::None,
            Self::Bearer { token_env } => HttpAuth::BearerToken(read(token_env)?),
            Self::Basic {
                username_env,
                password_env,
            } => HttpAuth::Basic {
                username: read(username_env)?,
                password: read(password_env)?,
            },
            Self::Session { cookie_env } => HttpAuth::Cookie(read(cookie_env)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpConfig {
    pub adapter: ErpId,
    /// Service root the adapter endpoints are appended to.
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_price_list")]
    pub price_list: u32,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Warehouse list cache lifetime; 0 disables the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub field_mappings: FieldMappingConfig,
}

fn default_currency() -> String {
    String::from("EUR")
}

const fn default_price_list() -> u32 {
    1
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

const fn default_timeout_ms() -> u64 {
    10_000
}

impl ErpConfig {
    pub fn new(adapter: ErpId) -> Self {
        Self {
            adapter,
            base_url: String::new(),
            auth: AuthConfig::None,
            default_currency: default_currency(),
            price_list: default_price_list(),
            error_policy: ErrorPolicy::Rethrow,
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_ms: default_timeout_ms(),
            field_mappings: FieldMappingConfig::default(),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// ```
    /// use erpbridge_core::config::ErpConfig;
    ///
    /// let config = ErpConfig::from_toml_str(r#"
    ///     adapter = "exact"
    ///     base_url = "https://start.exactonline.nl/api/v1/123"
    /// "#).unwrap();
    /// assert_eq!(config.default_currency, "EUR");
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Builds a configuration from `ERPBRIDGE_*` process environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Environment-style loading over an arbitrary variable source.
    ///
    /// `ERPBRIDGE_ADAPTER` is required. Auth is bearer when
    /// `ERPBRIDGE_TOKEN` is set, basic when `ERPBRIDGE_USERNAME` is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let var = |suffix: &str| {
            lookup(&format!("{ENV_PREFIX}{suffix}"))
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let adapter = var("ADAPTER")
            .ok_or_else(|| ValidationError::MissingEnv {
                name: format!("{ENV_PREFIX}ADAPTER"),
            })?
            .parse::<ErpId>()?;

        let mut config = Self::new(adapter);
        if let Some(base_url) = var("BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(currency) = var("DEFAULT_CURRENCY") {
            config.default_currency = currency;
        }
        if let Some(policy) = var("ERROR_POLICY") {
            config.error_policy = policy.parse()?;
        }
        if let Some(value) = var("PRICE_LIST") {
            config.price_list = parse_setting("PRICE_LIST", &value)?;
        }
        if let Some(value) = var("CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_setting("CACHE_TTL_SECS", &value)?;
        }
        if let Some(value) = var("TIMEOUT_MS") {
            config.timeout_ms = parse_setting("TIMEOUT_MS", &value)?;
        }

        if var("TOKEN").is_some() {
            config.auth = AuthConfig::Bearer {
                token_env: format!("{ENV_PREFIX}TOKEN"),
            };
        } else if var("USERNAME").is_some() {
            config.auth = AuthConfig::Basic {
                username_env: format!("{ENV_PREFIX}USERNAME"),
                password_env: format!("{ENV_PREFIX}PASSWORD"),
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks every setting; an empty `base_url` is allowed for offline use.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.is_empty() {
            validate_base_url(&self.base_url)?;
        }
        validate_currency_code(&self.default_currency)?;
        if self.timeout_ms == 0 {
            return Err(ValidationError::InvalidSetting {
                name: String::from("timeout_ms"),
                value: String::from("0"),
            });
        }
        self.auth.validate()?;
        self.field_mappings.validate()
    }

    pub fn adapter_settings(&self) -> Result<AdapterSettings, ValidationError> {
        let mapper: Arc<dyn FieldMapper> = if self.field_mappings.is_empty() {
            Arc::new(IdentityFieldMapper)
        } else {
            Arc::new(ConfigurableFieldMapper::new(&self.field_mappings)?)
        };
        AdapterSettings::new(&self.default_currency, self.price_list, mapper)
    }

    /// Instantiates the adapter this configuration selects.
    pub fn build_adapter(&self) -> Result<Arc<dyn ErpAdapter>, ValidationError> {
        Ok(adapter_for(self.adapter, self.adapter_settings()?))
    }
}

fn parse_setting<T: FromStr>(name: &str, value: &str) -> Result<T, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidSetting {
        name: format!("{ENV_PREFIX}{name}"),
        value: value.to_owned(),
    })
}

fn validate_base_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidBaseUrl {
        value: value.to_owned(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

fn validate_env_name(name: &str) -> Result<(), ValidationError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_');
    if valid_start && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEnvName {
            value: name.to_owned(),
        })
    }
}
