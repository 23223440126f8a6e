use crate::services::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use crate::services::ItineraryOptions;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::retry::RetryConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ItineraryConfig {
    pub common: core_config::Config,
    pub provider: ProviderKind,
    pub gemini: GeminiSettings,
    pub itinerary: ItinerarySettings,
    /// OTLP collector endpoint; traces are only exported when set.
    pub otlp_endpoint: Option<String>,
}

/// Which text provider backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ItinerarySettings {
    pub echo_trip_id: bool,
    pub trim_output: bool,
    /// Retries for transient provider failures; 0 means a single attempt.
    pub max_retries: u32,
}

impl ItineraryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service config from `lookup`, which resolves variable names.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let provider: ProviderKind = parse_value(
            "ITINERARY_PROVIDER",
            &get("ITINERARY_PROVIDER", Some("gemini"))?,
        )?;

        // Only the Gemini backend needs a key; an empty value counts as missing.
        let api_key = match provider {
            ProviderKind::Gemini => {
                let key = get("GEMINI_API_KEY", None)?;
                if key.trim().is_empty() {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "GEMINI_API_KEY is required but empty"
                    )));
                }
                key
            }
            ProviderKind::Mock => lookup("GEMINI_API_KEY").unwrap_or_default(),
        };

        Ok(ItineraryConfig {
            common,
            provider,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get("GEMINI_API_BASE", Some(GEMINI_API_BASE))?,
                timeout_secs: parse_value(
                    "GEMINI_TIMEOUT_SECS",
                    &get("GEMINI_TIMEOUT_SECS", Some(&DEFAULT_TIMEOUT_SECS.to_string()))?,
                )?,
            },
            itinerary: ItinerarySettings {
                echo_trip_id: parse_value(
                    "ITINERARY_ECHO_TRIP_ID",
                    &get("ITINERARY_ECHO_TRIP_ID", Some("true"))?,
                )?,
                trim_output: parse_value(
                    "ITINERARY_TRIM_OUTPUT",
                    &get("ITINERARY_TRIM_OUTPUT", Some("true"))?,
                )?,
                max_retries: parse_value(
                    "PROVIDER_MAX_RETRIES",
                    &get("PROVIDER_MAX_RETRIES", Some("0"))?,
                )?,
            },
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
        })
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_secs)
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini.api_key.clone(),
            model: self.gemini.model.clone(),
            base_url: self.gemini.api_base.clone(),
            timeout: self.provider_timeout(),
        }
    }

    pub fn itinerary_options(&self) -> ItineraryOptions {
        ItineraryOptions {
            echo_trip_id: self.itinerary.echo_trip_id,
            trim_output: self.itinerary.trim_output,
            provider_timeout: self.provider_timeout(),
            retry: RetryConfig::with_max_retries(self.itinerary.max_retries),
        }
    }
}

fn get_env<F>(
    lookup: &F,
    key: &str,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
