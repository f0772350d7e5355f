//! Screen configuration delivered by the shell.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333/";
pub const DEFAULT_PAGE_SIZE: u32 = 8;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_END_REACHED_THRESHOLD: f64 = 0.1;
pub const GRID_COLUMNS: usize = 2;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },

    #[error("end-reached threshold must be in (0, 1], got {0}")]
    InvalidThreshold(String),

    #[error("malformed config: {0}")]
    Malformed(String),
}

/// What to do when the plants endpoint answers with no payload at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResponsePolicy {
    /// Keep showing the loading indicator.
    #[default]
    StayLoading,
    /// Treat the missing payload as an empty page.
    ShowEmptyState,
}

/// Base URL of the plant collection API. Always ends with a `/` so resource
/// names join under it instead of replacing its last segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiBaseUrl(Url);

impl ApiBaseUrl {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason,
        };

        let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".into()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".into()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for ApiBaseUrl {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApiBaseUrl> for String {
    fn from(value: ApiBaseUrl) -> Self {
        value.0.into()
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_API_BASE_URL).expect("default base url is valid"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenStrings {
    pub title: String,
    pub subtitle: String,
    pub no_more_items: String,
    pub empty: String,
    pub failed_title: String,
}

impl Default for ScreenStrings {
    fn default() -> Self {
        Self {
            title: "Em qual ambiente".into(),
            subtitle: "você quer colocar sua planta?".into(),
            no_more_items: "Não há mais itens para carregar".into(),
            empty: "Nenhuma planta encontrada".into(),
            failed_title: "Não foi possível carregar as plantas".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub api_base_url: ApiBaseUrl,
    pub page_size: u32,
    pub end_reached_threshold: f64,
    pub empty_response_policy: EmptyResponsePolicy,
    pub all_environments_title: String,
    pub strings: ScreenStrings,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            api_base_url: ApiBaseUrl::default(),
            page_size: DEFAULT_PAGE_SIZE,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            empty_response_policy: EmptyResponsePolicy::default(),
            all_environments_title: "Todos".into(),
            strings: ScreenStrings::default(),
        }
    }
}

impl ScreenConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                got: self.page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        if !(self.end_reached_threshold > 0.0 && self.end_reached_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.end_reached_threshold.to_string()));
        }
        Ok(())
    }
}
