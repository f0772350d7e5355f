//! Query building and response decoding for the plant collection API.
//!
//! The backend is a json-server style collection API: sorting and paging are
//! expressed with `_sort`, `_order`, `_page` and `_limit` query parameters.

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiBaseUrl;
use crate::error::{AppError, ErrorKind};
use crate::pagination::PageRequest;

pub const PLANTS_RESOURCE: &str = "plants";
pub const ENVIRONMENTS_RESOURCE: &str = "plants_environments";

pub type HttpOutput = crux_http::Response<Vec<u8>>;
pub type HttpResult = crux_http::Result<HttpOutput>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    resource: &'static str,
    sort: &'static str,
    page: Option<PageRequest>,
}

impl CollectionQuery {
    /// Environment categories sorted by title.
    #[must_use]
    pub const fn environments() -> Self {
        Self {
            resource: ENVIRONMENTS_RESOURCE,
            sort: "title",
            page: None,
        }
    }

    /// One page of plants sorted by name.
    #[must_use]
    pub const fn plants(page: PageRequest) -> Self {
        Self {
            resource: PLANTS_RESOURCE,
            sort: "name",
            page: Some(page),
        }
    }

    pub fn to_url(&self, base: &ApiBaseUrl) -> Result<Url, AppError> {
        let mut url = base.as_url().join(self.resource).map_err(|e| {
            AppError::new(ErrorKind::Configuration, "Could not build request url")
                .with_internal(e.to_string())
                .with_context("resource", self.resource)
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("_sort", self.sort).append_pair("_order", "asc");
            if let Some(page) = self.page {
                pairs
                    .append_pair("_page", &page.page.to_string())
                    .append_pair("_limit", &page.limit.to_string());
            }
        }

        Ok(url)
    }
}

/// Decoded body of a collection response. `Missing` covers an absent,
/// blank or `null` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionBody<T> {
    Records(Vec<T>),
    Missing,
}

pub fn decode_collection<T: DeserializeOwned>(
    bytes: &[u8],
) -> Result<CollectionBody<T>, AppError> {
    let trimmed = bytes.trim_ascii();
    if trimmed.is_empty() || trimmed == b"null" {
        return Ok(CollectionBody::Missing);
    }

    serde_json::from_slice::<Vec<T>>(trimmed)
        .map(CollectionBody::Records)
        .map_err(|e| {
            AppError::new(ErrorKind::Deserialization, "Unexpected response payload")
                .with_internal(e.to_string())
        })
}

/// Turns a finished request into a decoded collection, mapping transport
/// failures and non-success statuses into `AppError`.
pub fn read_collection<T: DeserializeOwned>(
    result: HttpResult,
) -> Result<CollectionBody<T>, AppError> {
    let mut response = result.map_err(|e| {
        AppError::new(ErrorKind::Network, "Request failed").with_internal(e.to_string())
    })?;

    let status: u16 = response.status().into();
    if !(200..300).contains(&status) {
        return Err(AppError::from_http_status(status));
    }

    let body = response.take_body().unwrap_or_default();
    decode_collection(&body)
}
