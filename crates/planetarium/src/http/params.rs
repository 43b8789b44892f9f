//! Query and form parameter parsing.

use std::collections::BTreeMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::error::{Error, Result};

/// Decoded query string arguments.
///
/// Rejections are reported with the usual JSON error body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestArgs(pub BTreeMap<String, String>);

impl<S> FromRequestParts<S> for RequestArgs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Query(args) = Query::<BTreeMap<String, String>>::from_request_parts(parts, state).await?;
        Ok(Self(args))
    }
}

/// Parse an integer identifier from a raw parameter value.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] for a blank value and
/// [`Error::InvalidParameter`] when it is not an integer.
pub fn parse_id(name: &'static str, raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::MissingParameter { name });
    }
    raw.parse().map_err(|_| Error::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

/// Extract the required `id` parameter from a query string map.
///
/// # Errors
///
/// Returns an error if `id` is absent, blank or not an integer.
pub fn required_id(params: &BTreeMap<String, String>) -> Result<i64> {
    let raw = params
        .get("id")
        .ok_or(Error::MissingParameter { name: "id" })?;
    parse_id("id", raw)
}
