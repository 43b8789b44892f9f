//! Core record types for planetarium.
//!
//! This module defines the planet and satellite records held by the catalog.
//! Both carry an open set of descriptive attributes so the static JSON sources
//! can grow new fields without code changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a planet.
pub type PlanetId = i64;

/// Identifier of a satellite.
pub type SatelliteId = i64;

/// A planet of the solar system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Unique, stable identifier.
    pub id: PlanetId,

    /// Display name.
    pub name: String,

    /// Relative path of the uploaded image, set once an upload succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Physical and orbital attributes, kept verbatim from the data source.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Planet {
    /// Create a planet with no attributes and no image.
    #[must_use]
    pub fn new(id: PlanetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute, replacing any previous value under the same key.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up a numeric attribute.
    #[must_use]
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// Check whether an image has been associated with this planet.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// A natural satellite orbiting a planet.
///
/// `planet_id` is not checked against the loaded planets; a satellite whose
/// planet is absent is an orphan and simply never shows up in per-planet lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Satellite {
    /// Unique identifier.
    pub id: SatelliteId,

    /// Identifier of the planet this satellite orbits.
    pub planet_id: PlanetId,

    /// Display name.
    pub name: String,

    /// Descriptive attributes, kept verbatim from the data source.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Satellite {
    /// Create a satellite with no attributes.
    #[must_use]
    pub fn new(id: SatelliteId, planet_id: PlanetId, name: impl Into<String>) -> Self {
        Self {
            id,
            planet_id,
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute, replacing any previous value under the same key.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check whether this satellite orbits the given planet.
    #[must_use]
    pub fn orbits(&self, planet_id: PlanetId) -> bool {
        self.planet_id == planet_id
    }
}
