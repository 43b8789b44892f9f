//! `planetarium` - Solar-system planet and satellite catalog
//!
//! This library provides the catalog of planets and satellites loaded from
//! static JSON data, the store that associates an uploaded image with each
//! planet, and the HTTP boundary that exposes both.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod logging;
pub mod model;

pub use catalog::{Catalog, CatalogStats};
pub use config::Config;
pub use error::{Error, Result};
pub use images::{ImageExtension, ImageStore, StoredImage};
pub use logging::init_logging;
pub use model::{Planet, PlanetId, Satellite, SatelliteId};
