//! Catalog of planets and satellites.
//!
//! The catalog is built once from static data and then only read, except for
//! the `image` attribute of planets which the image store updates after an
//! upload. Lookups go through id-keyed maps built at construction time.

pub mod source;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::DataConfig;
use crate::error::Result;
use crate::model::{Planet, PlanetId, Satellite, SatelliteId};

/// In-memory planet and satellite collections.
#[derive(Debug)]
pub struct Catalog {
    /// Planets in load order; only `image` ever changes.
    planets: RwLock<Vec<Planet>>,
    /// Satellites in load order.
    satellites: Vec<Satellite>,
    /// Position of the first planet with each id.
    planet_index: HashMap<PlanetId, usize>,
    /// Position of the first satellite with each id.
    satellite_index: HashMap<SatelliteId, usize>,
}

/// Summary counts over the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Number of planets.
    pub planets: usize,
    /// Number of satellites.
    pub satellites: usize,
    /// Satellites whose planet is not in the catalog.
    pub orphaned_satellites: usize,
    /// Planets with an associated image.
    pub planets_with_images: usize,
}

impl Catalog {
    /// Build a catalog from already-loaded records.
    ///
    /// Identifiers are expected to be unique. If they are not, the first
    /// record with a given id is the one lookups return.
    #[must_use]
    pub fn new(planets: Vec<Planet>, satellites: Vec<Satellite>) -> Self {
        let planet_index = index_by(planets.iter().map(|p| p.id), "planet");
        let satellite_index = index_by(satellites.iter().map(|s| s.id), "satellite");

        Self {
            planets: RwLock::new(planets),
            satellites,
            planet_index,
            satellite_index,
        }
    }

    /// Build a catalog from JSON arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if either document is not a valid record array.
    pub fn from_json(planets_json: &str, satellites_json: &str) -> Result<Self> {
        let planets = source::parse_records(planets_json, "planets")?;
        let satellites = source::parse_records(satellites_json, "satellites")?;
        Ok(Self::new(planets, satellites))
    }

    /// Build a catalog from the dataset bundled with the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data is malformed.
    pub fn embedded() -> Result<Self> {
        Self::load(&DataConfig::default())
    }

    /// Load the catalog from the configured data sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a data file cannot be read or parsed.
    pub fn load(config: &DataConfig) -> Result<Self> {
        let planets = source::load_planets(config.planets_path.as_deref())?;
        let satellites = source::load_satellites(config.satellites_path.as_deref())?;
        let catalog = Self::new(planets, satellites);

        let stats = catalog.stats();
        info!(
            planets = stats.planets,
            satellites = stats.satellites,
            orphaned = stats.orphaned_satellites,
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Find a planet by id.
    #[must_use]
    pub fn find_planet(&self, id: PlanetId) -> Option<Planet> {
        let index = *self.planet_index.get(&id)?;
        self.read_planets().get(index).cloned()
    }

    /// Find a satellite by id.
    #[must_use]
    pub fn find_satellite(&self, id: SatelliteId) -> Option<&Satellite> {
        self.satellite_index
            .get(&id)
            .and_then(|&index| self.satellites.get(index))
    }

    /// All satellites orbiting `planet_id`, in load order.
    ///
    /// A planet with no moons, or an id no planet has, yields an empty list.
    #[must_use]
    pub fn satellites_of_planet(&self, planet_id: PlanetId) -> Vec<&Satellite> {
        self.satellites
            .iter()
            .filter(|s| s.orbits(planet_id))
            .collect()
    }

    /// Satellites whose planet is not in the catalog.
    #[must_use]
    pub fn orphaned_satellites(&self) -> Vec<&Satellite> {
        self.satellites
            .iter()
            .filter(|s| !self.planet_index.contains_key(&s.planet_id))
            .collect()
    }

    /// Snapshot of all planets, in load order.
    #[must_use]
    pub fn planets(&self) -> Vec<Planet> {
        self.read_planets().clone()
    }

    /// All satellites, in load order.
    #[must_use]
    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    /// Identifiers of all planets, in load order.
    #[must_use]
    pub fn planet_ids(&self) -> Vec<PlanetId> {
        self.read_planets().iter().map(|p| p.id).collect()
    }

    /// Check whether a planet exists.
    #[must_use]
    pub fn contains_planet(&self, id: PlanetId) -> bool {
        self.planet_index.contains_key(&id)
    }

    /// Set the image path of a planet.
    ///
    /// Returns `false` if no planet has this id.
    pub(crate) fn set_planet_image(&self, id: PlanetId, image: Option<String>) -> bool {
        let Some(&index) = self.planet_index.get(&id) else {
            return false;
        };
        let mut planets = self.planets.write().unwrap_or_else(PoisonError::into_inner);
        match planets.get_mut(index) {
            Some(planet) => {
                planet.image = image;
                true
            }
            None => false,
        }
    }

    /// Get summary counts.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let planets = self.read_planets();
        CatalogStats {
            planets: planets.len(),
            satellites: self.satellites.len(),
            orphaned_satellites: self.orphaned_satellites().len(),
            planets_with_images: planets.iter().filter(|p| p.has_image()).count(),
        }
    }

    fn read_planets(&self) -> std::sync::RwLockReadGuard<'_, Vec<Planet>> {
        self.planets.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Map each id to the position of its first occurrence.
fn index_by(ids: impl Iterator<Item = i64>, kind: &str) -> HashMap<i64, usize> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if index.contains_key(&id) {
            warn!(id, kind, "Duplicate id in catalog data, keeping first");
            continue;
        }
        index.insert(id, position);
    }
    index
}
