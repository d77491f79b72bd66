#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative body table for the survey navigation subsystem.
//!
//! The catalog is reference data: it is loaded once from a versioned TOML
//! manifest and then only read by the generator and the projector. Body ids
//! are table indices and are what persisted records store.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use navsurvey_core::{BodyId, CelestialBody};
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Body manifest describing the stock star system.
pub const BUILTIN_MANIFEST: &str = include_str!("../../assets/bodies.toml");

/// Errors raised while loading or validating a body manifest.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The manifest file could not be read.
    #[error("failed to read body manifest at {path}")]
    Io {
        /// Location of the manifest.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The manifest was not valid TOML or did not match the schema.
    #[error("failed to parse body manifest")]
    Parse(#[from] toml::de::Error),
    /// The manifest declared a version this build does not understand.
    #[error("unsupported body manifest version {found}; expected {}", SUPPORTED_MANIFEST_VERSION)]
    UnsupportedVersion {
        /// Version declared by the manifest.
        found: u32,
    },
    /// Two rows shared an id.
    #[error("body id {0} appears more than once")]
    DuplicateId(u32),
    /// Two rows shared a name.
    #[error("body name `{0}` appears more than once")]
    DuplicateName(String),
    /// A row named a parent that is not in the table.
    #[error("body `{body}` names unknown parent `{parent}`")]
    UnknownParent {
        /// Body declaring the parent.
        body: String,
        /// Parent that could not be resolved.
        parent: String,
    },
    /// The home body is not in the table.
    #[error("home body `{0}` is not in the table")]
    UnknownHome(String),
    /// A row carried a non-positive or non-finite radius.
    #[error("body `{0}` must have a positive radius")]
    InvalidRadius(String),
}

/// Read-only table of celestial bodies keyed by [`BodyId`].
#[derive(Clone, Debug)]
pub struct BodyCatalog {
    home: BodyId,
    bodies: Vec<CelestialBody>,
    index: HashMap<BodyId, usize>,
}

impl BodyCatalog {
    /// Loads the manifest shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_MANIFEST)
    }

    /// Loads a manifest from disk.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a manifest.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = toml::from_str(contents)?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            return Err(CatalogError::UnsupportedVersion {
                found: manifest.version,
            });
        }

        let mut ids_by_name = HashMap::with_capacity(manifest.bodies.len());
        let mut seen_ids = HashSet::with_capacity(manifest.bodies.len());
        for row in &manifest.bodies {
            if !seen_ids.insert(row.id) {
                return Err(CatalogError::DuplicateId(row.id));
            }
            if ids_by_name
                .insert(row.name.clone(), BodyId::new(row.id))
                .is_some()
            {
                return Err(CatalogError::DuplicateName(row.name.clone()));
            }
        }

        let home = *ids_by_name
            .get(&manifest.home)
            .ok_or_else(|| CatalogError::UnknownHome(manifest.home.clone()))?;

        let mut bodies = Vec::with_capacity(manifest.bodies.len());
        for row in manifest.bodies {
            let parent = match &row.parent {
                Some(parent) => Some(*ids_by_name.get(parent).ok_or_else(|| {
                    CatalogError::UnknownParent {
                        body: row.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };

            if !(row.radius.is_finite() && row.radius > 0.0) {
                return Err(CatalogError::InvalidRadius(row.name));
            }

            bodies.push(CelestialBody {
                id: BodyId::new(row.id),
                name: row.name,
                radius: row.radius,
                gravity: row.gravity,
                reward_multiplier: row.reward_multiplier,
                parent,
                reached: row.reached,
            });
        }

        let catalog = Self::from_bodies(home, bodies)?;
        tracing::debug!(
            bodies = catalog.len(),
            home = %catalog.home().name,
            "loaded body catalog"
        );
        Ok(catalog)
    }

    /// Builds a catalog from bodies, ordering them by id.
    pub fn from_bodies(home: BodyId, mut bodies: Vec<CelestialBody>) -> Result<Self, CatalogError> {
        bodies.sort_by_key(|body| body.id);
        let mut index = HashMap::with_capacity(bodies.len());
        for (position, body) in bodies.iter().enumerate() {
            if index.insert(body.id, position).is_some() {
                return Err(CatalogError::DuplicateId(body.id.get()));
            }
        }
        if !index.contains_key(&home) {
            return Err(CatalogError::UnknownHome(home.get().to_string()));
        }

        Ok(Self {
            home,
            bodies,
            index,
        })
    }

    /// Identifier of the home body.
    #[must_use]
    pub const fn home_id(&self) -> BodyId {
        self.home
    }

    /// The home body, used as the fallback for unreadable records.
    #[must_use]
    pub fn home(&self) -> &CelestialBody {
        &self.bodies[self.index[&self.home]]
    }

    /// Looks up a body by id.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.index.get(&id).map(|position| &self.bodies[*position])
    }

    /// Looks up a body by name, ignoring ASCII case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies
            .iter()
            .find(|body| body.name.eq_ignore_ascii_case(name))
    }

    /// Bodies in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    /// Bodies the player has reached, in ascending id order.
    pub fn reached(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|body| body.reached)
    }

    /// The star at the root of the home body's orbital hierarchy.
    ///
    /// `None` when the home body orbits nothing, which is the case for
    /// catalogs that only describe a planet and its moons.
    #[must_use]
    pub fn star(&self) -> Option<&CelestialBody> {
        let home = self.home();
        let mut current = home;
        for _ in 0..self.bodies.len() {
            match current.parent.and_then(|parent| self.get(parent)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        (current.id != home.id).then_some(current)
    }

    /// Reached bodies that can host a surface survey, in ascending id order.
    ///
    /// The star is never surveyable, even when it is flagged as reached.
    pub fn surveyable(&self) -> impl Iterator<Item = &CelestialBody> {
        let star = self.star().map(|body| body.id);
        self.reached().filter(move |body| Some(body.id) != star)
    }

    /// Bodies orbiting `parent`, in ascending id order.
    pub fn moons_of(&self, parent: BodyId) -> impl Iterator<Item = &CelestialBody> {
        self.bodies
            .iter()
            .filter(move |body| body.parent == Some(parent))
    }

    /// Flags a body as reached. Returns `false` when the id is unknown.
    pub fn mark_reached(&mut self, id: BodyId) -> bool {
        match self.index.get(&id) {
            Some(position) => {
                self.bodies[*position].reached = true;
                true
            }
            None => false,
        }
    }

    /// Number of bodies in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the table holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    home: String,
    bodies: Vec<ManifestBody>,
}

#[derive(Debug, Deserialize)]
struct ManifestBody {
    id: u32,
    name: String,
    radius: f64,
    gravity: f64,
    #[serde(default = "default_reward_multiplier")]
    reward_multiplier: f64,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    reached: bool,
}

fn default_reward_multiplier() -> f64 {
    1.0
}
