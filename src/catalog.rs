//! Effect catalog: bomb profiles and their effect rings.
//!
//! Radii are airburst figures from NUKEMAP-style models. The catalog is built
//! once (built-in reference data or a JSON file) and passed by reference to
//! everything that needs it.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneError};

pub const FIREBALL: &str = "Fireball";
pub const HEAVY_BLAST: &str = "Heavy Blast Damage";
pub const THERMAL_RADIATION: &str = "Thermal Radiation";
pub const MODERATE_BLAST: &str = "Moderate Blast Damage";

/// RGBA display color for a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// `#rrggbb`, alpha dropped
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

/// One named concentric effect zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRing {
    pub name: String,
    pub radius_m: f64,
    pub color: Rgba,
    pub description: String,
}

/// A weapon and its effect rings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombProfile {
    pub name: String,
    pub yield_kt: f64,
    pub possessing_country: String,
    /// Rings in declaration order
    pub effects: Vec<EffectRing>,
}

impl BombProfile {
    /// Rings sorted by radius, smallest first. Equal radii keep declaration order.
    pub fn rings_ascending(&self) -> Vec<&EffectRing> {
        let mut rings: Vec<&EffectRing> = self.effects.iter().collect();
        rings.sort_by(|a, b| a.radius_m.total_cmp(&b.radius_m));
        rings
    }

    /// Rings in drawing order: largest first so inner rings stay visible
    pub fn legend_order(&self) -> Vec<&EffectRing> {
        let mut rings = self.rings_ascending();
        rings.reverse();
        rings
    }

    pub fn outermost(&self) -> Option<&EffectRing> {
        self.effects.iter().max_by(|a, b| a.radius_m.total_cmp(&b.radius_m))
    }

    pub fn ring(&self, name: &str) -> Option<&EffectRing> {
        self.effects.iter().find(|ring| ring.name == name)
    }

    /// Yield in tons of TNT
    pub fn tnt_tons(&self) -> f64 {
        self.yield_kt * 1000.0
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ZoneError::InvalidCatalog(msg));
        if self.name.trim().is_empty() {
            return invalid("bomb with empty name".into());
        }
        if !(self.yield_kt.is_finite() && self.yield_kt > 0.0) {
            return invalid(format!("{}: yield must be positive", self.name));
        }
        if self.effects.is_empty() {
            return invalid(format!("{}: no effect rings", self.name));
        }
        let mut seen = HashSet::new();
        for ring in &self.effects {
            if !(ring.radius_m.is_finite() && ring.radius_m > 0.0) {
                return invalid(format!("{}: ring {} has non-positive radius", self.name, ring.name));
            }
            if !seen.insert(ring.name.as_str()) {
                return invalid(format!("{}: duplicate ring {}", self.name, ring.name));
            }
        }
        Ok(())
    }
}

/// Read-only table of bomb profiles, in insertion order. Never empty: every
/// way of building one, deserialization included, goes through `Catalog::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    bombs: Vec<BombProfile>,
}

#[derive(Deserialize)]
struct RawCatalog {
    bombs: Vec<BombProfile>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = ZoneError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Catalog::new(raw.bombs)
    }
}

impl Catalog {
    /// Build a catalog, checking every profile and name uniqueness
    pub fn new(bombs: Vec<BombProfile>) -> Result<Self> {
        if bombs.is_empty() {
            return Err(ZoneError::InvalidCatalog("catalog has no bombs".into()));
        }
        let mut names = HashSet::new();
        for bomb in &bombs {
            bomb.validate()?;
            if !names.insert(bomb.name.as_str()) {
                return Err(ZoneError::InvalidCatalog(format!("duplicate bomb {}", bomb.name)));
            }
        }
        Ok(Self { bombs })
    }

    /// Parse and validate a catalog from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        // simd-json parses in place
        let mut buf = bytes.to_vec();
        let raw: RawCatalog = simd_json::serde::from_slice(&mut buf)?;
        Self::new(raw.bombs)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| ZoneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&bytes)?;
        tracing::info!(path = %path.display(), bombs = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn list_bombs(&self) -> impl Iterator<Item = &str> + '_ {
        self.bombs.iter().map(|b| b.name.as_str())
    }

    pub fn get_profile(&self, name: &str) -> Result<&BombProfile> {
        self.bombs
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ZoneError::NotFound(name.to_string()))
    }

    pub fn profiles(&self) -> &[BombProfile] {
        &self.bombs
    }

    pub fn len(&self) -> usize {
        self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bombs.is_empty()
    }

    /// Every distinct ring name across all profiles, first-seen order
    pub fn ring_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.bombs
            .iter()
            .flat_map(|b| b.effects.iter())
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// The built-in reference table
    pub fn reference() -> Self {
        let bomb = |name: &str, yield_kt: f64, country: &str, radii: [f64; 4]| BombProfile {
            name: name.to_string(),
            yield_kt,
            possessing_country: country.to_string(),
            effects: standard_effects(radii),
        };

        Self {
            bombs: vec![
                bomb("W-87 (Modern US Warhead)", 300.0, "United States", [750.0, 4300.0, 10500.0, 11500.0]),
                bomb("B-61-12 (Modern US Tactical Bomb)", 50.0, "United States", [350.0, 2000.0, 5100.0, 6000.0]),
                bomb("Topol-M SS-27 (Modern Russian ICBM)", 800.0, "Russia", [1100.0, 7000.0, 16000.0, 18000.0]),
                bomb("DF-5 (Modern Chinese ICBM)", 5000.0, "China", [2800.0, 18000.0, 38000.0, 45000.0]),
                bomb("Tsar Bomba (Largest Tested)", 50000.0, "Soviet Union (Former)", [4600.0, 32000.0, 65000.0, 90000.0]),
                bomb("Little Boy (Hiroshima)", 15.0, "United States", [200.0, 1600.0, 2500.0, 3200.0]),
            ],
        }
    }
}

/// Fireball, heavy blast, thermal and moderate blast rings with the given radii
fn standard_effects([fireball, heavy, thermal, moderate]: [f64; 4]) -> Vec<EffectRing> {
    let ring = |name: &str, radius_m: f64, color: [u8; 4], description: &str| EffectRing {
        name: name.to_string(),
        radius_m,
        color: Rgba(color),
        description: description.to_string(),
    };
    vec![
        ring(FIREBALL, fireball, [255, 255, 0, 150], "Vaporization of materials."),
        ring(HEAVY_BLAST, heavy, [255, 0, 0, 120], "Most concrete buildings destroyed."),
        ring(THERMAL_RADIATION, thermal, [255, 165, 0, 90], "Widespread 3rd-degree burns."),
        ring(MODERATE_BLAST, moderate, [0, 0, 255, 70], "Residential structures collapse."),
    ]
}
