//! Safety guidance per impact zone.
//!
//! Guidance is plain data keyed by zone name. Every ring name in the catalog
//! plus the outside sentinel must have an entry; `verify_covers` catches drift
//! between the two tables.

use std::collections::HashMap;
use std::fmt;

use crate::catalog::{Catalog, FIREBALL, HEAVY_BLAST, MODERATE_BLAST, THERMAL_RADIATION};
use crate::classify::OUTSIDE_SENTINEL;
use crate::error::{Result, ZoneError};

/// One recommendation line, optionally led by a short bold-style label
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub label: Option<String>,
    pub text: String,
}

/// Advisory text for a zone
#[derive(Debug, Clone, PartialEq)]
pub struct Guidance {
    pub title: String,
    pub impact: String,
    pub survival_chance: String,
    pub recommendations: Vec<Recommendation>,
    /// Longer definition of the effect, if the zone is a named effect
    pub terminology: Option<String>,
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Zone: {}", self.title)?;
        writeln!(f, "Impact: {}", self.impact)?;
        writeln!(f, "Survival chance: {}", self.survival_chance)?;
        writeln!(f, "Recommendations:")?;
        for rec in &self.recommendations {
            match &rec.label {
                Some(label) => writeln!(f, "  - {}: {}", label, rec.text)?,
                None => writeln!(f, "  - {}", rec.text)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuidanceTable {
    entries: HashMap<String, Guidance>,
}

impl GuidanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone: &str, guidance: Guidance) {
        self.entries.insert(zone.to_string(), guidance);
    }

    pub fn get(&self, zone: &str) -> Result<&Guidance> {
        self.entries
            .get(zone)
            .ok_or_else(|| ZoneError::UnknownZone(zone.to_string()))
    }

    pub fn terminology(&self, zone: &str) -> Option<&str> {
        self.entries.get(zone).and_then(|g| g.terminology.as_deref())
    }

    /// Check that every ring name in `catalog` and the outside sentinel resolve
    pub fn verify_covers(&self, catalog: &Catalog) -> Result<()> {
        for name in catalog.ring_names().into_iter().chain([OUTSIDE_SENTINEL]) {
            self.get(name)?;
        }
        Ok(())
    }

    /// Built-in guidance for the reference catalog's zones
    pub fn reference() -> Self {
        let mut table = Self::new();
        for (zone, title, impact, survival, recommendations, terminology) in REFERENCE {
            table.insert(
                zone,
                Guidance {
                    title: title.to_string(),
                    impact: impact.to_string(),
                    survival_chance: survival.to_string(),
                    recommendations: recommendations
                        .iter()
                        .map(|(label, text)| Recommendation {
                            label: label.map(str::to_string),
                            text: text.to_string(),
                        })
                        .collect(),
                    terminology: terminology.map(str::to_string),
                },
            );
        }
        table
    }
}

type Entry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [(Option<&'static str>, &'static str)],
    Option<&'static str>,
);

const REFERENCE: &[Entry] = &[
    (
        FIREBALL,
        "Fireball",
        "Complete vaporization.",
        "Zero.",
        &[(None, "There are no protective actions possible within this zone.")],
        Some(
            "The initial, extremely hot, and luminous sphere of plasma created by a nuclear explosion. \
             Temperatures inside the fireball can reach tens of millions of degrees Celsius, similar to \
             the core of the sun. Everything within this radius is effectively vaporized.",
        ),
    ),
    (
        HEAVY_BLAST,
        "Heavy Blast Damage (5 psi)",
        "Most buildings are demolished. A high-pressure blast wave moves faster than sound.",
        "Very low.",
        &[
            (
                Some("If indoors"),
                "Do not stand near windows. Seek shelter in a basement or a structurally sound, interior \
                 room. The primary goal is to shield yourself from the collapsing structure and flying debris.",
            ),
            (
                Some("If outdoors"),
                "Immediately drop to the ground, face down, with your head and neck covered by your arms. \
                 If possible, get behind any solid object that might offer protection from the blast pressure.",
            ),
            (Some("After the blast wave"), "Be aware of falling structures and fires."),
        ],
        Some(
            "The area affected by a high-pressure blast wave of at least 5 pounds per square inch (psi). \
             This pressure is sufficient to destroy most residential buildings and heavily damage \
             reinforced concrete structures. Fatalities are near-universal in this zone.",
        ),
    ),
    (
        THERMAL_RADIATION,
        "Thermal Radiation (3rd-Degree Burns)",
        "Intense heat flash lasting several seconds causes severe burns to exposed skin and can ignite fires.",
        "Moderate, if immediate action is taken.",
        &[
            (
                Some("Immediately take cover"),
                "The thermal flash travels at the speed of light. You have only a second or two.",
            ),
            (
                Some("Duck and cover"),
                "Drop to the ground and get behind any object that casts a shadow. A wall, a ditch, a \
                 vehicle: anything that blocks the direct line of sight to the detonation will protect \
                 you from the heat.",
            ),
            (Some("Do not look at the flash"), "It will cause temporary or permanent blindness."),
            (
                Some("After the flash"),
                "Be prepared for the arrival of the blast wave, which travels slower than light.",
            ),
        ],
        Some(
            "An intense wave of heat that travels at the speed of light from the explosion. This thermal \
             pulse can last for several seconds. At this range it can ignite flammable materials such as \
             wood, cloth and fuel, and inflict third-degree burns on exposed skin.",
        ),
    ),
    (
        MODERATE_BLAST,
        "Moderate Blast Damage (1 psi)",
        "Windows will shatter with extreme force, creating high-velocity projectiles. Some structural \
         damage to homes is possible.",
        "High, but risk of serious injury.",
        &[
            (
                Some("Stay away from windows"),
                "This is the single most important rule. The majority of injuries in this zone are from flying glass.",
            ),
            (Some("Move to an interior room or hallway"), "Choose one without windows."),
            (
                Some("Get under a sturdy piece of furniture"),
                "A heavy desk or table protects from falling debris from the ceiling.",
            ),
            (Some("After the blast"), "Be cautious of damaged structures and broken glass."),
        ],
        Some(
            "The area affected by a 1 psi blast wave. While not enough to destroy most buildings, this \
             pressure can shatter all windows, which become high-velocity projectiles. It can also cause \
             significant damage to residential roofs and non-load-bearing walls.",
        ),
    ),
    (
        OUTSIDE_SENTINEL,
        "Outside Immediate Impact Radii",
        "You are outside the immediate zones for severe blast, thermal, and fireball effects. However, risks remain.",
        "Very high.",
        &[
            (
                Some("Expect fallout"),
                "The most significant danger at this distance is radioactive fallout, which is carried by \
                 wind and can arrive hours after the detonation.",
            ),
            (
                Some("Go indoors"),
                "Find the most robust shelter possible. Brick or concrete buildings are best. Basements are ideal.",
            ),
            (
                Some("Seal the shelter"),
                "Close all windows, doors, and fireplace dampers. Turn off ventilation systems.",
            ),
            (
                Some("Tune in"),
                "Use a battery-powered or hand-crank radio to listen for instructions from emergency services.",
            ),
            (
                Some("Shelter in place"),
                "Plan to stay in your shelter for at least 24-48 hours unless told otherwise by authorities.",
            ),
        ],
        None,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_covers_reference_catalog() {
        let table = GuidanceTable::reference();
        table.verify_covers(&Catalog::reference()).unwrap();
        assert!(table.get(OUTSIDE_SENTINEL).is_ok());
    }

    #[test]
    fn test_unknown_zone() {
        let table = GuidanceTable::reference();
        assert!(matches!(
            table.get("Ionizing Radiation"),
            Err(ZoneError::UnknownZone(name)) if name == "Ionizing Radiation"
        ));
    }

    #[test]
    fn test_drift_detected() {
        let json = br#"{"bombs":[{"name":"X","yield_kt":1.0,"possessing_country":"Y",
            "effects":[{"name":"EMP","radius_m":900.0,"color":[0,0,0,0],"description":""}]}]}"#;
        let catalog = Catalog::from_json(json).unwrap();
        let err = GuidanceTable::reference().verify_covers(&catalog).unwrap_err();
        assert!(matches!(err, ZoneError::UnknownZone(name) if name == "EMP"));
    }

    #[test]
    fn test_display_layout() {
        let table = GuidanceTable::reference();
        let text = table.get(FIREBALL).unwrap().to_string();
        assert!(text.starts_with("Zone: Fireball\n"));
        assert!(text.contains("Survival chance: Zero."));
        assert!(text.contains("  - There are no protective actions"));

        let text = table.get(HEAVY_BLAST).unwrap().to_string();
        assert!(text.contains("  - If outdoors: Immediately drop to the ground"));
    }

    #[test]
    fn test_terminology() {
        let table = GuidanceTable::reference();
        assert!(table.terminology(THERMAL_RADIATION).unwrap().contains("speed of light"));
        assert!(table.terminology(OUTSIDE_SENTINEL).is_none());
    }
}
