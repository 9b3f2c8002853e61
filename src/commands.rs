use std::fmt::Write as _;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blast_zones::catalog::{BombProfile, Catalog};
use blast_zones::classify::{classify, classify_batch};
use blast_zones::export::rings_geojson;
use blast_zones::geo::Coordinate;
use blast_zones::guidance::GuidanceTable;
use blast_zones::service;

use crate::cli::ScenarioArgs;

/// Bomb by name, or the first catalog entry
fn select_profile<'a>(catalog: &'a Catalog, bomb: Option<&str>) -> Result<&'a BombProfile> {
    match bomb {
        Some(name) => Ok(catalog.get_profile(name)?),
        None => catalog.profiles().first().context("catalog is empty"),
    }
}

/// 50000 -> "50,000", 1234.5 -> "1,234.5". Fractions are kept as written.
pub fn group_thousands(value: f64) -> String {
    let plain = value.abs().to_string();
    let (digits, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

pub fn list(catalog: &Catalog) -> String {
    let mut out = String::new();
    for profile in catalog.profiles() {
        let _ = writeln!(
            out,
            "{:<38} {:>10} kt  {}",
            profile.name,
            group_thousands(profile.yield_kt),
            profile.possessing_country
        );
    }
    out
}

pub fn info(catalog: &Catalog, guidance: &GuidanceTable, bomb: &str) -> Result<String> {
    let profile = catalog.get_profile(bomb)?;
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.name);
    let _ = writeln!(out, "Explosive yield: {} kilotons", group_thousands(profile.yield_kt));
    let _ = writeln!(out, "Equivalent to {} tons of TNT", group_thousands(profile.tnt_tons()));
    let _ = writeln!(out, "Possessing country: {}", profile.possessing_country);
    let _ = writeln!(out);
    let _ = writeln!(out, "Effect legend (airburst; effects vary with terrain and weather):");
    for ring in profile.legend_order() {
        let _ = writeln!(
            out,
            "  {} {:<22} {:>7.2} km  {}",
            ring.color.hex(),
            ring.name,
            ring.radius_m / 1000.0,
            ring.description
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Terminology:");
    for ring in profile.rings_ascending() {
        if let Some(definition) = guidance.terminology(&ring.name) {
            let _ = writeln!(out, "  {}: {}", ring.name, definition);
        }
    }
    Ok(out)
}

pub fn classify_report(
    catalog: &Catalog,
    guidance: &GuidanceTable,
    scenario: &ScenarioArgs,
    json: bool,
) -> Result<String> {
    if json {
        let request = service::ClassifyRequest {
            bomb_id: select_profile(catalog, scenario.bomb.as_deref())?.name.clone(),
            detonation: scenario.detonation,
            observer: scenario.observer,
        };
        let response = service::handle(catalog, guidance, &request)?;
        return Ok(simd_json::serde::to_string_pretty(&response)?);
    }

    let profile = select_profile(catalog, scenario.bomb.as_deref())?;
    let result = classify(scenario.detonation, scenario.observer, profile);
    let advice = guidance.get(result.zone_name())?;

    let mut out = String::new();
    let _ = writeln!(out, "Bomb: {} ({} kt)", profile.name, group_thousands(profile.yield_kt));
    let _ = writeln!(out, "Ground zero: {}", scenario.detonation);
    let _ = writeln!(out, "Your location: {}", scenario.observer);
    let _ = writeln!(out, "Distance from ground zero: {:.2} km", result.distance_m / 1000.0);
    let _ = writeln!(out, "Impact zone: {}", result.zone_name());
    let _ = writeln!(out);
    let _ = write!(out, "{advice}");
    Ok(out)
}

/// Parse one `lat,lon` per line; blank lines and `#` comments are skipped
pub fn parse_observers(text: &str) -> Result<Vec<Coordinate>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| line.parse::<Coordinate>().with_context(|| format!("line {n}: {line}")))
        .collect()
}

pub fn batch(catalog: &Catalog, file: &Path, bomb: Option<&str>, detonation: Coordinate) -> Result<String> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let observers = parse_observers(&text)?;
    let profile = select_profile(catalog, bomb)?;
    tracing::info!(count = observers.len(), bomb = %profile.name, "classifying batch");

    let mut out = String::new();
    for (observer, result) in observers.iter().zip(classify_batch(detonation, &observers, profile)) {
        let _ = writeln!(
            out,
            "{}\t{:.1}\t{}",
            observer,
            result.distance_m,
            result.zone_name()
        );
    }
    Ok(out)
}

pub fn export(catalog: &Catalog, scenario: &ScenarioArgs, segments: usize) -> Result<String> {
    let profile = select_profile(catalog, scenario.bomb.as_deref())?;
    Ok(rings_geojson(profile, scenario.detonation, Some(scenario.observer), segments).to_string())
}

pub fn respond(catalog: &Catalog, guidance: &GuidanceTable, file: Option<&Path>) -> Result<String> {
    let body = match file {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };
    Ok(service::handle_json(catalog, guidance, &body)?)
}
