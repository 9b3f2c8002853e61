//! JSON request/response handling for classification as a service.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::classify::classify;
use crate::error::Result;
use crate::geo::Coordinate;
use crate::guidance::GuidanceTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub bomb_id: String,
    pub detonation: Coordinate,
    pub observer: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub zone_name: String,
    pub distance_meters: f64,
    pub guidance: String,
}

pub fn handle(catalog: &Catalog, guidance: &GuidanceTable, request: &ClassifyRequest) -> Result<ClassifyResponse> {
    let profile = catalog.get_profile(&request.bomb_id)?;
    let result = classify(request.detonation, request.observer, profile);
    let advice = guidance.get(result.zone_name())?;
    Ok(ClassifyResponse {
        zone_name: result.zone_name().to_string(),
        distance_meters: result.distance_m,
        guidance: advice.to_string(),
    })
}

/// Decode a request, handle it, and encode the response
pub fn handle_json(catalog: &Catalog, guidance: &GuidanceTable, body: &[u8]) -> Result<String> {
    let mut buf = body.to_vec();
    let request: ClassifyRequest = simd_json::serde::from_slice(&mut buf)?;
    tracing::info!(bomb = %request.bomb_id, "classify request");
    let response = handle(catalog, guidance, &request)?;
    Ok(simd_json::serde::to_string_pretty(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoneError;

    #[test]
    fn test_handle_json_shape() {
        let body = br#"{"bombId":"W-87 (Modern US Warhead)",
            "detonation":{"latitude":40.7128,"longitude":-74.0060},
            "observer":{"latitude":40.7580,"longitude":-73.9855}}"#;
        let out = handle_json(&Catalog::reference(), &GuidanceTable::reference(), body).unwrap();
        let mut bytes = out.into_bytes();
        let response: ClassifyResponse = simd_json::serde::from_slice(&mut bytes).unwrap();
        assert_eq!(response.zone_name, "Thermal Radiation");
        assert!(response.distance_meters > 5_250.0 && response.distance_meters < 5_400.0);
        assert!(response.guidance.starts_with("Zone: Thermal Radiation (3rd-Degree Burns)"));
    }

    #[test]
    fn test_unknown_bomb() {
        let request = ClassifyRequest {
            bomb_id: "Nope".into(),
            detonation: Coordinate::new(0.0, 0.0).unwrap(),
            observer: Coordinate::new(0.0, 0.0).unwrap(),
        };
        let err = handle(&Catalog::reference(), &GuidanceTable::reference(), &request).unwrap_err();
        assert!(matches!(err, ZoneError::NotFound(_)));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let body = br#"{"bombId":"W-87 (Modern US Warhead)",
            "detonation":{"latitude":140.0,"longitude":0.0},
            "observer":{"latitude":0.0,"longitude":0.0}}"#;
        assert!(handle_json(&Catalog::reference(), &GuidanceTable::reference(), body).is_err());
    }
}
