//! Station registry.
//!
//! The four Antamina stations are built in; a JSON file with the same shape
//! (an array of `Station`) can replace them for a run.

use std::path::Path;

use crate::model::Station;

#[derive(Debug, thiserror::Error)]
pub enum StationsError {
    #[error("Failed to read stations file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse stations file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Stations file {0} contains no stations")]
    Empty(String),
}

fn station(
    name: &str,
    location_code: &str,
    latitude: f64,
    longitude: f64,
    buffer_radius_m: f64,
) -> Station {
    Station {
        name: name.to_string(),
        location_code: location_code.to_string(),
        latitude,
        longitude,
        buffer_radius_m,
        static_record_code: None,
    }
}

/// The stations around the Antamina mine site.
pub fn default_stations() -> Vec<Station> {
    vec![
        station("Dos Cruces", "2CRUCES", -9.56023, -77.05986, 2000.0),
        station("Quebrada", "QUEBRADA", -9.55501, -77.08584, 1000.0),
        station("Tucush", "TUCUSH", -9.51011, -77.05715, 2000.0),
        station("Usupallares", "USUPALLARES", -9.55422, -77.07305, 2000.0),
    ]
}

/// Parse a JSON array of stations.
pub fn parse_stations(json: &str, origin: &str) -> Result<Vec<Station>, StationsError> {
    let stations: Vec<Station> =
        serde_json::from_str(json).map_err(|source| StationsError::Parse {
            path: origin.to_string(),
            source,
        })?;

    if stations.is_empty() {
        return Err(StationsError::Empty(origin.to_string()));
    }
    Ok(stations)
}

pub fn load_stations(path: &Path) -> Result<Vec<Station>, StationsError> {
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path).map_err(|source| StationsError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_stations(&json, &origin)
}

/// Arithmetic mean of station coordinates, used to centre the map.
pub fn centroid(stations: &[Station]) -> Option<(f64, f64)> {
    if stations.is_empty() {
        return None;
    }
    let n = stations.len() as f64;
    let lat = stations.iter().map(|s| s.latitude).sum::<f64>() / n;
    let lon = stations.iter().map(|s| s.longitude).sum::<f64>() / n;
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stations() {
        let stations = default_stations();
        assert_eq!(stations.len(), 4);
        assert_eq!(stations[0].location_code, "2CRUCES");
        assert_eq!(stations[1].buffer_radius_m, 1000.0);
        assert!(stations.iter().all(|s| s.static_record_code.is_none()));
    }

    #[test]
    fn test_location_codes_are_unique_and_uppercase() {
        let stations = default_stations();
        for s in &stations {
            assert!(
                s.location_code
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected location code {}",
                s.location_code
            );
        }
        let mut codes: Vec<_> = stations.iter().map(|s| &s.location_code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), stations.len());
    }

    #[test]
    fn test_parse_stations_with_static_record() {
        let json = r#"[
            {"name":"Test","location_code":"TEST","latitude":-9.5,"longitude":-77.0,
             "buffer_radius_m":500,"static_record_code":"alertdata:t:d:m:a:TEST:1"}
        ]"#;
        let stations = parse_stations(json, "inline").unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(
            stations[0].static_record_code.as_deref(),
            Some("alertdata:t:d:m:a:TEST:1")
        );
    }

    #[test]
    fn test_parse_stations_rejects_empty_list() {
        assert!(matches!(
            parse_stations("[]", "inline"),
            Err(StationsError::Empty(_))
        ));
    }

    #[test]
    fn test_parse_stations_rejects_bad_json() {
        assert!(matches!(
            parse_stations("{not json", "inline"),
            Err(StationsError::Parse { .. })
        ));
    }

    #[test]
    fn test_centroid() {
        let (lat, lon) = centroid(&default_stations()).unwrap();
        assert!((lat - -9.5448925).abs() < 1e-9);
        assert!((lon - -77.068975).abs() < 1e-9);
        assert!(centroid(&[]).is_none());
    }
}
