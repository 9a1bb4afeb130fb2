//! Collection point catalog
//!
//! Points are loaded once (from JSON or the built-in list), wrapped in `Arc`
//! and handed to the engine by reference. Nothing downstream mutates them.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::error::{suggest_point_id, Error, Result};
use crate::core::geo::{Coordinate, MIN_ROUTE_WAYPOINTS};

/// A physical recycling drop-off location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    /// Unique, stable identifier
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub coordinate: Coordinate,
    /// Nominal path to be resolved into a real route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Coordinate>>,
}

/// Ordered, read-only list of collection points
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    points: Vec<Arc<CollectionPoint>>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and out-of-range coordinates
    pub fn new(points: Vec<CollectionPoint>) -> Result<Self> {
        let mut seen = HashSet::new();

        for point in &points {
            if !seen.insert(point.id.as_str()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate collection point id '{}'",
                    point.id
                )));
            }
            if !point.coordinate.is_valid() {
                return Err(Error::InvalidInput(format!(
                    "collection point '{}' has an invalid coordinate {}",
                    point.id, point.coordinate
                )));
            }
            if let Some(waypoints) = &point.waypoints {
                if let Some(bad) = waypoints.iter().find(|c| !c.is_valid()) {
                    return Err(Error::InvalidInput(format!(
                        "collection point '{}' has an invalid waypoint {bad}",
                        point.id
                    )));
                }
                if waypoints.len() < MIN_ROUTE_WAYPOINTS {
                    warn!(
                        "Collection point '{}' has {} waypoint(s); no route will be resolved for it",
                        point.id,
                        waypoints.len()
                    );
                }
            }
        }

        Ok(Self {
            points: points.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a JSON array of collection points
    pub fn from_json(json: &str) -> Result<Self> {
        let points: Vec<CollectionPoint> = serde_json::from_str(json)?;
        Self::new(points)
    }

    /// Load a catalog file from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The three Tianguá drop-off points the app ships with
    pub fn builtin() -> Self {
        let points = vec![
            CollectionPoint {
                id: "centro".to_string(),
                name: "EcoPonto Centro".to_string(),
                description: "Plástico, papel e metal. Seg–Sáb, 8h–17h.".to_string(),
                coordinate: Coordinate::new(-3.7333, -40.9919),
                waypoints: Some(vec![
                    Coordinate::new(-3.7333, -40.9919),
                    Coordinate::new(-3.7340, -40.9930),
                ]),
            },
            CollectionPoint {
                id: "rodoviaria".to_string(),
                name: "EcoPonto Rodoviária".to_string(),
                description: "Vidro e eletrônicos de pequeno porte.".to_string(),
                coordinate: Coordinate::new(-3.7300, -40.9970),
                waypoints: Some(vec![
                    Coordinate::new(-3.7333, -40.9919),
                    Coordinate::new(-3.7318, -40.9944),
                    Coordinate::new(-3.7300, -40.9970),
                ]),
            },
            CollectionPoint {
                id: "mercado".to_string(),
                name: "EcoPonto Mercado".to_string(),
                description: "Óleo de cozinha usado.".to_string(),
                coordinate: Coordinate::new(-3.7200, -40.9870),
                waypoints: None,
            },
        ];

        Self {
            points: points.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn points(&self) -> &[Arc<CollectionPoint>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<CollectionPoint>> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Look up a point, producing a "did you mean" error for unknown ids
    pub fn require(&self, id: &str) -> Result<Arc<CollectionPoint>> {
        self.get(id).cloned().ok_or_else(|| Error::PointNotFound {
            id: id.to_string(),
            suggestion: suggest_point_id(id, self.points.iter().map(|p| p.id.as_str())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::{assert_err, assert_ok};

    const CATALOG_JSON: &str = r#"[
        {
            "id": "e1",
            "name": "Point one",
            "description": "first",
            "coordinate": [-3.733, -40.991],
            "waypoints": [[-3.733, -40.991], [-3.734, -40.993]]
        },
        {
            "id": "e3",
            "name": "Point three",
            "coordinate": [-3.72, -40.987]
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = assert_ok!(Catalog::from_json(CATALOG_JSON));
        assert_eq!(catalog.len(), 2);

        let e1 = catalog.get("e1").unwrap();
        assert_eq!(e1.coordinate, Coordinate::new(-3.733, -40.991));
        assert_eq!(e1.waypoints.as_ref().unwrap().len(), 2);

        let e3 = catalog.get("e3").unwrap();
        assert!(e3.waypoints.is_none());
        assert_eq!(e3.description, "");
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CATALOG_JSON.as_bytes()).unwrap();

        let catalog = assert_ok!(Catalog::from_path(file.path()));
        assert_eq!(catalog.points()[0].id, "e1");
        assert_eq!(catalog.points()[1].id, "e3");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(Catalog::from_path(dir.path().join("missing.json")));
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let point = CollectionPoint {
            id: "dup".to_string(),
            name: "A".to_string(),
            description: String::new(),
            coordinate: Coordinate::new(0.0, 0.0),
            waypoints: None,
        };
        let err = assert_err!(Catalog::new(vec![point.clone(), point]));
        assert!(err.to_string().contains("duplicate collection point id 'dup'"));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let point = CollectionPoint {
            id: "bad".to_string(),
            name: "Bad".to_string(),
            description: String::new(),
            coordinate: Coordinate::new(120.0, 0.0),
            waypoints: None,
        };
        assert!(matches!(
            Catalog::new(vec![point]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_waypoint_is_accepted() {
        let point = CollectionPoint {
            id: "one".to_string(),
            name: "One".to_string(),
            description: String::new(),
            coordinate: Coordinate::new(0.0, 0.0),
            waypoints: Some(vec![Coordinate::new(0.0, 0.0)]),
        };
        assert_ok!(Catalog::new(vec![point]));
    }

    #[test]
    fn test_require_suggests_close_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.require("centro").unwrap().name, "EcoPonto Centro");

        match catalog.require("rodoviara") {
            Err(Error::PointNotFound { id, suggestion }) => {
                assert_eq!(id, "rodoviara");
                assert_eq!(suggestion.as_deref(), Some("rodoviaria"));
            }
            other => panic!("Expected PointNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let owned: Vec<CollectionPoint> =
            builtin.points().iter().map(|p| (**p).clone()).collect();
        assert_ok!(Catalog::new(owned));
        assert_eq!(builtin.len(), 3);
    }
}
