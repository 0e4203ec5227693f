//! JSON input boundary
//!
//! Diagram data usually arrives as JSON embedded in generated quiz content.
//! Decoding errors carry the source and a span, so a caller printing them
//! through miette sees the offending spot.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::errors::DataError;
use crate::model::{DiagramElement, DiagramSpec, Point, Scene};

/// Scene JSON: points keyed by id plus elements and optional ranges.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneData {
    #[serde(default)]
    points: IndexMap<String, Point>,
    #[serde(default)]
    elements: Vec<DiagramElement>,
    #[serde(default)]
    x_range: Option<(f64, f64)>,
    #[serde(default)]
    y_range: Option<(f64, f64)>,
}

fn decode<T: DeserializeOwned>(name: &str, json: &str) -> Result<T, DataError> {
    serde_json::from_str(json)
        .map_err(|e| DataError::syntax(name, json, e.to_string(), e.line(), e.column()))
}

/// Decode a coordinate diagram such as
/// `{"type": "coordinate", "xMin": -5, "xMax": 5, "yMin": -5, "yMax": 5,
/// "functions": [{"equation": "x^2", "color": "blue"}]}`.
pub fn parse_diagram_data(json: &str) -> Result<DiagramSpec, DataError> {
    let spec: DiagramSpec = decode("diagram.json", json)?;
    spec.validate()?;
    Ok(spec)
}

/// Decode a point/element scene. Point ids are taken from the map keys.
pub fn parse_scene(json: &str) -> Result<Scene, DataError> {
    let data: SceneData = decode("scene.json", json)?;
    let points = data
        .points
        .into_iter()
        .map(|(id, mut point)| {
            point.id.clone_from(&id);
            (id, point)
        })
        .collect();
    let scene = Scene {
        points,
        elements: data.elements,
        x_range: data.x_range,
        y_range: data.y_range,
    };
    scene.validate()?;
    Ok(scene)
}
