//! Spatial and descriptive types returned by the SLAM capability set.

use serde::{Deserialize, Serialize};

/// A translation in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Orientation as a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// The zero rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A position and orientation in the map frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub point: Vector3,
    pub orientation: Quaternion,
}

impl Pose {
    pub const fn new(point: Vector3, orientation: Quaternion) -> Self {
        Self { point, orientation }
    }
}

/// How a SLAM service builds its map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    #[default]
    Unspecified,
    CreateNewMap,
    LocalizeOnly,
    UpdateExistingMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    #[default]
    Unspecified,
    Camera,
    MovementSensor,
}

/// A sensor the service consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SensorType,
}

/// Static description of a SLAM service.
///
/// Every field is optional on the wire; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    pub cloud_slam: bool,
    pub mapping_mode: MappingMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_state_file_type: Option<String>,
    pub sensor_info: Vec<SensorInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_decodes_to_default_properties() {
        let props: Properties = serde_json::from_value(json!({})).unwrap();
        assert_eq!(props, Properties::default());
    }

    #[test]
    fn partial_properties_fill_missing_fields() {
        let props: Properties =
            serde_json::from_value(json!({"mapping_mode": "localize_only"})).unwrap();
        assert_eq!(props.mapping_mode, MappingMode::LocalizeOnly);
        assert!(!props.cloud_slam);
        assert!(props.sensor_info.is_empty());
    }

    #[test]
    fn default_properties_round_trip_through_json() {
        let encoded = serde_json::to_value(Properties::default()).unwrap();
        assert_eq!(
            encoded,
            json!({"cloud_slam": false, "mapping_mode": "unspecified", "sensor_info": []})
        );
        assert_eq!(
            serde_json::from_value::<Properties>(encoded).unwrap(),
            Properties::default()
        );
    }
}
