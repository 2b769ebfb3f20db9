//! JSON configuration helpers for camera and target sets.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::{Camera, Target};

#[derive(thiserror::Error, Debug)]
pub enum BlocksIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Cameras taking part in a calibration run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSetConfig {
    pub cameras: Vec<Camera>,
}

impl CameraSetConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BlocksIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BlocksIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Targets taking part in a calibration run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSetConfig {
    pub targets: Vec<Target>,
}

impl TargetSetConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, BlocksIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), BlocksIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraParameters, Pose6d, TargetKind};

    #[test]
    fn camera_set_survives_disk_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cameras.json");
        let cfg = CameraSetConfig {
            cameras: vec![
                Camera::new(
                    "left",
                    CameraParameters::pinhole(600.0, 600.0, 320.0, 240.0).with_image_size(640, 480),
                ),
                Camera::new("right", CameraParameters::pinhole(610.0, 605.0, 318.0, 242.0)),
            ],
        };
        cfg.write_json(&path).expect("write");
        let back = CameraSetConfig::load_json(&path).expect("load");
        assert_eq!(back, cfg);
    }

    #[test]
    fn target_defaults_fill_missing_fields() {
        let raw = r#"{
            "targets": [
                { "name": "plate", "points": [ { "position": [0.0, 0.0, 0.0] } ] },
                {
                    "name": "board",
                    "kind": { "type": "checkerboard", "rows": 1, "cols": 2, "spacing": 0.5 },
                    "points": [
                        { "position": [0.0, 0.0, 0.0] },
                        { "position": [0.5, 0.0, 0.0] }
                    ]
                }
            ]
        }"#;
        let cfg: TargetSetConfig = serde_json::from_str(raw).expect("parse");
        assert_eq!(cfg.targets[0].kind, TargetKind::Custom);
        assert_eq!(cfg.targets[0].pose, Pose6d::identity());
        assert!(matches!(
            cfg.targets[1].kind,
            TargetKind::Checkerboard { rows: 1, cols: 2, .. }
        ));
        assert_eq!(cfg.targets[1].num_points(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TargetSetConfig::load_json(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BlocksIoError::Io(_)));
    }
}
