//! Camera value type and its intrinsics/extrinsics parameter blocks.

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

use crate::{ModelError, Pose6d};

/// Number of values in an intrinsics block.
pub const INTRINSICS_DIM: usize = 9;
/// Number of values in an extrinsics block.
pub const EXTRINSICS_DIM: usize = 6;

/// Camera parameters laid out as two solver blocks.
///
/// - intrinsics: `[fx, fy, cx, cy, k1, k2, k3, p1, p2]`
/// - extrinsics: `[ax, ay, az, x, y, z]` (angle-axis rotation, then position)
///
/// `width`/`height` describe the image and are never optimized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraParameters {
    pub intrinsics: [f64; INTRINSICS_DIM],
    pub extrinsics: [f64; EXTRINSICS_DIM],
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl CameraParameters {
    /// Build from slices, validating block lengths.
    ///
    /// A shorter intrinsics slice is accepted: missing trailing distortion
    /// terms are zero. Extrinsics must be complete.
    pub fn from_slices(intrinsics: &[f64], extrinsics: &[f64]) -> Result<Self, ModelError> {
        if intrinsics.len() > INTRINSICS_DIM {
            return Err(ModelError::BlockLength {
                block: "intrinsics",
                expected: INTRINSICS_DIM,
                got: intrinsics.len(),
            });
        }
        if extrinsics.len() != EXTRINSICS_DIM {
            return Err(ModelError::BlockLength {
                block: "extrinsics",
                expected: EXTRINSICS_DIM,
                got: extrinsics.len(),
            });
        }
        let mut params = Self::default();
        params.intrinsics[..intrinsics.len()].copy_from_slice(intrinsics);
        params.extrinsics.copy_from_slice(extrinsics);
        Ok(params)
    }

    /// Pinhole intrinsics with zero distortion and identity extrinsics.
    pub fn pinhole(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        let mut params = Self::default();
        params.intrinsics[..4].copy_from_slice(&[fx, fy, cx, cy]);
        params
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn focal_length(&self) -> [f64; 2] {
        [self.intrinsics[0], self.intrinsics[1]]
    }

    #[inline]
    pub fn principal_point(&self) -> [f64; 2] {
        [self.intrinsics[2], self.intrinsics[3]]
    }

    /// Radial terms `[k1, k2, k3]`.
    #[inline]
    pub fn radial_distortion(&self) -> [f64; 3] {
        [self.intrinsics[4], self.intrinsics[5], self.intrinsics[6]]
    }

    /// Tangential terms `[p1, p2]`.
    #[inline]
    pub fn tangential_distortion(&self) -> [f64; 2] {
        [self.intrinsics[7], self.intrinsics[8]]
    }

    #[inline]
    pub fn angle_axis(&self) -> [f64; 3] {
        [self.extrinsics[0], self.extrinsics[1], self.extrinsics[2]]
    }

    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.extrinsics[3], self.extrinsics[4], self.extrinsics[5]]
    }

    /// Extrinsics as an `Isometry3` (same convention as [`Pose6d`]).
    pub fn extrinsics_isometry(&self) -> Isometry3<f64> {
        Pose6d {
            values: self.extrinsics,
        }
        .to_isometry()
    }

    pub fn set_extrinsics_isometry(&mut self, iso: &Isometry3<f64>) {
        self.extrinsics = Pose6d::from_isometry(iso).values;
    }
}

/// A named camera.
///
/// `is_moving` records whether this instance was created for a per-scene
/// (moving) context. It does not change the block layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub name: String,
    pub params: CameraParameters,
    #[serde(default)]
    pub is_moving: bool,
}

impl Camera {
    pub fn new(name: impl Into<String>, params: CameraParameters) -> Self {
        Self {
            name: name.into(),
            params,
            is_moving: false,
        }
    }

    /// Deep copy of this camera tagged for a moving context.
    pub fn moving_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            is_moving: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Vector3};

    #[test]
    fn short_intrinsics_pad_with_zero_distortion() {
        let params =
            CameraParameters::from_slices(&[500.0, 510.0, 320.0, 240.0], &[0.0; 6]).expect("ok");
        assert_eq!(params.focal_length(), [500.0, 510.0]);
        assert_eq!(params.principal_point(), [320.0, 240.0]);
        assert_eq!(params.radial_distortion(), [0.0; 3]);
        assert_eq!(params.tangential_distortion(), [0.0; 2]);
    }

    #[test]
    fn rejects_bad_block_lengths() {
        let err = CameraParameters::from_slices(&[0.0; 10], &[0.0; 6]).unwrap_err();
        assert_eq!(
            err,
            ModelError::BlockLength {
                block: "intrinsics",
                expected: 9,
                got: 10
            }
        );
        let err = CameraParameters::from_slices(&[0.0; 4], &[0.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::BlockLength {
                block: "extrinsics",
                ..
            }
        ));
    }

    #[test]
    fn extrinsics_isometry_round_trip() {
        let mut params = CameraParameters::pinhole(800.0, 800.0, 640.0, 360.0);
        let iso = Isometry3::new(Vector3::new(0.1, 0.2, 1.5), Vector3::new(-0.2, 0.05, 0.4));
        params.set_extrinsics_isometry(&iso);
        assert_relative_eq!(params.position()[2], 1.5, epsilon = 1e-12);
        let back = params.extrinsics_isometry();
        assert_relative_eq!(back, iso, epsilon = 1e-12);
    }

    #[test]
    fn moving_copy_is_independent() {
        let cam = Camera::new("cam", CameraParameters::pinhole(1.0, 2.0, 3.0, 4.0));
        let mut copy = cam.moving_copy();
        assert!(copy.is_moving);
        assert!(!cam.is_moving);
        copy.params.extrinsics[3] = 9.0;
        assert_eq!(cam.params.extrinsics[3], 0.0);
    }
}
