//! Six degree-of-freedom pose parameter block.

use nalgebra::{Isometry3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Number of values in a pose block.
pub const POSE_DIM: usize = 6;

/// Rigid transform stored as a solver-ready block `[ax, ay, az, x, y, z]`.
///
/// The first three values are an angle-axis rotation (axis scaled by the
/// angle in radians), the last three a translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose6d {
    pub values: [f64; POSE_DIM],
}

impl Pose6d {
    /// Pose from angle-axis rotation and translation.
    pub fn new(angle_axis: [f64; 3], translation: [f64; 3]) -> Self {
        let [ax, ay, az] = angle_axis;
        let [x, y, z] = translation;
        Self {
            values: [ax, ay, az, x, y, z],
        }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn angle_axis(&self) -> [f64; 3] {
        [self.values[0], self.values[1], self.values[2]]
    }

    #[inline]
    pub fn translation(&self) -> [f64; 3] {
        [self.values[3], self.values[4], self.values[5]]
    }

    pub fn set_angle_axis(&mut self, angle_axis: [f64; 3]) {
        self.values[..3].copy_from_slice(&angle_axis);
    }

    pub fn set_translation(&mut self, translation: [f64; 3]) {
        self.values[3..].copy_from_slice(&translation);
    }

    /// Convert into an `Isometry3`.
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let [ax, ay, az] = self.angle_axis();
        let [x, y, z] = self.translation();
        Isometry3::new(Vector3::new(x, y, z), Vector3::new(ax, ay, az))
    }

    /// Build from an `Isometry3`.
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        let r = iso.rotation.scaled_axis();
        let t = iso.translation.vector;
        Self::new([r.x, r.y, r.z], [t.x, t.y, t.z])
    }

    /// Map a point from the pose's child frame into its parent frame.
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        self.to_isometry().transform_point(p)
    }

    /// Inverse transform.
    pub fn inverse(&self) -> Self {
        Self::from_isometry(&self.to_isometry().inverse())
    }
}

impl From<Isometry3<f64>> for Pose6d {
    fn from(iso: Isometry3<f64>) -> Self {
        Self::from_isometry(&iso)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn isometry_round_trip_keeps_values() {
        let pose = Pose6d::new([0.1, -0.2, 0.3], [1.0, 2.0, -3.0]);
        let back = Pose6d::from_isometry(&pose.to_isometry());
        for (a, b) in pose.values.iter().zip(back.values.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let pose = Pose6d::new([0.0, 0.0, FRAC_PI_2], [0.0, 0.0, 1.0]);
        let p = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_undoes_transform() {
        let pose = Pose6d::new([0.3, 0.1, -0.4], [0.5, -1.0, 2.0]);
        let p = Point3::new(0.2, 0.7, -0.1);
        let q = pose.inverse().transform_point(&pose.transform_point(&p));
        assert_relative_eq!(p, q, epsilon = 1e-12);
    }
}
