//! Calibration target value type.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::{ModelError, Pose6d};

/// Number of values in a target point block.
pub const POINT_DIM: usize = 3;

/// One target point; owns its 3D position block in the target frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub position: [f64; POINT_DIM],
}

impl TargetPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    #[inline]
    pub fn to_point(&self) -> Point3<f64> {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Physical layout a target was generated from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TargetKind {
    /// Inner-corner grid of a checkerboard.
    Checkerboard { rows: u32, cols: u32, spacing: f64 },
    /// Grid of circle centers.
    CircleGrid {
        rows: u32,
        cols: u32,
        spacing: f64,
        circle_diameter: f64,
    },
    /// Arbitrary point list.
    #[default]
    Custom,
}

/// A named calibration target: a pose block plus an ordered list of points.
///
/// Point ids are indices into `points` and never change once the target is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    pub kind: TargetKind,
    #[serde(default)]
    pub pose: Pose6d,
    pub points: Vec<TargetPoint>,
}

impl Target {
    pub fn new(name: impl Into<String>, pose: Pose6d, points: Vec<TargetPoint>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Custom,
            pose,
            points,
        }
    }

    /// Checkerboard with `rows × cols` inner corners spaced `spacing` apart.
    ///
    /// Points are row-major on the `z = 0` plane, origin at the first corner.
    pub fn checkerboard(
        name: impl Into<String>,
        rows: u32,
        cols: u32,
        spacing: f64,
    ) -> Result<Self, ModelError> {
        let points = grid_points(rows, cols, spacing)?;
        Ok(Self {
            name: name.into(),
            kind: TargetKind::Checkerboard {
                rows,
                cols,
                spacing,
            },
            pose: Pose6d::identity(),
            points,
        })
    }

    /// Circle grid with `rows × cols` centers spaced `spacing` apart.
    pub fn circle_grid(
        name: impl Into<String>,
        rows: u32,
        cols: u32,
        spacing: f64,
        circle_diameter: f64,
    ) -> Result<Self, ModelError> {
        if !circle_diameter.is_finite() || circle_diameter <= 0.0 {
            return Err(ModelError::InvalidDiameter(circle_diameter));
        }
        let points = grid_points(rows, cols, spacing)?;
        Ok(Self {
            name: name.into(),
            kind: TargetKind::CircleGrid {
                rows,
                cols,
                spacing,
                circle_diameter,
            },
            pose: Pose6d::identity(),
            points,
        })
    }

    pub fn with_pose(mut self, pose: Pose6d) -> Self {
        self.pose = pose;
        self
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point `id` mapped through the target pose.
    pub fn point_in_parent(&self, id: usize) -> Option<Point3<f64>> {
        let p = self.points.get(id)?;
        Some(self.pose.transform_point(&p.to_point()))
    }
}

fn grid_points(rows: u32, cols: u32, spacing: f64) -> Result<Vec<TargetPoint>, ModelError> {
    if rows == 0 || cols == 0 {
        return Err(ModelError::InvalidGridSize);
    }
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ModelError::InvalidSpacing(spacing));
    }
    let mut points = Vec::with_capacity(rows as usize * cols as usize);
    for r in 0..rows {
        for c in 0..cols {
            points.push(TargetPoint::new(
                c as f64 * spacing,
                r as f64 * spacing,
                0.0,
            ));
        }
    }
    Ok(points)
}
