//! Camera and calibration target value types.
//!
//! Every optimizable quantity is stored as a fixed-size `f64` array so that a
//! nonlinear solver can use it directly as a parameter block:
//!
//! - camera intrinsics (`[f64; 9]`) and extrinsics (`[f64; 6]`),
//! - target pose (`[f64; 6]`),
//! - target point positions (`[f64; 3]`).
//!
//! Block ownership and lookup live in `calib-blocks`.

mod camera;
mod error;
mod io;
mod logger;
mod pose;
mod target;

pub use camera::{Camera, CameraParameters, EXTRINSICS_DIM, INTRINSICS_DIM};
pub use error::ModelError;
pub use io::{BlocksIoError, CameraSetConfig, TargetSetConfig};
pub use pose::{Pose6d, POSE_DIM};
pub use target::{Target, TargetKind, TargetPoint, POINT_DIM};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init, init_with_level, LoggerOptions};
