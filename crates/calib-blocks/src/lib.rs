//! Registry of optimizable parameter blocks for camera/target calibration.
//!
//! Cameras and targets are registered either as *static* (one parameter set
//! shared by every scene) or *moving* (tracked per scene id). Lookups return
//! [`BlockId`] handles to the numeric arrays a nonlinear solver optimizes:
//! camera intrinsics and extrinsics, target poses and target point positions.
//! The same logical block always yields the same handle and the same address
//! for the lifetime of the registry, so residuals added at different times
//! can be correlated by block.
//!
//! ```
//! use calib_blocks::{BlockRegistry, Camera, CameraParameters};
//!
//! let mut registry = BlockRegistry::new();
//! let cam = Camera::new("camA", CameraParameters::pinhole(600.0, 600.0, 320.0, 240.0));
//! assert!(registry.add_static_camera(cam.clone()));
//! assert!(!registry.add_static_camera(cam));
//!
//! let id = registry.static_camera_intrinsics("camA").unwrap();
//! assert_eq!(&registry.block(id).unwrap()[..4], &[600.0, 600.0, 320.0, 240.0]);
//! assert!(registry.static_camera_intrinsics("camB").is_none());
//! ```

mod block;
mod entry;
mod error;
mod registry;

pub use block::{BlockId, BlockKind};
pub use entry::{MovingCamera, MovingTarget, SceneId, SharedTarget};
pub use error::RegistryError;
pub use registry::BlockRegistry;

pub use calib_blocks_core::{
    init_with_level, Camera, CameraParameters, LoggerOptions, ModelError, Pose6d, Target,
    TargetKind, TargetPoint, EXTRINSICS_DIM, INTRINSICS_DIM, POINT_DIM, POSE_DIM,
};

#[cfg(feature = "tracing")]
pub use calib_blocks_core::init_tracing;
