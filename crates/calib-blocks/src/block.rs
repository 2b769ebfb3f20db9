//! Parameter block handles.

use calib_blocks_core::{EXTRINSICS_DIM, INTRINSICS_DIM, POINT_DIM, POSE_DIM};

/// Which numeric array of an entity a block refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Camera intrinsics `[fx, fy, cx, cy, k1, k2, k3, p1, p2]`.
    Intrinsics,
    /// Camera extrinsics `[ax, ay, az, x, y, z]`.
    Extrinsics,
    /// Target pose `[ax, ay, az, x, y, z]`.
    Pose,
    /// Position `[x, y, z]` of the target point with this id.
    Point(usize),
}

impl BlockKind {
    /// Number of `f64` values in a block of this kind.
    #[inline]
    pub fn dim(self) -> usize {
        match self {
            BlockKind::Intrinsics => INTRINSICS_DIM,
            BlockKind::Extrinsics => EXTRINSICS_DIM,
            BlockKind::Pose => POSE_DIM,
            BlockKind::Point(_) => POINT_DIM,
        }
    }
}

/// Storage an entity lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    StaticCamera(usize),
    MovingCamera(usize),
    StaticTarget(usize),
    /// Index into the pool of distinct shared targets, not into the
    /// moving-target entries.
    SharedTarget(usize),
}

/// Handle to one parameter block inside a [`BlockRegistry`](crate::BlockRegistry).
///
/// Two handles compare equal exactly when they name the same storage, so a
/// handle can be used as a map key when correlating residuals by block.
/// Handles carry the registry generation they were issued in and stop
/// resolving once the registry is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId {
    pub(crate) generation: u64,
    pub(crate) slot: Slot,
    pub(crate) kind: BlockKind,
}

impl BlockId {
    #[inline]
    pub(crate) fn new(generation: u64, slot: Slot, kind: BlockKind) -> Self {
        Self {
            generation,
            slot,
            kind,
        }
    }

    #[inline]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.kind.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dims_match_core_layout() {
        assert_eq!(BlockKind::Intrinsics.dim(), 9);
        assert_eq!(BlockKind::Extrinsics.dim(), 6);
        assert_eq!(BlockKind::Pose.dim(), 6);
        assert_eq!(BlockKind::Point(42).dim(), 3);
    }

    #[test]
    fn identity_includes_generation_slot_and_kind() {
        let a = BlockId::new(0, Slot::StaticCamera(0), BlockKind::Intrinsics);
        assert_eq!(a, BlockId::new(0, Slot::StaticCamera(0), BlockKind::Intrinsics));
        assert_ne!(a, BlockId::new(0, Slot::StaticCamera(0), BlockKind::Extrinsics));
        assert_ne!(a, BlockId::new(0, Slot::MovingCamera(0), BlockKind::Intrinsics));
        assert_ne!(a, BlockId::new(1, Slot::StaticCamera(0), BlockKind::Intrinsics));
    }
}
