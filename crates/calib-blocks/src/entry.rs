use std::cell::{Ref, RefCell};
use std::rc::Rc;

use calib_blocks_core::{Camera, Target};

/// Index of one observation scene.
pub type SceneId = i32;

/// Target handle shared between the caller and moving-target entries.
pub type SharedTarget = Rc<RefCell<Target>>;

/// Registry-owned entity with its name cached, so lookups never borrow it.
#[derive(Debug)]
pub(crate) struct Owned<T> {
    pub(crate) name: String,
    pub(crate) cell: Rc<RefCell<T>>,
}

/// Per-scene copy of a moving camera.
///
/// Every entry owns its own camera, so each scene gets an independent
/// extrinsics block. Intrinsics are copied too, but only the first entry for
/// a camera name is handed out as the live intrinsics block.
#[derive(Debug)]
pub struct MovingCamera {
    pub(crate) name: String,
    pub(crate) scene_id: SceneId,
    pub(crate) camera: Rc<RefCell<Camera>>,
}

impl MovingCamera {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    pub fn camera(&self) -> Ref<'_, Camera> {
        self.camera.borrow()
    }
}

/// Scene reference to a moving target.
///
/// The target is shared, not copied: entries built from the same
/// [`SharedTarget`] see one pose block and one set of point blocks across all
/// of their scenes. The entry keeps the target alive for as long as the
/// registry holds it.
///
/// The name is captured at insertion and is the entry's lookup key; renaming
/// the shared target afterwards does not move the entry.
#[derive(Debug)]
pub struct MovingTarget {
    pub(crate) name: String,
    pub(crate) scene_id: SceneId,
    pub(crate) target: SharedTarget,
    pub(crate) pool_slot: usize,
}

impl MovingTarget {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    #[inline]
    pub fn target(&self) -> &SharedTarget {
        &self.target
    }
}
