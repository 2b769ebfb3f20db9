//! The parameter block registry.

use std::cell::{Ref, RefCell, RefMut};
use std::ptr::{addr_of_mut, NonNull};
use std::rc::Rc;

use calib_blocks_core::{Camera, Target};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::block::Slot;
use crate::entry::Owned;
use crate::{
    BlockId, BlockKind, MovingCamera, MovingTarget, RegistryError, SceneId, SharedTarget,
};

/// Owner of every camera and target taking part in one calibration run.
///
/// Entities are allocated individually and never relocate, so the arrays
/// behind a [`BlockId`] keep their address until [`clear`](Self::clear) or
/// drop. All lookups scan in insertion order and the first match wins.
/// Lookups compare cached names only and never borrow an entity, so they
/// work while block views or caller borrows of shared targets are alive.
///
/// The registry is single-threaded (`!Send`, `!Sync`).
#[derive(Debug, Default)]
pub struct BlockRegistry {
    generation: u64,
    static_cameras: Vec<Owned<Camera>>,
    static_targets: Vec<Owned<Target>>,
    moving_cameras: Vec<MovingCamera>,
    moving_targets: Vec<MovingTarget>,
    /// Distinct targets referenced by `moving_targets`, one block identity each.
    shared_targets: Vec<SharedTarget>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every camera and target. Safe to call on an empty registry.
    ///
    /// Handles obtained before the call no longer resolve, even if an entity
    /// with the same name is registered again.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing registry generation {}: {} static cameras, {} static targets, {} moving cameras, {} moving targets",
            self.generation,
            self.static_cameras.len(),
            self.static_targets.len(),
            self.moving_cameras.len(),
            self.moving_targets.len()
        );
        self.static_cameras.clear();
        self.static_targets.clear();
        self.moving_cameras.clear();
        self.moving_targets.clear();
        self.shared_targets.clear();
        self.generation += 1;
    }

    /// Total number of static and moving entries.
    pub fn len(&self) -> usize {
        self.static_cameras.len()
            + self.static_targets.len()
            + self.moving_cameras.len()
            + self.moving_targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ---- insertion -------------------------------------------------------

    /// Register a static camera. Returns `false` if the name is taken.
    pub fn add_static_camera(&mut self, camera: Camera) -> bool {
        self.try_add_static_camera(camera).is_ok()
    }

    /// Register a static camera, reporting a duplicate name as an error.
    ///
    /// The first camera registered under a name wins.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(name = %camera.name)))]
    pub fn try_add_static_camera(&mut self, camera: Camera) -> Result<(), RegistryError> {
        if self.find_static_camera(&camera.name).is_some() {
            log::debug!("rejecting duplicate static camera `{}`", camera.name);
            return Err(RegistryError::DuplicateStaticCamera { name: camera.name });
        }
        log::trace!("static camera `{}` registered", camera.name);
        self.static_cameras.push(Owned {
            name: camera.name.clone(),
            cell: Rc::new(RefCell::new(camera)),
        });
        Ok(())
    }

    /// Register a static target. Returns `false` if the name is taken.
    pub fn add_static_target(&mut self, target: Target) -> bool {
        self.try_add_static_target(target).is_ok()
    }

    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(name = %target.name)))]
    pub fn try_add_static_target(&mut self, target: Target) -> Result<(), RegistryError> {
        if self.find_static_target(&target.name).is_some() {
            log::debug!("rejecting duplicate static target `{}`", target.name);
            return Err(RegistryError::DuplicateStaticTarget { name: target.name });
        }
        log::trace!(
            "static target `{}` registered with {} points",
            target.name,
            target.points.len()
        );
        self.static_targets.push(Owned {
            name: target.name.clone(),
            cell: Rc::new(RefCell::new(target)),
        });
        Ok(())
    }

    /// Register `camera` for `scene_id`. Returns `false` if that pair exists.
    pub fn add_moving_camera(&mut self, camera: &Camera, scene_id: SceneId) -> bool {
        self.try_add_moving_camera(camera, scene_id).is_ok()
    }

    /// Register a per-scene copy of `camera`.
    ///
    /// The registry stores a new camera built from the current values of
    /// `camera` and tagged as moving; later edits to `camera` are not seen.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, camera), fields(name = %camera.name)))]
    pub fn try_add_moving_camera(
        &mut self,
        camera: &Camera,
        scene_id: SceneId,
    ) -> Result<(), RegistryError> {
        if self.find_moving_camera(&camera.name, scene_id).is_some() {
            log::debug!(
                "rejecting duplicate moving camera `{}` in scene {}",
                camera.name,
                scene_id
            );
            return Err(RegistryError::DuplicateMovingCamera {
                name: camera.name.clone(),
                scene_id,
            });
        }
        log::trace!("moving camera `{}` registered for scene {}", camera.name, scene_id);
        self.moving_cameras.push(MovingCamera {
            name: camera.name.clone(),
            scene_id,
            camera: Rc::new(RefCell::new(camera.moving_copy())),
        });
        Ok(())
    }

    /// Register `target` for `scene_id`. Returns `false` if that pair exists.
    ///
    /// # Panics
    ///
    /// If the caller holds a mutable borrow of `target`; its name is read
    /// once here.
    pub fn add_moving_target(&mut self, target: SharedTarget, scene_id: SceneId) -> bool {
        self.try_add_moving_target(target, scene_id).is_ok()
    }

    /// Register a shared target for `scene_id`.
    ///
    /// The target is not copied. Every entry holding the same `Rc` resolves
    /// to the same pose and point blocks, whatever its scene.
    ///
    /// # Panics
    ///
    /// If the caller holds a mutable borrow of `target`.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, target)))]
    pub fn try_add_moving_target(
        &mut self,
        target: SharedTarget,
        scene_id: SceneId,
    ) -> Result<(), RegistryError> {
        let name = target.borrow().name.clone();
        if self.find_moving_target(&name, scene_id).is_some() {
            log::debug!("rejecting duplicate moving target `{name}` in scene {scene_id}");
            return Err(RegistryError::DuplicateMovingTarget { name, scene_id });
        }
        let pool_slot = match self
            .shared_targets
            .iter()
            .position(|t| Rc::ptr_eq(t, &target))
        {
            Some(slot) => slot,
            None => {
                self.shared_targets.push(Rc::clone(&target));
                self.shared_targets.len() - 1
            }
        };
        log::trace!("moving target `{name}` registered for scene {scene_id}");
        self.moving_targets.push(MovingTarget {
            name,
            scene_id,
            target,
            pool_slot,
        });
        Ok(())
    }

    // ---- camera lookups --------------------------------------------------

    pub fn static_camera_intrinsics(&self, name: &str) -> Option<BlockId> {
        let idx = self.find_static_camera(name)?;
        Some(self.id(Slot::StaticCamera(idx), BlockKind::Intrinsics))
    }

    pub fn static_camera_extrinsics(&self, name: &str) -> Option<BlockId> {
        let idx = self.find_static_camera(name)?;
        Some(self.id(Slot::StaticCamera(idx), BlockKind::Extrinsics))
    }

    /// Intrinsics of the first moving entry named `name`, whatever its scene.
    ///
    /// Intrinsics do not change between scenes; the copies held by later
    /// entries are never handed out.
    pub fn moving_camera_intrinsics(&self, name: &str) -> Option<BlockId> {
        let idx = self.moving_cameras.iter().position(|m| m.name == name)?;
        Some(self.id(Slot::MovingCamera(idx), BlockKind::Intrinsics))
    }

    pub fn moving_camera_extrinsics(&self, name: &str, scene_id: SceneId) -> Option<BlockId> {
        let idx = self.find_moving_camera(name, scene_id)?;
        Some(self.id(Slot::MovingCamera(idx), BlockKind::Extrinsics))
    }

    // ---- target lookups --------------------------------------------------

    pub fn static_target_pose(&self, name: &str) -> Option<BlockId> {
        let idx = self.find_static_target(name)?;
        Some(self.id(Slot::StaticTarget(idx), BlockKind::Pose))
    }

    /// Position block of point `point_id` on static target `name`.
    ///
    /// # Panics
    ///
    /// If the target exists but has no point `point_id`.
    pub fn static_target_point(&self, name: &str, point_id: usize) -> Option<BlockId> {
        let idx = self.find_static_target(name)?;
        check_point_id(&self.static_targets[idx].cell, point_id);
        Some(self.id(Slot::StaticTarget(idx), BlockKind::Point(point_id)))
    }

    /// Pose block of the target registered for `(name, scene_id)`.
    ///
    /// Scenes registered with the same [`SharedTarget`] return the same block.
    pub fn moving_target_pose(&self, name: &str, scene_id: SceneId) -> Option<BlockId> {
        let idx = self.find_moving_target(name, scene_id)?;
        let slot = Slot::SharedTarget(self.moving_targets[idx].pool_slot);
        Some(self.id(slot, BlockKind::Pose))
    }

    /// Position block of point `point_id` on the first moving target named
    /// `name`. Points are fixed in the target frame, so no scene is needed.
    ///
    /// # Panics
    ///
    /// If the target exists but has no point `point_id`. The range is not
    /// checked while the caller holds a mutable borrow of the target.
    pub fn moving_target_point(&self, name: &str, point_id: usize) -> Option<BlockId> {
        let entry = self.moving_targets.iter().find(|m| m.name == name)?;
        check_point_id(&entry.target, point_id);
        Some(self.id(
            Slot::SharedTarget(entry.pool_slot),
            BlockKind::Point(point_id),
        ))
    }

    // ---- block access ----------------------------------------------------

    /// Read view onto a block. `None` if the handle no longer resolves.
    ///
    /// # Panics
    ///
    /// If the owning entity is currently borrowed mutably.
    pub fn block(&self, id: BlockId) -> Option<Ref<'_, [f64]>> {
        match id.slot {
            Slot::StaticCamera(_) | Slot::MovingCamera(_) => {
                Ref::filter_map(self.camera_cell(id)?.borrow(), |c| {
                    camera_values(c, id.kind)
                })
                .ok()
            }
            Slot::StaticTarget(_) | Slot::SharedTarget(_) => {
                Ref::filter_map(self.target_cell(id)?.borrow(), |t| {
                    target_values(t, id.kind)
                })
                .ok()
            }
        }
    }

    /// Write view onto a block; this is how solver results land in the
    /// registry.
    ///
    /// # Panics
    ///
    /// If the owning entity is currently borrowed.
    pub fn block_mut(&self, id: BlockId) -> Option<RefMut<'_, [f64]>> {
        match id.slot {
            Slot::StaticCamera(_) | Slot::MovingCamera(_) => {
                RefMut::filter_map(self.camera_cell(id)?.borrow_mut(), |c| {
                    camera_values_mut(c, id.kind)
                })
                .ok()
            }
            Slot::StaticTarget(_) | Slot::SharedTarget(_) => {
                RefMut::filter_map(self.target_cell(id)?.borrow_mut(), |t| {
                    target_values_mut(t, id.kind)
                })
                .ok()
            }
        }
    }

    /// Stable address of the first value of a block, for solvers that keep
    /// raw pointers. Never borrows the entity, so it cannot panic on live
    /// views.
    ///
    /// The pointer stays valid while the registry holds the entity and is
    /// not cleared. Reading or writing through it while a [`block`](Self::block)
    /// or [`block_mut`](Self::block_mut) view of the same block is alive is
    /// undefined behaviour.
    pub fn block_ptr(&self, id: BlockId) -> Option<NonNull<f64>> {
        let ptr: *mut f64 = match id.slot {
            Slot::StaticCamera(_) | Slot::MovingCamera(_) => {
                let camera = self.camera_cell(id)?.as_ptr();
                // SAFETY: `camera` points at a live `RefCell` value owned by
                // the registry; `addr_of_mut!` projects without creating a
                // reference.
                unsafe {
                    match id.kind {
                        BlockKind::Intrinsics => addr_of_mut!((*camera).params.intrinsics).cast(),
                        BlockKind::Extrinsics => addr_of_mut!((*camera).params.extrinsics).cast(),
                        BlockKind::Pose | BlockKind::Point(_) => return None,
                    }
                }
            }
            Slot::StaticTarget(_) | Slot::SharedTarget(_) => {
                let target = self.target_cell(id)?.as_ptr();
                // SAFETY: as above. For points only the `Vec` header is
                // touched, never the element a view may cover.
                unsafe {
                    match id.kind {
                        BlockKind::Pose => addr_of_mut!((*target).pose.values).cast(),
                        BlockKind::Point(i) => {
                            let points = addr_of_mut!((*target).points);
                            if i >= (*points).len() {
                                return None;
                            }
                            let point = (*points).as_mut_ptr().add(i);
                            addr_of_mut!((*point).position).cast()
                        }
                        BlockKind::Intrinsics | BlockKind::Extrinsics => return None,
                    }
                }
            }
        };
        NonNull::new(ptr)
    }

    /// Number of values behind `id`, if it resolves.
    pub fn block_dim(&self, id: BlockId) -> Option<usize> {
        self.block(id).map(|b| b.len())
    }

    // ---- enumeration -----------------------------------------------------

    pub fn static_cameras(&self) -> impl Iterator<Item = Ref<'_, Camera>> + '_ {
        self.static_cameras.iter().map(|c| c.cell.borrow())
    }

    pub fn static_targets(&self) -> impl Iterator<Item = Ref<'_, Target>> + '_ {
        self.static_targets.iter().map(|t| t.cell.borrow())
    }

    pub fn moving_cameras(&self) -> impl Iterator<Item = &MovingCamera> + '_ {
        self.moving_cameras.iter()
    }

    pub fn moving_targets(&self) -> impl Iterator<Item = &MovingTarget> + '_ {
        self.moving_targets.iter()
    }

    /// Scenes a moving camera is registered for, in insertion order.
    pub fn scene_ids_for_camera(&self, name: &str) -> Vec<SceneId> {
        self.moving_cameras
            .iter()
            .filter(|m| m.name == name)
            .map(|m| m.scene_id)
            .collect()
    }

    /// Scenes a moving target is registered for, in insertion order.
    pub fn scene_ids_for_target(&self, name: &str) -> Vec<SceneId> {
        self.moving_targets
            .iter()
            .filter(|m| m.name == name)
            .map(|m| m.scene_id)
            .collect()
    }

    // ---- internals -------------------------------------------------------

    #[inline]
    fn id(&self, slot: Slot, kind: BlockKind) -> BlockId {
        BlockId::new(self.generation, slot, kind)
    }

    fn find_static_camera(&self, name: &str) -> Option<usize> {
        self.static_cameras.iter().position(|c| c.name == name)
    }

    fn find_static_target(&self, name: &str) -> Option<usize> {
        self.static_targets.iter().position(|t| t.name == name)
    }

    fn find_moving_camera(&self, name: &str, scene_id: SceneId) -> Option<usize> {
        self.moving_cameras
            .iter()
            .position(|m| m.scene_id == scene_id && m.name == name)
    }

    fn find_moving_target(&self, name: &str, scene_id: SceneId) -> Option<usize> {
        self.moving_targets
            .iter()
            .position(|m| m.scene_id == scene_id && m.name == name)
    }

    /// Cell behind a camera handle; `None` for stale or foreign handles.
    fn camera_cell(&self, id: BlockId) -> Option<&RefCell<Camera>> {
        if id.generation != self.generation {
            return None;
        }
        match id.slot {
            Slot::StaticCamera(i) => self.static_cameras.get(i).map(|c| &*c.cell),
            Slot::MovingCamera(i) => self.moving_cameras.get(i).map(|m| &*m.camera),
            Slot::StaticTarget(_) | Slot::SharedTarget(_) => None,
        }
    }

    /// Cell behind a target handle; `None` for stale or foreign handles.
    fn target_cell(&self, id: BlockId) -> Option<&RefCell<Target>> {
        if id.generation != self.generation {
            return None;
        }
        match id.slot {
            Slot::StaticTarget(i) => self.static_targets.get(i).map(|t| &*t.cell),
            Slot::SharedTarget(i) => self.shared_targets.get(i).map(|t| &**t),
            Slot::StaticCamera(_) | Slot::MovingCamera(_) => None,
        }
    }
}

fn check_point_id(target: &RefCell<Target>, point_id: usize) {
    let Ok(target) = target.try_borrow() else {
        return;
    };
    assert!(
        point_id < target.points.len(),
        "point id {point_id} out of range for target `{}` with {} points",
        target.name,
        target.points.len()
    );
}

fn camera_values(camera: &Camera, kind: BlockKind) -> Option<&[f64]> {
    match kind {
        BlockKind::Intrinsics => Some(&camera.params.intrinsics[..]),
        BlockKind::Extrinsics => Some(&camera.params.extrinsics[..]),
        BlockKind::Pose | BlockKind::Point(_) => None,
    }
}

fn camera_values_mut(camera: &mut Camera, kind: BlockKind) -> Option<&mut [f64]> {
    match kind {
        BlockKind::Intrinsics => Some(&mut camera.params.intrinsics[..]),
        BlockKind::Extrinsics => Some(&mut camera.params.extrinsics[..]),
        BlockKind::Pose | BlockKind::Point(_) => None,
    }
}

fn target_values(target: &Target, kind: BlockKind) -> Option<&[f64]> {
    match kind {
        BlockKind::Pose => Some(&target.pose.values[..]),
        BlockKind::Point(i) => target.points.get(i).map(|p| &p.position[..]),
        BlockKind::Intrinsics | BlockKind::Extrinsics => None,
    }
}

fn target_values_mut(target: &mut Target, kind: BlockKind) -> Option<&mut [f64]> {
    match kind {
        BlockKind::Pose => Some(&mut target.pose.values[..]),
        BlockKind::Point(i) => target.points.get_mut(i).map(|p| &mut p.position[..]),
        BlockKind::Intrinsics | BlockKind::Extrinsics => None,
    }
}
