use crate::SceneId;

/// Rejected insertions. State is left untouched when one of these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("static camera `{name}` already registered")]
    DuplicateStaticCamera { name: String },
    #[error("static target `{name}` already registered")]
    DuplicateStaticTarget { name: String },
    #[error("moving camera `{name}` already registered for scene {scene_id}")]
    DuplicateMovingCamera { name: String, scene_id: SceneId },
    #[error("moving target `{name}` already registered for scene {scene_id}")]
    DuplicateMovingTarget { name: String, scene_id: SceneId },
}
