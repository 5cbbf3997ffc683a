use crate::entity::EntityId;

/// Errors from world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("no constructor registered for class `{0}`")]
    UnknownClass(String),
    #[error("entity {0:?} is not in this world's arena")]
    UnknownEntity(EntityId),
    #[error("entity {0:?} is still attached, pending or pooled")]
    NotDetached(EntityId),
}
