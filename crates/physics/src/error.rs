use jointbench_common::EntityId;

/// Errors from physics context operations.
///
/// None of these are recoverable inside the demo: callers abort with the
/// message.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("invalid physics configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("entity {0} is not dynamic")]
    NotDynamic(EntityId),

    #[error("entity {0} has no physics body")]
    MissingBody(EntityId),

    #[error("cannot join entity {0} to itself")]
    SelfJoint(EntityId),

    #[error("entity {entity} has {expected} shapes but {given} filter data records were given")]
    FilterDataMismatch {
        entity: EntityId,
        expected: usize,
        given: usize,
    },

    #[cfg(feature = "parallel")]
    #[error("failed to build solver worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
