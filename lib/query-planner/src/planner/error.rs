use crate::graph::error::GraphError;

use super::walker::error::WalkOperationError;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("graph error: {0}")]
    GraphFailure(#[from] GraphError),
    #[error("could not identify a target field after the entity move into subgraph '{0}'")]
    MissingTargetField(String),
    #[error("entity move into '{0}' carries no requirement")]
    MissingEntityRequirement(String),
    #[error("move kind is not supported by plan synthesis: {0}")]
    UnsupportedMove(String),
    #[error("operation path is malformed: {0} edges but {1} requirement slots")]
    MisalignedPath(usize, usize),
}

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Walk(#[from] WalkOperationError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}
