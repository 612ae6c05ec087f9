use crate::graph::error::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum WalkOperationError {
    #[error("graph error: {0}")]
    GraphFailure(#[from] GraphError),
    #[error("fragments are not supported in requirement selections (type '{0}')")]
    UnsupportedRequirementFragment(String),
}
