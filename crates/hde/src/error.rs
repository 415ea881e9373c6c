use hde_graph::VertexId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout was cancelled")]
    Cancelled,
    #[error("cannot arrange a graph with no vertices")]
    EmptyGraph,
    #[error("invalid arrange options: {reason}")]
    InvalidOptions { reason: String },
    #[error("graph store returned unknown vertex id {id}")]
    UnknownVertex { id: VertexId },
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
