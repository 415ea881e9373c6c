use crate::VertexId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("vertex {id} does not exist")]
    UnknownVertex { id: VertexId },
    #[error("vertex label is already in use: {label}")]
    DuplicateVertex { label: String },
    #[error("edge {index} references a missing endpoint: {label}")]
    MissingEndpoint { index: usize, label: String },
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
