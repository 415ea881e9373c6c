#![forbid(unsafe_code)]

//! Graph store APIs consumed by `hde`.
//!
//! The layout engine never owns a graph. It reads topology through [`GraphRead`] and writes
//! coordinates back through [`GraphWrite`]. [`MemoryGraph`] is the in-memory store used by the
//! CLI and the test suites; hosts with their own storage implement the two traits instead.

pub mod document;
mod error;
mod memory;
mod store;

pub use document::{EdgeRecord, GraphDocument, VertexRecord};
pub use error::{Error, Result};
pub use memory::MemoryGraph;
pub use store::{GraphRead, GraphWrite, Position};

/// External vertex identifier. Identifier spaces may be sparse; see [`GraphRead::vertex_capacity`].
pub type VertexId = u32;
