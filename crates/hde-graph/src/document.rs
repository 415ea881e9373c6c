//! JSON interchange format for [`MemoryGraph`].
//!
//! ```json
//! {
//!   "vertices": [{ "id": "a" }, { "id": "b", "x": 1.0, "y": 2.0 }],
//!   "edges": [{ "source": "a", "target": "b" }]
//! }
//! ```
//!
//! Vertices are enumerated in document order. Missing coordinates default to `0`.

use crate::error::{Error, Result};
use crate::memory::MemoryGraph;
use crate::store::{GraphRead, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
}

impl GraphDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }

    pub fn to_graph(&self) -> Result<MemoryGraph> {
        let mut g = MemoryGraph::new();
        for v in &self.vertices {
            let id = g.add_labeled_vertex(v.id.clone())?;
            g.set_position(id, Position::new(v.x, v.y, v.z))?;
        }
        for (index, e) in self.edges.iter().enumerate() {
            let endpoint = |label: &str| {
                g.vertex_by_label(label).ok_or_else(|| Error::MissingEndpoint {
                    index,
                    label: label.to_string(),
                })
            };
            let source = endpoint(&e.source)?;
            let target = endpoint(&e.target)?;
            g.add_edge(source, target)?;
        }
        Ok(g)
    }

    /// Snapshot of `g` in enumeration order. Unlabeled vertices are named by their id.
    pub fn from_graph(g: &MemoryGraph) -> Self {
        let name = |v| g.label(v).map_or_else(|| v.to_string(), str::to_string);
        let vertices = g
            .vertices()
            .map(|v| {
                let p = g.position(v);
                VertexRecord {
                    id: name(v),
                    x: p.x,
                    y: p.y,
                    z: p.z,
                }
            })
            .collect();
        let edges = g
            .edges()
            .map(|(a, b)| EdgeRecord {
                source: name(a),
                target: name(b),
            })
            .collect();
        Self { vertices, edges }
    }
}
