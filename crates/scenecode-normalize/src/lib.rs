//! Node normalization for scenecode.
//!
//! Walks the host scene tree and produces the intermediate node tree that
//! every code generator consumes:
//!
//! - [`normalize`] - selection → intermediate trees, with warnings
//! - [`IntermediateNode`] / [`NodeKind`] - the closed set of node kinds
//! - [`strip_origins`] - removes host back-references before serialization

pub mod error;
pub mod kind;
pub mod node;
pub mod normalizer;
pub mod strip;

pub use error::{NormalizeError, Result};
pub use kind::{classify, is_vector_subtree, HostKind};
pub use node::{ImageData, IntermediateNode, NodeKind, TextData, TextRun, VectorData};
pub use normalizer::{normalize, MAX_DEPTH};
pub use strip::{strip_origins, stripped, to_json};
