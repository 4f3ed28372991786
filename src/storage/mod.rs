//! Graph storage layer
//!
//! Node id types, frontier bitsets, CSR graphs/partitions and Parquet persistence.

pub mod bitset;
pub mod csr;
pub mod ids;
#[cfg(feature = "storage")]
pub mod parquet;

pub use bitset::FrontierBitset;
pub use csr::{CsrGraph, CsrPartition};
pub use ids::{GlobalNodeId, LocalNodeId, WORD_BITS};
