//! Incremental rail network connectivity for Railyard.
//!
//! A [`NetworkRegistry`] partitions rail tiles into [`TrainNetwork`]s as
//! grid events arrive. Networks only ever grow and merge: when two meet,
//! the one with the higher [`NetworkId`](railyard_core::NetworkId) absorbs
//! the other. Removing a tile does not split its network.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod network;
pub mod registry;

pub use network::TrainNetwork;
pub use registry::NetworkRegistry;
