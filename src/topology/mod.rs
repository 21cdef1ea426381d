//! Topology subsystem for gmha
//!
//! Persistent hierarchical model of the register:
//! - Cluster -> Hosts
//! - Cluster -> Instances
//!
//! # Invariants Enforced
//!
//! - Cluster ids are unique; a second add with the same id is rejected
//! - Hosts and instances can only be attached to an existing cluster
//! - Per-cluster lists keep insertion order and every field across reopen
//! - Clusters list in insertion order

mod errors;
mod model;
mod store;

pub use errors::{ErrorKind, TopologyError, TopologyResult};
pub use model::{
    Cluster, Host, Instance, Role, Topology, DEFAULT_SSH_PORT, DEFAULT_SSH_USER,
    DEFAULT_WORKER_ADDR,
};
pub use store::TopologyStore;
