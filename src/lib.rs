//! gmha - a cluster-topology register for database high-availability clusters
//!
//! Clusters own hosts and database instances. The register persists them in
//! an embedded key-value file and is driven by a small text command language:
//!
//! ```text
//! cluster add --id=demo
//! cluster demo host add --ip=10.0.0.9
//! cluster demo instance add --host=10.0.0.9 --port=3306 --role=master
//! cluster show demo
//! ```

pub mod cli;
pub mod command;
pub mod dispatch;
pub mod topology;
