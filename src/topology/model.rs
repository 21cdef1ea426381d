//! Topology records persisted by the store
//!
//! Field names are the on-disk JSON names; changing them breaks existing
//! store files.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Worker address used when `cluster add` omits `--listen`
pub const DEFAULT_WORKER_ADDR: &str = "127.0.0.1:9001";

/// SSH user used when `host add` omits `--ssh-user`
pub const DEFAULT_SSH_USER: &str = "root";

/// SSH port used when `host add` omits `--ssh-port`
pub const DEFAULT_SSH_PORT: u16 = 22;

/// A named group of hosts and instances managed as one HA unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub worker_addr: String,
    pub created_at: DateTime<Utc>,
}

impl Cluster {
    /// Create a cluster stamped with the current time.
    pub fn new(id: impl Into<String>, worker_addr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            worker_addr: worker_addr.into(),
            created_at: Utc::now(),
        }
    }

    /// Creation time as shown to operators.
    pub fn created_display(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// A machine registered under a cluster, reachable over SSH.
///
/// `id` and `cluster_id` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub id: String,
    pub ip: String,
    pub ssh_user: String,
    pub ssh_port: u16,
    #[serde(default)]
    pub cluster_id: String,
}

impl Host {
    pub fn new(ip: impl Into<String>, ssh_user: impl Into<String>, ssh_port: u16) -> Self {
        Self {
            id: String::new(),
            ip: ip.into(),
            ssh_user: ssh_user.into(),
            ssh_port,
            cluster_id: String::new(),
        }
    }
}

/// Replication role of a database instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Master,
    #[default]
    Slave,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Slave => "slave",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "master" => Ok(Role::Master),
            "slave" => Ok(Role::Slave),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A database server process on a host.
///
/// `id` and `cluster_id` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub id: String,
    pub host: String,
    pub port: u16,
    pub role: Role,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub master_addr: String,
    #[serde(default)]
    pub cluster_id: String,
}

impl Instance {
    pub fn new(host: impl Into<String>, port: u16, role: Role) -> Self {
        Self {
            id: String::new(),
            host: host.into(),
            port,
            role,
            master_addr: String::new(),
            cluster_id: String::new(),
        }
    }

    /// Set the upstream master address (slaves only).
    pub fn with_master(mut self, master_addr: impl Into<String>) -> Self {
        self.master_addr = master_addr.into();
        self
    }

    /// `host:port`, which is also the instance id.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A cluster together with everything attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub cluster: Cluster,
    pub hosts: Vec<Host>,
    pub instances: Vec<Instance>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.instances.is_empty()
    }
}
