//! Operator-facing text output

use std::io::{self, Write};

use crate::command::{USAGE_CLUSTER_ADD, USAGE_CLUSTER_SHOW, USAGE_HOST_ADD, USAGE_INSTANCE_ADD};
use crate::topology::{Cluster, Role, Topology};

pub const NO_CLUSTERS: &str = "  [topology] no clusters";

/// Prints every cluster, one per line, or a placeholder when there are none.
pub fn write_cluster_list<W: Write>(out: &mut W, clusters: &[Cluster]) -> io::Result<()> {
    if clusters.is_empty() {
        return writeln!(out, "{}", NO_CLUSTERS);
    }
    writeln!(out, "  ---------- clusters ----------")?;
    for c in clusters {
        writeln!(
            out,
            "  cluster: {}   worker: {}   created: {}",
            c.id,
            c.worker_addr,
            c.created_display()
        )?;
    }
    writeln!(out, "  ------------------------------")
}

/// Prints the hosts and instances of one cluster.
pub fn write_topology<W: Write>(out: &mut W, topology: &Topology) -> io::Result<()> {
    writeln!(
        out,
        "  ---------- cluster {} topology ----------",
        topology.cluster.id
    )?;

    if !topology.hosts.is_empty() {
        writeln!(out, "  hosts:")?;
        for h in &topology.hosts {
            writeln!(out, "    - {}  (ssh {}@{}:{})", h.ip, h.ssh_user, h.ip, h.ssh_port)?;
        }
    }

    if !topology.instances.is_empty() {
        writeln!(out, "  instances:")?;
        for i in &topology.instances {
            match i.role {
                Role::Master => writeln!(out, "    master: {}", i.addr())?,
                Role::Slave if i.master_addr.is_empty() => {
                    writeln!(out, "    slave:  {}  -> master (unset)", i.addr())?
                }
                Role::Slave => writeln!(out, "    slave:  {}  -> master {}", i.addr(), i.master_addr)?,
            }
        }
    }

    if topology.is_empty() {
        writeln!(out, "  (no hosts or instances)")?;
    }
    writeln!(out, "  ------------------------------------------")
}

pub fn write_show_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "  usage: {}", USAGE_CLUSTER_SHOW)
}

/// Full command reference.
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    let rows = [
        (USAGE_CLUSTER_ADD, "add a cluster, then list clusters"),
        ("cluster list", "list all clusters"),
        (USAGE_CLUSTER_SHOW, "show a cluster's hosts and instances"),
        (USAGE_HOST_ADD, "add a host, then show the topology"),
        ("cluster <cluster_id> host list", "show the topology"),
        (USAGE_INSTANCE_ADD, "add an instance, then show the topology"),
        ("cluster <cluster_id> instance list", "show the topology"),
        ("help", "show this help"),
        ("exit | quit", "leave the session"),
    ];

    writeln!(out)?;
    writeln!(out, "  commands (clusters, hosts, instances):")?;
    for (usage, what) in rows {
        writeln!(out, "    {}", usage)?;
        writeln!(out, "        {}", what)?;
    }
    writeln!(out)
}
