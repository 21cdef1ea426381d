//! Command dispatcher
//!
//! Maps validated commands onto [`TopologyStore`] operations and writes the
//! operator-facing result. The dispatcher keeps no state of its own between
//! commands.
//!
//! # Rules
//!
//! 1. Every successful mutation is followed by the affected view (cluster
//!    list after `cluster add`, cluster topology after host/instance adds)
//! 2. Validation, not-found and persistence failures are printed as one
//!    `[error]` line and the session continues
//! 3. Only output I/O failures are returned to the caller

pub mod render;

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::command::{
    parse_line, ClusterAddArgs, Command, CommandCode, HostAddArgs, InstanceAddArgs, ParsedLine,
    UsageTopic,
};
use crate::topology::{
    Cluster, ErrorKind, Host, Instance, TopologyError, TopologyStore, DEFAULT_SSH_PORT,
    DEFAULT_SSH_USER, DEFAULT_WORKER_ADDR,
};

/// What the read loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Values applied when optional flags are omitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefaults {
    pub worker_addr: String,
    pub ssh_user: String,
    pub ssh_port: u16,
}

impl Default for CommandDefaults {
    fn default() -> Self {
        Self {
            worker_addr: DEFAULT_WORKER_ADDR.to_string(),
            ssh_user: DEFAULT_SSH_USER.to_string(),
            ssh_port: DEFAULT_SSH_PORT,
        }
    }
}

/// Executes commands against a store, writing results to `out`.
pub struct Dispatcher<'a, W: Write> {
    store: &'a TopologyStore,
    defaults: CommandDefaults,
    out: W,
}

impl<'a, W: Write> Dispatcher<'a, W> {
    pub fn new(store: &'a TopologyStore, defaults: CommandDefaults, out: W) -> Self {
        Self {
            store,
            defaults,
            out,
        }
    }

    /// Returns the output writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Direct access to the output, for prompts and banners.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Parses and executes one line of input.
    pub fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        self.execute(parse_line(line))
    }

    /// Validates a parsed line and executes it.
    ///
    /// A line that fails validation prints the reason and the command's
    /// usage; the store is not touched. Host and instance adds report an
    /// unknown cluster before any flag error.
    pub fn execute(&mut self, parsed: ParsedLine) -> io::Result<Flow> {
        debug!(code = %parsed.code, cluster_id = %parsed.cluster_id, "dispatching");
        let action = match parsed.code {
            CommandCode::HostAdd => Some("add host"),
            CommandCode::InstanceAdd => Some("add instance"),
            _ => None,
        };
        if let Some(action) = action {
            if !self.require_cluster(action, &parsed.cluster_id)? {
                return Ok(Flow::Continue);
            }
        }
        match Command::try_from(parsed) {
            Ok(command) => self.run(command),
            Err(e) => {
                debug!(error = %e, "command rejected");
                writeln!(self.out, "  [error] {}", e)?;
                writeln!(self.out, "  usage: {}", e.usage())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Executes an already validated command.
    pub fn run(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Noop => {}
            Command::Exit => return Ok(Flow::Exit),
            Command::Help | Command::Usage(UsageTopic::General) => render::write_help(&mut self.out)?,
            Command::Usage(UsageTopic::ClusterShow) => render::write_show_usage(&mut self.out)?,
            Command::Unknown => writeln!(self.out, "  unknown command, type help for usage")?,
            Command::ClusterAdd(args) => self.cluster_add(args)?,
            Command::ClusterList => self.show_cluster_list()?,
            Command::ClusterShow { cluster_id }
            | Command::HostList { cluster_id }
            | Command::InstanceList { cluster_id } => self.show_topology(&cluster_id)?,
            Command::HostAdd { cluster_id, args } => self.host_add(&cluster_id, args)?,
            Command::InstanceAdd { cluster_id, args } => self.instance_add(&cluster_id, args)?,
        }
        Ok(Flow::Continue)
    }

    fn cluster_add(&mut self, args: ClusterAddArgs) -> io::Result<()> {
        let worker_addr = args
            .listen
            .unwrap_or_else(|| self.defaults.worker_addr.clone());
        let cluster = Cluster::new(args.id, worker_addr);

        match self.store.add_cluster(&cluster) {
            Ok(()) => {
                writeln!(self.out, "  [ok] cluster added: {}", cluster.id)?;
                self.show_cluster_list()
            }
            Err(e) => self.report("add cluster", &e),
        }
    }

    fn host_add(&mut self, cluster_id: &str, args: HostAddArgs) -> io::Result<()> {
        let host = Host::new(
            args.ip,
            args.ssh_user
                .unwrap_or_else(|| self.defaults.ssh_user.clone()),
            args.ssh_port.unwrap_or(self.defaults.ssh_port),
        );

        match self.store.add_host(cluster_id, host) {
            Ok(host) => {
                writeln!(
                    self.out,
                    "  [ok] host added: {} to cluster {}",
                    host.ip, cluster_id
                )?;
                self.show_topology(cluster_id)
            }
            Err(e) => self.report("add host", &e),
        }
    }

    fn instance_add(&mut self, cluster_id: &str, args: InstanceAddArgs) -> io::Result<()> {
        let instance = Instance::new(args.host, args.port, args.role)
            .with_master(args.master.unwrap_or_default());

        match self.store.add_instance(cluster_id, instance) {
            Ok(instance) => {
                writeln!(
                    self.out,
                    "  [ok] instance added: {} role {} to cluster {}",
                    instance.id, instance.role, cluster_id
                )?;
                self.show_topology(cluster_id)
            }
            Err(e) => self.report("add instance", &e),
        }
    }

    fn show_cluster_list(&mut self) -> io::Result<()> {
        match self.store.list_clusters() {
            Ok(clusters) => render::write_cluster_list(&mut self.out, &clusters),
            Err(e) => self.report("list clusters", &e),
        }
    }

    fn show_topology(&mut self, cluster_id: &str) -> io::Result<()> {
        match self.store.topology(cluster_id) {
            Ok(topology) => render::write_topology(&mut self.out, &topology),
            Err(e) => self.report("read topology", &e),
        }
    }

    /// Prints the failure and returns false when the cluster is missing or
    /// cannot be read.
    fn require_cluster(&mut self, action: &str, cluster_id: &str) -> io::Result<bool> {
        match self.store.cluster_exists(cluster_id) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.report(action, &TopologyError::ClusterNotFound(cluster_id.to_string()))?;
                Ok(false)
            }
            Err(e) => {
                self.report(action, &e)?;
                Ok(false)
            }
        }
    }

    fn report(&mut self, action: &str, err: &TopologyError) -> io::Result<()> {
        warn!(code = err.code(), error = %err, "{} failed", action);
        match err.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => writeln!(self.out, "  [error] {}", err),
            ErrorKind::Persistence => {
                writeln!(self.out, "  [error] {} failed: {}", action, err)
            }
        }
    }
}
