//! Typed commands
//!
//! A [`ParsedLine`] still carries a free-form flag bag. Converting it into a
//! [`Command`] validates required flags and numeric values once, so the
//! dispatcher only ever sees well-formed arguments.

use thiserror::Error;

use crate::topology::Role;

use super::parser::{CommandCode, ParsedLine};

pub const USAGE_CLUSTER_ADD: &str = "cluster add --id=<cluster_id> [--listen=127.0.0.1:9001]";
pub const USAGE_CLUSTER_SHOW: &str = "cluster show <cluster_id>";
pub const USAGE_HOST_ADD: &str =
    "cluster <cluster_id> host add --ip=<ip> [--ssh-user=root] [--ssh-port=22]";
pub const USAGE_INSTANCE_ADD: &str = "cluster <cluster_id> instance add --host=<ip> --port=<3306> [--role=master|slave] [--master=<ip:port>]";

/// Arguments of `cluster add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAddArgs {
    pub id: String,
    /// Worker listen address; the configured default applies when absent
    pub listen: Option<String>,
}

/// Arguments of `cluster <id> host add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddArgs {
    pub ip: String,
    pub ssh_user: Option<String>,
    pub ssh_port: Option<u16>,
}

/// Arguments of `cluster <id> instance add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceAddArgs {
    pub host: String,
    pub port: u16,
    pub role: Role,
    pub master: Option<String>,
}

/// Which help text an incomplete line should get
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageTopic {
    /// Full command reference
    General,
    /// `cluster show` without an id
    ClusterShow,
}

/// A validated operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line, does nothing
    Noop,
    Exit,
    Help,
    /// First token was not a known verb
    Unknown,
    Usage(UsageTopic),
    ClusterAdd(ClusterAddArgs),
    ClusterList,
    ClusterShow { cluster_id: String },
    HostAdd { cluster_id: String, args: HostAddArgs },
    HostList { cluster_id: String },
    InstanceAdd { cluster_id: String, args: InstanceAddArgs },
    InstanceList { cluster_id: String },
}

/// Operator input that fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required flag --{flag}")]
    MissingFlag {
        flag: &'static str,
        usage: &'static str,
    },

    #[error("{flag} must be an integer between 1 and 65535, got '{value}'")]
    InvalidPort {
        flag: &'static str,
        value: String,
        usage: &'static str,
    },

    #[error("role must be master or slave, got '{value}'")]
    InvalidRole { value: String, usage: &'static str },
}

impl ValidationError {
    /// Usage line of the command that failed
    pub fn usage(&self) -> &'static str {
        match self {
            ValidationError::MissingFlag { usage, .. }
            | ValidationError::InvalidPort { usage, .. }
            | ValidationError::InvalidRole { usage, .. } => usage,
        }
    }
}

impl TryFrom<ParsedLine> for Command {
    type Error = ValidationError;

    fn try_from(parsed: ParsedLine) -> Result<Self, Self::Error> {
        let command = match parsed.code {
            CommandCode::Empty => Command::Noop,
            CommandCode::Exit => Command::Exit,
            CommandCode::Help => Command::Help,
            CommandCode::Unknown => Command::Unknown,
            CommandCode::ClusterHelp
            | CommandCode::ClusterSubNeedCmd
            | CommandCode::HostNeedAddList
            | CommandCode::InstanceNeedAddList
            | CommandCode::UnknownSub => Command::Usage(UsageTopic::General),
            CommandCode::ClusterShowNeedId => Command::Usage(UsageTopic::ClusterShow),
            CommandCode::ClusterList => Command::ClusterList,
            CommandCode::ClusterShow => Command::ClusterShow {
                cluster_id: parsed.cluster_id,
            },
            CommandCode::HostList => Command::HostList {
                cluster_id: parsed.cluster_id,
            },
            CommandCode::InstanceList => Command::InstanceList {
                cluster_id: parsed.cluster_id,
            },
            CommandCode::ClusterAdd => Command::ClusterAdd(ClusterAddArgs {
                id: required(&parsed, "id", USAGE_CLUSTER_ADD)?,
                listen: optional(&parsed, "listen"),
            }),
            CommandCode::HostAdd => {
                let args = HostAddArgs {
                    ip: required(&parsed, "ip", USAGE_HOST_ADD)?,
                    ssh_user: optional(&parsed, "ssh-user"),
                    ssh_port: optional(&parsed, "ssh-port")
                        .map(|value| parse_port("ssh-port", value, USAGE_HOST_ADD))
                        .transpose()?,
                };
                Command::HostAdd {
                    cluster_id: parsed.cluster_id,
                    args,
                }
            }
            CommandCode::InstanceAdd => {
                let host = required(&parsed, "host", USAGE_INSTANCE_ADD)?;
                let port = required(&parsed, "port", USAGE_INSTANCE_ADD)?;
                let args = InstanceAddArgs {
                    host,
                    port: parse_port("port", port, USAGE_INSTANCE_ADD)?,
                    role: match optional(&parsed, "role") {
                        Some(value) => value.parse::<Role>().map_err(|_| ValidationError::InvalidRole {
                            value,
                            usage: USAGE_INSTANCE_ADD,
                        })?,
                        None => Role::default(),
                    },
                    master: optional(&parsed, "master"),
                };
                Command::InstanceAdd {
                    cluster_id: parsed.cluster_id,
                    args,
                }
            }
        };
        Ok(command)
    }
}

fn required(
    parsed: &ParsedLine,
    flag: &'static str,
    usage: &'static str,
) -> Result<String, ValidationError> {
    parsed
        .flag(flag)
        .map(str::to_string)
        .ok_or(ValidationError::MissingFlag { flag, usage })
}

fn optional(parsed: &ParsedLine, flag: &str) -> Option<String> {
    parsed.flag(flag).map(str::to_string)
}

fn parse_port(
    flag: &'static str,
    value: String,
    usage: &'static str,
) -> Result<u16, ValidationError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ValidationError::InvalidPort { flag, value, usage }),
    }
}
