//! Command grammar
//!
//! ```text
//! line       := "exit" | "quit" | "help" | "cluster" subcommand
//! subcommand := "add" flags
//!             | "list"
//!             | "show" cluster_id
//!             | cluster_id "host" ("add" flags | "list")
//!             | cluster_id "instance" ("add" flags | "list")
//! flags      := ("--key=value" | "-key=value")*
//! ```
//!
//! The second token decides between the reserved words `add`, `list` and
//! `show` and a cluster id. Anything else in that position is a cluster id,
//! so a cluster literally named `add` cannot be addressed.
//!
//! Parsing never fails: incomplete or unknown shapes get their own
//! [`CommandCode`] so the dispatcher can print the matching usage.

use std::collections::BTreeMap;
use std::fmt;

use super::tokenize::split_quoted;

/// Flag bag collected from `--key=value` tokens
pub type Flags = BTreeMap<String, String>;

/// Shape of a parsed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// Blank line
    Empty,
    Exit,
    Help,
    /// `cluster` with nothing after it
    ClusterHelp,
    /// First token is not a known verb
    Unknown,
    ClusterAdd,
    ClusterList,
    ClusterShow,
    /// `cluster show` without an id
    ClusterShowNeedId,
    /// `cluster <id>` with nothing after it
    ClusterSubNeedCmd,
    HostAdd,
    HostList,
    /// `cluster <id> host` without `add`/`list`
    HostNeedAddList,
    InstanceAdd,
    InstanceList,
    /// `cluster <id> instance` without `add`/`list`
    InstanceNeedAddList,
    /// `cluster <id> <something else>`
    UnknownSub,
}

impl CommandCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandCode::Empty => "",
            CommandCode::Exit => "exit",
            CommandCode::Help => "help",
            CommandCode::ClusterHelp => "cluster_help",
            CommandCode::Unknown => "unknown",
            CommandCode::ClusterAdd => "cluster_add",
            CommandCode::ClusterList => "cluster_list",
            CommandCode::ClusterShow => "cluster_show",
            CommandCode::ClusterShowNeedId => "cluster_show_need_id",
            CommandCode::ClusterSubNeedCmd => "cluster_sub_need_cmd",
            CommandCode::HostAdd => "host_add",
            CommandCode::HostList => "host_list",
            CommandCode::HostNeedAddList => "host_need_add_list",
            CommandCode::InstanceAdd => "instance_add",
            CommandCode::InstanceList => "instance_list",
            CommandCode::InstanceNeedAddList => "instance_need_add_list",
            CommandCode::UnknownSub => "unknown_sub",
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of parsing one line: command shape, addressed cluster, flags.
///
/// `cluster_id` is empty for commands that do not address a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub code: CommandCode,
    pub cluster_id: String,
    pub flags: Flags,
}

impl ParsedLine {
    fn bare(code: CommandCode) -> Self {
        Self::for_cluster(code, String::new())
    }

    fn for_cluster(code: CommandCode, cluster_id: String) -> Self {
        Self {
            code,
            cluster_id,
            flags: Flags::new(),
        }
    }

    fn with_flags(mut self, tokens: &[String]) -> Self {
        self.flags = parse_flags(tokens);
        self
    }

    /// Flag value, treating an empty value as absent.
    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Parses one line of operator input.
pub fn parse_line(line: &str) -> ParsedLine {
    let tokens = split_quoted(line.trim());
    let Some(first) = tokens.first() else {
        return ParsedLine::bare(CommandCode::Empty);
    };

    match first.to_ascii_lowercase().as_str() {
        "exit" | "quit" => return ParsedLine::bare(CommandCode::Exit),
        "help" => return ParsedLine::bare(CommandCode::Help),
        "cluster" => {}
        _ => return ParsedLine::bare(CommandCode::Unknown),
    }

    let Some(second) = tokens.get(1) else {
        return ParsedLine::bare(CommandCode::ClusterHelp);
    };

    match second.to_ascii_lowercase().as_str() {
        "add" => ParsedLine::bare(CommandCode::ClusterAdd).with_flags(&tokens[2..]),
        "list" => ParsedLine::bare(CommandCode::ClusterList),
        "show" => match tokens.get(2) {
            Some(id) => ParsedLine::for_cluster(CommandCode::ClusterShow, id.clone()),
            None => ParsedLine::bare(CommandCode::ClusterShowNeedId),
        },
        _ => parse_cluster_scoped(second.clone(), &tokens[2..]),
    }
}

/// Joins command-line arguments with single spaces and parses them as one
/// line.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> ParsedLine {
    let line = args
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    parse_line(&line)
}

/// `cluster <id> ...`; `rest` starts after the cluster id.
fn parse_cluster_scoped(cluster_id: String, rest: &[String]) -> ParsedLine {
    let Some(scope) = rest.first() else {
        return ParsedLine::for_cluster(CommandCode::ClusterSubNeedCmd, cluster_id);
    };

    let (add, list, need) = match scope.to_ascii_lowercase().as_str() {
        "host" => (
            CommandCode::HostAdd,
            CommandCode::HostList,
            CommandCode::HostNeedAddList,
        ),
        "instance" => (
            CommandCode::InstanceAdd,
            CommandCode::InstanceList,
            CommandCode::InstanceNeedAddList,
        ),
        _ => return ParsedLine::for_cluster(CommandCode::UnknownSub, cluster_id),
    };

    match rest.get(1).map(|verb| verb.to_ascii_lowercase()).as_deref() {
        Some("add") => ParsedLine::for_cluster(add, cluster_id).with_flags(&rest[2..]),
        Some("list") => ParsedLine::for_cluster(list, cluster_id),
        _ => ParsedLine::for_cluster(need, cluster_id),
    }
}

/// Collects `--key=value` and `-key=value` tokens; everything else is
/// dropped. A repeated key keeps the last value.
fn parse_flags(tokens: &[String]) -> Flags {
    let mut flags = Flags::new();
    for token in tokens {
        let body = if let Some(body) = token.strip_prefix("--") {
            body
        } else if let Some(body) = token.strip_prefix('-') {
            if body.is_empty() {
                continue;
            }
            body
        } else {
            continue;
        };
        if let Some((key, value)) = body.split_once('=') {
            flags.insert(key.to_string(), value.to_string());
        }
    }
    flags
}
