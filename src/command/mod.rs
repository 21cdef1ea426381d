//! Operator command language
//!
//! - `tokenize`: quote-aware splitting
//! - `parser`: line -> (code, cluster id, flags), never fails
//! - `typed`: (code, cluster id, flags) -> validated [`Command`]

mod parser;
mod tokenize;
mod typed;

pub use parser::{parse_args, parse_line, CommandCode, Flags, ParsedLine};
pub use tokenize::split_quoted;
pub use typed::{
    ClusterAddArgs, Command, HostAddArgs, InstanceAddArgs, UsageTopic, ValidationError,
    USAGE_CLUSTER_ADD, USAGE_CLUSTER_SHOW, USAGE_HOST_ADD, USAGE_INSTANCE_ADD,
};
