//! Interactive and one-shot sessions
//!
//! Both modes feed lines through the same parser and dispatcher.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::command::parse_args;
use crate::dispatch::{Dispatcher, Flow};
use crate::topology::TopologyStore;

use super::config::Config;
use super::errors::CliResult;

const BANNER: &str = "gmha - cluster topology register for database HA clusters";

/// Prompt, read one line, dispatch, repeat until `exit`, `quit` or end of
/// input. Data errors are printed by the dispatcher and never end the loop.
/// Lines are read as bytes; invalid UTF-8 is replaced, not rejected.
pub fn run_interactive<R, W>(
    store: &TopologyStore,
    config: &Config,
    mut input: R,
    output: W,
) -> CliResult<()>
where
    R: BufRead,
    W: Write,
{
    let mut dispatcher = Dispatcher::new(store, config.command_defaults(), output);
    {
        let out = dispatcher.output_mut();
        writeln!(out, "{}", BANNER)?;
        writeln!(out, "type help for commands, exit to quit")?;
        writeln!(out)?;
    }
    info!(store = %store.path().display(), "interactive session started");

    let mut buf = Vec::new();
    loop {
        {
            let out = dispatcher.output_mut();
            write!(out, "{}", config.prompt)?;
            out.flush()?;
        }

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            // end of input
            writeln!(dispatcher.output_mut())?;
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if dispatcher.execute_line(&line)? == Flow::Exit {
            writeln!(dispatcher.output_mut(), "  bye")?;
            break;
        }
    }

    dispatcher.output_mut().flush()?;
    info!("interactive session ended");
    Ok(())
}

/// Joins `args` into one line and executes it.
pub fn run_one_shot<W: Write>(
    store: &TopologyStore,
    config: &Config,
    args: &[String],
    output: W,
) -> CliResult<()> {
    let parsed = parse_args(args);
    debug!(code = %parsed.code, "one-shot command");

    let mut dispatcher = Dispatcher::new(store, config.command_defaults(), output);
    dispatcher.execute(parsed)?;
    dispatcher.output_mut().flush()?;
    Ok(())
}
