//! Per-invocation dispatch: resolve → validate → execute → report.
//!
//! Resolution and validation failures short-circuit here and never reach
//! handler code; handler-domain failures are caught at the execution
//! boundary and rendered as fatal status lines, so the console loop
//! survives every outcome. While `VERBOSITY` is TRUE each invocation is
//! framed by `[#]` trace lines; the gate is read live before and after
//! execution, so a command that flips the setting traces only one side.

use crate::console::Console;
use crate::error::ConsoleError;
use crate::registry::Handler;
use crate::services::{plugins, report, storage};

/// Outcome of dispatching one console line: everything to print, the
/// code surfaced on trace lines, and whether the loop should stop.
#[derive(Debug, Default)]
pub struct Dispatch {
    pub code: i32,
    pub lines: Vec<String>,
    pub stop: bool,
}

impl Dispatch {
    fn failed(err: &ConsoleError) -> Self {
        Dispatch {
            code: 1,
            lines: vec![report::status(err)],
            stop: false,
        }
    }
}

/// Resolve, validate, execute, and wrap one input line. Empty lines are
/// a silent no-op.
pub fn dispatch(console: &mut Console, line: &str) -> Dispatch {
    let mut argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() {
        return Dispatch::default();
    }

    // one level of alias expansion on the command token
    if let Some(expansion) = console.aliases.get(&argv[0]) {
        let mut expanded: Vec<String> =
            expansion.split_whitespace().map(str::to_string).collect();
        expanded.extend(argv.drain(1..));
        argv = expanded;
        if argv.is_empty() {
            return Dispatch::default();
        }
    }

    let (handler, arity) = match console.registry.lookup(&argv[0]) {
        Some(descriptor) => (descriptor.handler.clone(), descriptor.arity),
        None => return Dispatch::failed(&ConsoleError::UnknownCommand(argv[0].clone())),
    };

    let args = &argv[1..];
    if !arity.accepts(args.len()) {
        return Dispatch::failed(&ConsoleError::InvalidArguments(format!(
            "{}: wrong number of arguments (see `help {}`)",
            argv[0], argv[0]
        )));
    }

    let mut lines = Vec::new();
    if console.conf.is_true("VERBOSITY") {
        lines.push(report::trace_running(&argv));
    }

    let result = match handler {
        Handler::Builtin(run) => run(console, args),
        Handler::External(ext) => plugins::run(&ext, args),
    };

    let (code, stop) = match result {
        Ok(execution) => {
            lines.extend(execution.out);
            (execution.code, execution.stop)
        }
        Err(err) => {
            lines.push(report::status(&err));
            (1, false)
        }
    };

    if console.conf.is_true("VERBOSITY") {
        lines.push(report::trace_returned(&argv, code));
    }

    storage::audit(&argv[0], code);
    Dispatch { code, lines, stop }
}
