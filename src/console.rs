//! The interactive console: owned state plus the read–dispatch–print
//! loop. One invocation is fully resolved, executed and reported before
//! the next line is read; handlers receive `&mut Console`, so the
//! configuration store has a single writer by construction.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::commands::builtin;
use crate::dispatch;
use crate::domain::models::ConfigFile;
use crate::registry::CommandRegistry;
use crate::services::config::ConfigStore;
use crate::services::plugins;
use crate::services::vars::VarStore;

const PROMPT: &str = "husk > ";

pub struct Console {
    pub registry: CommandRegistry,
    pub conf: ConfigStore,
    pub env: VarStore,
    pub aliases: VarStore,
}

impl Console {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = CommandRegistry::default();
        builtin::install(&mut registry)?;
        Ok(Console {
            registry,
            conf: ConfigStore::with_builtins(),
            env: VarStore::env(),
            aliases: VarStore::aliases(),
        })
    }

    /// Register every plugin bundle under `dir`; returns warning lines
    /// for skipped entries.
    pub fn load_plugins(&mut self, dir: &Path) -> anyhow::Result<Vec<String>> {
        plugins::load_dir(dir, &mut self.registry, &mut self.conf)
    }

    /// Apply a startup configuration file through the normal validators;
    /// returns one warning line per rejected setting.
    pub fn apply_config(&mut self, config: &ConfigFile) -> Vec<String> {
        let warnings = self.conf.restore(&config.settings);
        for (name, value) in &config.aliases {
            self.aliases.set(name, value);
        }
        warnings
    }

    /// Dispatch one line and print its output.
    pub fn eval(&mut self, line: &str) -> dispatch::Dispatch {
        let outcome = dispatch::dispatch(self, line);
        for printed in &outcome.lines {
            println!("{printed}");
        }
        outcome
    }

    /// The interactive loop: prompt, read, dispatch, report, repeat.
    /// Ends on `exit` (or a sourced script reaching it) or end of input.
    pub fn run_loop(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut line = String::new();

        loop {
            print!("{PROMPT}");
            io::stdout().flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                println!();
                return Ok(());
            }
            if self.eval(&line).stop {
                return Ok(());
            }
        }
    }
}
