use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::console::Console;
use crate::error::ConsoleError;

/// A worked example attached to a command: the invocation as typed at the
/// prompt, and a one-line description of its effect.
#[derive(Debug, Clone)]
pub struct Example {
    pub invocation: String,
    pub effect: String,
}

/// Inclusive bounds on the number of arguments after the command token.
#[derive(Debug, Clone, Copy)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub fn exactly(n: usize) -> Self {
        Arity {
            min: n,
            max: Some(n),
        }
    }

    pub fn at_least(n: usize) -> Self {
        Arity { min: n, max: None }
    }

    pub fn range(min: usize, max: usize) -> Self {
        Arity {
            min,
            max: Some(max),
        }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map(|m| n <= m).unwrap_or(true)
    }
}

pub type BuiltinFn = fn(&mut Console, &[String]) -> Result<Execution, ConsoleError>;

/// The invokable capability behind a command: either a built-in function
/// or a program invocation declared by a plugin manifest.
#[derive(Debug, Clone)]
pub enum Handler {
    Builtin(BuiltinFn),
    External(ExternalCommand),
}

/// Program invocation declared by a plugin manifest. The program path is
/// resolved against the plugin directory at load time; user arguments are
/// appended after the declared ones.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

/// Output of one handler invocation: pre-rendered output lines plus the
/// exit code surfaced on `[#] ... Returned <code>` trace lines. `stop`
/// ends the console loop after this invocation is reported.
#[derive(Debug, Default)]
pub struct Execution {
    pub code: i32,
    pub out: Vec<String>,
    pub stop: bool,
}

impl Execution {
    pub fn silent() -> Self {
        Execution::default()
    }

    pub fn lines(out: Vec<String>) -> Self {
        Execution {
            code: 0,
            out,
            stop: false,
        }
    }
}

/// Static metadata describing a command, independent of its handler.
/// Registered once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub category: String,
    pub summary: String,
    pub synopsis: String,
    pub description: String,
    pub examples: Vec<Example>,
    pub arity: Arity,
    pub handler: Handler,
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("duplicate command name: {0}")]
    DuplicateCommand(String),
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        if self.commands.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateCommand(descriptor.name));
        }
        self.commands.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Exact-match, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Every descriptor, categories sorted lexically, commands within a
    /// category sorted lexically. This is the index rendering order.
    pub fn all(&self) -> Vec<&CommandDescriptor> {
        let mut out: Vec<&CommandDescriptor> = self.commands.values().collect();
        out.sort_by(|a, b| a.category.cmp(&b.category).then(a.name.cmp(&b.name)));
        out
    }
}
