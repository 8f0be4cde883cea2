//! Built-in command set.
//!
//! Descriptors carry the manual content rendered by `help`; handlers
//! stay thin and delegate to `services/*`. Everything here is registered
//! once at startup, before any plugin.

use std::path::PathBuf;

use crate::console::Console;
use crate::dispatch;
use crate::domain::models::SessionFile;
use crate::error::ConsoleError;
use crate::registry::{
    Arity, CommandDescriptor, CommandRegistry, Example, Execution, ExternalCommand, Handler,
    RegistryError,
};
use crate::services::{help, plugins, report, storage};

const CATEGORY: &str = "Core";

pub fn install(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    for descriptor in descriptors() {
        registry.register(descriptor)?;
    }
    Ok(())
}

fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        help_command(),
        set_command(),
        env_command(),
        alias_command(),
        session_command(),
        source_command(),
        lrun_command(),
        exit_command(),
    ]
}

fn example(invocation: &str, effect: &str) -> Example {
    Example {
        invocation: invocation.to_string(),
        effect: effect.to_string(),
    }
}

//////////////////
// COMMAND: help

fn help_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "help".to_string(),
        category: CATEGORY.to_string(),
        summary: "Show commands help".to_string(),
        synopsis: "help [<COMMAND>]".to_string(),
        description: "\
Display help for any command, including plugins.

Without arguments, every available command is listed with a summary
line, sorted by category, followed by its manual block. For the
detailed manual of a single command, give its name as argument."
            .to_string(),
        examples: vec![
            example("help", "Display the full command index"),
            example("help set", "Display the manual of the `set` command"),
        ],
        arity: Arity::range(0, 1),
        handler: Handler::Builtin(run_help),
    }
}

fn run_help(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    match args.first() {
        None => Ok(Execution::lines(help::index(&console.registry))),
        Some(name) => match console.registry.lookup(name) {
            Some(descriptor) => Ok(Execution::lines(help::detail(descriptor))),
            // name resolution is the registry's, so this is the same
            // error an execution attempt would produce
            None => Err(ConsoleError::UnknownCommand(name.clone())),
        },
    }
}

/////////////////
// COMMAND: set

fn set_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "set".to_string(),
        category: CATEGORY.to_string(),
        summary: "View and edit configuration settings".to_string(),
        synopsis: "set [<VAR> [<VALUE>]]".to_string(),
        description: "\
Settings are editable variables shaping the console's behavior.
Values are bound to the current session; to change one permanently,
declare it in the startup configuration file.

> set
  - Display every setting with its current value

> set <STRING>
  - Display settings whose name starts with STRING

> set <VAR> <VALUE>
  - Assign VALUE to VAR (only if it passes VAR's validator)

> set <VAR> %%DEFAULT%%
  - Restore VAR to its default value"
            .to_string(),
        examples: vec![
            example("set VERBOSITY TRUE", "Trace every command dispatch"),
            example(
                "set TARGET http://victim.example/page.php",
                "Point the session at a backdoored page",
            ),
        ],
        arity: Arity::at_least(0),
        handler: Handler::Builtin(run_set),
    }
}

fn run_set(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    match args.len() {
        0 => Ok(settings_table(console, None)),
        1 => Ok(settings_table(console, Some(args[0].as_str()))),
        _ => {
            let value = args[1..].join(" ");
            console.conf.set(&args[0], &value)?;
            Ok(Execution::silent())
        }
    }
}

fn settings_table(console: &Console, filter: Option<&str>) -> Execution {
    let rows = console.conf.report(filter);
    Execution::lines(report::table(
        "Configuration Settings",
        ("Variable", "Value"),
        &rows,
    ))
}

/////////////////
// COMMAND: env

fn env_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "env".to_string(),
        category: CATEGORY.to_string(),
        summary: "Environment variables handler".to_string(),
        synopsis: "env [<NAME> [<VALUE>|None]]".to_string(),
        description: "\
Environment variables hold per-session state shared between commands,
such as the remote working directory once a tunnel is open.

> env
  - Display all current environment variables

> env <STRING>
  - Display variables whose name starts with STRING

> env <NAME> <VALUE>
  - Set NAME to VALUE

> env <NAME> None
  - Remove the NAME variable"
            .to_string(),
        examples: vec![example("env PWD /var/www", "Set the remote working directory")],
        arity: Arity::at_least(0),
        handler: Handler::Builtin(run_env),
    }
}

fn run_env(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    match args.len() {
        0 => Ok(var_table(console, false, None)),
        1 => Ok(var_table(console, false, Some(args[0].as_str()))),
        _ => {
            console.env.set(&args[0], &args[1..].join(" "));
            Ok(Execution::silent())
        }
    }
}

///////////////////
// COMMAND: alias

fn alias_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "alias".to_string(),
        category: CATEGORY.to_string(),
        summary: "Define command aliases".to_string(),
        synopsis: "alias [<NAME> [<VALUE>|None]]".to_string(),
        description: "\
Once defined, an alias can be used as if it were a standard command;
its value is substituted for the first token of the line and the
remaining arguments are appended.

> alias
  - Display all current command aliases

> alias <NAME> <VALUE>
  - Set NAME as an alias for VALUE

> alias <NAME> None
  - Remove the NAME alias"
            .to_string(),
        examples: vec![example("alias ll lrun ls -la", "Shorten a local listing")],
        arity: Arity::at_least(0),
        handler: Handler::Builtin(run_alias),
    }
}

fn run_alias(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    match args.len() {
        0 => Ok(var_table(console, true, None)),
        1 => Ok(var_table(console, true, Some(args[0].as_str()))),
        _ => {
            console.aliases.set(&args[0], &args[1..].join(" "));
            Ok(Execution::silent())
        }
    }
}

fn var_table(console: &Console, aliases: bool, filter: Option<&str>) -> Execution {
    let store = if aliases {
        &console.aliases
    } else {
        &console.env
    };
    let rows = store.report(filter);
    Execution::lines(report::table(store.title(), store.headers(), &rows))
}

/////////////////////
// COMMAND: session

fn session_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "session".to_string(),
        category: CATEGORY.to_string(),
        summary: "Save and restore console sessions".to_string(),
        synopsis: "session [save|load] [<FILE>]".to_string(),
        description: "\
A session bundles the current configuration settings, environment
variables and command aliases so work on a target can be resumed.

> session
  - Show the current session content

> session save [<FILE>]
  - Save the session; FILE defaults to $SAVEPATH/husk.session

> session load <FILE>
  - Replace the current session with FILE's content"
            .to_string(),
        examples: vec![
            example("session save /tmp/victim.session", "Snapshot the session to a file"),
            example("session load /tmp/victim.session", "Resume from the snapshot"),
        ],
        arity: Arity::range(0, 2),
        handler: Handler::Builtin(run_session),
    }
}

fn run_session(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    match args.first().map(String::as_str) {
        None => Ok(session_overview(console)),
        Some("save") => {
            let path = match args.get(1) {
                Some(raw) => PathBuf::from(raw),
                None => default_session_path(console),
            };
            let snapshot = SessionFile {
                settings: console.conf.snapshot(),
                env: console.env.snapshot(),
                aliases: console.aliases.snapshot(),
            };
            storage::save_session(&path, &snapshot)
                .map_err(|err| ConsoleError::Runtime(err.to_string()))?;
            Ok(Execution::lines(vec![report::info(&format!(
                "Session saved into « {} »",
                path.display()
            ))]))
        }
        Some("load") => {
            let path = args.get(1).map(PathBuf::from).ok_or_else(|| {
                ConsoleError::InvalidArguments("session load requires a file path".to_string())
            })?;
            if !path.is_file() {
                return Err(ConsoleError::FileNotFound(path));
            }
            let session = storage::load_session(&path)
                .map_err(|err| ConsoleError::Runtime(err.to_string()))?;
            let mut out = console.conf.restore(&session.settings);
            console.env.restore(&session.env);
            console.aliases.restore(&session.aliases);
            out.push(report::info(&format!(
                "Session loaded from « {} »",
                path.display()
            )));
            Ok(Execution::lines(out))
        }
        Some(other) => Err(ConsoleError::InvalidArguments(format!(
            "session: unknown action '{other}' (see `help session`)"
        ))),
    }
}

fn default_session_path(console: &Console) -> PathBuf {
    let dir = console.conf.value("SAVEPATH").unwrap_or(".");
    PathBuf::from(dir).join("husk.session")
}

fn session_overview(console: &Console) -> Execution {
    let mut out = report::table(
        "Configuration Settings",
        ("Variable", "Value"),
        &console.conf.report(None),
    );
    if !console.env.is_empty() {
        out.extend(report::table(
            console.env.title(),
            console.env.headers(),
            &console.env.report(None),
        ));
    }
    if !console.aliases.is_empty() {
        out.extend(report::table(
            console.aliases.title(),
            console.aliases.headers(),
            &console.aliases.report(None),
        ));
    }
    Execution::lines(out)
}

////////////////////
// COMMAND: source

fn source_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "source".to_string(),
        category: CATEGORY.to_string(),
        summary: "Execute a console script file".to_string(),
        synopsis: "source [-e] <LOCAL_FILE>".to_string(),
        description: "\
Read LOCAL_FILE and execute the statements contained therein, as if
each line had been typed at the prompt.

With -e, sourcing aborts as soon as a statement fails (returns
nonzero), and the failing statement's code becomes the result."
            .to_string(),
        examples: vec![example(
            "source /tmp/recon.husk",
            "Run the script's content line by line",
        )],
        arity: Arity::range(1, 2),
        handler: Handler::Builtin(run_source),
    }
}

fn run_source(console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    let (abort_on_error, raw_path) = match args {
        [path] => (false, path),
        [flag, path] if flag == "-e" => (true, path),
        _ => {
            return Err(ConsoleError::InvalidArguments(
                "usage: source [-e] <LOCAL_FILE>".to_string(),
            ))
        }
    };

    let path = PathBuf::from(raw_path);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConsoleError::FileNotFound(path))
        }
        Err(err) => return Err(ConsoleError::Runtime(err.to_string())),
    };

    let mut out = Vec::new();
    let mut code = 0;
    let mut stop = false;
    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let nested = dispatch::dispatch(console, line);
        out.extend(nested.lines);
        if nested.code != 0 {
            code = nested.code;
            if abort_on_error {
                stop = nested.stop;
                break;
            }
        }
        if nested.stop {
            stop = true;
            break;
        }
    }
    Ok(Execution { code, out, stop })
}

//////////////////
// COMMAND: lrun

fn lrun_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "lrun".to_string(),
        category: CATEGORY.to_string(),
        summary: "Execute client-side shell command".to_string(),
        synopsis: "lrun <COMMAND> [<ARG> ...]".to_string(),
        description: "\
Execute a shell command on your own operating system, like the `exec`
command in unix shells. Not to be confused with plugin commands,
which run on the remotely exploited system."
            .to_string(),
        examples: vec![example("lrun ls -la /", "List the local root directory")],
        arity: Arity::at_least(1),
        handler: Handler::Builtin(run_lrun),
    }
}

fn run_lrun(_console: &mut Console, args: &[String]) -> Result<Execution, ConsoleError> {
    let ext = ExternalCommand {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), args.join(" ")],
        workdir: PathBuf::from("."),
    };
    plugins::run(&ext, &[])
}

//////////////////
// COMMAND: exit

fn exit_command() -> CommandDescriptor {
    CommandDescriptor {
        name: "exit".to_string(),
        category: CATEGORY.to_string(),
        summary: "Leave the console".to_string(),
        synopsis: "exit".to_string(),
        description: "\
Leave the console. The current session is kept in memory only; use
`session save` first to persist it."
            .to_string(),
        examples: vec![],
        arity: Arity::exactly(0),
        handler: Handler::Builtin(run_exit),
    }
}

fn run_exit(_console: &mut Console, _args: &[String]) -> Result<Execution, ConsoleError> {
    Ok(Execution {
        code: 0,
        out: vec![],
        stop: true,
    })
}
