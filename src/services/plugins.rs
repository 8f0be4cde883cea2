//! Plugin discovery and external command execution.
//!
//! A plugin is a directory holding a `plugin.json` manifest (see
//! `docs/contracts/plugin.schema.json`). Manifests are loaded once at
//! startup: each declared command becomes a registry descriptor whose
//! handler runs the manifest's program, and declared settings join the
//! configuration store. A bundle that fails to parse or collides with an
//! existing name is skipped with a warning line; startup continues.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::models::{ManifestCommand, PluginManifest};
use crate::error::ConsoleError;
use crate::registry::{
    Arity, CommandDescriptor, CommandRegistry, Example, Execution, ExternalCommand, Handler,
};
use crate::services::config::{ConfigStore, Validator};

/// Manifest file name inside each plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Load every plugin bundle under `dir`, in directory-name order.
/// Returns the warning lines to print for skipped bundles or entries.
pub fn load_dir(
    dir: &Path,
    registry: &mut CommandRegistry,
    conf: &mut ConfigStore,
) -> anyhow::Result<Vec<String>> {
    let mut warnings = Vec::new();
    if !dir.is_dir() {
        return Ok(warnings);
    }

    let mut bundles: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.join(MANIFEST_FILE).is_file())
        .collect();
    bundles.sort();

    for bundle in bundles {
        match load_manifest(&bundle) {
            Ok(manifest) => install(&bundle, manifest, registry, conf, &mut warnings),
            Err(err) => warnings.push(format!(
                "[-] Skipping plugin « {} »: {err}",
                bundle.display()
            )),
        }
    }
    Ok(warnings)
}

fn load_manifest(bundle: &Path) -> anyhow::Result<PluginManifest> {
    let raw = std::fs::read_to_string(bundle.join(MANIFEST_FILE))?;
    Ok(serde_json::from_str(&raw)?)
}

fn install(
    bundle: &Path,
    manifest: PluginManifest,
    registry: &mut CommandRegistry,
    conf: &mut ConfigStore,
    warnings: &mut Vec<String>,
) {
    for command in manifest.commands {
        let descriptor = descriptor_from(bundle, command);
        if let Err(err) = registry.register(descriptor) {
            warnings.push(format!(
                "[-] Skipping command from plugin '{}': {err}",
                manifest.name
            ));
        }
    }
    for setting in manifest.settings {
        if !conf.declare(
            &setting.name,
            &setting.default,
            &setting.description,
            Validator::Any,
        ) {
            warnings.push(format!(
                "[-] Skipping setting '{}' from plugin '{}': illegal or duplicate name",
                setting.name, manifest.name
            ));
        }
    }
}

fn descriptor_from(bundle: &Path, command: ManifestCommand) -> CommandDescriptor {
    let program = PathBuf::from(&command.run.program);
    let program = if program.is_absolute() {
        program
    } else {
        bundle.join(program)
    };

    CommandDescriptor {
        name: command.name,
        category: command.category,
        summary: command.summary,
        synopsis: command.synopsis,
        description: command.description,
        examples: command
            .examples
            .into_iter()
            .map(|e| Example {
                invocation: e.invocation,
                effect: e.effect,
            })
            .collect(),
        arity: Arity::at_least(0),
        handler: Handler::External(ExternalCommand {
            program,
            args: command.run.args,
            workdir: bundle.to_path_buf(),
        }),
    }
}

/// Run a plugin command's program with the user's arguments appended.
/// Output is relayed line by line; the exit code becomes the invocation
/// code surfaced on trace lines.
pub fn run(ext: &ExternalCommand, args: &[String]) -> Result<Execution, ConsoleError> {
    let output = Command::new(&ext.program)
        .args(&ext.args)
        .args(args)
        .current_dir(&ext.workdir)
        .output();

    let output = match output {
        Ok(o) => o,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConsoleError::FileNotFound(ext.program.clone()))
        }
        Err(err) if err.kind() == io::ErrorKind::Interrupted => {
            return Err(ConsoleError::Interrupted("execution interrupted".to_string()))
        }
        Err(err) => return Err(ConsoleError::Runtime(err.to_string())),
    };

    // no exit code means the child died on a signal
    let code = match output.status.code() {
        Some(code) => code,
        None => {
            return Err(ConsoleError::Interrupted(
                "execution interrupted".to_string(),
            ))
        }
    };

    let mut out: Vec<String> = Vec::new();
    out.extend(relay_lines(&output.stdout));
    out.extend(relay_lines(&output.stderr));
    Ok(Execution {
        code,
        out,
        stop: false,
    })
}

fn relay_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
