//! Help rendering from registry descriptors.
//!
//! Two modes: the categorized index (`help`) and a single command's
//! manual page (`help <command>`). Section headers are fixed literal
//! tokens and bodies sit one four-space stop under them; tests treat the
//! layout as a contract.

use crate::registry::{CommandDescriptor, CommandRegistry};

const INDENT: &str = "    ";

/// Index mode: one `[*] name: summary` line per command in registry
/// order, each command's summary block, then the worked examples of
/// every descriptor that declares them.
pub fn index(registry: &CommandRegistry) -> Vec<String> {
    let all = registry.all();
    let mut out = Vec::new();

    for d in &all {
        out.push(headline(d));
    }

    for d in &all {
        out.push(String::new());
        out.extend(block(d, false));
    }

    let examples: Vec<&&CommandDescriptor> =
        all.iter().filter(|d| !d.examples.is_empty()).collect();
    if !examples.is_empty() {
        out.push(String::new());
        out.push("EXAMPLES:".to_string());
        for d in examples {
            out.extend(example_lines(d));
        }
    }

    out
}

/// Detail mode: the command's full block with its own examples.
pub fn detail(descriptor: &CommandDescriptor) -> Vec<String> {
    block(descriptor, true)
}

fn headline(d: &CommandDescriptor) -> String {
    format!("[*] {}: {}", d.name, d.summary)
}

fn block(d: &CommandDescriptor, with_examples: bool) -> Vec<String> {
    let mut out = vec![headline(d)];

    out.push("SYNOPSIS:".to_string());
    out.push(format!("{INDENT}{}", d.synopsis));

    out.push("DESCRIPTION:".to_string());
    for line in d.description.lines() {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{INDENT}{line}"));
        }
    }

    if with_examples && !d.examples.is_empty() {
        out.push("EXAMPLES:".to_string());
        out.extend(example_lines(d));
    }

    out
}

fn example_lines(d: &CommandDescriptor) -> Vec<String> {
    let mut out = Vec::new();
    for e in &d.examples {
        out.push(format!("{INDENT}> {}", e.invocation));
        out.push(format!("{INDENT}  - {}", e.effect));
    }
    out
}
