//! Status envelope and table rendering.
//!
//! Every line printed by the console goes through one of these builders.
//! The four prefixes and their punctuation are a wire-level contract for
//! tooling that parses console output; tests pin them byte-for-byte.
//! Builders are pure; printing belongs to the console loop.

use crate::error::ConsoleError;

pub fn info(summary: &str) -> String {
    format!("[*] {summary}")
}

fn diagnostic(err: &ConsoleError) -> String {
    format!("[-] {err}")
}

fn fatal(err: &ConsoleError) -> String {
    format!("[!] {} Error: {}", err.kind_label(), err)
}

/// Render a failed invocation with the prefix its family demands.
pub fn status(err: &ConsoleError) -> String {
    if err.is_fatal() {
        fatal(err)
    } else {
        diagnostic(err)
    }
}

pub fn trace_running(argv: &[String]) -> String {
    format!("[#] {}: Running...", cmd_repr(argv))
}

pub fn trace_returned(argv: &[String], code: i32) -> String {
    format!("[#] {}: Returned {code}", cmd_repr(argv))
}

/// `CMD('set' 'VERBOSITY' 'TRUE')` — the replay-friendly argv rendering
/// used on trace lines.
fn cmd_repr(argv: &[String]) -> String {
    let args: Vec<String> = argv.iter().map(|a| format!("'{a}'")).collect();
    format!("CMD({})", args.join(" "))
}

/// Two-column report under a `=`-underlined title.
///
/// Each column is as wide as the longer of its header and its widest
/// cell, and the dash separator spans exactly that width. The block is
/// framed by blank lines and rows are indented one four-space stop.
pub fn table(title: &str, headers: (&str, &str), rows: &[(String, String)]) -> Vec<String> {
    let left = headers
        .0
        .len()
        .max(rows.iter().map(|r| r.0.len()).max().unwrap_or(0));
    let right = headers
        .1
        .len()
        .max(rows.iter().map(|r| r.1.len()).max().unwrap_or(0));

    let mut out = Vec::with_capacity(rows.len() + 6);
    out.push(String::new());
    out.push(title.to_string());
    out.push("=".repeat(title.len()));
    out.push(String::new());
    out.push(format!("    {:<left$}  {}", headers.0, headers.1));
    out.push(format!("    {}  {}", "-".repeat(left), "-".repeat(right)));
    for (variable, value) in rows {
        out.push(format!("    {variable:<left$}  {value}"));
    }
    out.push(String::new());
    out
}
