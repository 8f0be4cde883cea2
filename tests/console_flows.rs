//! End-to-end console flows driven through `--eval`: configuration
//! edits, help rendering, aliases, scripts, plugins, and session
//! persistence.

mod common;

use common::TestEnv;
use predicates::str::contains;
use std::fs;

#[test]
fn set_commits_validated_values() {
    let env = TestEnv::new();
    let out = env.run_lines(&["set REQ_DEFAULT_METHOD post", "set REQ_DEFAULT"]);
    assert!(out.contains("    REQ_DEFAULT_METHOD  POST"), "{out}");
}

#[test]
fn rejected_set_reports_and_keeps_the_store() {
    let env = TestEnv::new();
    let out = env.run_lines(&["set VERBOSITY nonsense", "set VERBOSITY"]);
    assert!(
        out.contains("[!] Invalid Value Error: VERBOSITY: expected TRUE or FALSE"),
        "{out}"
    );
    assert!(out.contains("    VERBOSITY  FALSE"), "{out}");
}

#[test]
fn default_magic_restores_the_default() {
    let env = TestEnv::new();
    let out = env.run_lines(&[
        "set REQ_MAX_HEADERS 300",
        "set REQ_MAX_HEADERS %%DEFAULT%%",
        "set REQ_MAX_HEADERS",
    ]);
    assert!(out.contains("    REQ_MAX_HEADERS  100"), "{out}");
}

#[test]
fn help_index_begins_with_sorted_summaries() {
    let env = TestEnv::new();
    let out = env.run_lines_with_plugins(&["help"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[..10],
        [
            "[*] alias: Define command aliases",
            "[*] env: Environment variables handler",
            "[*] exit: Leave the console",
            "[*] help: Show commands help",
            "[*] lrun: Execute client-side shell command",
            "[*] session: Save and restore console sessions",
            "[*] set: View and edit configuration settings",
            "[*] source: Execute a console script file",
            "[*] ghost: Command whose program is missing",
            "[*] whoami: Print the remote user identity",
        ],
        "{out}"
    );
    // full blocks follow the one-liners, and worked examples close the index
    assert!(lines[10].is_empty(), "{out}");
    assert!(out.contains("SYNOPSIS:"), "{out}");
    assert!(out.trim_end().ends_with("- Print the remote username"), "{out}");
}

#[test]
fn help_detail_round_trips_descriptor_content() {
    let env = TestEnv::new();
    let out = env.run_lines(&["help set"]);
    assert!(out.starts_with("[*] set: View and edit configuration settings\n"));
    assert!(out.contains("SYNOPSIS:\n    set [<VAR> [<VALUE>]]\n"), "{out}");
    assert!(out.contains("DESCRIPTION:\n    Settings are editable variables"), "{out}");
    assert!(
        out.contains("EXAMPLES:\n    > set VERBOSITY TRUE\n      - Trace every command dispatch"),
        "{out}"
    );
}

#[test]
fn help_for_unknown_name_is_the_dispatcher_error() {
    let env = TestEnv::new();
    let out = env.run_lines(&["help nothere"]);
    assert_eq!(out, "[-] Unknown Command: nothere\n");
}

#[test]
fn arity_violations_point_at_the_manual() {
    let env = TestEnv::new();
    let out = env.run_lines(&["session save here and there"]);
    assert_eq!(
        out,
        "[-] session: wrong number of arguments (see `help session`)\n"
    );
}

#[test]
fn aliases_expand_with_trailing_arguments() {
    let env = TestEnv::new();
    let out = env.run_lines(&["alias greet lrun echo hello", "greet operator"]);
    assert_eq!(out, "hello operator\n");
}

#[test]
fn removed_alias_no_longer_resolves() {
    let env = TestEnv::new();
    let out = env.run_lines(&["alias q exit", "alias q None", "q"]);
    assert_eq!(out, "[-] Unknown Command: q\n");
}

#[test]
fn source_replays_lines_through_the_dispatcher() {
    let env = TestEnv::new();
    let script = env.base().join("toggle.husk");
    fs::write(&script, "set VERBOSITY TRUE\nset VERBOSITY FALSE\n").unwrap();

    let out = env.run_lines(&[&format!("source {}", script.display())]);
    assert_eq!(
        out,
        "[#] CMD('set' 'VERBOSITY' 'TRUE'): Returned 0\n\
         [#] CMD('set' 'VERBOSITY' 'FALSE'): Running...\n"
    );
}

#[test]
fn source_with_dash_e_aborts_on_first_failure() {
    let env = TestEnv::new();
    let script = env.base().join("fragile.husk");
    fs::write(&script, "set VERBOSITY nonsense\nenv MARKER reached\n").unwrap();

    let out = env.run_lines(&[&format!("source -e {}", script.display()), "env"]);
    assert!(out.contains("[!] Invalid Value Error: VERBOSITY"), "{out}");
    assert!(!out.contains("MARKER"), "{out}");
}

#[test]
fn session_save_and_load_round_trip() {
    let env = TestEnv::new();
    let snapshot = env.base().join("victim.session");

    let saved = env.run_lines(&[
        "set REQ_DEFAULT_METHOD POST",
        "env PWD /var/www",
        &format!("session save {}", snapshot.display()),
    ]);
    assert_eq!(
        saved,
        format!("[*] Session saved into « {} »\n", snapshot.display())
    );

    let restored = env.run_lines(&[
        &format!("session load {}", snapshot.display()),
        "set REQ_DEFAULT",
        "env PWD",
    ]);
    assert!(
        restored.contains(&format!("[*] Session loaded from « {} »", snapshot.display())),
        "{restored}"
    );
    assert!(restored.contains("    REQ_DEFAULT_METHOD  POST"), "{restored}");
    assert!(restored.contains("    PWD       /var/www"), "{restored}");
}

#[test]
fn session_load_of_missing_file_is_fatal() {
    let env = TestEnv::new();
    let snapshot = env.base().join("never-saved.session");
    let out = env.run_lines(&[&format!("session load {}", snapshot.display())]);
    assert_eq!(
        out,
        format!(
            "[!] File Not Found Error: No such file or directory: « {} »\n",
            snapshot.display()
        )
    );
}

#[test]
fn plugin_commands_execute_their_program() {
    let env = TestEnv::new();
    let out = env.run_lines_with_plugins(&["whoami"]);
    assert_eq!(out, "remote-operator\n");
}

#[test]
fn plugin_commands_trace_like_builtins() {
    let env = TestEnv::new();
    let out = env.run_lines_with_plugins(&["set VERBOSITY TRUE", "whoami"]);
    assert_eq!(
        out,
        "[#] CMD('set' 'VERBOSITY' 'TRUE'): Returned 0\n\
         [#] CMD('whoami'): Running...\n\
         remote-operator\n\
         [#] CMD('whoami'): Returned 0\n"
    );
}

#[test]
fn plugin_help_comes_from_the_manifest() {
    let env = TestEnv::new();
    let out = env.run_lines_with_plugins(&["help whoami"]);
    assert!(out.starts_with("[*] whoami: Print the remote user identity\n"), "{out}");
    assert!(out.contains("SYNOPSIS:\n    whoami\n"), "{out}");
    assert!(out.contains("    > whoami\n      - Print the remote username"), "{out}");
}

#[test]
fn plugin_settings_join_the_config_store() {
    let env = TestEnv::new();
    let out = env.run_lines_with_plugins(&["set WHOAMI"]);
    assert!(out.contains("    WHOAMI_STYLE  short"), "{out}");
}

#[test]
fn colliding_plugin_commands_are_skipped_with_a_warning() {
    let env = TestEnv::new();
    let rogue = env.base().join("rogue-plugins");
    fs::create_dir_all(rogue.join("helpjack")).unwrap();
    fs::write(
        rogue.join("helpjack/plugin.json"),
        serde_json::json!({
            "name": "helpjack",
            "commands": [{
                "name": "help",
                "summary": "Shadow the core help",
                "synopsis": "help",
                "description": "Tries to take over a built-in name.",
                "run": {"program": "bin/help.sh"}
            }]
        })
        .to_string(),
    )
    .unwrap();

    let out = env.cmd()
        .arg("--plugins")
        .arg(&rogue)
        .arg("--eval")
        .arg("help help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();

    assert!(
        out.starts_with(
            "[-] Skipping command from plugin 'helpjack': duplicate command name: help\n"
        ),
        "{out}"
    );
    // the built-in descriptor stays in charge
    assert!(out.contains("[*] help: Show commands help"), "{out}");
}

#[test]
fn unparseable_plugin_bundles_are_skipped_with_a_warning() {
    let env = TestEnv::new();
    let rogue = env.base().join("broken-plugins");
    fs::create_dir_all(rogue.join("mangled")).unwrap();
    fs::write(rogue.join("mangled/plugin.json"), "{not json").unwrap();

    let out = env.cmd()
        .arg("--plugins")
        .arg(&rogue)
        .arg("--eval")
        .arg("env")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("[-] Skipping plugin « "), "{out}");
    assert!(out.contains("mangled"), "{out}");
    // the console still comes up and dispatches
    assert!(out.contains("Environment Variables"), "{out}");
}

#[test]
fn startup_config_file_applies_settings_and_aliases() {
    let env = TestEnv::new();
    let config = env.base().join("config.toml");
    fs::write(
        &config,
        "[settings]\nREQ_DEFAULT_METHOD = \"POST\"\n\n[aliases]\nq = \"exit\"\n",
    )
    .unwrap();

    env.cmd()
        .arg("--config")
        .arg(&config)
        .arg("--eval")
        .arg("set REQ_DEFAULT")
        .assert()
        .success()
        .stdout(contains("    REQ_DEFAULT_METHOD  POST"));

    // the alias resolves, so the eval loop stops without a diagnostic
    let out = env.cmd()
        .arg("--config")
        .arg(&config)
        .arg("--eval")
        .arg("q")
        .arg("--eval")
        .arg("env AFTER exit")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out).unwrap(), "");
}

#[test]
fn lrun_relays_exit_codes_to_trace_lines() {
    let env = TestEnv::new();
    let out = env.run_lines(&["set VERBOSITY TRUE", "lrun false"]);
    assert!(
        out.contains("[#] CMD('lrun' 'false'): Returned 1"),
        "{out}"
    );
}
