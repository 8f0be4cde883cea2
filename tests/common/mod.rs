use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    tmp: TempDir,
    pub home: PathBuf,
    pub plugins: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let plugins = make_fixture_plugins(tmp.path());

        Self { tmp, home, plugins }
    }

    pub fn base(&self) -> &Path {
        self.tmp.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("husk");
        cmd.env("HOME", &self.home);
        cmd
    }

    /// Dispatch the given console lines through `--eval` and return the
    /// raw stdout.
    pub fn run_lines(&self, lines: &[&str]) -> String {
        let mut cmd = self.cmd();
        for line in lines {
            cmd.arg("--eval").arg(line);
        }
        let out = cmd.assert().success().get_output().stdout.clone();
        String::from_utf8(out).expect("utf8 console output")
    }

    /// Same as `run_lines`, with the fixture plugin rack loaded.
    pub fn run_lines_with_plugins(&self, lines: &[&str]) -> String {
        let mut cmd = self.cmd();
        cmd.arg("--plugins").arg(&self.plugins);
        for line in lines {
            cmd.arg("--eval").arg(line);
        }
        let out = cmd.assert().success().get_output().stdout.clone();
        String::from_utf8(out).expect("utf8 console output")
    }
}

fn make_fixture_plugins(base: &Path) -> PathBuf {
    let plugins = base.join("plugins");

    let whoami = plugins.join("whoami");
    fs::create_dir_all(whoami.join("bin")).expect("create plugin bin dir");
    write_script(
        &whoami.join("bin/whoami.sh"),
        "#!/bin/sh\necho remote-operator\n",
    );
    fs::write(
        whoami.join("plugin.json"),
        serde_json::json!({
            "name": "whoami",
            "version": "1.0.0",
            "commands": [{
                "name": "whoami",
                "category": "System",
                "summary": "Print the remote user identity",
                "synopsis": "whoami",
                "description": "Ask the remote session which user the payload runs as.",
                "examples": [
                    {"invocation": "whoami", "effect": "Print the remote username"}
                ],
                "run": {"program": "bin/whoami.sh"}
            }],
            "settings": [{
                "name": "WHOAMI_STYLE",
                "default": "short",
                "description": "Output style for whoami"
            }]
        })
        .to_string(),
    )
    .expect("write whoami manifest");

    let ghost = plugins.join("ghost");
    fs::create_dir_all(&ghost).expect("create ghost plugin dir");
    fs::write(
        ghost.join("plugin.json"),
        serde_json::json!({
            "name": "ghost",
            "commands": [{
                "name": "ghost",
                "category": "System",
                "summary": "Command whose program is missing",
                "synopsis": "ghost",
                "description": "Fixture for filesystem handler failures.",
                "run": {"program": "bin/ghost.sh"}
            }]
        })
        .to_string(),
    )
    .expect("write ghost manifest");

    plugins
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).expect("write plugin script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .expect("mark plugin script executable");
    }
}
