use clap::Parser;

mod cli;
mod commands;
mod console;
mod dispatch;
mod domain;
mod error;
mod registry;
mod services;

use cli::Cli;
use console::Console;
use services::storage;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut console = Console::new()?;

    let config_path = cli.config.or_else(storage::default_config_path);
    if let Some(path) = config_path.filter(|p| p.is_file()) {
        let config = storage::load_config_file(&path)?;
        for warning in console.apply_config(&config) {
            println!("{warning}");
        }
    }

    let plugins_dir = cli.plugins.or_else(storage::default_plugins_dir);
    if let Some(dir) = plugins_dir {
        for warning in console.load_plugins(&dir)? {
            println!("{warning}");
        }
    }

    if !cli.eval.is_empty() {
        for line in &cli.eval {
            if console.eval(line).stop {
                break;
            }
        }
        return Ok(());
    }

    console.run_loop()
}
