use clap::Parser;
use std::path::PathBuf;

/// Outer CLI surface. The transport and payload layers are external
/// collaborators; this binary hosts the dispatch core only.
#[derive(Parser, Debug)]
#[command(name = "husk", version, about = "Interactive console for remote shell sessions")]
pub struct Cli {
    #[arg(
        long,
        help = "Directory of plugin bundles loaded at startup (default: ~/.config/husk/plugins)"
    )]
    pub plugins: Option<PathBuf>,
    #[arg(
        long,
        help = "Startup configuration file (default: ~/.config/husk/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "eval",
        short = 'e',
        value_name = "LINE",
        help = "Dispatch LINE and exit instead of reading stdin (repeatable)"
    )]
    pub eval: Vec<String>,
}
