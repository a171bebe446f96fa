mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pushgate",
    about = "Local pre-push gate: run branch, commit, lint, typecheck, test and audit checks before git push",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: hook payload cwd, then nearest .git/ above the current directory)
    #[arg(long, global = true, env = "PUSHGATE_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Act as a PreToolUse hook: read the host payload on stdin, gate git push
    Hook,

    /// Run every check now and report (exit 2 if the push would be blocked)
    Run {
        /// Print the full report as JSON on stdout
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Inspect, validate, or create .pushgate.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout is reserved for the hook payload and JSON reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let explicit_root = cli.root.as_deref();

    let result = match cli.command {
        Commands::Hook => Ok(cmd::hook::run(explicit_root)),
        Commands::Run { json } => cmd::run::run(explicit_root, json),
        Commands::Config { subcommand } => {
            let root = root::resolve_root(explicit_root, None);
            cmd::config::run(&root, subcommand).map(|()| 0)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
