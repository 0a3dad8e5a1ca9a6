use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "regtool", version, about = "Registry core operations against an in-memory datastore")]
pub(crate) struct Cli {
    /// Configuration file (TOML or JSON), overlaid with `REGISTRY__*` variables
    #[arg(short, long, global = true, default_value = "config/registry.toml")]
    pub config: PathBuf,

    /// Resources to preload into the datastore (JSON)
    #[arg(short, long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Evaluate as of this instant instead of the system clock (RFC 3339)
    #[arg(long, global = true)]
    pub at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run the admission pipeline for a create command without writing anything
    Check(CreateArgs),
    /// Admit a create command and persist the domain
    Create(CreateArgs),
    /// Request deletion of a host, then run the reference-safe deletion job
    DeleteHost {
        /// Fully qualified host name
        host: String,
        #[arg(long)]
        registrar: String,
        #[arg(long)]
        superuser: bool,
    },
    /// Verify an encoded signed mark file against the configured trust root
    VerifySmd {
        path: PathBuf,
        /// Also require the mark to cover this label
        #[arg(long)]
        label: Option<String>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct CreateArgs {
    /// Create command as JSON
    pub command: PathBuf,
    #[arg(long)]
    pub registrar: String,
    #[arg(long)]
    pub superuser: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "regtool",
            "check",
            "create.json",
            "--registrar",
            "TheRegistrar",
            "--at",
            "2026-03-01T12:00:00Z",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("config/registry.toml"));
        assert!(cli.at.is_some());
        let Command::Check(args) = cli.command else { panic!("expected check") };
        assert_eq!(args.registrar, "TheRegistrar");
        assert!(!args.superuser);
    }
}
