use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// worldvault: снапшоты миров Valheim в удалённом хранилище
#[derive(Parser, Debug)]
#[command(name = "worldvault", version, about = "Valheim world backups: create, list, restore")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Without a subcommand the interactive menu starts.
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

/// Flags shared by all subcommands; they override WV_* environment values.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory with the world files (.fwl/.db)
    #[arg(long, global = true)]
    pub saves_dir: Option<PathBuf>,
    /// Root directory of the remote store
    #[arg(long, global = true)]
    pub remote_dir: Option<PathBuf>,
    /// Remote namespace (folder), e.g. /Valheim_Worlds
    #[arg(long, global = true)]
    pub namespace: Option<String>,
    /// Directory for scratch archives (default: system temp)
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,
    /// Print counters after the command
    #[arg(long, global = true)]
    pub metrics: bool,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List local worlds
    Worlds {
        #[arg(long)]
        json: bool,
    },
    /// Back up one world
    Backup {
        #[arg(long)]
        world: String,
        #[arg(long)]
        json: bool,
    },
    /// List remote backups grouped by world
    List {
        #[arg(long)]
        json: bool,
    },
    /// Restore a backup into the saves directory
    ///
    /// Существующие файлы мира переименовываются в <name>.bak перед распаковкой.
    Restore {
        /// Ordinal from `list`, e.g. 1.2
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        select: Option<String>,
        /// Flat object name, e.g. valheim_Meadow_2024-05-01_18_42_07_123.zip
        #[arg(long)]
        name: Option<String>,
        /// Skip the y/n confirmation
        #[arg(long)]
        yes: bool,
        /// JSON result on stdout; needs --yes (no interactive prompt)
        #[arg(long, requires = "yes")]
        json: bool,
    },
    /// Interactive menu (create / restore / exit)
    Menu,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_json_requires_yes() {
        let err = Cli::try_parse_from(["worldvault", "restore", "--select", "1.1", "--json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from(["worldvault", "restore", "--select", "1.1", "--json", "--yes"])
            .unwrap();
        assert!(matches!(cli.cmd, Some(Cmd::Restore { json: true, yes: true, .. })));
    }

    #[test]
    fn restore_needs_select_or_name() {
        assert!(Cli::try_parse_from(["worldvault", "restore"]).is_err());
        assert!(Cli::try_parse_from(["worldvault", "restore", "--select", "1.1", "--name", "x"]).is_err());
        assert!(Cli::try_parse_from(["worldvault", "--saves-dir", "/s", "list"]).is_ok());
    }
}
