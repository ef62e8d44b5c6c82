use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mango_repo::Tier;
use mango_types::Address;

#[derive(Parser)]
#[command(
    name = "mango",
    about = "Administer access-controlled Mango repositories",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Sender account (an administrator or committer of the repository)
    #[arg(long, global = true, env = "MANGO_ACCOUNT")]
    pub account: Option<Address>,

    /// Configuration file (defaults to ./mango.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Committed state file
    #[arg(long, global = true, env = "MANGO_STATE")]
    pub state: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TierArg {
    Committer,
    Admin,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Committer => Tier::Committer,
            TierArg::Admin => Tier::Admin,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a repository administered by the sender account
    Create,
    /// Check status of a repository
    Status(RepoArgs),
    /// Mark a repository obsolete
    Obsolete(RepoArgs),
    /// Authorize an account as committer or administrator
    Authorize(AuthArgs),
    /// Remove an account from a tier
    Deauthorize(AuthArgs),
    /// Point a reference at a target
    SetRef(SetRefArgs),
    /// Append a snapshot record
    Snapshot(SnapshotArgs),
    /// List known repositories
    List,
}

#[derive(Args)]
pub struct RepoArgs {
    /// Repository address
    #[arg(short = 'R', long)]
    pub repo: Address,
}

#[derive(Args)]
pub struct AuthArgs {
    /// Repository address
    #[arg(short = 'R', long)]
    pub repo: Address,
    /// Account to change
    pub address: Address,
    /// Tier to grant or revoke
    #[arg(long, value_enum)]
    pub tier: TierArg,
}

#[derive(Args)]
pub struct SetRefArgs {
    /// Repository address
    #[arg(short = 'R', long)]
    pub repo: Address,
    pub name: String,
    pub target: String,
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Repository address
    #[arg(short = 'R', long)]
    pub repo: Address,
    pub record: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn parse_create() {
        let cli = Cli::try_parse_from(["mango", "create"]).unwrap();
        assert!(matches!(cli.command, Command::Create));
        assert!(cli.account.is_none());
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["mango", "status", "-R", REPO]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.repo, REPO.parse().unwrap());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_authorize_requires_tier() {
        assert!(Cli::try_parse_from(["mango", "authorize", "-R", REPO, BOB]).is_err());

        let cli =
            Cli::try_parse_from(["mango", "authorize", "-R", REPO, BOB, "--tier", "admin"]).unwrap();
        if let Command::Authorize(args) = cli.command {
            assert_eq!(args.address, BOB.parse().unwrap());
            assert_eq!(Tier::from(args.tier), Tier::Admin);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_deauthorize_committer() {
        let cli = Cli::try_parse_from([
            "mango",
            "deauthorize",
            "--repo",
            REPO,
            BOB,
            "--tier",
            "committer",
        ])
        .unwrap();
        if let Command::Deauthorize(args) = cli.command {
            assert_eq!(args.tier, TierArg::Committer);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn rejects_invalid_addresses() {
        assert!(Cli::try_parse_from(["mango", "status", "-R", "0x1234"]).is_err());
        assert!(Cli::try_parse_from(["mango", "--account", "nope", "create"]).is_err());
    }

    #[test]
    fn parse_set_ref() {
        let cli = Cli::try_parse_from(["mango", "set-ref", "-R", REPO, "main", "snap0"]).unwrap();
        if let Command::SetRef(args) = cli.command {
            assert_eq!(args.name, "main");
            assert_eq!(args.target, "snap0");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_snapshot() {
        let cli = Cli::try_parse_from(["mango", "snapshot", "-R", REPO, "blob:abc"]).unwrap();
        if let Command::Snapshot(args) = cli.command {
            assert_eq!(args.record, "blob:abc");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "mango", "list", "--account", BOB, "--state", "/tmp/s.json", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(cli.account, Some(BOB.parse().unwrap()));
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mango", "-q", "-v", "list"]).is_err());
    }
}
