use colored::Colorize;
use mango_repo::{
    CommitReceipt, Executor, FileExecutor, RepoError, RepoHandle, RepoStatus, Tier,
};
use mango_types::Address;
use serde_json::json;
use tracing::{info, warn};

use crate::cli::*;
use crate::config::MangoConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = MangoConfig::discover(cli.config.as_deref(), &cwd)?
        .with_overrides(cli.state.clone(), cli.account);
    let executor = FileExecutor::open(&config.state_path).map_err(rejected)?;
    execute(&executor, &config, cli.command, cli.format)
}

/// Run one command against any executor.
pub fn execute(
    executor: &dyn Executor,
    config: &MangoConfig,
    command: Command,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Command::Create => cmd_create(executor, &config.require_account()?, format),
        Command::Status(args) => cmd_status(executor, args.repo, format),
        Command::Obsolete(args) => cmd_obsolete(executor, &config.require_account()?, args, format),
        Command::Authorize(args) => {
            cmd_authorize(executor, &config.require_account()?, args, format)
        }
        Command::Deauthorize(args) => {
            cmd_deauthorize(executor, &config.require_account()?, args, format)
        }
        Command::SetRef(args) => cmd_set_ref(executor, &config.require_account()?, args, format),
        Command::Snapshot(args) => cmd_snapshot(executor, &config.require_account()?, args, format),
        Command::List => cmd_list(executor, format),
    }
}

/// Surface the error kind alongside the reason.
fn rejected(e: RepoError) -> anyhow::Error {
    anyhow::anyhow!("{} error: {e}", e.kind())
}

fn cmd_create(
    executor: &dyn Executor,
    account: &Address,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!(admin = %account, "creating repository");
    let (handle, receipt) = RepoHandle::create(executor, account).map_err(rejected)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Text => {
            println!(
                "{} Repository created: {}",
                "✓".green().bold(),
                handle.address().to_string().bold()
            );
            println!("  Administrator: {}", account.to_string().cyan());
            print_tx(&receipt);
        }
    }
    Ok(())
}

fn cmd_status(executor: &dyn Executor, repo: Address, format: OutputFormat) -> anyhow::Result<()> {
    info!(repo = %repo, "checking status");
    let handle = RepoHandle::open(executor, repo).map_err(rejected)?;
    let status = handle.status().map_err(rejected)?;

    if status.obsolete {
        warn!(repo = %repo, "repository is marked as OBSOLETE");
    }
    if status.refs.is_empty() {
        warn!(repo = %repo, "no references");
    }

    match format {
        OutputFormat::Json => {
            let report = json!({ "repo": repo, "status": status });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_status(&repo, &status),
    }
    Ok(())
}

fn print_status(repo: &Address, status: &RepoStatus) {
    println!("Repository {}", repo.to_string().bold());
    println!("  Interface version: {}", status.interface_version);
    if status.obsolete {
        println!("  State: {}", "OBSOLETE".red().bold());
    } else {
        println!("  State: {}", "active".green());
    }
    for admin in &status.administrators {
        println!("  Administrator: {}", admin.to_string().cyan());
    }
    for committer in &status.committers {
        println!("  Committer: {}", committer.to_string().cyan());
    }

    if status.refs.is_empty() {
        println!("No references");
    }
    for entry in &status.refs {
        println!("Reference: {} -> {}", entry.name.yellow(), entry.target);
    }

    if status.snapshots.is_empty() {
        println!("No snapshots");
    }
    for (index, snapshot) in status.snapshots.iter().enumerate() {
        println!("Snapshot #{index}: {snapshot}");
    }
}

fn cmd_obsolete(
    executor: &dyn Executor,
    account: &Address,
    args: RepoArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    info!(repo = %args.repo, "marking repository obsolete");
    let handle = RepoHandle::open(executor, args.repo).map_err(rejected)?;
    let receipt = handle.set_obsolete(account).map_err(rejected)?;
    report(&receipt, format, &format!("Marked {} as obsolete", args.repo))
}

fn cmd_authorize(
    executor: &dyn Executor,
    account: &Address,
    args: AuthArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tier = Tier::from(args.tier);
    info!(repo = %args.repo, identity = %args.address, tier = %tier, "authorizing");
    let handle = RepoHandle::open(executor, args.repo).map_err(rejected)?;
    let receipt = handle.authorize(account, args.address, tier).map_err(rejected)?;
    report(&receipt, format, &format!("Authorized {} as {tier}", args.address))
}

fn cmd_deauthorize(
    executor: &dyn Executor,
    account: &Address,
    args: AuthArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let tier = Tier::from(args.tier);
    info!(repo = %args.repo, identity = %args.address, tier = %tier, "deauthorizing");
    let handle = RepoHandle::open(executor, args.repo).map_err(rejected)?;
    let receipt = handle.deauthorize(account, args.address, tier).map_err(rejected)?;
    report(&receipt, format, &format!("Deauthorized {} as {tier}", args.address))
}

fn cmd_set_ref(
    executor: &dyn Executor,
    account: &Address,
    args: SetRefArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let handle = RepoHandle::open(executor, args.repo).map_err(rejected)?;
    let receipt = handle
        .set_ref(account, args.name.as_str(), args.target.as_str())
        .map_err(rejected)?;
    report(&receipt, format, &format!("Reference {} -> {}", args.name, args.target))
}

fn cmd_snapshot(
    executor: &dyn Executor,
    account: &Address,
    args: SnapshotArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let handle = RepoHandle::open(executor, args.repo).map_err(rejected)?;
    let receipt = handle.append_snapshot(account, args.record).map_err(rejected)?;
    let summary = match receipt.snapshot_index() {
        Some(index) => format!("Snapshot #{index} recorded"),
        None => "Snapshot recorded".to_string(),
    };
    report(&receipt, format, &summary)
}

fn cmd_list(executor: &dyn Executor, format: OutputFormat) -> anyhow::Result<()> {
    let repos = executor.repositories().map_err(rejected)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&repos)?),
        OutputFormat::Text => {
            if repos.is_empty() {
                println!("No repositories.");
            }
            for repo in repos {
                println!("{repo}");
            }
        }
    }
    Ok(())
}

fn report(receipt: &CommitReceipt, format: OutputFormat, summary: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(receipt)?),
        OutputFormat::Text => {
            println!("{} {summary}", "✓".green().bold());
            print_tx(receipt);
        }
    }
    Ok(())
}

fn print_tx(receipt: &CommitReceipt) {
    println!(
        "  Transaction: {} (commit #{})",
        receipt.tx_hash.to_string().yellow(),
        receipt.seq
    );
}
