//! mintage-cli: operator interface for the Mintage emission schedule.
//!
//! Inspects and drives a node's persistent mint state, and answers pure
//! schedule questions (what a height mints, when the next decay happens,
//! how much has been emitted by a given height) without touching disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mintage_core::constants::STATE_NAMESPACE;
use mintage_core::{Amount, FixedParams, MemoryStore, MintOutcome, Minter, Params, Prefixed, Schedule};
use mintage_node_lib::{MintNode, NodeConfig};
use serde_json::json;
use tracing::{debug, info};

/// Mintage command-line interface.
#[derive(Parser)]
#[command(name = "mintage-cli")]
#[command(version, about = "Deterministic fixed-supply block emission schedule")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the configuration file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json").
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parameters stored in the data directory.
    Params,
    /// Validate the configured parameters and write them to the data directory.
    Init,
    /// Evaluate one block against the persistent store.
    Step(StepArgs),
    /// Show the remaining supply counter.
    Remaining,
    /// Replay heights 0..=H against an in-memory store.
    Simulate(SimulateArgs),
    /// Show schedule information for a height.
    Schedule(ScheduleArgs),
}

#[derive(Args)]
struct StepArgs {
    /// Block height to evaluate.
    #[arg(long)]
    height: u64,
}

#[derive(Args)]
struct SimulateArgs {
    /// Last height to evaluate (inclusive).
    #[arg(long)]
    to: u64,

    /// Also print every Nth block's outcome.
    #[arg(long)]
    every: Option<u64>,
}

#[derive(Args)]
struct ScheduleArgs {
    /// Block height to describe.
    #[arg(long)]
    height: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_format = cli.log_format.as_deref().unwrap_or(&config.log_format);
    init_logging(&config.log_level, log_format);
    debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match &cli.command {
        Commands::Params => cmd_params(config, cli.json),
        Commands::Init => cmd_init(config, cli.json),
        Commands::Step(args) => cmd_step(config, args, cli.json),
        Commands::Remaining => cmd_remaining(config, cli.json),
        Commands::Simulate(args) => cmd_simulate(&config.params, args, cli.json),
        Commands::Schedule(args) => cmd_schedule(&config.params, args, cli.json),
    }
}

/// Load the configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = NodeConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn open_node(config: NodeConfig) -> Result<MintNode> {
    let path = config.db_path();
    MintNode::open(config).with_context(|| format!("Failed to open mint store: {}", path.display()))
}

/// Show the stored parameters.
fn cmd_params(config: NodeConfig, as_json: bool) -> Result<()> {
    let node = open_node(config)?;
    let params = node.params().context("Failed to read parameters")?;
    print_params(&params, as_json)
}

/// Write the configured parameters, replacing whatever is stored.
fn cmd_init(config: NodeConfig, as_json: bool) -> Result<()> {
    let params = config.params.clone();
    let node = open_node(config)?;
    node.set_params(params.clone())
        .context("Failed to write parameters")?;
    node.flush().context("Failed to flush mint store")?;
    info!(denom = %params.mint_denom, "parameters initialized");
    print_params(&params, as_json)
}

fn cmd_step(config: NodeConfig, args: &StepArgs, as_json: bool) -> Result<()> {
    let node = open_node(config)?;
    let outcome = node
        .step(args.height)
        .with_context(|| format!("Failed to evaluate height {}", args.height))?;
    node.flush().context("Failed to flush mint store")?;

    if as_json {
        println!("{}", outcome_json(&outcome));
    } else {
        println!("Height:        {}", outcome.height);
        println!("Cycle:         {}", outcome.cycle);
        println!("Cycle amount:  {}", outcome.cycle_amount);
        println!("Minted:        {}", outcome.minted);
        println!("Remaining:     {}", outcome.remaining);
    }
    Ok(())
}

fn cmd_remaining(config: NodeConfig, as_json: bool) -> Result<()> {
    let node = open_node(config)?;
    let remaining = node
        .remaining_supply()
        .context("Failed to read remaining supply")?;

    match (remaining, as_json) {
        (Some(r), true) => println!("{}", json!({ "remaining": r.to_string() })),
        (None, true) => println!("{}", json!({ "remaining": null })),
        (Some(r), false) => println!("Remaining supply: {r}"),
        (None, false) => println!("Remaining supply: not initialized (no block evaluated yet)"),
    }
    Ok(())
}

/// Per-cycle totals accumulated during a simulation.
struct CycleSummary {
    cycle: u64,
    first_height: u64,
    last_height: u64,
    cycle_amount: Amount,
    minted: Amount,
    remaining: Amount,
}

impl CycleSummary {
    fn start(outcome: &MintOutcome) -> Self {
        Self {
            cycle: outcome.cycle,
            first_height: outcome.height,
            last_height: outcome.height,
            cycle_amount: outcome.cycle_amount,
            minted: 0,
            remaining: outcome.remaining,
        }
    }

    fn add(&mut self, outcome: &MintOutcome) {
        self.last_height = outcome.height;
        self.minted += outcome.minted;
        self.remaining = outcome.remaining;
    }

    fn print(&self, as_json: bool) {
        if as_json {
            println!(
                "{}",
                json!({
                    "cycle": self.cycle,
                    "first_height": self.first_height,
                    "last_height": self.last_height,
                    "cycle_amount": self.cycle_amount.to_string(),
                    "minted": self.minted.to_string(),
                    "remaining": self.remaining.to_string(),
                })
            );
        } else {
            println!(
                "cycle {:>6}  heights {:>10}..={:<10}  amount {:>24}  minted {:>28}  remaining {:>28}",
                self.cycle,
                self.first_height,
                self.last_height,
                self.cycle_amount,
                self.minted,
                self.remaining
            );
        }
    }
}

fn cmd_simulate(params: &Params, args: &SimulateArgs, as_json: bool) -> Result<()> {
    let fixed = FixedParams::new(params.clone()).context("Invalid parameters")?;
    let mut minter = Minter::new(Prefixed::new(MemoryStore::new(), STATE_NAMESPACE), fixed);
    let every = args.every.filter(|n| *n > 0);

    let mut summary: Option<CycleSummary> = None;
    let mut total: Amount = 0;

    for height in 0..=args.to {
        let outcome = minter
            .begin_block(height)
            .with_context(|| format!("Simulation failed at height {height}"))?;
        total += outcome.minted;

        if every.is_some_and(|n| height % n == 0) {
            if as_json {
                println!("{}", outcome_json(&outcome));
            } else {
                println!(
                    "  height {:>10}  minted {:>24}  remaining {:>28}",
                    outcome.height, outcome.minted, outcome.remaining
                );
            }
        }

        match summary.as_mut() {
            Some(s) if s.cycle == outcome.cycle => s.add(&outcome),
            _ => {
                if let Some(done) = summary.take() {
                    done.print(as_json);
                }
                let mut s = CycleSummary::start(&outcome);
                s.add(&outcome);
                summary = Some(s);
            }
        }

        // Drained or stranded: every later height mints zero.
        if outcome.is_final() {
            info!(
                height,
                remaining = %outcome.remaining,
                "no further emission possible, stopping simulation"
            );
            break;
        }
    }

    if let Some(done) = summary {
        done.print(as_json);
    }
    if as_json {
        println!("{}", json!({ "total_minted": total.to_string() }));
    } else {
        println!("Total minted: {total}");
    }
    Ok(())
}

fn cmd_schedule(params: &Params, args: &ScheduleArgs, as_json: bool) -> Result<()> {
    let schedule = Schedule::new(params).context("Invalid parameters")?;
    let height = args.height;
    let cycle = schedule.cycle_of(height);
    let block_amount = schedule
        .block_amount(height)
        .with_context(|| format!("Failed to compute the amount at height {height}"))?;
    let next_decay = schedule.next_decay_height(height)?;
    let until_decay = schedule.blocks_until_decay(height)?;
    let last_cycle = schedule.last_emitting_cycle();
    let projected = schedule
        .projected_emission(height)
        .with_context(|| format!("Failed to project emission through height {height}"))?;

    if as_json {
        println!(
            "{}",
            json!({
                "height": height,
                "cycle": cycle,
                "cycle_start_height": schedule.cycle_start_height(cycle),
                "block_amount": block_amount.to_string(),
                "next_decay_height": next_decay,
                "blocks_until_decay": until_decay,
                "last_emitting_cycle": last_cycle,
                "projected_emission": projected.to_string(),
                "total_supply": schedule.total_supply().to_string(),
            })
        );
        return Ok(());
    }

    println!("Height:               {height}");
    println!("Cycle:                {cycle}");
    println!("Cycle start height:   {}", schedule.cycle_start_height(cycle));
    println!("Block amount:         {block_amount}");
    println!("Next decay height:    {}", display_opt(next_decay));
    println!("Blocks until decay:   {}", display_opt(until_decay));
    println!("Last emitting cycle:  {}", display_opt(last_cycle));
    println!("Projected emission:   {projected} / {}", schedule.total_supply());
    Ok(())
}

fn print_params(params: &Params, as_json: bool) -> Result<()> {
    if as_json {
        let encoded = serde_json::to_string_pretty(params).context("Failed to encode parameters")?;
        println!("{encoded}");
    } else {
        println!("{params}");
    }
    Ok(())
}

fn outcome_json(outcome: &MintOutcome) -> serde_json::Value {
    json!({
        "height": outcome.height,
        "cycle": outcome.cycle,
        "cycle_amount": outcome.cycle_amount.to_string(),
        "minted": outcome.minted.to_string(),
        "remaining": outcome.remaining.to_string(),
    })
}

fn display_opt(value: Option<u64>) -> String {
    value.map_or_else(|| "never".to_string(), |v| v.to_string())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`. Logs go to stderr so that
/// command output on stdout stays machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
