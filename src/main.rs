use anyhow::{bail, Context, Result};
use bullwhip_breaker::io::demand;
use bullwhip_breaker::io::protocol::{
    parse_body, DecisionService, Identity, Method, Reply, STATUS_OK,
};
use bullwhip_breaker::io::reporting;
use bullwhip_breaker::simulation::config::SimulationConfig;
use bullwhip_breaker::simulation::engine::ChainSimulation;
use bullwhip_breaker::strategy::baseline::NaivePolicy;
use bullwhip_breaker::strategy::controller::BullwhipController;
use bullwhip_breaker::strategy::params::ChainParams;
use bullwhip_breaker::strategy::traits::{Mode, OrderPolicy};
use bullwhip_breaker::{telemetry, Role};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Beer game order controller that keeps the bullwhip in check")]
struct Cli {
    /// JSON file overriding the built-in controller parameters
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one request read from a file or stdin and print the JSON reply
    Decide {
        /// Request body; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Request method (POST, GET, ...)
        #[arg(long, default_value = "POST")]
        method: String,
        /// Address reported in the handshake
        #[arg(long)]
        email: Option<String>,
    },
    /// Run the closed-loop beer game and export a per-week CSV
    Simulate {
        #[arg(long, default_value_t = 36)]
        weeks: usize,
        #[arg(long, value_enum, default_value_t = DemandPattern::Classic)]
        demand: DemandPattern,
        #[arg(long, value_enum, default_value_t = PolicyKind::Controller)]
        policy: PolicyKind,
        #[arg(long, default_value = "blackbox")]
        mode: String,
        /// Seed for the normal demand pattern
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "simulation_results.csv")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DemandPattern {
    Classic,
    Constant,
    Normal,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    Controller,
    Naive,
}

fn load_params(path: Option<&Path>) -> Result<ChainParams> {
    match path {
        Some(path) => ChainParams::from_json_file(path)
            .with_context(|| format!("loading controller parameters from {}", path.display())),
        None => Ok(ChainParams::default()),
    }
}

fn read_request(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading request from stdin")?;
            Ok(raw)
        }
    }
}

fn decide(
    params: ChainParams,
    input: Option<&Path>,
    method: &str,
    email: Option<String>,
) -> Result<()> {
    let identity = Identity {
        student_email: email,
        ..Identity::default()
    };
    let service = DecisionService::new(Box::new(BullwhipController::new(params)?), identity);

    let method: Method = method.parse()?;
    // A probe carries no body worth reading.
    let body = match method {
        Method::Post => parse_body(&read_request(input)?),
        _ => serde_json::Value::Null,
    };

    let reply = service.respond(method, &body);
    println!("{}", serde_json::to_string(&reply.body)?);
    ensure_accepted(&reply)
}

/// The reply body is printed either way; a rejected request still fails the command.
fn ensure_accepted(reply: &Reply) -> Result<()> {
    if reply.status != STATUS_OK {
        warn!(status = reply.status, "request rejected");
        bail!("request rejected with status {}", reply.status);
    }
    Ok(())
}

fn simulate(
    params: ChainParams,
    weeks: usize,
    pattern: DemandPattern,
    kind: PolicyKind,
    mode: Mode,
    seed: u64,
    output: &Path,
) -> Result<()> {
    let config = SimulationConfig {
        max_weeks: weeks,
        mode,
        ..SimulationConfig::default()
    };

    let demand_schedule = match pattern {
        DemandPattern::Classic => demand::generate_classic_beer_game_demand(weeks),
        DemandPattern::Constant => demand::generate_constant_demand(weeks, config.initial_flow),
        DemandPattern::Normal => demand::generate_normal_demand(weeks, 8.0, 2.0, seed),
    };

    let policy: Box<dyn OrderPolicy> = match kind {
        PolicyKind::Controller => Box::new(BullwhipController::new(params)?),
        PolicyKind::Naive => Box::new(NaivePolicy::new(config.initial_flow)),
    };

    let mut sim = ChainSimulation::new(config, demand_schedule, policy);
    sim.run();

    reporting::write_simulation_log(output, &sim.history)
        .with_context(|| format!("writing {}", output.display()))?;

    let costs = sim.cost_breakdown();
    let ratios = sim.bullwhip_ratios();
    for role in Role::ALL {
        match ratios[role] {
            Some(ratio) => info!(
                role = role.name(),
                cost = costs[role],
                bullwhip = ratio,
                "summary"
            ),
            None => info!(role = role.name(), cost = costs[role], "summary (flat demand)"),
        }
    }
    info!(total_cost = sim.total_supply_chain_cost(), "simulation complete");
    Ok(())
}

fn main() -> Result<()> {
    telemetry::init_tracing()?;
    let cli = Cli::parse();
    let params = load_params(cli.params.as_deref())?;

    match cli.command {
        Command::Decide {
            input,
            method,
            email,
        } => decide(params, input.as_deref(), &method, email),
        Command::Simulate {
            weeks,
            demand,
            policy,
            mode,
            seed,
            output,
        } => simulate(
            params,
            weeks,
            demand,
            policy,
            Mode::from_wire(Some(&mode)),
            seed,
            &output,
        ),
    }
}
