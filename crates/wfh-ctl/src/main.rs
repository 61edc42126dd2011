use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use wfh_common::{Direction, Duration, TeamSchedule, WfhRequest, WithdrawActor};

use wfh_ctl::commands::{self, print_json, read_json};
use wfh_ctl::{parse_date, today, CtlConfig};

#[derive(Parser)]
#[command(name = "wfh-ctl")]
#[command(about = "WFH scheduler policy tool", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to ctl.toml")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-day WFH counts for one date
    Day {
        #[arg(long, help = "Team schedule JSON file, or - for stdin")]
        schedule: PathBuf,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Proportion table for a team schedule
    Proportions {
        #[arg(long)]
        schedule: PathBuf,
        #[arg(long)]
        team_size: Option<usize>,
    },

    Evaluate {
        #[arg(long)]
        proportion: f64,
        #[arg(long)]
        team_size: usize,
        #[arg(long, default_value_t = 1)]
        pending: usize,
    },

    /// Check a single pending request against a schedule
    Assess {
        #[arg(long)]
        schedule: PathBuf,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, help = "AM, PM or FD")]
        duration: Duration,
        #[arg(long)]
        team_size: Option<usize>,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Check the pending occurrences of a recurring request
    AssessBatch {
        #[arg(long)]
        schedule: PathBuf,
        #[arg(long, help = "Request list JSON file")]
        requests: PathBuf,
        #[arg(long)]
        batch: Option<u64>,
        #[arg(long)]
        team_size: Option<usize>,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Request window around today
    Window {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Withdrawal window for an arrangement date
    Withdraw {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_enum)]
        actor: Actor,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Apply a withdrawal to one request from a request list
    WithdrawRequest {
        #[arg(long)]
        requests: PathBuf,
        #[arg(long)]
        id: u64,
        #[arg(long, value_enum)]
        actor: Actor,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Step a calendar view by a day or a week
    Navigate {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_enum)]
        direction: Step,
        #[arg(long)]
        week: bool,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Auto-rejection records for stale pending requests
    Expire {
        #[arg(long)]
        requests: PathBuf,
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
enum Actor {
    Manager,
    Employee,
}

impl From<Actor> for WithdrawActor {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::Manager => WithdrawActor::Manager,
            Actor::Employee => WithdrawActor::Employee,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Step {
    Next,
    Prev,
}

impl From<Step> for Direction {
    fn from(step: Step) -> Self {
        match step {
            Step::Next => Direction::Forward,
            Step::Prev => Direction::Backward,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(CtlConfig::default_config_path);
    let config = CtlConfig::load_from_path(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    debug!("Using configuration from {:?}", config_path);

    if let Err(e) = run(cli.command, &config, &config_path) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(command: Commands, config: &CtlConfig, config_path: &Path) -> Result<()> {
    let policy = &config.policy;

    match command {
        Commands::Day { schedule, date } => {
            let schedule: TeamSchedule = read_json(&schedule)?;
            print_json(&commands::schedule::day(&schedule, date))?
        }
        Commands::Proportions { schedule, team_size } => {
            let schedule: TeamSchedule = read_json(&schedule)?;
            print_json(&commands::schedule::proportions(&schedule, team_size))?
        }
        Commands::Evaluate { proportion, team_size, pending } => {
            print_json(&commands::approval::evaluate(policy, proportion, team_size, pending))?
        }
        Commands::Assess { schedule, date, duration, team_size, today: on } => {
            let schedule: TeamSchedule = read_json(&schedule)?;
            let assessment = commands::approval::assess(
                policy,
                &schedule,
                date,
                duration,
                team_size,
                on.unwrap_or_else(today),
            );
            print_json(&assessment)?
        }
        Commands::AssessBatch { schedule, requests, batch, team_size, today: on } => {
            let schedule: TeamSchedule = read_json(&schedule)?;
            let requests: Vec<WfhRequest> = read_json(&requests)?;
            let assessment = commands::approval::assess_batch(
                policy,
                &schedule,
                &requests,
                batch,
                team_size,
                on.unwrap_or_else(today),
            );
            print_json(&assessment)?
        }
        Commands::Window { date, today: on } => {
            print_json(&commands::window::request_window(policy, date, on.unwrap_or_else(today)))?
        }
        Commands::Withdraw { date, actor, today: on } => print_json(
            &commands::window::withdraw_window(policy, date, actor.into(), on.unwrap_or_else(today)),
        )?,
        Commands::WithdrawRequest { requests, id, actor, today: on } => {
            let requests: Vec<WfhRequest> = read_json(&requests)?;
            let outcome = commands::requests::withdraw_request(
                policy,
                &requests,
                id,
                actor.into(),
                on.unwrap_or_else(today),
            )?;
            print_json(&outcome)?
        }
        Commands::Navigate { date, direction, week, today: on } => print_json(
            &commands::window::navigate(policy, date, direction.into(), week, on.unwrap_or_else(today)),
        )?,
        Commands::Expire { requests, today: on } => {
            let requests: Vec<WfhRequest> = read_json(&requests)?;
            print_json(&commands::requests::expire(policy, &requests, on.unwrap_or_else(today)))?
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => {
                if config_path.exists() && !force {
                    bail!("{:?} already exists, pass --force to overwrite", config_path);
                }
                CtlConfig::default().save_to_path(config_path)?;
                println!("Wrote default configuration to {}", config_path.display());
            }
            ConfigAction::Show => print!("{}", toml::to_string_pretty(config)?),
        },
    }

    Ok(())
}
