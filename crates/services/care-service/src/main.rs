//! Care Service - meal-delivery contracts from the command line.

use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use care_service_lib::config::CareServiceConfig;
use common::{init_tracing, AppError, AppResult};
use domain::{Coordinates, CreateContract, SystemClock};

#[derive(Parser)]
#[command(name = "care-service")]
#[command(about = "Meal-delivery contract service")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a contract request and print its delivery calendar
    Plan {
        /// `half_month`/`HM` or `monthly`/`M`
        #[arg(long = "type", default_value = "monthly")]
        contract_type: String,
        /// First delivery day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        cost: i64,
        #[arg(long)]
        street: String,
        #[arg(long)]
        number: i32,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        administrator: Option<Uuid>,
        #[arg(long)]
        patient: Option<Uuid>,
    },
    /// Run a full contract lifecycle against in-memory storage
    Demo,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = CareServiceConfig::from_env();
    if cli.verbose {
        config = config.verbose();
    }
    init_tracing(&config.service);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = err.code(), "{}", err);
            eprintln!("{}", to_json(&err.body()).unwrap_or_else(|_| err.user_message()));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let clock = Arc::new(SystemClock);

    match command {
        Commands::Plan {
            contract_type,
            start,
            cost,
            street,
            number,
            lat,
            lon,
            administrator,
            patient,
        } => {
            let input = CreateContract {
                administrator_id: administrator.unwrap_or_else(Uuid::new_v4),
                patient_id: patient.unwrap_or_else(Uuid::new_v4),
                contract_type,
                start_date: start,
                cost_value: cost,
                street,
                number,
                coordinates: Coordinates::new(lat, lon)?,
            };
            let plan = care_service_lib::plan_contract(input, clock.as_ref())?;
            println!("{}", to_json(&plan)?);
        }
        Commands::Demo => {
            let report = care_service_lib::run_demo(clock).await?;
            println!("{}", to_json(&report)?);
        }
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::internal(e.to_string()))
}
