//! Command-line harness over a JSON fixture.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use boarding_engine::availability::{AvailabilityEngine, AvailabilityQuery};
use boarding_engine::cache::CachedRuleRepository;
use boarding_engine::calendar::Normalizer;
use boarding_engine::config::EngineConfig;
use boarding_engine::fixture::Fixture;
use boarding_engine::models::{ResourceCategory, ServiceCategory};
use boarding_engine::pricing::{PricingEngine, QuoteContext};

#[derive(Parser)]
#[command(
    name = "boarding-engine",
    version,
    about = "Availability and pricing for a pet boarding resort"
)]
struct Cli {
    /// Fixture with resources, bookings and rules
    #[arg(long, global = true, default_value = "demos/resort.json")]
    fixture: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List resources that can take a party
    Availability(AvailabilityArgs),
    /// Price a stay
    Quote(QuoteArgs),
}

#[derive(Args)]
struct AvailabilityArgs {
    #[arg(long, value_parser = parse_enum::<ResourceCategory>)]
    category: ResourceCategory,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: NaiveDate,
    #[arg(long, default_value_t = 1)]
    party: u32,
    /// Booking being edited; its occupants are not counted
    #[arg(long)]
    exclude: Option<Uuid>,
}

#[derive(Args)]
struct QuoteArgs {
    #[arg(long)]
    base: Decimal,
    #[arg(long, value_parser = parse_enum::<ServiceCategory>)]
    service: ServiceCategory,
    #[arg(long, value_parser = parse_enum::<ResourceCategory>)]
    resource: ResourceCategory,
    #[arg(long)]
    check_in: NaiveDate,
    #[arg(long)]
    check_out: NaiveDate,
    #[arg(long)]
    booked_on: NaiveDate,
    /// Current occupancy percentage; computed from the fixture when omitted
    #[arg(long)]
    occupancy: Option<Decimal>,
}

/// Parse a snake_case category name the way it appears in fixtures.
fn parse_enum<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown value '{value}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("boarding_engine=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env().context("invalid configuration")?;
    let fixture = Fixture::load(&cli.fixture)?;

    let availability = AvailabilityEngine::new(
        fixture.catalog(),
        fixture.booking_store(),
        Normalizer::new(config.timezone),
    );

    let output = match cli.command {
        Command::Availability(args) => {
            let query = AvailabilityQuery {
                category: args.category,
                start_date: args.start,
                end_date: args.end,
                party_size: args.party,
                exclude_booking_id: args.exclude,
            };
            let results = availability.find_available(&query)?;
            let span = availability.normalizer().stay_span(args.start, args.end)?;
            let occupancy = availability.occupancy(args.category, &span)?;
            json!({ "results": results, "occupancy": occupancy })
        }
        Command::Quote(args) => {
            let occupancy = match args.occupancy {
                Some(pct) => pct,
                None => {
                    // A same-day stay still occupies its check-in day
                    let next_day = args.check_in.succ_opt().unwrap_or(args.check_out);
                    let end = args.check_out.max(next_day);
                    let span = availability.normalizer().stay_span(args.check_in, end)?;
                    availability.occupancy(args.resource, &span)?.percentage
                }
            };
            let context = QuoteContext {
                service_category: args.service,
                resource_category: args.resource,
                check_in_date: args.check_in,
                check_out_date: args.check_out,
                booking_date: args.booked_on,
                current_occupancy_percentage: occupancy,
            };
            let rules = CachedRuleRepository::from_config(fixture.rule_repository(), &config);
            let quote = PricingEngine::from_config(&config)
                .quote_from_repository(&rules, args.base, &context)?;
            serde_json::to_value(quote)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
