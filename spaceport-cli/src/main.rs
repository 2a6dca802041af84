#![deny(missing_docs)]
//! Spaceport command-line interface.
//!
//! Lists, inspects and edits ship records through the Spaceport server.

mod client;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, ShipQuery, SpaceportClient};
use spaceport_core::{Ship, ShipDraft, ShipOrder, ShipType, parse_id};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "spaceport", version, about = "Spaceport ship registry CLI")]
struct Cli {
    /// Base URL of the Spaceport server.
    #[arg(long, global = true, env = "SPACEPORT_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OrderArg {
    Id,
    Speed,
    Date,
    Rating,
}

impl From<OrderArg> for ShipOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Id => ShipOrder::Id,
            OrderArg::Speed => ShipOrder::Speed,
            OrderArg::Date => ShipOrder::Date,
            OrderArg::Rating => ShipOrder::Rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military, merchant).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Produced after the start of this year.
    #[arg(long)]
    after_year: Option<i32>,
    /// Produced before the start of this year.
    #[arg(long)]
    before_year: Option<i32>,
    /// Used flag.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn to_query(&self) -> CliResult<ShipQuery> {
        Ok(ShipQuery {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            after: year_millis(self.after_year)?,
            before: year_millis(self.before_year)?,
            used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew_size,
            max_crew_size: self.max_crew_size,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            ..ShipQuery::default()
        })
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military, merchant).
    #[arg(long)]
    ship_type: Option<ShipType>,
    /// Production year; the date is set to January 1st.
    #[arg(long)]
    prod_year: Option<i32>,
    /// Whether the ship has had previous owners.
    #[arg(long)]
    used: Option<bool>,
    /// Top speed.
    #[arg(long)]
    speed: Option<f64>,
    /// Number of crew members.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl ShipArgs {
    fn to_draft(&self) -> CliResult<ShipDraft> {
        Ok(ShipDraft {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type,
            prod_date: self.prod_year.map(start_of_year).transpose()?,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort field.
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
        /// Zero-based page index.
        #[arg(long)]
        page: Option<u32>,
        /// Ships per page.
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show one ship.
    Show {
        /// Ship identifier.
        id: String,
    },
    /// Register a new ship.
    Create(ShipArgs),
    /// Change the supplied fields of a ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        fields: ShipArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
fn main() {}

#[cfg_attr(test, allow(dead_code))]
async fn run(cli: Cli) -> CliResult<()> {
    let client = SpaceportClient::new(&cli.server_url)?;
    let output = match cli.command {
        Commands::List {
            filters,
            order,
            page,
            page_size,
        } => {
            let query = ShipQuery {
                order: order.map(ShipOrder::from),
                page_number: page,
                page_size,
                ..filters.to_query()?
            };
            let ships = client.list(&query).await?;
            render_ships(&ships, cli.format)?
        }
        Commands::Count { filters } => {
            let total = client.count(&filters.to_query()?).await?;
            total.to_string()
        }
        Commands::Show { id } => {
            let ship = client.get(parse_id(&id)?).await?;
            render_ship(&ship, cli.format)?
        }
        Commands::Create(fields) => {
            let ship = client.create(&fields.to_draft()?).await?;
            render_ship(&ship, cli.format)?
        }
        Commands::Update { id, fields } => {
            let ship = client.update(parse_id(&id)?, &fields.to_draft()?).await?;
            render_ship(&ship, cli.format)?
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            client.delete(id).await?;
            match cli.format {
                OutputFormat::Text => format!("Deleted ship {id}."),
                OutputFormat::Json => serde_json::json!({ "deleted": id }).to_string(),
            }
        }
    };
    println!("{output}");
    Ok(())
}

fn start_of_year(year: i32) -> CliResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| format!("year out of range: {year}").into())
}

fn year_millis(year: Option<i32>) -> CliResult<Option<i64>> {
    let start = year.map(start_of_year).transpose()?;
    Ok(start.map(|date| date.timestamp_millis()))
}

#[cfg_attr(test, allow(dead_code))]
fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text => Ok(render_ship_table(ships)),
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => Ok(render_ship_details(ship)),
    }
}

fn render_ship_table(ships: &[Ship]) -> String {
    if ships.is_empty() {
        return "No ships found.".to_string();
    }
    let mut output = format!(
        "{:>6}  {:<24}  {:<16}  {:<9}  {:>4}  {:<4}  {:>5}  {:>5}  {:>7}",
        "ID", "NAME", "PLANET", "TYPE", "YEAR", "USED", "SPEED", "CREW", "RATING"
    );
    for ship in ships {
        let _ = write!(
            output,
            "\n{:>6}  {:<24}  {:<16}  {:<9}  {:>4}  {:<4}  {:>5.2}  {:>5}  {:>7.2}",
            ship.id,
            ship.name,
            ship.planet,
            ship.ship_type,
            ship.prod_date.year(),
            if ship.used { "yes" } else { "no" },
            ship.speed,
            ship.crew_size,
            ship.rating
        );
    }
    output
}

fn render_ship_details(ship: &Ship) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Ship {}", ship.id);
    let _ = writeln!(output, "  name:      {}", ship.name);
    let _ = writeln!(output, "  planet:    {}", ship.planet);
    let _ = writeln!(output, "  type:      {}", ship.ship_type);
    let _ = writeln!(output, "  produced:  {}", ship.prod_date.format("%Y-%m-%d"));
    let _ = writeln!(output, "  used:      {}", ship.used);
    let _ = writeln!(output, "  speed:     {}", ship.speed);
    let _ = writeln!(output, "  crew size: {}", ship.crew_size);
    let _ = write!(output, "  rating:    {}", ship.rating);
    output
}
