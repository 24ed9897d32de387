//! COVID-19 Dashboard CLI
//!
//! Offline inspection of a dataset using the same views the server builds:
//! - Print the per-country snapshot
//! - List available months
//! - Render the dashboard outputs for a selection as JSON
//! - Generate a default config file

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covid_dashboard::api::dto::DashboardResponse;
use covid_dashboard::config::{generate_default_config, Config};
use covid_dashboard::controller::Dashboard;
use covid_dashboard::data::{CountrySnapshot, DerivedViews, Metric, MonthKey, Variable};
use covid_dashboard::render::{Render, Selection};

#[derive(Parser)]
#[command(name = "covid-dashboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect a COVID-19 dataset from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Dataset CSV (default: from config)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show latest totals per country
    Snapshot {
        /// Only show the first N countries after sorting
        #[arg(short, long)]
        top: Option<usize>,
        /// Sort descending by metric (cases, deaths, cases_per_100000, deaths_per_million)
        #[arg(short, long)]
        sort_by: Option<Metric>,
    },

    /// List the months present in the dataset
    Months,

    /// Render the dashboard for a selection and print it as JSON
    Render {
        /// Map metric
        #[arg(short, long, default_value = "cases")]
        metric: Metric,
        /// First month (YYYY-MM, inclusive)
        #[arg(short, long)]
        start: MonthKey,
        /// Last month (YYYY-MM, exclusive)
        #[arg(short, long)]
        end: MonthKey,
        /// Countries for the panels (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,
        /// Variables for the panels (repeatable)
        #[arg(long = "variable")]
        variables: Vec<Variable>,
        /// Emit Plotly figures instead of chart specs
        #[arg(long)]
        figures: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "covid_dashboard=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::Snapshot { top, sort_by } => {
            let views = load_views(cli.data.as_deref(), cli.config.as_deref())?;

            let mut rows: Vec<&CountrySnapshot> = views.snapshot().iter().collect();
            if let Some(metric) = sort_by {
                rows.sort_by(|a, b| b.value(metric).total_cmp(&a.value(metric)));
            }
            if let Some(n) = top {
                rows.truncate(n);
            }

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_snapshot(&rows);
            }
        }

        Commands::Months => {
            let views = load_views(cli.data.as_deref(), cli.config.as_deref())?;
            let months = views.months();

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&months)?);
            } else {
                for month in &months {
                    println!("{}", month);
                }
                if let Some((first, last)) = views.date_range() {
                    eprintln!("{} months, {} to {}", months.len(), first, last);
                }
            }
        }

        Commands::Render {
            metric,
            start,
            end,
            countries,
            variables,
            figures,
        } => {
            let views = load_views(cli.data.as_deref(), cli.config.as_deref())?;
            let dashboard = Dashboard::new(Arc::new(views));

            let selection = Selection::new()
                .metric(metric)
                .months(start, end)
                .countries(countries)
                .variables(variables);

            let render = dashboard.on_selection_change(&selection);

            if figures {
                let response = DashboardResponse::from(render);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                match render {
                    Render::Rendered(outputs) => {
                        println!("{}", serde_json::to_string_pretty(&outputs)?)
                    }
                    Render::Unchanged { status: Some(status) } => {
                        eprintln!("Nothing rendered: {}", status)
                    }
                    Render::Unchanged { status: None } => eprintln!("Nothing rendered"),
                }
            }
        }
    }

    Ok(())
}

/// Resolve the dataset path from the flag or config and build the views
fn load_views(data: Option<&Path>, config: Option<&Path>) -> anyhow::Result<DerivedViews> {
    let path = match data {
        Some(path) => path.to_path_buf(),
        None => {
            let config = match config {
                Some(path) => Config::load_with_env(path)?,
                None => Config::load_default()?,
            };
            for warning in &config.warnings {
                tracing::warn!("{}", warning);
            }
            PathBuf::from(config.data.path)
        }
    };

    Ok(DerivedViews::load(&path)?)
}

fn print_snapshot(rows: &[&CountrySnapshot]) {
    if rows.is_empty() {
        println!("No countries in dataset.");
        return;
    }

    println!(
        "{:<6} {:<32} {:>14} {:>12} {:>14} {:>14}",
        "ISO", "Location", "Cases", "Deaths", "Cases/100k", "Deaths/1M"
    );
    println!("{}", "-".repeat(97));

    for row in rows {
        println!(
            "{:<6} {:<32} {:>14.0} {:>12.0} {:>14} {:>14}",
            row.iso_code,
            truncate(&row.location, 32),
            row.total_cases,
            row.total_deaths,
            format_rate(row.cases_per_100000),
            format_rate(row.deaths_per_million),
        );
    }
}

fn format_rate(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "-".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
