use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dashboard_engine::{AssembleOptions, aggregate, assemble, write_view};
use models::Container;

/// Builds the dashboard view JSON from the dashboard XML and the record file.
#[derive(Debug, Parser)]
#[command(name = "generate-dashboard")]
struct Args {
    /// Dashboard XML document
    #[arg(long, env = "DASHBOARD_XML", default_value = "public/data.xml")]
    dashboard: PathBuf,

    /// JSON file of financial records
    #[arg(long, env = "RECORDS_JSON", default_value = "public/records.json")]
    records: PathBuf,

    /// Output file
    #[arg(long, env = "DASHBOARD_OUT", default_value = "dashboard/dashboard.json")]
    out: PathBuf,

    #[arg(long, env = "CONTAINER_WIDTH", default_value_t = 1200.0)]
    width: f64,

    #[arg(long, env = "CONTAINER_HEIGHT", default_value_t = 800.0)]
    height: f64,

    /// Columns of the fallback grid when the XML has no layout tree
    #[arg(long, env = "GRID_COLUMNS", default_value_t = 2)]
    grid_columns: usize,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_engine=info,config_loader=info".into()),
        )
        .init();

    let args = Args::parse();
    tracing::info!(
        dashboard = %args.dashboard.display(),
        records = %args.records.display(),
        out = %args.out.display(),
        "generating dashboard"
    );

    let config = config_loader::load_dashboard(&args.dashboard).context("load dashboard XML")?;
    let records = config_loader::load_records(&args.records).context("load records")?;

    let aggregates = aggregate(&records);
    let options = AssembleOptions {
        container: Container::new(args.width, args.height),
        grid_columns: args.grid_columns,
    };
    let view = assemble(&config, &aggregates, &options);
    write_view(&view, &args.out, args.pretty).context("write dashboard.json")?;

    tracing::info!(
        panels = view.panels.len(),
        generated_at = %view.metadata.generated_at,
        "done"
    );
    Ok(())
}
