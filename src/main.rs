//! symframe - run selection and subset stages against a JSON table

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use symframe::access::{Frame, Table};
use symframe::expression::Operand;
use symframe::stage::{drop, head, select, tail, BoundStage};

/// symframe - deferred column selection over tables
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table file: {"columns": [{"name": ..., "values": [...]}]}
    #[arg(short, long)]
    table: PathBuf,

    /// Print the result as JSON instead of a text table
    #[arg(short, long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keep columns: names, -name with *, or positions
    Select {
        #[arg(allow_hyphen_values = true)]
        specs: Vec<String>,
    },
    /// Remove columns
    Drop {
        #[arg(allow_hyphen_values = true)]
        specs: Vec<String>,
    },
    /// First n rows
    Head {
        #[arg(default_value = "5")]
        n: i64,
    },
    /// Last n rows
    Tail {
        #[arg(default_value = "5")]
        n: i64,
    },
}

/// Integers that are not column names address columns by position
fn selector_operand(spec: &str, table: &Frame) -> Operand {
    match spec.parse::<i64>() {
        Ok(position) if table.column_position(spec).is_none() => Operand::from(position),
        _ => Operand::from(spec),
    }
}

fn selector_operands(specs: &[String], table: &Frame) -> Vec<Operand> {
    specs.iter().map(|s| selector_operand(s, table)).collect()
}

fn build_stage(command: &Command, table: &Frame) -> BoundStage {
    match command {
        Command::Select { specs } => select(selector_operands(specs, table)),
        Command::Drop { specs } => drop(selector_operands(specs, table)),
        Command::Head { n } => head(*n),
        Command::Tail { n } => tail(*n),
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let table = Frame::from_json_file(&args.table)
        .with_context(|| format!("Failed to load table from {}", args.table.display()))?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        args.table.display()
    );

    let stage = build_stage(&args.command, &table);
    debug!("running {:?}", args.command);
    let result = stage
        .apply(&table)
        .with_context(|| format!("{} failed", stage.name()))?;

    if args.json {
        println!("{}", result.to_json_string()?);
    } else {
        print!("{}", result);
    }
    Ok(())
}
