#![deny(unsafe_code)]
//! CLI binary for evenly spaced streamline placement.
//!
//! Subcommands:
//! - `place`: expansion placement from one start point
//! - `scatter`: direct placement from PRNG-scattered seeds
//! - `run <recipe.json>`: replay a saved recipe
//! - `list`: print available field kinds

mod error;
mod logging;
mod output;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use flowlines_core::{CapacityPolicy, FieldKind, Mode, PlacementConfig, Recipe};
use output::Format;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "flowlines", about = "Evenly spaced streamlines in 2D direction fields")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log more (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FieldArgs {
    /// Field kind (uniform, perlin, simplex, curl, vortex).
    #[arg(short, long, default_value = "perlin")]
    field: String,

    /// Side length of the square field, in cells.
    #[arg(short = 'W', long, default_value_t = 120)]
    width: usize,

    /// Noise seed for the field source.
    #[arg(long, default_value_t = 42)]
    noise_seed: u32,

    /// Field parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    field_params: String,
}

#[derive(Args)]
struct PlacementArgs {
    /// Target number of accepted curves.
    #[arg(short = 'n', long, default_value_t = 1500)]
    n_curves: usize,

    /// Step budget per curve, seed included.
    #[arg(long, default_value_t = 30)]
    n_steps: usize,

    /// Curves with fewer steps are discarded.
    #[arg(long, default_value_t = 5)]
    min_steps: usize,

    /// Euler step length.
    #[arg(long, default_value_t = 1.2)]
    step_length: f64,

    /// Minimum separation between curves.
    #[arg(long, default_value_t = 0.8)]
    d_sep: f64,

    /// Points per density cell (bounded policy).
    #[arg(long, default_value_t = 2000)]
    cell_capacity: usize,

    /// Never drop points from full density cells.
    #[arg(long)]
    unbounded: bool,
}

impl PlacementArgs {
    fn config(&self) -> PlacementConfig {
        PlacementConfig {
            n_curves: self.n_curves,
            n_steps: self.n_steps,
            min_steps_allowed: self.min_steps,
            step_length: self.step_length,
            d_sep: self.d_sep,
            cell_capacity: self.cell_capacity,
            capacity_policy: if self.unbounded {
                CapacityPolicy::Unbounded
            } else {
                CapacityPolicy::Bounded
            },
        }
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output format for the curves.
    #[arg(long, value_enum, default_value_t = Format::Rows)]
    format: Format,

    /// Write curves to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the run as a replayable recipe.
    #[arg(long)]
    save_recipe: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Grow curves outward from one start point.
    Place {
        #[command(flatten)]
        field: FieldArgs,

        /// Start point x.
        #[arg(long, default_value_t = 45.0)]
        x0: f64,

        /// Start point y.
        #[arg(long, default_value_t = 24.0)]
        y0: f64,

        #[command(flatten)]
        placement: PlacementArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Trace curves from pseudo-random seed points, without expansion.
    Scatter {
        #[command(flatten)]
        field: FieldArgs,

        /// Number of seed points to scatter.
        #[arg(long, default_value_t = 5000)]
        seeds: usize,

        /// PRNG seed for the scattered points.
        #[arg(long, default_value_t = 7)]
        seed: u64,

        #[command(flatten)]
        placement: PlacementArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Replay a recipe saved with --save-recipe.
    Run {
        /// Recipe file.
        recipe: PathBuf,

        /// Placement overrides as a JSON object, e.g. '{"d_sep": 1.5}'.
        #[arg(long, default_value = "{}")]
        set: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List available field kinds.
    List,
}

fn parse_json(flag: &str, text: &str) -> Result<serde_json::Value, CliError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CliError::Input(format!("invalid {flag} JSON: {e}")))?;
    if !value.is_object() {
        return Err(CliError::Input(format!("{flag} must be a JSON object")));
    }
    Ok(value)
}

fn build_recipe(field: FieldArgs, placement: &PlacementArgs, mode: Mode) -> Result<Recipe, CliError> {
    Ok(Recipe {
        field_params: parse_json("--field-params", &field.field_params)?,
        field: field.field,
        width: field.width,
        noise_seed: field.noise_seed,
        placement: placement.config(),
        mode,
    })
}

fn execute(recipe: &Recipe, output: &OutputArgs, json: bool) -> Result<(), CliError> {
    let placement = recipe.run()?;
    output::emit(&placement, output.format, output.output.as_deref())?;
    if let Some(path) = &output.save_recipe {
        output::save_recipe(recipe, path)?;
    }

    let stats = placement.stats;
    let dest = output
        .output
        .as_deref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    if json {
        let info = serde_json::json!({
            "field": recipe.field,
            "width": recipe.width,
            "curves": placement.curves.len(),
            "stats": stats,
            "output": dest,
        });
        // stdout may already carry the curves
        eprintln!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "placed {} curves in {} field ({w}x{w}): {} invalid, {} too short of {} proposed -> {dest}",
            placement.curves.len(),
            recipe.field,
            stats.rejected_invalid,
            stats.discarded_short,
            stats.proposed,
            w = recipe.width,
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_names();
            if cli.json {
                let info = serde_json::json!({ "fields": fields });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
            }
        }
        Command::Place {
            field,
            x0,
            y0,
            placement,
            output,
        } => {
            let recipe = build_recipe(field, &placement, Mode::Expand { x0, y0 })?;
            execute(&recipe, &output, cli.json)?;
        }
        Command::Scatter {
            field,
            seeds,
            seed,
            placement,
            output,
        } => {
            let recipe = build_recipe(field, &placement, Mode::Scatter { seeds, seed })?;
            execute(&recipe, &output, cli.json)?;
        }
        Command::Run {
            recipe,
            set,
            output,
        } => {
            let mut loaded = output::load_recipe(&recipe)?;
            let overrides = parse_json("--set", &set)?;
            loaded.placement = loaded.placement.with_overrides(&overrides)?;
            execute(&loaded, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
