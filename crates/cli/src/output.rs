//! Writers for placed curves and recipes.
//!
//! The rows format has one line per step, `id; x; y; direction`, with
//! direction 0 for backward steps (the seed included) and 1 for forward
//! steps. Steps appear in recording order, not along the curve.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use flowlines_core::{Curve, Placement, Recipe};

use crate::error::CliError;

/// Output format for placed curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `id; x; y; direction` per step, with a header line.
    Rows,
    /// The full placement (curves and counters) as pretty JSON.
    Json,
}

pub const ROWS_HEADER: &str = "id; x; y; direction";

/// Writes every step of `curves` in the rows format.
pub fn write_rows<W: Write>(curves: &[Curve], out: &mut W) -> io::Result<()> {
    writeln!(out, "{ROWS_HEADER}")?;
    for curve in curves {
        for step in curve.steps() {
            writeln!(
                out,
                "{}; {}; {}; {}",
                curve.id(),
                step.x,
                step.y,
                step.direction.as_flag()
            )?;
        }
    }
    Ok(())
}

fn write_placement<W: Write>(
    placement: &Placement,
    format: Format,
    out: &mut W,
) -> Result<(), CliError> {
    match format {
        Format::Rows => write_rows(&placement.curves, out)
            .map_err(|e| CliError::Io(format!("writing rows: {e}")))?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, placement)?;
            writeln!(out).map_err(|e| CliError::Io(format!("writing json: {e}")))?;
        }
    }
    out.flush()
        .map_err(|e| CliError::Io(format!("flushing output: {e}")))
}

/// Writes `placement` to `path`, or to stdout when `path` is `None`.
pub fn emit(placement: &Placement, format: Format, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::io(path, e))?;
            write_placement(placement, format, &mut BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            write_placement(placement, format, &mut stdout.lock())
        }
    }
}

pub fn save_recipe(recipe: &Recipe, path: &Path) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(recipe)?;
    fs::write(path, text + "\n").map_err(|e| CliError::io(path, e))
}

pub fn load_recipe(path: &Path) -> Result<Recipe, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid recipe {}: {e}", path.display())))
}
