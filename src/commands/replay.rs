use std::path::{Path, PathBuf};

use anyhow::Result;
use fieldmap_designer::{default_export_file_name, DrawingCanvas, ExportOutcome, NullPresenter};

use crate::cli::{Cli, ReplayArgs};
use crate::replay::{self, ReplaySummary};

pub fn run(cli: &Cli, args: &ReplayArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let steps = replay::load_script(&args.script)?;

    let mut canvas = DrawingCanvas::new(Box::new(NullPresenter::default()));
    canvas.set_color(config.drawing.color.clone());
    canvas.set_category(config.drawing.category.clone());

    let summary = replay::run(&mut canvas, &steps);
    let target = match &args.output {
        Some(path) if path == Path::new("-") => None,
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(default_export_file_name())),
    };

    export(&canvas, target.as_deref(), &summary)
}

/// Writes the canvas contents to `target`, or to stdout when `None`.
pub fn export(canvas: &DrawingCanvas, target: Option<&Path>, summary: &ReplaySummary) -> Result<()> {
    let outcome = match target {
        Some(path) => canvas.export_to_file(path)?,
        None => canvas.export(),
    };

    match (&outcome, target) {
        (ExportOutcome::NothingToExport, _) => {
            eprintln!("nothing to export ({} steps replayed)", summary.steps);
        }
        (ExportOutcome::Collection(collection), None) => {
            println!("{}", serde_json::to_string_pretty(collection)?);
        }
        (ExportOutcome::Collection(_), Some(path)) => {
            eprintln!(
                "exported {} feature(s) to {}",
                canvas.store().len(),
                path.display()
            );
        }
    }
    Ok(())
}
