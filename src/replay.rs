//! Scripted drawing sessions.
//!
//! A replay script is a JSON array of steps that drive a [`DrawingCanvas`]
//! exactly as a map host would:
//!
//! ```json
//! [
//!   { "mode": "Polygon" },
//!   { "input": { "Click": { "lat": 48.85, "lng": 2.35 } } },
//!   { "input": { "Click": { "lat": 48.85, "lng": 2.36 } } },
//!   { "input": { "Click": { "lat": 48.86, "lng": 2.36 } } },
//!   { "input": { "KeyPressed": "Enter" } },
//!   "delete_last"
//! ]
//! ```

use std::path::Path;

use fieldmap_core::{Error, FeatureId};
use fieldmap_designer::{CanvasInput, DrawingCanvas, DrawingMode, InputOutcome};
use serde::{Deserialize, Serialize};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    /// Select a drawing tool.
    Mode(DrawingMode),
    /// Color for features finalized afterwards.
    Color(String),
    /// Category for features finalized afterwards.
    Category(Option<String>),
    /// Pointer or keyboard input.
    Input(CanvasInput),
    DeleteLast,
    ClearAll,
}

/// What a replay did to the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    pub finalized: Vec<FeatureId>,
    pub cancelled: usize,
    pub ignored: usize,
    pub removed: usize,
}

/// Parses a replay script.
pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, Error> {
    serde_json::from_str(text).map_err(|e| Error::other(format!("invalid replay script: {e}")))
}

/// Reads and parses a replay script file.
pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>, Error> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Feeds every step through the canvas.
pub fn run(canvas: &mut DrawingCanvas, steps: &[ReplayStep]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for step in steps {
        summary.steps += 1;
        match step {
            ReplayStep::Mode(mode) => canvas.set_mode(*mode),
            ReplayStep::Color(color) => canvas.set_color(color.clone()),
            ReplayStep::Category(category) => canvas.set_category(category.clone()),
            ReplayStep::Input(input) => match canvas.handle(*input) {
                InputOutcome::Finalized(id) => summary.finalized.push(id),
                InputOutcome::Cancelled => summary.cancelled += 1,
                InputOutcome::Ignored => summary.ignored += 1,
                InputOutcome::VertexAdded(_) | InputOutcome::PreviewUpdated => {}
            },
            ReplayStep::DeleteLast => {
                if canvas.delete_last().is_some() {
                    summary.removed += 1;
                }
            }
            ReplayStep::ClearAll => summary.removed += canvas.clear_all(),
        }
    }

    tracing::debug!(
        "Replayed {} steps: {} finalized, {} removed",
        summary.steps,
        summary.finalized.len(),
        summary.removed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::Vertex;
    use fieldmap_designer::NullPresenter;

    #[test]
    fn test_parse_script_forms() {
        let steps = parse_script(
            r##"[
                {"mode": "LineString"},
                {"color": "#ff0000"},
                {"category": null},
                {"input": {"Click": {"lat": 1.0, "lng": 2.0}}},
                {"input": "RightClick"},
                {"input": {"KeyPressed": "Enter"}},
                "delete_last",
                "clear_all"
            ]"##,
        )
        .unwrap();

        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0], ReplayStep::Mode(DrawingMode::LineString));
        assert_eq!(
            steps[3],
            ReplayStep::Input(CanvasInput::Click(Vertex::new(1.0, 2.0)))
        );
        assert_eq!(steps[4], ReplayStep::Input(CanvasInput::RightClick));
        assert_eq!(steps[7], ReplayStep::ClearAll);
    }

    #[test]
    fn test_parse_script_rejects_unknown_step() {
        assert!(parse_script(r#"[{"teleport": 3}]"#).is_err());
    }

    #[test]
    fn test_run_counts_outcomes() {
        let mut canvas = DrawingCanvas::new(Box::new(NullPresenter::default()));
        let steps = vec![
            ReplayStep::Input(CanvasInput::Click(Vertex::new(0.0, 0.0))),
            ReplayStep::Mode(DrawingMode::Point),
            ReplayStep::Input(CanvasInput::Click(Vertex::new(0.0, 0.0))),
            ReplayStep::Input(CanvasInput::Click(Vertex::new(0.0, 1.0))),
            ReplayStep::DeleteLast,
        ];

        let summary = run(&mut canvas, &steps);

        assert_eq!(summary.steps, 5);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.finalized.len(), 2);
        assert_eq!(summary.removed, 1);
        assert_eq!(canvas.store().len(), 1);
    }
}
