//! Canvas type definitions: DrawingMode, CanvasInput, InputOutcome, ToolStyle, DrawingPreview.

use fieldmap_core::constants::DEFAULT_DRAW_COLOR;
use fieldmap_core::{FeatureId, FeatureKind, Vertex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawingMode {
    #[default]
    None,
    Point,
    LineString,
    Polygon,
    /// Drawn like a polygon; finalizes as [`FeatureKind::Polygon`].
    Rectangle,
}

impl DrawingMode {
    /// Whether a tool is active.
    pub fn is_active(self) -> bool {
        self != DrawingMode::None
    }

    /// Whether clicks accumulate into a vertex buffer.
    pub fn collects_vertices(self) -> bool {
        matches!(
            self,
            DrawingMode::LineString | DrawingMode::Polygon | DrawingMode::Rectangle
        )
    }

    /// Vertices needed before the buffer can be finalized.
    pub fn min_vertices(self) -> usize {
        match self {
            DrawingMode::None => usize::MAX,
            DrawingMode::Point => 1,
            DrawingMode::LineString => 2,
            DrawingMode::Polygon | DrawingMode::Rectangle => 3,
        }
    }

    /// Kind of feature the tool produces.
    pub fn feature_kind(self) -> Option<FeatureKind> {
        match self {
            DrawingMode::None => None,
            DrawingMode::Point => Some(FeatureKind::Point),
            DrawingMode::LineString => Some(FeatureKind::LineString),
            DrawingMode::Polygon | DrawingMode::Rectangle => Some(FeatureKind::Polygon),
        }
    }
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawingMode::None => write!(f, "None"),
            DrawingMode::Point => write!(f, "Point"),
            DrawingMode::LineString => write!(f, "LineString"),
            DrawingMode::Polygon => write!(f, "Polygon"),
            DrawingMode::Rectangle => write!(f, "Rectangle"),
        }
    }
}

/// Keys the drawing tools react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawingKey {
    Escape,
    Enter,
}

/// Pointer and keyboard input delivered by the map host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CanvasInput {
    Click(Vertex),
    DoubleClick(Vertex),
    RightClick,
    CursorMoved(Vertex),
    KeyPressed(DrawingKey),
}

/// What an input did to the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Nothing changed.
    Ignored,
    /// A vertex was buffered; holds the new buffer length.
    VertexAdded(usize),
    /// Only the live preview moved.
    PreviewUpdated,
    /// The buffer was discarded.
    Cancelled,
    /// A feature was stored.
    Finalized(FeatureId),
}

/// Color and category applied to newly finalized features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStyle {
    pub color: String,
    pub category: Option<String>,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_DRAW_COLOR.to_string(),
            category: None,
        }
    }
}

/// Unfinalized shape shown while a tool collects vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingPreview {
    pub mode: DrawingMode,
    pub vertices: Vec<Vertex>,
    pub cursor: Option<Vertex>,
    pub color: String,
}

impl DrawingPreview {
    /// Dashed outline: buffered vertices, then the cursor, closed for polygons.
    pub fn outline(&self) -> Vec<Vertex> {
        let mut outline = self.vertices.clone();
        outline.extend(self.cursor);
        let closes = matches!(self.mode, DrawingMode::Polygon | DrawingMode::Rectangle);
        if closes && outline.len() >= 3 {
            outline.push(outline[0]);
        }
        outline
    }

    /// Per-vertex markers (buffered vertices only).
    pub fn markers(&self) -> &[Vertex] {
        &self.vertices
    }
}
