//! Category legend: UI label, backend type key, and marker color.

use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_OBJECT_COLOR;

/// One row of the legend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Label shown in the UI, e.g. "Arbre"
    pub label: String,
    /// Backend type key, e.g. "arbres"
    pub object_type: String,
    /// Marker color as a hex string
    pub color: String,
}

impl LegendEntry {
    /// Create a legend entry
    pub fn new(label: &str, object_type: &str, color: &str) -> Self {
        Self {
            label: label.to_string(),
            object_type: object_type.to_string(),
            color: color.to_string(),
        }
    }
}

/// Fixed lookup table between category labels, backend keys, and colors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build a legend from its rows
    pub fn new(entries: Vec<LegendEntry>) -> Self {
        Self { entries }
    }

    /// The standard facility legend
    pub fn facility_defaults() -> Self {
        Self::new(vec![
            LegendEntry::new("Arbre", "arbres", "#228b22"),
            LegendEntry::new("Puit", "puits", "#1e90ff"),
            LegendEntry::new("Banc", "bancs", "#8b4513"),
            LegendEntry::new("Luminaire", "luminaires", "#ffd700"),
            LegendEntry::new("Poubelle", "poubelles", "#696969"),
            LegendEntry::new("Bâtiment", "batiments", "#b22222"),
            LegendEntry::new("Parking", "parkings", "#4b0082"),
            LegendEntry::new("Allée", "allees", "#d2b48c"),
        ])
    }

    /// All rows in table order
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    /// Backend key for a UI label; unmapped labels fall back to lower case
    pub fn backend_key(&self, label: &str) -> String {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.object_type.clone())
            .unwrap_or_else(|| label.to_lowercase())
    }

    /// Marker color for a backend type key
    pub fn color_for(&self, object_type: &str) -> &str {
        self.entries
            .iter()
            .find(|e| e.object_type == object_type)
            .map(|e| e.color.as_str())
            .unwrap_or(FALLBACK_OBJECT_COLOR)
    }

    /// UI label for a backend type key
    pub fn label_for(&self, object_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.object_type == object_type)
            .map(|e| e.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_key_lookup() {
        let legend = Legend::facility_defaults();
        assert_eq!(legend.backend_key("Arbre"), "arbres");
        assert_eq!(legend.backend_key("Puit"), "puits");
    }

    #[test]
    fn test_backend_key_fallback_lowercases() {
        let legend = Legend::facility_defaults();
        assert_eq!(legend.backend_key("Fontaine"), "fontaine");
    }

    #[test]
    fn test_color_fallback() {
        let legend = Legend::facility_defaults();
        assert_eq!(legend.color_for("arbres"), "#228b22");
        assert_eq!(legend.color_for("unknown"), FALLBACK_OBJECT_COLOR);
        assert_eq!(legend.label_for("puits"), Some("Puit"));
    }
}
