use serde::{Deserialize, Serialize};

/// Measured vertical extent of one category section, in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBounds {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

impl CategoryBounds {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }

    /// Half-open: `top <= y < bottom`.
    pub fn contains(&self, y: f64) -> bool {
        self.top <= y && y < self.bottom
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn is_measurable(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite() && self.bottom >= self.top
    }
}

/// One entry reported by a layout provider. Sections that are not rendered
/// yet report no extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeasurement {
    pub id: String,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

/// Category sections in the order they were laid out.
///
/// The order is kept exactly as supplied. Sections are expected to be
/// stacked top to bottom without overlap; if they are not, the first match
/// in sequence order wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryLayout {
    categories: Vec<CategoryBounds>,
}

impl CategoryLayout {
    /// Build a layout, dropping sections whose extent cannot be used
    /// (non-finite or inverted).
    pub fn new(bounds: impl IntoIterator<Item = CategoryBounds>) -> Self {
        Self {
            categories: bounds.into_iter().filter(CategoryBounds::is_measurable).collect(),
        }
    }

    /// Build a layout from provider measurements. Entries missing either
    /// edge are treated as not currently measurable and skipped.
    pub fn from_measurements(measurements: impl IntoIterator<Item = CategoryMeasurement>) -> Self {
        Self::new(measurements.into_iter().filter_map(|m| match (m.top, m.bottom) {
            (Some(top), Some(bottom)) => Some(CategoryBounds::new(m.id, top, bottom)),
            _ => None,
        }))
    }

    pub fn get(&self, id: &str) -> Option<&CategoryBounds> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryBounds> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Bottom edge of the last section, i.e. the total content height.
    pub fn content_bottom(&self) -> f64 {
        self.categories.last().map_or(0.0, |c| c.bottom)
    }

    /// The category that owns the detection line `line`.
    ///
    /// Resolution order:
    /// 1. the first section whose `[top, bottom)` contains the line;
    /// 2. otherwise the first section whose bottom lies below the line
    ///    (the line is above everything, or in a gap between sections);
    /// 3. otherwise the last section (the line is past the end).
    ///
    /// Returns `None` only when the layout is empty.
    pub fn detect(&self, line: f64) -> Option<&CategoryBounds> {
        self.categories
            .iter()
            .find(|c| c.contains(line))
            .or_else(|| self.categories.iter().find(|c| c.bottom > line))
            .or_else(|| self.categories.last())
    }
}
