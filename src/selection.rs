// Process-wide UI selections, threaded explicitly into every render.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::{VizError, VizResult};
use crate::record::{Attribute, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartId {
    Histogram,
    Pie,
    Parallel,
}

impl ChartId {
    pub const ALL: [ChartId; 3] = [ChartId::Histogram, ChartId::Pie, ChartId::Parallel];

    pub fn key(self) -> &'static str {
        match self {
            ChartId::Histogram => "histogram",
            ChartId::Pie => "pie",
            ChartId::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChartId {
    type Err = VizError;

    fn from_str(s: &str) -> VizResult<Self> {
        ChartId::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VizError::UnknownChart(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pie-slice visibility, persisted across redraws and attribute changes.
///
/// Kept beside [`SelectionState`] as the pie chart's side-table; only legend
/// clicks flip entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityState {
    visible: HashMap<String, bool>,
}

impl VisibilityState {
    /// Register a key the first time it is observed; existing keys keep their state.
    pub fn observe(&mut self, key: &str) {
        if !self.visible.contains_key(key) {
            self.visible.insert(key.to_string(), true);
        }
    }

    /// Unobserved keys count as visible.
    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.get(key).copied().unwrap_or(true)
    }

    /// Flip a key and return its new visibility.
    pub fn toggle(&mut self, key: &str) -> bool {
        let entry = self.visible.entry(key.to_string()).or_insert(true);
        *entry = !*entry;
        *entry
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    pub selected_attribute: Attribute,
    checked: BTreeSet<Variable>,
    viewports: HashMap<ChartId, Viewport>,
}

impl SelectionState {
    pub fn new(defaults: &HashMap<ChartId, Viewport>) -> Self {
        SelectionState {
            selected_attribute: Attribute::Gpa,
            checked: Variable::CHECKABLE.into_iter().collect(),
            viewports: defaults.clone(),
        }
    }

    pub fn set_checked(&mut self, variable: Variable, checked: bool) -> VizResult<()> {
        if variable == Variable::Depression {
            return if checked { Ok(()) } else { Err(VizError::DepressionLocked) };
        }
        if checked {
            self.checked.insert(variable);
        } else {
            self.checked.remove(&variable);
        }
        Ok(())
    }

    pub fn is_checked(&self, variable: Variable) -> bool {
        variable == Variable::Depression || self.checked.contains(&variable)
    }

    /// Axes to draw, left to right; depression is always last.
    pub fn selected_parallel_variables(&self) -> Vec<Variable> {
        Variable::ALL
            .into_iter()
            .filter(|v| self.is_checked(*v))
            .collect()
    }

    pub fn viewport(&self, chart: ChartId) -> Viewport {
        self.viewports
            .get(&chart)
            .copied()
            .unwrap_or(Viewport::new(0, 0))
    }

    pub fn set_viewport(&mut self, chart: ChartId, viewport: Viewport) {
        self.viewports.insert(chart, viewport);
    }
}
