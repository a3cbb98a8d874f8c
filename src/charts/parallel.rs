// Parallel-coordinates plot of the checked variables plus depression,
// with a vertical brush on every axis.

use std::collections::HashMap;

use tracing::debug;

use super::{axis, escape_html, ChartController, Surface, SURFACE_SLOT};
use crate::error::{VizError, VizResult};
use crate::interaction::Control;
use crate::ir::{Anchor, DrawCommand, RectGeom, TextStyle};
use crate::palette::Color;
use crate::record::{RowStore, Variable};
use crate::scale::PointScale;
use crate::selection::{ChartId, SelectionState};

pub const MARGIN_TOP: f64 = 50.0;
pub const MARGIN_RIGHT: f64 = 50.0;
pub const MARGIN_BOTTOM: f64 = 100.0;
pub const MARGIN_LEFT: f64 = 50.0;
const LINE_WIDTH: f64 = 0.4;
const BRUSH_HALF_WIDTH: f64 = 10.0;
const BRUSH_FILL: Color = Color(0xe4, 0xe4, 0xe4);

pub const TITLE: &str = "Parallel Coordinates (Interactive) Plot: Selected Variables and Depression";

/// One record's path across the displayed axes.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    record: usize,
    points: Vec<(f64, f64)>,
}

pub struct ParallelCoordinatesController {
    surface: Surface,
    axes: Vec<Variable>,
    axis_x: HashMap<Variable, f64>,
    lines: Vec<Line>,
    brushes: HashMap<Variable, (f64, f64)>,
    /// The most recently dragged axis; only it governs highlighting.
    brushing_axis: Option<Variable>,
}

impl ParallelCoordinatesController {
    pub fn new() -> Self {
        ParallelCoordinatesController {
            surface: Surface::new(ChartId::Parallel),
            axes: Vec::new(),
            axis_x: HashMap::new(),
            lines: Vec::new(),
            brushes: HashMap::new(),
            brushing_axis: None,
        }
    }

    /// Axes currently drawn, left to right.
    pub fn axes(&self) -> &[Variable] {
        &self.axes
    }

    /// Horizontal pixel position of a drawn axis.
    pub fn axis_x(&self, axis: Variable) -> Option<f64> {
        self.axis_x.get(&axis).copied()
    }

    /// Records that have a line, in record order.
    pub fn drawn_records(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.record).collect()
    }

    /// Records drawn in the highlight color.
    pub fn highlighted_records(&self) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|l| self.is_highlighted(l))
            .map(|l| l.record)
            .collect()
    }

    /// Move or clear the brush on `axis`; `None` restores every line.
    pub fn brush(&mut self, axis: Variable, selection: Option<(f64, f64)>) -> VizResult<()> {
        if !self.surface.is_mounted() {
            return Err(VizError::NotMounted(ChartId::Parallel.to_string()));
        }
        if !self.axes.contains(&axis) {
            return Err(VizError::AxisNotDisplayed(axis.to_string()));
        }
        match selection {
            Some((a, b)) => {
                let height = self.surface.scene().height as f64;
                let lo = a.min(b).clamp(0.0, height);
                let hi = a.max(b).clamp(0.0, height);
                self.brushes.insert(axis, (lo, hi));
                self.brushing_axis = Some(axis);
                debug!(%axis, lo, hi, "brush moved");
            }
            None => {
                self.brushes.remove(&axis);
                if self.brushing_axis == Some(axis) {
                    self.brushing_axis = None;
                }
                debug!(%axis, "brush cleared");
            }
        }
        self.draw_brushes();
        self.draw_lines();
        Ok(())
    }

    fn is_highlighted(&self, line: &Line) -> bool {
        let Some(axis) = self.brushing_axis else {
            return true;
        };
        let (Some(index), Some((lo, hi))) = (
            self.axes.iter().position(|a| *a == axis),
            self.brushes.get(&axis),
        ) else {
            return true;
        };
        line.points
            .get(index)
            .map(|(_, y)| *y >= *lo && *y <= *hi)
            .unwrap_or(false)
    }

    fn draw_lines(&mut self) {
        let commands = self
            .lines
            .iter()
            .map(|line| DrawCommand::Polyline {
                points: line.points.clone(),
                stroke: if self.is_highlighted(line) {
                    Color::STEELBLUE
                } else {
                    Color::LIGHTGRAY
                },
                width: LINE_WIDTH,
                tag: Some(line.record.to_string()),
            })
            .collect();
        self.surface.scene_mut().replace_group("lines", commands);
    }

    fn draw_brushes(&mut self) {
        let mut commands = Vec::new();
        for axis in &self.axes {
            let (Some((lo, hi)), Some(x)) = (self.brushes.get(axis), self.axis_x.get(axis)) else {
                continue;
            };
            commands.push(DrawCommand::Rect {
                geom: RectGeom {
                    x: x - BRUSH_HALF_WIDTH,
                    y: *lo,
                    width: 2.0 * BRUSH_HALF_WIDTH,
                    height: hi - lo,
                },
                fill: BRUSH_FILL,
                enter: None,
                tag: Some(axis.key().to_string()),
            });
        }
        self.surface.scene_mut().replace_group("brushes", commands);
    }
}

impl Default for ParallelCoordinatesController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartController for ParallelCoordinatesController {
    fn id(&self) -> ChartId {
        ChartId::Parallel
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn controls(&self) -> &'static [Control] {
        &[Control::VariableCheckboxes, Control::Brush]
    }

    fn fragment(&self, state: &SelectionState) -> String {
        let boxes: String = Variable::CHECKABLE
            .iter()
            .map(|v| {
                let checked = if state.is_checked(*v) { " checked" } else { "" };
                format!(
                    "<label><input type='checkbox' class='variable-checkbox' value='{}'{} /> \
                     <span>{}</span></label>",
                    v.key(),
                    checked,
                    escape_html(v.label())
                )
            })
            .collect();
        format!(
            "<div id='controls'>{}</div><div class='chart-container' id='container3'>{}</div>",
            boxes, SURFACE_SLOT
        )
    }

    fn render(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<()> {
        let viewport = state.viewport(ChartId::Parallel);
        self.axes = state.selected_parallel_variables();
        self.axis_x.clear();
        self.lines.clear();
        self.brushes.clear();
        self.brushing_axis = None;

        self.surface.clear(viewport);
        if viewport.is_empty() {
            debug!("parallel viewport is empty, nothing drawn");
            return Ok(());
        }

        let width = viewport.width as f64;
        let height = viewport.height as f64;
        let y_range = (height - MARGIN_BOTTOM, MARGIN_TOP);

        let keys: Vec<&str> = self.axes.iter().map(|v| v.key()).collect();
        let x = PointScale::new(keys.as_slice(), (MARGIN_LEFT, width - MARGIN_RIGHT));
        let y: HashMap<Variable, PointScale> = self
            .axes
            .iter()
            .map(|v| (*v, PointScale::new(v.domain(), y_range)))
            .collect();
        for v in &self.axes {
            if let Some(px) = x.map(v.key()) {
                self.axis_x.insert(*v, px);
            }
        }

        let mut axes = Vec::new();
        let mut labels = Vec::new();
        for v in &self.axes {
            let (Some(px), Some(scale)) = (self.axis_x.get(v), y.get(v)) else {
                continue;
            };
            let ticks: Vec<(f64, String)> = v
                .domain()
                .iter()
                .filter_map(|value| scale.map(value).map(|py| (py, value.to_string())))
                .collect();
            axes.extend(axis::left_axis(*px, y_range, &ticks));
            labels.push(DrawCommand::Text {
                pos: (*px, MARGIN_TOP - 20.0),
                text: v.label().to_string(),
                style: TextStyle {
                    bold: true,
                    anchor: Anchor::Middle,
                    ..TextStyle::plain(16.0)
                },
            });
        }

        let mut skipped = 0usize;
        for (index, record) in store.records().iter().enumerate() {
            let points: Option<Vec<(f64, f64)>> = self
                .axes
                .iter()
                .map(|v| {
                    let px = self.axis_x.get(v)?;
                    let py = y.get(v)?.map(record.variable(*v)?)?;
                    Some((*px, py))
                })
                .collect();
            match points {
                Some(points) => self.lines.push(Line { record: index, points }),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "records without a placeable value on every axis have no line");
        }

        let scene = self.surface.scene_mut();
        scene.replace_group("axes", axes);
        scene.replace_group("labels", labels);
        self.draw_brushes();
        self.draw_lines();
        self.surface.scene_mut().replace_group(
            "title",
            vec![DrawCommand::Text {
                pos: (width / 2.0, height - MARGIN_BOTTOM + 50.0),
                text: TITLE.to_string(),
                style: TextStyle::title(24.0),
            }],
        );

        debug!(axes = self.axes.len(), lines = self.lines.len(), "parallel coordinates rendered");
        Ok(())
    }
}
