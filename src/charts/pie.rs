// Pie chart of depressed respondents by the selected attribute, with a
// legend that toggles slice visibility and a hover tooltip.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use tracing::{debug, trace};

use super::{ChartController, Surface, SURFACE_SLOT};
use crate::aggregate::{self, PieSlice};
use crate::error::{VizError, VizResult};
use crate::interaction::Control;
use crate::ir::{ArcGeom, DrawCommand, Enter, RectGeom, TextStyle};
use crate::palette::{Color, ColorPalette};
use crate::record::RowStore;
use crate::selection::{ChartId, SelectionState, VisibilityState};

pub const SLICE_ENTER_MS: u64 = 1000;
const LEGEND_OFFSET: (f64, f64) = (200.0, 150.0);
const LEGEND_ROW: f64 = 20.0;
const SWATCH: f64 = 18.0;
const TOOLTIP_OFFSET: (f64, f64) = (5.0, -30.0);

/// Hover text and where it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

pub struct PieChartController {
    surface: Surface,
    slices: Vec<PieSlice>,
    colors: HashMap<String, Color>,
    visibility: VisibilityState,
    /// Keys drawn by the last slice update.
    present: HashSet<String>,
    tooltip: Option<Tooltip>,
}

impl PieChartController {
    pub fn new() -> Self {
        PieChartController {
            surface: Surface::new(ChartId::Pie),
            slices: Vec::new(),
            colors: HashMap::new(),
            visibility: VisibilityState::default(),
            present: HashSet::new(),
            tooltip: None,
        }
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// Slices that pass the visibility filter, in slice order.
    pub fn visible_slices(&self) -> Vec<&PieSlice> {
        self.slices
            .iter()
            .filter(|s| self.visibility.is_visible(&s.key))
            .collect()
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Flip a category's visibility and redraw the slice layer only.
    pub fn toggle_slice(&mut self, key: &str) -> VizResult<bool> {
        if !self.surface.is_mounted() {
            return Err(VizError::NotMounted(ChartId::Pie.to_string()));
        }
        if !self.slices.iter().any(|s| s.key == key) {
            return Err(VizError::UnknownCategory(key.to_string()));
        }
        let visible = self.visibility.toggle(key);
        debug!(key, visible, "pie slice toggled");
        self.tooltip = None;
        self.update_slices();
        Ok(visible)
    }

    /// Show the tooltip for the slice under `point`, hiding it elsewhere.
    pub fn hover(&mut self, point: (f64, f64)) {
        let visible = self.visible_slices();
        let total: usize = visible.iter().map(|s| s.count).sum();
        let hit = self
            .arcs()
            .into_iter()
            .find(|(_, arc)| arc.contains(point))
            .and_then(|(key, _)| visible.iter().find(|s| s.key == key).copied());

        self.tooltip = match hit {
            Some(slice) if total > 0 => {
                let pct = slice.count as f64 / total as f64 * 100.0;
                Some(Tooltip {
                    text: format!("{}: {} ({:.1}%)", slice.key, slice.count, pct),
                    x: point.0 + TOOLTIP_OFFSET.0,
                    y: point.1 + TOOLTIP_OFFSET.1,
                })
            }
            _ => None,
        };
        trace!(x = point.0, y = point.1, shown = self.tooltip.is_some(), "pie hover");
    }

    pub fn leave(&mut self) {
        self.tooltip = None;
    }

    /// Settled wedge of every visible slice, laid out clockwise from 12 o'clock.
    fn arcs(&self) -> Vec<(String, ArcGeom)> {
        let scene = self.surface.scene();
        let width = scene.width as f64;
        let height = scene.height as f64;
        let radius = width.min(height) / 3.0;
        let center = (width / 2.0, height / 2.0);

        let visible = self.visible_slices();
        let total: usize = visible.iter().map(|s| s.count).sum();
        if total == 0 || radius <= 0.0 {
            return Vec::new();
        }

        let mut angle = 0.0;
        visible
            .into_iter()
            .map(|slice| {
                let sweep = slice.count as f64 / total as f64 * TAU;
                let arc = ArcGeom {
                    center,
                    radius,
                    start_angle: angle,
                    end_angle: angle + sweep,
                };
                angle += sweep;
                (slice.key.clone(), arc)
            })
            .collect()
    }

    fn update_slices(&mut self) {
        let arcs = self.arcs();
        let mut commands = Vec::with_capacity(arcs.len() * 2);
        for (key, arc) in &arcs {
            let entering = !self.present.contains(key);
            commands.push(DrawCommand::Wedge {
                geom: *arc,
                fill: self.colors.get(key).copied().unwrap_or(Color::LIGHTGRAY),
                stroke: Some((Color::BLACK, 1.0)),
                enter: entering.then_some(Enter {
                    from: ArcGeom {
                        start_angle: 0.0,
                        end_angle: 0.0,
                        ..*arc
                    },
                    duration_ms: SLICE_ENTER_MS,
                }),
                tag: Some(key.clone()),
            });
        }
        // Labels after every wedge so no slice paints over them
        for (key, arc) in &arcs {
            commands.push(DrawCommand::Text {
                pos: arc.centroid(),
                text: key.clone(),
                style: TextStyle::centered(12.8),
            });
        }

        self.present = arcs.into_iter().map(|(key, _)| key).collect();
        self.surface.scene_mut().replace_group("slices", commands);
    }
}

impl Default for PieChartController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartController for PieChartController {
    fn id(&self) -> ChartId {
        ChartId::Pie
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn controls(&self) -> &'static [Control] {
        &[Control::AttributeSelector, Control::Legend, Control::Pointer]
    }

    fn fragment(&self, _state: &SelectionState) -> String {
        format!("<div class='chart-container' id='container2'>{}</div>", SURFACE_SLOT)
    }

    fn render(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<()> {
        let attribute = state.selected_attribute;
        let viewport = state.viewport(ChartId::Pie);

        self.slices = aggregate::count_by_attribute_where_depressed(store, attribute);
        for slice in &self.slices {
            self.visibility.observe(&slice.key);
        }
        let keys: Vec<String> = self.slices.iter().map(|s| s.key.clone()).collect();
        self.colors = ColorPalette::set3().assign_colors(&keys);
        self.present.clear();
        self.tooltip = None;

        self.surface.clear(viewport);
        if viewport.is_empty() {
            debug!("pie viewport is empty, nothing drawn");
            return Ok(());
        }
        let width = viewport.width as f64;

        self.update_slices();

        let legend_x = width - LEGEND_OFFSET.0;
        let mut legend = Vec::with_capacity(self.slices.len() * 2);
        for (i, slice) in self.slices.iter().enumerate() {
            let row = LEGEND_OFFSET.1 + i as f64 * LEGEND_ROW;
            legend.push(DrawCommand::Rect {
                geom: RectGeom {
                    x: legend_x,
                    y: row,
                    width: SWATCH,
                    height: SWATCH,
                },
                fill: self.colors.get(&slice.key).copied().unwrap_or(Color::LIGHTGRAY),
                enter: None,
                tag: Some(slice.key.clone()),
            });
            legend.push(DrawCommand::Text {
                pos: (legend_x + 24.0, row + 14.0),
                text: slice.key.clone(),
                style: TextStyle::plain(16.0),
            });
        }

        let scene = self.surface.scene_mut();
        scene.replace_group("legend", legend);
        scene.replace_group(
            "title",
            vec![DrawCommand::Text {
                pos: (width / 2.0, 30.0),
                text: format!("{} Distribution", attribute.label()),
                style: TextStyle::title(24.0),
            }],
        );

        debug!(%attribute, slices = self.slices.len(), "pie rendered");
        Ok(())
    }
}
