// Stacked histogram of the selected attribute split by depression status.

use tracing::debug;

use super::{axis, ChartController, Surface, SURFACE_SLOT};
use crate::aggregate::{self, GroupedSeries};
use crate::error::VizResult;
use crate::interaction::Control;
use crate::ir::{DrawCommand, Enter, RectGeom, TextStyle};
use crate::palette::status_color;
use crate::record::{Attribute, RowStore, YesNo};
use crate::scale::{BandScale, LinearScale};
use crate::selection::{ChartId, SelectionState};

pub const MARGIN_LEFT: f64 = 40.0;
pub const MARGIN_RIGHT: f64 = 20.0;
pub const MARGIN_TOP: f64 = 70.0;
pub const MARGIN_BOTTOM: f64 = 110.0;
pub const BAR_ENTER_MS: u64 = 750;
const BAND_PADDING: f64 = 0.2;
const Y_TICKS: usize = 10;

pub struct HistogramController {
    surface: Surface,
    series: Vec<GroupedSeries>,
}

impl HistogramController {
    pub fn new() -> Self {
        HistogramController {
            surface: Surface::new(ChartId::Histogram),
            series: Vec::new(),
        }
    }

    /// Summary behind the current drawing.
    pub fn series(&self) -> &[GroupedSeries] {
        &self.series
    }
}

impl Default for HistogramController {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartController for HistogramController {
    fn id(&self) -> ChartId {
        ChartId::Histogram
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn controls(&self) -> &'static [Control] {
        &[Control::AttributeSelector]
    }

    fn fragment(&self, state: &SelectionState) -> String {
        let options: String = Attribute::ALL
            .iter()
            .map(|a| {
                let selected = if *a == state.selected_attribute { " selected" } else { "" };
                format!("<option value='{}'{}>{}</option>", a.key(), selected, a.label())
            })
            .collect();
        format!(
            "<div style='margin: 10px;'>\
             <label for='attribute-dropdown'>Select Attribute:</label> \
             <select id='attribute-dropdown'>{}</select></div>\
             <div class='chart-container' id='container1'>{}</div>",
            options, SURFACE_SLOT
        )
    }

    fn render(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<()> {
        let attribute = state.selected_attribute;
        let viewport = state.viewport(ChartId::Histogram);
        self.series = aggregate::group_by_attribute_and_depression(store, attribute);

        let scene = self.surface.clear(viewport);
        if viewport.is_empty() {
            debug!("histogram viewport is empty, nothing drawn");
            return Ok(());
        }

        let width = viewport.width as f64;
        let height = viewport.height as f64;
        let baseline = height - MARGIN_BOTTOM;

        let categories: Vec<String> = self.series.iter().map(|s| s.category.clone()).collect();
        let x = BandScale::new(categories, (MARGIN_LEFT, width - MARGIN_RIGHT), BAND_PADDING);
        let y_max = self.series.iter().map(GroupedSeries::total).max().unwrap_or(0) as f64;
        let y = LinearScale::new((0.0, y_max), (baseline, MARGIN_TOP));

        // Axes
        let x_ticks: Vec<(f64, String)> = self
            .series
            .iter()
            .filter_map(|s| x.map(&s.category).map(|left| (left + x.bandwidth() / 2.0, s.category.clone())))
            .collect();
        let y_ticks: Vec<(f64, String)> = y
            .ticks(Y_TICKS)
            .into_iter()
            .map(|t| (y.map(t), axis::format_tick(t)))
            .collect();
        let mut axes = axis::bottom_axis(baseline, x.range, &x_ticks);
        axes.extend(axis::left_axis(MARGIN_LEFT, y.range, &y_ticks));
        scene.replace_group("axes", axes);

        scene.replace_group(
            "labels",
            vec![
                DrawCommand::Text {
                    pos: (10.0, height / 2.0),
                    text: "Frequency".to_string(),
                    style: TextStyle {
                        vertical: true,
                        ..TextStyle::plain(12.8)
                    },
                },
                DrawCommand::Text {
                    pos: (width / 2.0 - MARGIN_LEFT, height - MARGIN_TOP),
                    text: attribute.label().to_string(),
                    style: TextStyle::plain(16.0),
                },
            ],
        );

        // Bars, stacked No then Yes
        let mut bars = Vec::new();
        for group in &self.series {
            let Some(left) = x.map(&group.category) else {
                continue;
            };
            let mut cumulative = 0usize;
            for sub in &group.values {
                let top = y.map((cumulative + sub.count) as f64);
                let bar_height = (y.map(0.0) - y.map(sub.count as f64)).abs();
                cumulative += sub.count;
                bars.push(DrawCommand::Rect {
                    geom: RectGeom {
                        x: left,
                        y: top,
                        width: x.bandwidth(),
                        height: bar_height,
                    },
                    fill: status_color(sub.sub_category),
                    enter: Some(Enter {
                        from: RectGeom {
                            x: left,
                            y: baseline,
                            width: x.bandwidth(),
                            height: 0.0,
                        },
                        duration_ms: BAR_ENTER_MS,
                    }),
                    tag: Some(format!("{}/{}", group.category, sub.sub_category)),
                });
            }
        }
        scene.replace_group("bars", bars);

        let legend_x = width - MARGIN_RIGHT - 150.0;
        let mut legend = Vec::new();
        for (i, (label, status)) in [("Not Depressed", YesNo::No), ("Depressed", YesNo::Yes)]
            .into_iter()
            .enumerate()
        {
            let row = MARGIN_TOP + i as f64 * 20.0;
            legend.push(DrawCommand::Rect {
                geom: RectGeom {
                    x: legend_x,
                    y: row,
                    width: 18.0,
                    height: 18.0,
                },
                fill: status_color(status),
                enter: None,
                tag: None,
            });
            legend.push(DrawCommand::Text {
                pos: (legend_x + 25.0, row + 9.0 + 0.35 * 16.0),
                text: label.to_string(),
                style: TextStyle::plain(16.0),
            });
        }
        scene.replace_group("legend", legend);

        scene.replace_group(
            "title",
            vec![DrawCommand::Text {
                pos: (width / 2.0, 28.0),
                text: format!("Distribution of {} Among Students", attribute.label()),
                style: TextStyle::title(24.0),
            }],
        );

        debug!(%attribute, categories = self.series.len(), y_max, "histogram rendered");
        Ok(())
    }
}
