// The three linked charts, their shared selections and event routing.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::charts::{
    escape_html, ChartController, HistogramController, ParallelCoordinatesController,
    PieChartController, SURFACE_SLOT,
};
use crate::debounce::RESIZE_QUIET_MS;
use crate::error::{VizError, VizResult};
use crate::graph;
use crate::interaction::{Control, Event, Listeners};
use crate::ir::Scene;
use crate::record::RowStore;
use crate::selection::{ChartId, SelectionState, Viewport};

/// Initial viewport of every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub viewports: HashMap<ChartId, Viewport>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut viewports = HashMap::new();
        viewports.insert(ChartId::Histogram, Viewport::new(700, 400));
        viewports.insert(ChartId::Pie, Viewport::new(700, 400));
        viewports.insert(ChartId::Parallel, Viewport::new(1300, 500));
        DashboardConfig { viewports }
    }
}

impl DashboardConfig {
    /// Override width and/or height of every chart.
    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        for viewport in self.viewports.values_mut() {
            if let Some(w) = width {
                viewport.width = w;
            }
            if let Some(h) = height {
                viewport.height = h;
            }
        }
        self
    }
}

pub struct Dashboard {
    store: RowStore,
    state: SelectionState,
    histogram: HistogramController,
    pie: PieChartController,
    parallel: ParallelCoordinatesController,
    listeners: Listeners,
    clock_ms: u64,
}

impl Dashboard {
    pub fn new(store: RowStore, config: &DashboardConfig) -> Self {
        Dashboard {
            store,
            state: SelectionState::new(&config.viewports),
            histogram: HistogramController::new(),
            pie: PieChartController::new(),
            parallel: ParallelCoordinatesController::new(),
            listeners: Listeners::default(),
            clock_ms: 0,
        }
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn histogram(&self) -> &HistogramController {
        &self.histogram
    }

    pub fn pie(&self) -> &PieChartController {
        &self.pie
    }

    pub fn parallel(&self) -> &ParallelCoordinatesController {
        &self.parallel
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn controller(&self, chart: ChartId) -> &dyn ChartController {
        match chart {
            ChartId::Histogram => &self.histogram,
            ChartId::Pie => &self.pie,
            ChartId::Parallel => &self.parallel,
        }
    }

    // Borrow one controller alongside the data it renders from.
    fn parts(&mut self, chart: ChartId) -> (&mut dyn ChartController, &RowStore, &SelectionState) {
        let Dashboard {
            store,
            state,
            histogram,
            pie,
            parallel,
            ..
        } = self;
        let controller: &mut dyn ChartController = match chart {
            ChartId::Histogram => histogram,
            ChartId::Pie => pie,
            ChartId::Parallel => parallel,
        };
        (controller, &*store, &*state)
    }

    /// Insert a chart's fragment into the document.
    pub fn attach(&mut self, chart: ChartId) {
        let (controller, _, _) = self.parts(chart);
        controller.surface_mut().attach();
    }

    /// First render, then subscribe the chart to its controls.
    pub fn mount(&mut self, chart: ChartId) -> VizResult<()> {
        let (controller, store, state) = self.parts(chart);
        let controls = controller.controls();
        controller.mount(store, state)?;
        for control in controls {
            self.listeners.listen(*control, chart);
        }
        Ok(())
    }

    /// Attach and mount every chart in document order.
    pub fn open(&mut self) -> VizResult<()> {
        for chart in ChartId::ALL {
            self.attach(chart);
            self.mount(chart)?;
        }
        info!(records = self.store.len(), "dashboard opened");
        Ok(())
    }

    fn render(&mut self, chart: ChartId) -> VizResult<()> {
        let (controller, store, state) = self.parts(chart);
        controller.render(store, state)
    }

    fn listening(&self, control: Control, chart: ChartId) -> bool {
        self.listeners.listeners(control).contains(&chart)
    }

    /// Apply one UI event.
    pub fn dispatch(&mut self, event: Event) -> VizResult<()> {
        debug!(?event, "dispatch");
        match event {
            Event::SelectAttribute(attribute) => {
                self.state.selected_attribute = attribute;
                for chart in self.listeners.listeners(Control::AttributeSelector).to_vec() {
                    self.render(chart)?;
                }
            }
            Event::SetChecked { variable, checked } => {
                self.state.set_checked(variable, checked)?;
                for chart in self.listeners.listeners(Control::VariableCheckboxes).to_vec() {
                    self.render(chart)?;
                }
            }
            Event::LegendClick(key) => {
                if !self.listening(Control::Legend, ChartId::Pie) {
                    return Err(VizError::NotMounted(ChartId::Pie.to_string()));
                }
                self.pie.toggle_slice(&key)?;
            }
            Event::Brush { axis, selection } => {
                if !self.listening(Control::Brush, ChartId::Parallel) {
                    return Err(VizError::NotMounted(ChartId::Parallel.to_string()));
                }
                self.parallel.brush(axis, selection)?;
            }
            Event::PointerMove { x, y } => {
                if self.listening(Control::Pointer, ChartId::Pie) {
                    self.pie.hover((x, y));
                }
            }
            Event::PointerLeave => {
                if self.listening(Control::Pointer, ChartId::Pie) {
                    self.pie.leave();
                }
            }
            Event::Resize {
                chart,
                viewport,
                at_ms,
            } => {
                self.advance(at_ms);
                let (controller, _, _) = self.parts(chart);
                controller.surface_mut().resize_signal().signal(viewport, at_ms);
                self.flush_resizes()?;
            }
            Event::Tick { at_ms } => {
                self.advance(at_ms);
                self.flush_resizes()?;
            }
        }
        Ok(())
    }

    /// Apply events in order, stopping at the first rejected one.
    pub fn dispatch_all<I>(&mut self, events: I) -> VizResult<()>
    where
        I: IntoIterator<Item = Event>,
    {
        events.into_iter().try_for_each(|event| self.dispatch(event))
    }

    /// Let every pending resize window elapse.
    pub fn settle(&mut self) -> VizResult<()> {
        self.advance(self.clock_ms + RESIZE_QUIET_MS);
        self.flush_resizes()
    }

    fn advance(&mut self, at_ms: u64) {
        if at_ms < self.clock_ms {
            warn!(at_ms, clock_ms = self.clock_ms, "event timestamp is in the past");
        }
        self.clock_ms = self.clock_ms.max(at_ms);
    }

    fn flush_resizes(&mut self) -> VizResult<()> {
        let now = self.clock_ms;
        for chart in ChartId::ALL {
            let (controller, _, _) = self.parts(chart);
            let mounted = controller.surface().is_mounted();
            let Some(viewport) = controller.surface_mut().resize_signal().poll(now) else {
                continue;
            };
            if mounted {
                self.state.set_viewport(chart, viewport);
            }
            let (controller, store, state) = self.parts(chart);
            if controller.resized(store, state)? {
                debug!(%chart, width = viewport.width, height = viewport.height, "resized");
            }
        }
        Ok(())
    }

    /// The chart's scene `frame_ms` into its transitions, or settled.
    pub fn frame(&self, chart: ChartId, frame_ms: Option<u64>) -> Scene {
        let scene = self.controller(chart).surface().scene();
        match frame_ms {
            Some(ms) => scene.frame_at(ms),
            None => scene.settled(),
        }
    }

    /// Standalone page with every chart and its controls.
    pub fn to_html(&self, frame_ms: Option<u64>) -> Result<String> {
        let mut body = String::new();
        for chart in ChartId::ALL {
            let controller = self.controller(chart);
            let svg = graph::render_svg(&self.frame(chart, frame_ms))
                .with_context(|| format!("Failed to render {} chart", chart))?;
            body.push_str(&controller.fragment(&self.state).replace(SURFACE_SLOT, &svg));
            body.push('\n');
        }

        let tooltip = match self.pie.tooltip() {
            Some(t) => format!(
                "<div id='tooltip' style='position: absolute; opacity: 1; left: {}px; top: {}px;'>{}</div>",
                t.x,
                t.y,
                escape_html(&t.text)
            ),
            None => "<div id='tooltip' style='position: absolute; opacity: 0;'></div>".to_string(),
        };

        Ok(page("Student Mental Health", &format!("{}{}", body, tooltip)))
    }
}

/// Page shown instead of the charts when the dataset cannot be loaded.
pub fn failure_html(err: &dyn fmt::Display) -> String {
    page(
        "Student Mental Health",
        &format!(
            "<div class='load-error'><h1>Could not load the dataset</h1><p>{}</p></div>",
            escape_html(&err.to_string())
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>{}</title>\n\
         <style>.chart-container {{ margin: 10px; }} #tooltip {{ background: #fff; border: 1px solid #ccc; padding: 4px; }}</style>\n\
         </head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;
    use crate::record::{Attribute, Variable, YesNo};

    fn store() -> RowStore {
        let mut male = record(YesNo::No, Some("2.00 - 2.49"));
        male.gender = Some("Male".to_string());
        RowStore::new(vec![
            record(YesNo::Yes, Some("3.50 - 4.00")),
            male,
            record(YesNo::Yes, Some("2.50 - 2.99")),
        ])
        .unwrap()
    }

    fn opened() -> Dashboard {
        let mut dashboard = Dashboard::new(store(), &DashboardConfig::default());
        dashboard.open().unwrap();
        dashboard
    }

    #[test]
    fn test_open_registers_listeners() {
        let dashboard = opened();
        assert_eq!(
            dashboard.listeners().listeners(Control::AttributeSelector),
            &[ChartId::Histogram, ChartId::Pie]
        );
        assert_eq!(
            dashboard.listeners().listeners(Control::Brush),
            &[ChartId::Parallel]
        );
    }

    #[test]
    fn test_mount_before_attach_fails() {
        let mut dashboard = Dashboard::new(store(), &DashboardConfig::default());
        assert_eq!(
            dashboard.mount(ChartId::Pie).unwrap_err(),
            VizError::NotAttached("pie".to_string())
        );
        assert!(dashboard.listeners().listeners(Control::Legend).is_empty());
    }

    #[test]
    fn test_selector_rerenders_histogram_and_pie() {
        let mut dashboard = opened();
        dashboard.dispatch(Event::SelectAttribute(Attribute::Gender)).unwrap();

        assert_eq!(dashboard.histogram().surface().redraws(), 2);
        assert_eq!(dashboard.pie().surface().redraws(), 2);
        assert_eq!(dashboard.parallel().surface().redraws(), 1);

        let categories: Vec<&str> = dashboard
            .histogram()
            .series()
            .iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Female", "Male"]);
        assert_eq!(dashboard.pie().slices().len(), 1);
        assert_eq!(dashboard.pie().slices()[0].count, 2);
    }

    #[test]
    fn test_legend_toggle_round_trip() {
        let mut dashboard = opened();
        let before = dashboard.frame(ChartId::Pie, None);

        dashboard.dispatch(Event::LegendClick("2.50 - 2.99".to_string())).unwrap();
        assert_eq!(dashboard.pie().visible_slices().len(), 1);

        dashboard.dispatch(Event::LegendClick("2.50 - 2.99".to_string())).unwrap();
        assert_eq!(dashboard.frame(ChartId::Pie, None), before);
    }

    #[test]
    fn test_brush_routes_to_parallel() {
        let mut dashboard = opened();
        dashboard
            .dispatch(Event::Brush {
                axis: Variable::Depression,
                selection: Some((380.0, 420.0)),
            })
            .unwrap();
        assert_eq!(dashboard.parallel().highlighted_records(), vec![0, 2]);

        dashboard
            .dispatch(Event::Brush {
                axis: Variable::Depression,
                selection: None,
            })
            .unwrap();
        assert_eq!(dashboard.parallel().highlighted_records(), vec![0, 1, 2]);
    }

    #[test]
    fn test_uncheck_removes_axis() {
        let mut dashboard = opened();
        dashboard
            .dispatch(Event::SetChecked {
                variable: Variable::Year,
                checked: false,
            })
            .unwrap();
        assert_eq!(
            dashboard.parallel().axes(),
            &[Variable::Gender, Variable::Gpa, Variable::Age, Variable::Depression]
        );
        assert_eq!(dashboard.parallel().surface().redraws(), 2);

        let err = dashboard
            .dispatch(Event::SetChecked {
                variable: Variable::Depression,
                checked: false,
            })
            .unwrap_err();
        assert_eq!(err, VizError::DepressionLocked);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut dashboard = opened();
        // Pie at 700x400: center (350, 200), radius 133
        dashboard.dispatch(Event::PointerMove { x: 380.0, y: 200.0 }).unwrap();
        assert_eq!(
            dashboard.pie().tooltip().map(|t| t.text.as_str()),
            Some("3.50 - 4.00: 1 (50.0%)")
        );
        let html = dashboard.to_html(None).unwrap();
        assert!(html.contains("opacity: 1"));

        dashboard.dispatch(Event::PointerLeave).unwrap();
        assert!(dashboard.pie().tooltip().is_none());
    }

    #[test]
    fn test_resize_burst_rebuilds_once() {
        let mut dashboard = opened();
        for (at_ms, width) in [(10, 600), (50, 650), (90, 800)] {
            dashboard
                .dispatch(Event::Resize {
                    chart: ChartId::Pie,
                    viewport: Viewport::new(width, 500),
                    at_ms,
                })
                .unwrap();
        }
        dashboard.dispatch(Event::Tick { at_ms: 150 }).unwrap();
        assert_eq!(dashboard.pie().surface().redraws(), 1);

        dashboard.dispatch(Event::Tick { at_ms: 190 }).unwrap();
        assert_eq!(dashboard.pie().surface().redraws(), 2);
        assert_eq!(dashboard.state().viewport(ChartId::Pie), Viewport::new(800, 500));
        assert_eq!(dashboard.pie().surface().scene().width, 800);
        assert_eq!(dashboard.histogram().surface().redraws(), 1);
    }

    #[test]
    fn test_legend_and_brush_before_mount_rejected() {
        let mut dashboard = Dashboard::new(store(), &DashboardConfig::default());
        assert_eq!(
            dashboard.dispatch(Event::LegendClick("3.50 - 4.00".to_string())).unwrap_err(),
            VizError::NotMounted("pie".to_string())
        );
        assert_eq!(
            dashboard
                .dispatch(Event::Brush {
                    axis: Variable::Depression,
                    selection: Some((380.0, 420.0)),
                })
                .unwrap_err(),
            VizError::NotMounted("parallel".to_string())
        );
    }

    #[test]
    fn test_resize_before_mount_is_noop() {
        let mut dashboard = Dashboard::new(store(), &DashboardConfig::default());
        dashboard.attach(ChartId::Histogram);
        dashboard
            .dispatch(Event::Resize {
                chart: ChartId::Histogram,
                viewport: Viewport::new(300, 200),
                at_ms: 0,
            })
            .unwrap();
        dashboard.settle().unwrap();

        assert_eq!(dashboard.histogram().surface().redraws(), 0);
        assert_eq!(
            dashboard.state().viewport(ChartId::Histogram),
            Viewport::new(700, 400)
        );
    }

    #[test]
    fn test_settle_flushes_pending_resize() {
        let mut dashboard = opened();
        dashboard
            .dispatch(Event::Resize {
                chart: ChartId::Parallel,
                viewport: Viewport::new(900, 450),
                at_ms: 5,
            })
            .unwrap();
        dashboard.settle().unwrap();
        assert_eq!(dashboard.parallel().surface().scene().height, 450);
    }

    #[test]
    fn test_config_with_size() {
        let config = DashboardConfig::default().with_size(Some(500), None);
        assert_eq!(config.viewports[&ChartId::Parallel], Viewport::new(500, 500));
        assert_eq!(config.viewports[&ChartId::Pie], Viewport::new(500, 400));
    }

    #[test]
    fn test_to_html_contains_every_chart() {
        let dashboard = opened();
        let html = dashboard.to_html(None).unwrap();
        assert!(html.contains("id='attribute-dropdown'"));
        assert!(html.contains("id='container2'"));
        assert!(html.contains("id='container3'"));
        assert_eq!(html.matches("<svg").count(), 3);
        assert!(!html.contains(SURFACE_SLOT));
    }

    #[test]
    fn test_failure_html_escapes_message() {
        let html = failure_html(&VizError::MissingColumn {
            column: "Age".to_string(),
            available: "<none>".to_string(),
        });
        assert!(html.contains("Could not load the dataset"));
        assert!(html.contains("&lt;none&gt;"));
    }
}
