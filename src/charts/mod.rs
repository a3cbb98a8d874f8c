// Chart controllers: each owns a drawing surface and redraws it from
// the row store and the current selections.

pub mod histogram;
pub mod parallel;
pub mod pie;

mod axis;

pub use histogram::HistogramController;
pub use parallel::ParallelCoordinatesController;
pub use pie::{PieChartController, Tooltip};

use tracing::debug;

use crate::debounce::{Debouncer, RESIZE_QUIET_MS};
use crate::error::{VizError, VizResult};
use crate::interaction::Control;
use crate::ir::Scene;
use crate::record::RowStore;
use crate::selection::{ChartId, SelectionState, Viewport};

/// Placeholder in a fragment where the rendered surface is inserted.
pub const SURFACE_SLOT: &str = "<!-- surface -->";

/// A chart's drawing surface and its mount lifecycle.
#[derive(Debug, Clone)]
pub struct Surface {
    chart: ChartId,
    attached: bool,
    mounted: bool,
    scene: Scene,
    resize: Debouncer,
    redraws: usize,
}

impl Surface {
    pub fn new(chart: ChartId) -> Self {
        Surface {
            chart,
            attached: false,
            mounted: false,
            scene: Scene::new(0, 0),
            resize: Debouncer::new(RESIZE_QUIET_MS),
            redraws: 0,
        }
    }

    pub fn chart(&self) -> ChartId {
        self.chart
    }

    /// Mark the container markup as inserted into the document.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Number of full clears since creation.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Remove everything and start an empty scene of the given size.
    pub(crate) fn clear(&mut self, viewport: Viewport) -> &mut Scene {
        self.redraws += 1;
        self.scene = Scene::new(viewport.width, viewport.height);
        &mut self.scene
    }

    pub fn resize_signal(&mut self) -> &mut Debouncer {
        &mut self.resize
    }
}

/// Mount contract shared by every chart.
pub trait ChartController {
    fn id(&self) -> ChartId;

    fn surface(&self) -> &Surface;

    fn surface_mut(&mut self) -> &mut Surface;

    /// Controls whose events this chart listens to once mounted.
    fn controls(&self) -> &'static [Control];

    /// Container markup, including chart-local controls.
    fn fragment(&self, state: &SelectionState) -> String;

    /// Clear the surface and rebuild it from the current selections.
    fn render(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<()>;

    /// First render; the fragment must already be attached.
    fn mount(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<()> {
        if !self.surface().is_attached() {
            return Err(VizError::NotAttached(self.id().to_string()));
        }
        self.surface_mut().mounted = true;
        debug!(chart = %self.id(), "mounted");
        self.render(store, state)
    }

    /// Apply a settled viewport change; a no-op until the chart is mounted.
    fn resized(&mut self, store: &RowStore, state: &SelectionState) -> VizResult<bool> {
        if !self.surface().is_mounted() {
            debug!(chart = %self.id(), "resize before first render ignored");
            return Ok(false);
        }
        self.render(store, state)?;
        Ok(true)
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
