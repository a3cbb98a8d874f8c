// UI events and the listener registry of each control.

use std::collections::HashMap;

use crate::record::{Attribute, Variable};
use crate::selection::{ChartId, Viewport};

/// Event sources a chart can subscribe to when it mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// The shared attribute dropdown.
    AttributeSelector,
    VariableCheckboxes,
    Legend,
    Brush,
    Pointer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectAttribute(Attribute),
    SetChecked { variable: Variable, checked: bool },
    LegendClick(String),
    /// Pixel extent on an axis; `None` clears the brush.
    Brush {
        axis: Variable,
        selection: Option<(f64, f64)>,
    },
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Resize {
        chart: ChartId,
        viewport: Viewport,
        at_ms: u64,
    },
    Tick { at_ms: u64 },
}

impl Event {
    /// The control that emits this event, if any.
    pub fn control(&self) -> Option<Control> {
        match self {
            Event::SelectAttribute(_) => Some(Control::AttributeSelector),
            Event::SetChecked { .. } => Some(Control::VariableCheckboxes),
            Event::LegendClick(_) => Some(Control::Legend),
            Event::Brush { .. } => Some(Control::Brush),
            Event::PointerMove { .. } | Event::PointerLeave => Some(Control::Pointer),
            Event::Resize { .. } | Event::Tick { .. } => None,
        }
    }
}

/// Which charts listen to which control, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    by_control: HashMap<Control, Vec<ChartId>>,
}

impl Listeners {
    pub fn listen(&mut self, control: Control, chart: ChartId) {
        let charts = self.by_control.entry(control).or_default();
        if !charts.contains(&chart) {
            charts.push(chart);
        }
    }

    pub fn listeners(&self, control: Control) -> &[ChartId] {
        self.by_control
            .get(&control)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listeners_dedupe_and_order() {
        let mut l = Listeners::default();
        l.listen(Control::AttributeSelector, ChartId::Histogram);
        l.listen(Control::AttributeSelector, ChartId::Pie);
        l.listen(Control::AttributeSelector, ChartId::Histogram);
        assert_eq!(
            l.listeners(Control::AttributeSelector),
            &[ChartId::Histogram, ChartId::Pie]
        );
        assert!(l.listeners(Control::Brush).is_empty());
    }

    #[test]
    fn test_event_control() {
        assert_eq!(
            Event::SelectAttribute(Attribute::Age).control(),
            Some(Control::AttributeSelector)
        );
        assert_eq!(Event::PointerLeave.control(), Some(Control::Pointer));
        assert_eq!(Event::Tick { at_ms: 5 }.control(), None);
    }
}
