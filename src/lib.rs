// Library exports for moodgraph

pub mod aggregate;
pub mod charts;
pub mod csv_reader;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod ir;
pub mod palette;
pub mod parser;
pub mod record;
pub mod scale;
pub mod selection;

pub use dashboard::{Dashboard, DashboardConfig};
pub use error::{VizError, VizResult};
