// Event script parser module

pub mod event;
pub mod lexer;

// Public API re-exports
pub use event::{parse_event, parse_script};
