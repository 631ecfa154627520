pub mod bbox;
pub mod config;
pub mod error;
pub mod eval;
pub mod io;
pub mod shelf;

pub use bbox::{BBox, ImageBoxMap};
pub use config::{EvalConfig, RowGapConfig};
pub use error::Error;
pub use eval::{evaluate, EvalReport};
pub use shelf::OosDetector;
