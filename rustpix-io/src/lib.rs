//! The pipeline driver: byte-region adapters, pipeline configuration, and
//! the C3->C4->C5->C6->C7 orchestration across a raw TPX3 region, in both
//! single-threaded and `rayon`-parallel modes.

mod config;
mod driver;
mod error;
mod reader;
mod region;

pub use config::{PeakFitterKind, PipelineConfig};
pub use driver::{run_parallel, run_sequential, Diagnostics, PipelineOutput};
pub use error::{Error, Result};
pub use reader::read_file;
pub use region::{ByteRegion, MappedRegion};
