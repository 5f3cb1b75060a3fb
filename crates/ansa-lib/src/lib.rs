pub mod classify;
pub mod conditioning;
pub mod detectors;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod signal;

pub use classify::*;
pub use conditioning::*;
pub use pipeline::*;
pub use signal::*;
