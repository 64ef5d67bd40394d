//! Process lifecycle: cancellation from signals and wall-clock deadlines.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
