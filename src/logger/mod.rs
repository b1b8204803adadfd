//! Process-wide `tracing` setup. Library code only uses the re-exported
//! macros; the subscriber is installed once by the binary.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
