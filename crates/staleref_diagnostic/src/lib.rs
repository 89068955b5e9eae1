//! Logging setup and use-after-free finding reporting for staleref.

mod finding;
mod logging;

pub use finding::{Finding, FindingSite};
pub use logging::init;
