mod controller;
mod debounce;
mod report;

pub use controller::Pipeline;
pub use debounce::debounce;
pub use report::{RunOutcome, RunReport};
