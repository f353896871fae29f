mod coordinator;
mod epoch;

pub use coordinator::{BatchOutcome, GeocodeCoordinator, GeocodeResult};
pub use epoch::{Epoch, EpochClock};
