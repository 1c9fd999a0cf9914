pub mod activity;
pub mod state;

pub use activity::{ActivityKind, Heartbeat};
pub use state::{unix_secs, MachineState, StatusResponse};
