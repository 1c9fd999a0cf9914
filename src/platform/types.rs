use crate::models::ActivityKind;
use std::time::Duration;

/// Reads how long the user has been away from the input devices.
pub trait InputProbe: Send {
    /// Time since the last user input, or `None` when the platform cannot tell.
    fn idle_time(&mut self) -> Option<Duration>;

    /// The activity kind reported when input is seen.
    fn input_kind(&self) -> ActivityKind {
        ActivityKind::UserInput
    }
}
