pub mod types;

pub use types::InputProbe;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub use macos::{MacOSInjector as NativeInjector, MacOSProbe as NativeProbe};

#[cfg(target_os = "linux")]
pub use linux::{LinuxInjector as NativeInjector, LinuxProbe as NativeProbe};

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub use unsupported::{UnsupportedInjector as NativeInjector, UnsupportedProbe as NativeProbe};

// Stub for other platforms: never sees input, never manages to move.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
mod unsupported {
    use super::InputProbe;
    use crate::error::AppError;
    use crate::mover::PointerInjector;
    use std::time::Duration;

    pub struct UnsupportedProbe;

    impl UnsupportedProbe {
        pub fn connect() -> Result<Self, AppError> {
            Ok(Self)
        }
    }

    impl InputProbe for UnsupportedProbe {
        fn idle_time(&mut self) -> Option<Duration> {
            None
        }
    }

    pub struct UnsupportedInjector;

    impl UnsupportedInjector {
        pub fn new(_pixels: i16) -> Self {
            Self
        }
    }

    impl PointerInjector for UnsupportedInjector {
        fn nudge(&self) -> Result<(), AppError> {
            Err(AppError::Injection(
                "pointer injection is not supported on this platform".into(),
            ))
        }
    }
}
