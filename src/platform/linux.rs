use super::InputProbe;
use crate::error::AppError;
use crate::mover::PointerInjector;
use log::warn;
use std::time::Duration;
use x11rb::connection::Connection;
use x11rb::protocol::screensaver;
use x11rb::protocol::xproto::{Window, MOTION_NOTIFY_EVENT};
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;

fn connect() -> Result<(RustConnection, Window), String> {
    let (conn, screen_num) =
        x11rb::connect(None).map_err(|e| format!("Failed to connect to X server: {e}"))?;
    // Validate screen_num is within bounds to avoid potential panic
    let root = conn
        .setup()
        .roots
        .get(screen_num)
        .map(|screen| screen.root)
        .ok_or_else(|| {
            format!(
                "Invalid screen number {} (only {} screens available)",
                screen_num,
                conn.setup().roots.len()
            )
        })?;
    Ok((conn, root))
}

/// Idle time from the X11 screensaver extension.
pub struct LinuxProbe {
    conn: RustConnection,
    root: Window,
}

impl LinuxProbe {
    pub fn connect() -> Result<Self, AppError> {
        let (conn, root) = connect().map_err(AppError::SourceUnavailable)?;

        // Without the extension every sample would silently read as "no input".
        screensaver::query_version(&conn, 1, 1)
            .map_err(|e| AppError::SourceUnavailable(format!("screensaver extension: {e}")))?
            .reply()
            .map_err(|e| AppError::SourceUnavailable(format!("screensaver extension: {e}")))?;

        Ok(Self { conn, root })
    }
}

impl InputProbe for LinuxProbe {
    fn idle_time(&mut self) -> Option<Duration> {
        let info = screensaver::query_info(&self.conn, self.root)
            .ok()
            .and_then(|cookie| cookie.reply().ok())?;

        Some(Duration::from_millis(u64::from(info.ms_since_user_input)))
    }
}

/// Moves the pointer with XTEST relative motion, which also resets the X idle timer.
pub struct LinuxInjector {
    conn: Option<RustConnection>,
    pixels: i16,
}

impl LinuxInjector {
    pub fn new(pixels: i16) -> Self {
        match connect() {
            Ok((conn, _root)) => Self {
                conn: Some(conn),
                pixels,
            },
            Err(e) => {
                // Log the error but don't panic - every nudge then fails and is counted.
                // This allows the app to run on Wayland or headless systems
                warn!("{e}. Pointer injection disabled.");
                Self { conn: None, pixels }
            }
        }
    }

    fn relative_motion(conn: &RustConnection, dx: i16, dy: i16) -> Result<(), AppError> {
        conn.xtest_fake_input(MOTION_NOTIFY_EVENT, 1, x11rb::CURRENT_TIME, x11rb::NONE, dx, dy, 0)
            .map_err(|e| AppError::Injection(e.to_string()))?
            .check()
            .map_err(|e| AppError::Injection(e.to_string()))
    }
}

impl PointerInjector for LinuxInjector {
    fn nudge(&self) -> Result<(), AppError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| AppError::Injection("no X server connection".into()))?;

        Self::relative_motion(conn, self.pixels, self.pixels)?;
        Self::relative_motion(conn, -self.pixels, -self.pixels)
    }
}
