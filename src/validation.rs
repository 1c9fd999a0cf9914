use crate::constants::{MAX_HEARTBEAT_SECS, MAX_NUDGE_PIXELS};
use crate::error::AppError;

/// Validate the heartbeat interval in seconds.
pub fn validate_heartbeat_secs(secs: u64) -> Result<(), AppError> {
    if secs == 0 {
        return Err(AppError::InvalidInput {
            field: "heartbeat_interval_secs",
            reason: "must be positive".into(),
        });
    }
    if secs > MAX_HEARTBEAT_SECS {
        return Err(AppError::InvalidInput {
            field: "heartbeat_interval_secs",
            reason: format!("cannot exceed {MAX_HEARTBEAT_SECS} seconds"),
        });
    }
    Ok(())
}

/// Validate the sampling interval against the heartbeat interval.
pub fn validate_sample_secs(sample_secs: u64, heartbeat_secs: u64) -> Result<(), AppError> {
    if sample_secs == 0 {
        return Err(AppError::InvalidInput {
            field: "sample_interval_secs",
            reason: "must be positive".into(),
        });
    }
    if sample_secs > heartbeat_secs {
        return Err(AppError::InvalidInput {
            field: "sample_interval_secs",
            reason: format!("cannot exceed the heartbeat interval ({heartbeat_secs}s)"),
        });
    }
    Ok(())
}

/// Validate the nudge offset in pixels.
pub fn validate_nudge_pixels(pixels: i16) -> Result<(), AppError> {
    if !(1..=MAX_NUDGE_PIXELS).contains(&pixels) {
        return Err(AppError::InvalidInput {
            field: "nudge_pixels",
            reason: format!("must be 1-{MAX_NUDGE_PIXELS}"),
        });
    }
    Ok(())
}
