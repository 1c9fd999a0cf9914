use super::InputProbe;
use crate::error::AppError;
use crate::mover::PointerInjector;
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use log::debug;
use std::time::Duration;
use user_idle::UserIdle;

fn event_source() -> Option<CGEventSource> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState).ok()
}

fn pointer_location() -> Option<CGPoint> {
    let source = event_source()?;
    CGEvent::new(source).ok().map(|event| event.location())
}

/// HID idle time, reset by any keyboard, pointer or trackpad input.
pub struct MacOSProbe;

impl MacOSProbe {
    pub fn connect() -> Result<Self, AppError> {
        UserIdle::get_time()
            .map_err(|e| AppError::SourceUnavailable(format!("cannot read HID idle time: {e}")))?;
        Ok(Self)
    }
}

impl InputProbe for MacOSProbe {
    fn idle_time(&mut self) -> Option<Duration> {
        match UserIdle::get_time() {
            Ok(idle) => Some(Duration::from_secs(u64::from(idle.as_seconds()))),
            Err(e) => {
                debug!("Failed to get idle time: {e}");
                None
            }
        }
    }
}

pub struct MacOSInjector {
    pixels: f64,
}

impl MacOSInjector {
    pub fn new(pixels: i16) -> Self {
        Self {
            pixels: f64::from(pixels),
        }
    }

    fn post_move(to: CGPoint) -> Result<(), AppError> {
        let source = event_source()
            .ok_or_else(|| AppError::Injection("cannot create event source".into()))?;
        let event =
            CGEvent::new_mouse_event(source, CGEventType::MouseMoved, to, CGMouseButton::Left)
                .map_err(|()| AppError::Injection("cannot create mouse event".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}

impl PointerInjector for MacOSInjector {
    fn nudge(&self) -> Result<(), AppError> {
        let origin = pointer_location()
            .ok_or_else(|| AppError::Injection("cannot read pointer location".into()))?;
        Self::post_move(CGPoint::new(origin.x + self.pixels, origin.y + self.pixels))?;
        Self::post_move(origin)
    }
}
