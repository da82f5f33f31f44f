//! Analog watch face core: repaint scheduling, clock-hand geometry and a
//! cached background, driven by host lifecycle callbacks.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod driver;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod system;
pub mod ui;

pub use engine::{DeviceProperties, Host, WatchFaceEngine};
pub use error::{Error, RenderError};
pub use scheduler::{Fired, PendingRepaint, RepaintScheduler, TimerToken};
