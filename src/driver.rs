//! Embassy task glue
//!
//! Runs a face on firmware: lifecycle events arrive over a channel, the
//! repaint deadline is awaited with an embassy timer and frames are drawn
//! whenever the face asked for one.

use chrono::{DateTime, Utc};
use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Duration, Timer};
use embedded_graphics::{
    geometry::Size,
    pixelcolor::{PixelColor, Rgb888},
};

use crate::{
    engine::{DeviceProperties, Host, WatchFaceEngine},
    system::time::{TimeManager, TimeReference},
    ui::Canvas,
    RenderError,
};

/// Lifecycle events delivered by the rest of the firmware.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceEvent {
    Properties(DeviceProperties),
    /// Once-per-minute tick from the system clock.
    TimeTick,
    Ambient(bool),
    Visibility(bool),
    SurfaceChanged(Size),
    /// The local zone moved to `utc_offset_secs` east of UTC.
    TimeZoneChanged { utc_offset_secs: i32 },
    /// The wall clock was set, e.g. from a paired phone.
    ClockSet { utc_millis: i64 },
    Destroy,
}

/// `Host` backed by the device clock; redraw requests are collected for the task.
#[derive(Debug)]
pub struct TaskHost {
    time: TimeManager,
    redraw: bool,
    zone_listener: bool,
}

impl TaskHost {
    pub fn new(time: TimeManager) -> Self {
        Self {
            time,
            redraw: false,
            zone_listener: false,
        }
    }

    pub fn time(&self) -> &TimeManager {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut TimeManager {
        &mut self.time
    }

    /// Whether a redraw is wanted, clearing the request.
    pub fn take_redraw(&mut self) -> bool {
        core::mem::take(&mut self.redraw)
    }
}

impl Host for TaskHost {
    fn now_millis(&self) -> i64 {
        self.time.now_millis()
    }

    fn local_offset(&self) -> chrono::FixedOffset {
        self.time.offset()
    }

    fn invalidate(&mut self) {
        self.redraw = true;
    }

    fn register_time_zone_listener(&mut self) {
        self.zone_listener = true;
    }

    fn unregister_time_zone_listener(&mut self) {
        self.zone_listener = false;
    }
}

/// Drive `engine` until a `FaceEvent::Destroy` arrives.
pub async fn run<M, C, K, const N: usize>(
    engine: &mut WatchFaceEngine<C, TaskHost>,
    canvas: &mut K,
    events: &Channel<M, FaceEvent, N>,
) -> Result<(), RenderError<K::Error>>
where
    M: RawMutex,
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
    K: Canvas<C>,
{
    info!("Watch face task started");
    loop {
        let event = match engine.next_deadline() {
            Some(pending) => {
                let wait = pending.remaining_ms(engine.host().now_millis());
                match select(events.receive(), Timer::after(Duration::from_millis(wait))).await {
                    Either::First(event) => Some(event),
                    Either::Second(()) => {
                        engine.on_timer_fired(pending.token);
                        None
                    }
                }
            }
            None => Some(events.receive().await),
        };

        if let Some(event) = event {
            if !handle_event(engine, event) {
                info!("Watch face task stopped");
                return Ok(());
            }
        }

        if engine.host_mut().take_redraw() {
            engine.on_draw(canvas)?;
        }
    }
}

/// Apply one event. Returns `false` once the face is destroyed.
fn handle_event<C>(engine: &mut WatchFaceEngine<C, TaskHost>, event: FaceEvent) -> bool
where
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
{
    match event {
        FaceEvent::Properties(properties) => engine.on_properties_changed(properties),
        FaceEvent::TimeTick => engine.on_time_tick(),
        FaceEvent::Ambient(ambient) => engine.on_ambient_mode_changed(ambient),
        FaceEvent::Visibility(visible) => {
            engine.on_visibility_changed(visible);
            // The frame on screen may be from before the face was hidden
            if visible {
                engine.host_mut().invalidate();
            }
        }
        FaceEvent::SurfaceChanged(size) => {
            engine.on_surface_changed(size);
            engine.host_mut().invalidate();
        }
        FaceEvent::TimeZoneChanged { utc_offset_secs } => {
            if let Err(_err) = engine.host_mut().time_mut().set_offset(utc_offset_secs) {
                warn!("Ignoring time zone change: {}", _err);
                return true;
            }
            // Hidden faces pick the new zone up when they become visible
            if engine.host().zone_listener {
                engine.on_time_zone_changed();
            }
        }
        FaceEvent::ClockSet { utc_millis } => {
            if DateTime::<Utc>::from_timestamp_millis(utc_millis).is_none() {
                warn!("Ignoring clock set to {}ms: out of range", utc_millis);
                return true;
            }
            engine
                .host_mut()
                .time_mut()
                .set_time(TimeReference::from_millis(utc_millis));
            // Realigns the repaint deadline to the new clock
            engine.on_time_tick();
        }
        FaceEvent::Destroy => {
            engine.destroy();
            return false;
        }
    }
    true
}
