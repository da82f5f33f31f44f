//! Face engine: the lifecycle entry points a host calls into

use chrono::FixedOffset;
use embedded_graphics::{
    geometry::Size,
    pixelcolor::{PixelColor, Rgb888},
};

use crate::{
    scheduler::{Fired, PendingRepaint, RepaintScheduler, TimerToken},
    system::config::FaceConfig,
    ui::{analog_watchface::AnalogWatchface, background::Bitmap, Canvas, ClockAngles},
    Error, RenderError,
};

/// Capabilities the device reports for its display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProperties {
    /// Ambient mode has fewer color bits; anti-aliasing would dither.
    pub low_bit_ambient: bool,
    /// Reported by the host but currently unused by the face.
    pub burn_in_protection: bool,
}

/// Services the platform provides to the face.
pub trait Host {
    /// Wall-clock time, milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Current local time zone.
    fn local_offset(&self) -> FixedOffset;

    /// Ask for `on_draw` to be called at the next frame.
    fn invalidate(&mut self);

    /// Start delivering `on_time_zone_changed`.
    fn register_time_zone_listener(&mut self) {}

    fn unregister_time_zone_listener(&mut self) {}
}

/// One instance of the face, driven by host callbacks on a single thread.
pub struct WatchFaceEngine<C, H> {
    host: H,
    face: AnalogWatchface<C>,
    scheduler: RepaintScheduler,
    properties: DeviceProperties,
    offset: FixedOffset,
    zone_listener_registered: bool,
}

impl<C, H> WatchFaceEngine<C, H>
where
    C: PixelColor + From<Rgb888> + Into<Rgb888>,
    H: Host,
{
    /// Set up the face. A missing background is fatal here rather than per frame.
    pub fn create(background: Bitmap<C>, config: FaceConfig, host: H) -> Result<Self, Error> {
        let face = AnalogWatchface::new(background, &config)?;
        let offset = host.local_offset();
        info!("Watch face created");

        Ok(Self {
            host,
            face,
            scheduler: RepaintScheduler::new(config.update_rate_ms),
            properties: DeviceProperties::default(),
            offset,
            zone_listener_registered: false,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn face(&self) -> &AnalogWatchface<C> {
        &self.face
    }

    pub fn scheduler(&self) -> &RepaintScheduler {
        &self.scheduler
    }

    pub fn properties(&self) -> DeviceProperties {
        self.properties
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn is_zone_listener_registered(&self) -> bool {
        self.zone_listener_registered
    }

    /// The armed repaint deadline, if any.
    pub fn next_deadline(&self) -> Option<PendingRepaint> {
        self.scheduler.pending()
    }

    pub fn on_properties_changed(&mut self, properties: DeviceProperties) {
        debug!("Low-bit ambient: {}", properties.low_bit_ambient);
        self.properties = properties;
        let ambient = self.scheduler.is_ambient();
        self.face
            .style_mut()
            .apply_ambient(ambient, properties.low_bit_ambient);
    }

    pub fn on_time_tick(&mut self) {
        self.host.invalidate();
        let now = self.host.now_millis();
        self.scheduler.on_time_tick(now);
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        info!("Ambient mode: {}", ambient);
        self.face
            .style_mut()
            .apply_ambient(ambient, self.properties.low_bit_ambient);
        self.host.invalidate();
        let now = self.host.now_millis();
        self.scheduler.set_ambient(ambient, now);
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        debug!("Visible: {}", visible);
        if visible {
            self.register_zone_listener();
            // The zone may have changed while hidden
            self.offset = self.host.local_offset();
        } else {
            self.unregister_zone_listener();
        }

        let now = self.host.now_millis();
        self.scheduler.set_visible(visible, now);
    }

    pub fn on_surface_changed(&mut self, size: Size) {
        debug!("Surface changed to {}x{}", size.width, size.height);
        self.face.on_surface_changed(size);
    }

    pub fn on_time_zone_changed(&mut self) {
        self.offset = self.host.local_offset();
        debug!("UTC offset now {}s", self.offset.local_minus_utc());
        self.host.invalidate();
    }

    /// Deadline `token` expired. Requests a redraw and re-arms if it is still current.
    pub fn on_timer_fired(&mut self, token: TimerToken) -> Fired {
        let now = self.host.now_millis();
        let fired = self.scheduler.on_timer_fired(token, now);
        if fired == Fired::Redraw {
            self.host.invalidate();
        }
        fired
    }

    /// Draw the current time onto `canvas`.
    pub fn on_draw<K>(&mut self, canvas: &mut K) -> Result<ClockAngles, RenderError<K::Error>>
    where
        K: Canvas<C>,
    {
        let now = self.host.now_millis();
        self.face
            .render(canvas, now, &self.offset, self.scheduler.is_ambient())
    }

    /// Stop repainting and release host resources. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.scheduler.cancel();
        self.unregister_zone_listener();
        info!("Watch face destroyed");
    }

    fn register_zone_listener(&mut self) {
        if self.zone_listener_registered {
            return;
        }
        self.zone_listener_registered = true;
        self.host.register_time_zone_listener();
    }

    fn unregister_zone_listener(&mut self) {
        if !self.zone_listener_registered {
            return;
        }
        self.zone_listener_registered = false;
        self.host.unregister_time_zone_listener();
    }
}
