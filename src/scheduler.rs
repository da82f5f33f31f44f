//! Repaint scheduling
//!
//! While the face is visible and interactive a single one-shot deadline is
//! kept armed at the next whole-second boundary. Firing it requests a redraw
//! and arms the next one, so the chain runs until the face is hidden or
//! enters ambient mode. Aligning to the boundary instead of sleeping a flat
//! period keeps the chain from drifting.

use crate::system::config::INTERACTIVE_UPDATE_RATE_MS;

/// Identifies one arming of the repaint deadline.
///
/// A fire carrying an old token belongs to a cancelled deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerToken(u32);

/// The armed repaint deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRepaint {
    pub token: TimerToken,
    /// Wall-clock time to fire at, in milliseconds since the epoch.
    pub deadline_ms: i64,
}

impl PendingRepaint {
    /// Milliseconds left until the deadline, zero once it has passed.
    pub fn remaining_ms(&self, now_ms: i64) -> u64 {
        self.deadline_ms.saturating_sub(now_ms).max(0) as u64
    }
}

/// Outcome of a timer fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fired {
    /// The armed deadline fired; the face should be redrawn.
    Redraw,
    /// The deadline was cancelled or re-armed since; nothing to do.
    Stale,
}

/// Delay from `now_ms` to the next multiple of `rate_ms`, in `(0, rate_ms]`.
pub fn delay_until_next_tick(now_ms: i64, rate_ms: u32) -> u32 {
    let rate = rate_ms.max(1);
    rate - now_ms.rem_euclid(rate as i64) as u32
}

#[derive(Debug)]
pub struct RepaintScheduler {
    rate_ms: u32,
    visible: bool,
    ambient: bool,
    pending: Option<PendingRepaint>,
    next_token: u32,
}

impl Default for RepaintScheduler {
    fn default() -> Self {
        Self::new(INTERACTIVE_UPDATE_RATE_MS)
    }
}

impl RepaintScheduler {
    /// Hidden, interactive and idle.
    pub fn new(rate_ms: u32) -> Self {
        Self {
            rate_ms: rate_ms.max(1),
            visible: false,
            ambient: false,
            pending: None,
            next_token: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_ambient(&self) -> bool {
        self.ambient
    }

    /// Whether the repaint chain should be running.
    pub fn should_run(&self) -> bool {
        self.visible && !self.ambient
    }

    pub fn pending(&self) -> Option<PendingRepaint> {
        self.pending
    }

    pub fn set_visible(&mut self, visible: bool, now_ms: i64) -> Option<PendingRepaint> {
        self.visible = visible;
        self.reconcile(now_ms)
    }

    pub fn set_ambient(&mut self, ambient: bool, now_ms: i64) -> Option<PendingRepaint> {
        self.ambient = ambient;
        self.reconcile(now_ms)
    }

    /// The host's low-frequency tick; realigns the deadline if one is armed.
    pub fn on_time_tick(&mut self, now_ms: i64) -> Option<PendingRepaint> {
        self.reconcile(now_ms)
    }

    /// Handle a fire of the deadline armed with `token`.
    pub fn on_timer_fired(&mut self, token: TimerToken, now_ms: i64) -> Fired {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.reconcile(now_ms);
                Fired::Redraw
            }
            _ => {
                trace!("Ignoring stale repaint timer");
                Fired::Stale
            }
        }
    }

    /// Stop the chain for good, e.g. when the face is destroyed.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancel whatever is armed, then arm a fresh deadline if the chain
    /// should run.
    pub fn reconcile(&mut self, now_ms: i64) -> Option<PendingRepaint> {
        self.pending = None;

        if self.should_run() {
            let delay = delay_until_next_tick(now_ms, self.rate_ms);
            self.next_token = self.next_token.wrapping_add(1);
            self.pending = Some(PendingRepaint {
                token: TimerToken(self.next_token),
                deadline_ms: now_ms.saturating_add(delay as i64),
            });
        }
        self.pending
    }
}
