//! Playback driver: maps a host frame clock onto a looping timeline position.
//!
//! The host supplies a [`Ticker`] ("call me on the next frame"). The driver
//! anchors the first frame it sees, reduces the elapsed time modulo the
//! timeline duration and hands the loop-relative time to the caller's
//! `on_tick` callback, then schedules the next frame.
//!
//! Everything here is single-threaded. Driver state is shared with the
//! scheduled callbacks through `Rc<RefCell<_>>`, and a generation counter makes
//! sure a frame scheduled before `stop()` can never reach the callback, even
//! when the host ticker is unable to cancel it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::PlaybackError;

/// Callback handed to a ticker. Receives the host's monotonic timestamp in ms.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Token identifying a scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Host scheduling primitive.
pub trait Ticker {
    /// Run `callback` once on the next frame.
    fn schedule(&self, callback: FrameCallback) -> TickHandle;

    /// Cancel a frame that has not fired yet. Unknown handles are ignored.
    fn cancel(&self, handle: TickHandle);
}

/// Reduce elapsed playback time into `[0, duration)`.
///
/// Returns 0 for a duration that is not positive and finite, and for a
/// non-finite elapsed time.
pub fn loop_time(elapsed: f64, duration: f64) -> f64 {
    if !(duration > 0.0) || !duration.is_finite() || !elapsed.is_finite() {
        return 0.0;
    }
    let time = elapsed.rem_euclid(duration);
    // rem_euclid can round up to exactly `duration` for tiny negative inputs
    if time >= duration { 0.0 } else { time }
}

/// Elapsed-time bookkeeping for a looping timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopClock {
    duration: f64,
    anchor: Option<f64>,
}

impl LoopClock {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            anchor: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether a start time has been recorded.
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }

    /// Loop-relative time at `now`. The first call anchors the clock.
    pub fn advance(&mut self, now: f64) -> f64 {
        let anchor = *self.anchor.get_or_insert(now);
        loop_time(now - anchor, self.duration)
    }

    /// Forget the anchor so the next `advance` starts a fresh baseline.
    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

type TickCallback = Rc<RefCell<dyn FnMut(f64)>>;

struct DriverState {
    clock: LoopClock,
    pending: Option<TickHandle>,
    on_tick: Option<TickCallback>,
    generation: u64,
    playing: bool,
}

/// Drives a looping timeline from a host [`Ticker`].
///
/// Clones share the same playback state, so a clone can be moved into the
/// `on_tick` callback to stop playback from inside a frame.
pub struct PlaybackDriver<T: Ticker + 'static> {
    ticker: Rc<T>,
    state: Rc<RefCell<DriverState>>,
}

impl<T: Ticker + 'static> Clone for PlaybackDriver<T> {
    fn clone(&self) -> Self {
        Self {
            ticker: Rc::clone(&self.ticker),
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Ticker + 'static> fmt::Debug for PlaybackDriver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PlaybackDriver")
            .field("clock", &state.clock)
            .field("pending", &state.pending)
            .field("playing", &state.playing)
            .finish()
    }
}

impl<T: Ticker + 'static> PlaybackDriver<T> {
    pub fn new(ticker: Rc<T>) -> Self {
        Self {
            ticker,
            state: Rc::new(RefCell::new(DriverState {
                clock: LoopClock::new(0.0),
                pending: None,
                on_tick: None,
                generation: 0,
                playing: false,
            })),
        }
    }

    pub fn ticker(&self) -> &Rc<T> {
        &self.ticker
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Start or stop playback.
    ///
    /// With `is_playing == false` this is `stop()`. Otherwise any previous run
    /// is stopped and a new one begins; its first frame reports time 0.
    /// A duration that is not positive and finite is rejected and the driver
    /// is left stopped.
    pub fn start<F>(&self, is_playing: bool, duration: f64, on_tick: F) -> Result<(), PlaybackError>
    where
        F: FnMut(f64) + 'static,
    {
        if !is_playing {
            self.stop();
            return Ok(());
        }

        if !(duration > 0.0) || !duration.is_finite() {
            tracing::warn!(duration, "rejected playback duration");
            self.stop();
            return Err(PlaybackError::InvalidDuration(duration));
        }

        self.halt();
        let generation = {
            let mut state = self.state.borrow_mut();
            state.clock = LoopClock::new(duration);
            state.on_tick = Some(Rc::new(RefCell::new(on_tick)));
            state.playing = true;
            state.generation
        };

        tracing::debug!(duration, "playback started");
        Self::schedule_frame(&self.ticker, &self.state, generation);
        Ok(())
    }

    /// Stop playback, cancel the pending frame and drop the callback.
    pub fn stop(&self) {
        if self.halt() {
            tracing::debug!("playback stopped");
        }
    }

    /// Returns whether playback was running.
    fn halt(&self) -> bool {
        let (pending, on_tick, was_playing) = {
            let mut state = self.state.borrow_mut();
            state.generation = state.generation.wrapping_add(1);
            state.clock.reset();
            let was_playing = std::mem::replace(&mut state.playing, false);
            (state.pending.take(), state.on_tick.take(), was_playing)
        };

        if let Some(handle) = pending {
            self.ticker.cancel(handle);
        }
        // Dropped outside the borrow; the callback may own a driver clone
        drop(on_tick);
        was_playing
    }

    fn schedule_frame(ticker: &Rc<T>, state: &Rc<RefCell<DriverState>>, generation: u64) {
        let weak_ticker = Rc::downgrade(ticker);
        let weak_state = Rc::downgrade(state);
        let handle = ticker.schedule(Box::new(move |now| {
            if let (Some(ticker), Some(state)) = (weak_ticker.upgrade(), weak_state.upgrade()) {
                Self::run_frame(&ticker, &state, generation, now);
            }
        }));

        let mut state = state.borrow_mut();
        if state.generation == generation {
            state.pending = Some(handle);
        }
    }

    fn run_frame(ticker: &Rc<T>, state: &Rc<RefCell<DriverState>>, generation: u64, now: f64) {
        let (time, on_tick) = {
            let mut state = state.borrow_mut();
            if state.generation != generation || !state.playing {
                return;
            }
            state.pending = None;
            let Some(on_tick) = state.on_tick.clone() else {
                return;
            };
            (state.clock.advance(now), on_tick)
        };

        // No driver borrow is held here, so the callback may stop or restart
        (&mut *on_tick.borrow_mut())(time);

        let current = {
            let state = state.borrow();
            state.generation == generation && state.playing
        };
        if current {
            Self::schedule_frame(ticker, state, generation);
        }
    }
}

/// A ticker that fires only when told to.
///
/// Useful for tests and for hosts that run their own frame loop.
#[derive(Default)]
pub struct ManualTicker {
    next_handle: Cell<u64>,
    pending: RefCell<Vec<(TickHandle, FrameCallback)>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next `fire`.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every callback scheduled so far with timestamp `now`.
    ///
    /// Callbacks scheduled while firing wait for the next call. Returns how
    /// many callbacks ran.
    pub fn fire(&self, now: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(now);
        }
        count
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("pending", &self.pending())
            .finish()
    }
}

impl Ticker for ManualTicker {
    fn schedule(&self, callback: FrameCallback) -> TickHandle {
        let handle = TickHandle(self.next_handle.get() + 1);
        self.next_handle.set(handle.0);
        self.pending.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        self.pending.borrow_mut().retain(|(pending, _)| *pending != handle);
    }
}
