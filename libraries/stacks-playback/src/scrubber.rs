//! Scrubber seek control state machine
//!
//! Pan-gesture seeking with momentum: idle, dragging, then decelerating,
//! with an orthogonal "scrub session open" flag that spans from gesture
//! begin through deceleration settle. While a session is open the playback
//! clock must not drive the value; the session closes only when momentum
//! settles, which is when `FinishScrubbing` fires and consumers commit the
//! actual seek.

use crate::events::ScrubberEvent;
use std::collections::VecDeque;
use std::time::Duration;

/// Divisor applied to raw pan translation before mapping to track width.
/// Tames the remote trackpad's high delta rate.
const PAN_SENSITIVITY_DIVISOR: f64 = 4.0;

/// Per-tick velocity decay while decelerating.
const DECELERATION_RATE: f64 = 0.92;

/// Cap on release velocity, points per second.
const DECELERATION_MAX_VELOCITY: f64 = 1000.0;

/// Deceleration stops once |velocity| drops below this, points per second.
const DECELERATION_STOP_THRESHOLD: f64 = 1.0;

/// Accessibility step as a fraction of the full range.
const ACCESSIBILITY_STEP_FRACTION: f64 = 0.05;

/// Seconds to animate a full-range value sweep.
const FULL_SWEEP_ANIMATION_SECS: f64 = 1.0;

/// Gesture/deceleration phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubPhase {
    /// No gesture in flight
    Idle,

    /// Finger down, tracking translation
    Dragging,

    /// Finger up, momentum still moving the value
    Decelerating,
}

/// Seek control state machine.
///
/// Emits [`ScrubberEvent`]s into an internal queue; the owning session
/// drains them with [`Scrubber::take_events`]. Value-to-label text is
/// pull-based via the optional formatter, since it returns data rather
/// than signaling a transition.
pub struct Scrubber {
    min: f64,
    max: f64,
    value: f64,
    phase: ScrubPhase,
    session_open: bool,
    focused: bool,
    track_width: f64,
    origin_percentage: f64,
    velocity: f64,
    events: VecDeque<ScrubberEvent>,
    text_formatter: Option<Box<dyn Fn(f64) -> String + Send>>,
}

impl std::fmt::Debug for Scrubber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scrubber")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("value", &self.value)
            .field("phase", &self.phase)
            .field("session_open", &self.session_open)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl Scrubber {
    /// Create a scrubber over `[min, max]` with the value at `min`.
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max: max.max(min),
            value: min,
            phase: ScrubPhase::Idle,
            session_open: false,
            focused: false,
            track_width: 1000.0,
            origin_percentage: 0.0,
            velocity: 0.0,
            events: VecDeque::new(),
            text_formatter: None,
        }
    }

    fn distance(&self) -> f64 {
        self.max - self.min
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Value as a fraction of the range, 0 when the range is empty.
    pub fn percentage(&self) -> f64 {
        let distance = self.distance();
        if distance <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / distance
    }

    /// Whether a scrub session is open (dragging or decelerating).
    ///
    /// The playback clock must not write the value while this holds.
    pub fn has_open_session(&self) -> bool {
        self.session_open
    }

    /// Current phase.
    pub fn phase(&self) -> ScrubPhase {
        self.phase
    }

    /// Whether momentum is still moving the value.
    pub fn is_decelerating(&self) -> bool {
        self.phase == ScrubPhase::Decelerating
    }

    /// Set the layout width the pan translation maps onto.
    pub fn set_track_width(&mut self, width: f64) {
        if width > 0.0 {
            self.track_width = width;
        }
    }

    /// Install the value-to-label formatter.
    pub fn set_text_formatter(&mut self, formatter: Box<dyn Fn(f64) -> String + Send>) {
        self.text_formatter = Some(formatter);
    }

    /// Label text for the current value, if a formatter is installed.
    pub fn current_text(&self) -> Option<String> {
        self.text_formatter.as_ref().map(|f| f(self.value))
    }

    /// Raise the upper bound, clamping the value into the new range.
    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(self.min);
        let clamped = self.value.clamp(self.min, self.max);
        if (clamped - self.value).abs() > f64::EPSILON {
            self.value = clamped;
        }
        // Redraw with the re-derived distance
        self.events.push_back(ScrubberEvent::ValueChanged {
            value: self.value,
            animation: None,
        });
    }

    /// Assign a value, clamped to the bounds.
    ///
    /// With `animated`, the emitted event carries a duration proportional to
    /// the distance moved: a full-range sweep animates for one second. A
    /// zero-width range makes assignment a no-op (guards divide-by-zero in
    /// the duration math).
    pub fn set_value(&mut self, value: f64, animated: bool) {
        let distance = self.distance();
        if distance <= 0.0 {
            return;
        }

        let clamped = value.clamp(self.min, self.max);
        let animation = if animated {
            let swept = (clamped - self.value).abs() / distance;
            Some(Duration::from_secs_f64(swept * FULL_SWEEP_ANIMATION_SECS))
        } else {
            None
        };

        self.value = clamped;
        self.events.push_back(ScrubberEvent::ValueChanged {
            value: self.value,
            animation,
        });
    }

    /// Assign by fraction of the range, clamped to `[0, 1]`.
    pub fn set_percentage(&mut self, percentage: f64) {
        let target = self.distance() * percentage.clamp(0.0, 1.0) + self.min;
        self.set_value(target, false);
    }

    /// Gesture began: kill any in-flight deceleration and open a session.
    pub fn begin_drag(&mut self) {
        self.velocity = 0.0;
        self.phase = ScrubPhase::Dragging;
        self.origin_percentage = self.percentage();
        if !self.session_open {
            self.session_open = true;
            self.events.push_back(ScrubberEvent::BeginScrubbing);
        }
    }

    /// Gesture moved: map horizontal translation to a range fraction.
    pub fn drag_changed(&mut self, translation_x: f64) {
        if self.phase != ScrubPhase::Dragging {
            return;
        }
        let delta = (translation_x / PAN_SENSITIVITY_DIVISOR) / self.track_width;
        self.set_percentage(self.origin_percentage + delta);
    }

    /// Gesture ended: capture release velocity and start decelerating.
    ///
    /// The session stays open; `FinishScrubbing` waits for the momentum to
    /// settle via [`Scrubber::tick`].
    pub fn drag_ended(&mut self, velocity_x: f64) {
        if self.phase != ScrubPhase::Dragging {
            return;
        }
        self.velocity = velocity_x.clamp(-DECELERATION_MAX_VELOCITY, DECELERATION_MAX_VELOCITY);
        self.phase = ScrubPhase::Decelerating;
        self.events.push_back(ScrubberEvent::EndScrubbing);

        if self.velocity.abs() < DECELERATION_STOP_THRESHOLD {
            self.settle();
        }
    }

    /// Advance the deceleration by one timer tick.
    ///
    /// Decays the velocity and integrates position; settles (closing the
    /// session) once the velocity falls under the stop threshold.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.phase != ScrubPhase::Decelerating {
            return;
        }

        self.velocity *= DECELERATION_RATE;
        let points = self.velocity * elapsed.as_secs_f64();
        let delta = (points / PAN_SENSITIVITY_DIVISOR) / self.track_width;
        self.set_percentage(self.percentage() + delta);

        if self.velocity.abs() < DECELERATION_STOP_THRESHOLD {
            self.settle();
        }
    }

    /// Tap: cancel momentum and notify. Consumers redirect focus on this,
    /// not position.
    pub fn tap(&mut self) {
        if self.phase == ScrubPhase::Decelerating {
            // Settle first so the open session doesn't outlive the gesture
            self.settle();
        }
        self.events.push_back(ScrubberEvent::Tap);
    }

    /// Focus moved onto or off the control.
    ///
    /// Losing focus stops any deceleration. While focused, the control
    /// captures left/right directional input instead of letting it reach
    /// grid navigation.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused && self.phase == ScrubPhase::Decelerating {
            self.settle();
        }
    }

    /// Whether directional input should be captured by the control.
    pub fn captures_directional_input(&self) -> bool {
        self.focused
    }

    /// Accessibility step up: a complete synchronous scrub session.
    ///
    /// Fires begin, value change, end, and finish in one call so playback
    /// consumers pause/seek/resume exactly as they would for a gesture.
    pub fn accessibility_increment(&mut self) {
        self.accessibility_step(ACCESSIBILITY_STEP_FRACTION);
    }

    /// Accessibility step down; clamped at the lower bound.
    pub fn accessibility_decrement(&mut self) {
        self.accessibility_step(-ACCESSIBILITY_STEP_FRACTION);
    }

    fn accessibility_step(&mut self, fraction: f64) {
        self.begin_drag();
        let step = self.distance() * fraction;
        self.set_value(self.value + step, false);
        self.phase = ScrubPhase::Idle;
        self.events.push_back(ScrubberEvent::EndScrubbing);
        self.session_open = false;
        self.events.push_back(ScrubberEvent::FinishScrubbing);
    }

    fn settle(&mut self) {
        self.phase = ScrubPhase::Idle;
        self.velocity = 0.0;
        if self.session_open {
            self.session_open = false;
            self.events.push_back(ScrubberEvent::FinishScrubbing);
        }
    }

    /// Drain pending events in emission order.
    pub fn take_events(&mut self) -> Vec<ScrubberEvent> {
        self.events.drain(..).collect()
    }
}
