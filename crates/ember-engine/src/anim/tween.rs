use super::{Ease, Lerp};

/// Lifecycle of a [`Tween`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TweenState {
    /// Not running. Entered through [`Tween::cancel`].
    Idle,
    /// Counting down the pre-start delay; nothing is written yet.
    Delaying,
    /// Interpolating every step.
    Active,
    /// Reached the end value. Terminal until restarted.
    Complete,
}

/// Time-driven interpolation of one value between `from` and `to`.
///
/// Progress is accumulated from the deltas passed to [`Tween::step`] and is
/// clamped to `[0, 1]`. A non-positive duration completes on the first active
/// step.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: f32,
    ease: Ease,
    delay_left: f32,
    elapsed: f32,
    state: TweenState,
    paused: bool,
    current: T,
}

impl<T: Lerp> Tween<T> {
    /// Creates a started tween without delay.
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        let mut tween = Self {
            from,
            to,
            duration,
            ease,
            delay_left: 0.0,
            elapsed: 0.0,
            state: TweenState::Active,
            paused: false,
            current: from,
        };
        tween.start(from, to, duration, ease, 0.0);
        tween
    }

    /// Sets the pre-start delay. Only meaningful before the first step.
    pub fn with_delay(mut self, delay: f32) -> Self {
        if self.elapsed == 0.0 && matches!(self.state, TweenState::Active | TweenState::Delaying) {
            self.delay_left = delay.max(0.0);
            self.state = if self.delay_left > 0.0 {
                TweenState::Delaying
            } else {
                TweenState::Active
            };
        }
        self
    }

    /// (Re)starts the tween, discarding any previous progress.
    pub fn start(&mut self, from: T, to: T, duration: f32, ease: Ease, delay: f32) {
        self.from = from;
        self.to = to;
        self.duration = duration;
        self.ease = ease;
        self.delay_left = delay.max(0.0);
        self.elapsed = 0.0;
        self.paused = false;
        self.current = from;
        self.state = if self.delay_left > 0.0 {
            TweenState::Delaying
        } else {
            TweenState::Active
        };
    }

    /// Advances by `dt` seconds and returns the value to write back, if any.
    ///
    /// Returns `None` while idle, delaying, paused, or after completion.
    pub fn step(&mut self, dt: f32) -> Option<T> {
        if self.paused {
            return None;
        }

        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.state {
            TweenState::Idle | TweenState::Complete => return None,
            TweenState::Delaying => {
                if dt < self.delay_left {
                    self.delay_left -= dt;
                    return None;
                }
                dt -= self.delay_left;
                self.delay_left = 0.0;
                self.state = TweenState::Active;
            }
            TweenState::Active => {}
        }

        if self.duration <= 0.0 {
            self.state = TweenState::Complete;
            self.current = self.to;
            return Some(self.to);
        }

        self.elapsed = (self.elapsed + dt).min(self.duration);
        let progress = self.elapsed / self.duration;

        self.current = if progress >= 1.0 {
            self.state = TweenState::Complete;
            self.to
        } else {
            self.from.lerp(self.to, self.ease.apply(progress))
        };

        Some(self.current)
    }

    /// Advances by `dt` and hands any produced value to `on_step`.
    pub fn step_with(&mut self, dt: f32, mut on_step: impl FnMut(T)) {
        if let Some(v) = self.step(dt) {
            on_step(v);
        }
    }

    /// Stops the tween where it is. The last written value stays in place.
    pub fn cancel(&mut self) {
        if matches!(self.state, TweenState::Active | TweenState::Delaying) {
            self.state = TweenState::Idle;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn state(&self) -> TweenState {
        self.state
    }

    /// True while delaying or interpolating.
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TweenState::Active | TweenState::Delaying)
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.state == TweenState::Complete {
            return 1.0;
        }
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Last value produced (the start value before the first active step).
    #[inline]
    pub fn value(&self) -> T {
        self.current
    }

    #[inline]
    pub fn target(&self) -> T {
        self.to
    }
}

/// Optional active tween for one animatable property.
///
/// Setting a new tween replaces the previous one wholesale; there is no queue.
#[derive(Debug, Clone)]
pub struct TweenSlot<T> {
    active: Option<Tween<T>>,
}

impl<T> Default for TweenSlot<T> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<T: Lerp> TweenSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any running tween with `tween`.
    pub fn set(&mut self, tween: Tween<T>) {
        self.active = Some(tween);
    }

    /// Cancels and drops the running tween, leaving the property as is.
    pub fn cancel(&mut self) {
        if let Some(tween) = self.active.as_mut() {
            tween.cancel();
        }
        self.active = None;
    }

    /// Steps the tween and writes the produced value into `target`.
    ///
    /// The slot empties itself once the tween completes.
    pub fn step(&mut self, dt: f32, target: &mut T) {
        let Some(tween) = self.active.as_mut() else {
            return;
        };

        tween.step_with(dt, |v| *target = v);

        if !tween.is_running() {
            self.active = None;
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(Tween::is_running)
    }

    #[inline]
    pub fn get(&self) -> Option<&Tween<T>> {
        self.active.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut Tween<T>> {
        self.active.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn linear_tween_reaches_target_and_completes() {
        let mut t = Tween::new(0.0f32, 10.0, 1.0, Ease::Linear);
        assert_eq!(t.state(), TweenState::Active);

        assert!(approx(t.step(0.25).unwrap(), 2.5));
        assert!(approx(t.step(0.25).unwrap(), 5.0));
        assert_eq!(t.step(0.5), Some(10.0));
        assert_eq!(t.state(), TweenState::Complete);
        assert_eq!(t.step(0.5), None);
    }

    #[test]
    fn delay_holds_before_interpolation() {
        let mut t = Tween::new(0.0f32, 10.0, 1.0, Ease::Linear).with_delay(0.5);
        assert_eq!(t.state(), TweenState::Delaying);

        assert_eq!(t.step(0.3), None);
        assert_eq!(t.state(), TweenState::Delaying);
        assert_eq!(t.progress(), 0.0);

        // 0.2 of delay left; the remaining 0.3 goes into the active phase.
        assert!(approx(t.step(0.5).unwrap(), 3.0));
        assert_eq!(t.state(), TweenState::Active);
    }

    #[test]
    fn non_positive_duration_completes_immediately() {
        let mut zero = Tween::new(1.0f32, 4.0, 0.0, Ease::Linear);
        assert_eq!(zero.step(0.0), Some(4.0));
        assert_eq!(zero.state(), TweenState::Complete);
        assert_eq!(zero.progress(), 1.0);

        let mut negative = Tween::new(1.0f32, 4.0, -2.0, Ease::OutBounce);
        assert_eq!(negative.step(0.016), Some(4.0));
        assert_eq!(negative.state(), TweenState::Complete);
    }

    #[test]
    fn restart_after_completion() {
        let mut t = Tween::new(0.0f32, 1.0, 0.1, Ease::Linear);
        t.step(1.0);
        assert_eq!(t.state(), TweenState::Complete);

        t.start(1.0, 0.0, 1.0, Ease::Linear, 0.0);
        assert_eq!(t.state(), TweenState::Active);
        assert!(approx(t.step(0.5).unwrap(), 0.5));
    }

    // ── progress ──────────────────────────────────────────────────────────

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let mut t = Tween::new(0.0f32, 1.0, 1.0, Ease::InOutCubic);
        let mut last = t.progress();
        for _ in 0..40 {
            t.step(0.037);
            let p = t.progress();
            assert!(p >= last);
            assert!((0.0..=1.0).contains(&p));
            last = p;
        }
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn oversized_step_does_not_extrapolate() {
        let mut t = Tween::new(Vec2::ZERO, Vec2::new(10.0, 20.0), 1.0, Ease::Linear);
        assert_eq!(t.step(100.0), Some(Vec2::new(10.0, 20.0)));
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn negative_and_nan_deltas_do_not_rewind() {
        let mut t = Tween::new(0.0f32, 1.0, 1.0, Ease::Linear);
        t.step(0.5);
        t.step(-1.0);
        t.step(f32::NAN);
        assert!(approx(t.progress(), 0.5));
    }

    // ── cancel / pause ────────────────────────────────────────────────────

    #[test]
    fn cancel_freezes_value_and_ignores_steps() {
        let mut t = Tween::new(0.0f32, 10.0, 1.0, Ease::Linear);
        let v = t.step(0.4).unwrap();
        t.cancel();

        assert_eq!(t.state(), TweenState::Idle);
        assert_eq!(t.step(0.3), None);
        assert_eq!(t.value(), v);
        assert!(approx(t.progress(), 0.4));
    }

    #[test]
    fn cancel_during_delay_goes_idle() {
        let mut t = Tween::new(0.0f32, 10.0, 1.0, Ease::Linear).with_delay(1.0);
        t.cancel();
        assert_eq!(t.state(), TweenState::Idle);
        assert_eq!(t.step(5.0), None);
    }

    #[test]
    fn pause_holds_progress_until_resume() {
        let mut t = Tween::new(0.0f32, 10.0, 1.0, Ease::Linear);
        t.step(0.2);
        t.pause();
        assert_eq!(t.step(0.5), None);
        assert!(approx(t.progress(), 0.2));
        t.resume();
        assert!(approx(t.step(0.3).unwrap(), 5.0));
    }

    #[test]
    fn step_with_invokes_callback_per_step() {
        let mut t = Tween::new(0.0f32, 1.0, 1.0, Ease::Linear);
        let mut seen = Vec::new();
        for _ in 0..4 {
            t.step_with(0.5, |v| seen.push(v));
        }
        assert_eq!(seen, vec![0.5, 1.0]);
    }

    // ── slot ──────────────────────────────────────────────────────────────

    #[test]
    fn slot_writes_into_target_and_empties_on_completion() {
        let mut slot = TweenSlot::new();
        let mut x = 0.0f32;
        slot.set(Tween::new(x, 2.0, 1.0, Ease::Linear));

        slot.step(0.5, &mut x);
        assert!(approx(x, 1.0));
        assert!(slot.is_running());

        slot.step(0.5, &mut x);
        assert_eq!(x, 2.0);
        assert!(!slot.is_running());
        assert!(slot.get().is_none());
    }

    #[test]
    fn slot_replaces_previous_tween() {
        let mut slot = TweenSlot::new();
        let mut x = 0.0f32;
        slot.set(Tween::new(0.0, 100.0, 1.0, Ease::Linear));
        slot.step(0.5, &mut x);

        slot.set(Tween::new(x, -10.0, 1.0, Ease::Linear));
        slot.step(1.0, &mut x);
        assert_eq!(x, -10.0);
    }

    #[test]
    fn slot_cancel_leaves_property_untouched() {
        let mut slot = TweenSlot::new();
        let mut x = 0.0f32;
        slot.set(Tween::new(0.0, 10.0, 1.0, Ease::Linear));
        slot.step(0.3, &mut x);
        let frozen = x;

        slot.cancel();
        slot.step(0.3, &mut x);
        assert_eq!(x, frozen);
    }
}
