//! Frame-driven animation primitive.
//!
//! [`Animator`] is the headless stand-in for a platform animation engine: it
//! advances property animations when the host calls [`Animator::tick`] and
//! reports each animation's end through a single-shot completion callback.
//!
//! Two kinds of animation are supported:
//!
//! - **Timed** animations started with [`Animator::animate`] advance on every
//!   tick until they reach `1.0`.
//! - **Percent-driven** animations started with [`Animator::begin_interactive`]
//!   stay where they are until [`Animator::update`] moves them, then either
//!   [`Animator::finish`] or [`Animator::cancel`] hands them back to the clock,
//!   running forward to `1.0` or backward to `0.0` at the given speed.
//!
//! Completion callbacks never run synchronously from the call that scheduled
//! the animation. Even a zero-length animation completes on the next tick.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use horizon_waypoint_core::{Animator, Easing};
//!
//! let animator = Animator::new();
//! let done = Rc::new(Cell::new(false));
//! let flag = done.clone();
//! animator.animate(
//!     Duration::from_millis(100),
//!     Easing::Linear,
//!     None,
//!     Box::new(move |finished| flag.set(finished)),
//! );
//!
//! animator.tick(Duration::from_millis(50));
//! assert!(!done.get());
//! animator.tick(Duration::from_millis(50));
//! assert!(done.get());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::easing::{ease, Easing};
use crate::error::{CoreError, Result};
use crate::logging::targets;

new_key_type! {
    /// Identifies a scheduled animation until its completion callback fires.
    pub struct AnimationId;
}

/// Per-frame callback receiving eased progress in `0.0..=1.0`.
pub type FrameFn = Box<dyn FnMut(f32)>;

/// Terminal callback. `true` when the animation reached its end, `false`
/// when it was cancelled back to its start.
pub type FinishFn = Box<dyn FnOnce(bool)>;

/// Upper bound on ticks performed by [`Animator::run_until_idle`].
const MAX_IDLE_TICKS: usize = 100_000;

/// How an animation advances on each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drive {
    /// Run toward `1.0`, `speed` times the nominal rate.
    Forward { speed: f32 },
    /// Run back toward `0.0`, `speed` times the nominal rate.
    Reverse { speed: f32 },
    /// Held in place; moved only by [`Animator::update`].
    Interactive,
}

struct Running {
    duration: Duration,
    easing: Easing,
    percent: f32,
    drive: Drive,
    frame: Option<Rc<RefCell<FrameFn>>>,
    finish: Option<FinishFn>,
}

/// Schedules and advances animations on the UI thread.
pub struct Animator {
    running: RefCell<SlotMap<AnimationId, Running>>,
    ticks: Cell<u64>,
}

impl Animator {
    /// Create an animator with nothing scheduled.
    pub fn new() -> Self {
        Self {
            running: RefCell::new(SlotMap::with_key()),
            ticks: Cell::new(0),
        }
    }

    /// Schedule a timed animation.
    ///
    /// `frame` is applied immediately at progress `0.0` and then once per tick.
    pub fn animate(
        &self,
        duration: Duration,
        easing: Easing,
        frame: Option<FrameFn>,
        finish: FinishFn,
    ) -> AnimationId {
        self.insert(duration, easing, Drive::Forward { speed: 1.0 }, frame, finish)
    }

    /// Schedule a percent-driven animation that waits for [`update`](Self::update).
    pub fn begin_interactive(
        &self,
        duration: Duration,
        frame: Option<FrameFn>,
        finish: FinishFn,
    ) -> AnimationId {
        self.insert(duration, Easing::Linear, Drive::Interactive, frame, finish)
    }

    /// Run `task` on the next tick.
    pub fn defer<F>(&self, task: F) -> AnimationId
    where
        F: FnOnce() + 'static,
    {
        self.animate(
            Duration::ZERO,
            Easing::Linear,
            None,
            Box::new(move |_| task()),
        )
    }

    fn insert(
        &self,
        duration: Duration,
        easing: Easing,
        drive: Drive,
        frame: Option<FrameFn>,
        finish: FinishFn,
    ) -> AnimationId {
        let frame = frame.map(|f| Rc::new(RefCell::new(f)));
        let id = self.running.borrow_mut().insert(Running {
            duration,
            easing,
            percent: 0.0,
            drive,
            frame: frame.clone(),
            finish: Some(finish),
        });
        tracing::trace!(target: targets::ANIMATOR, ?id, ?duration, ?drive, "animation scheduled");

        if let Some(frame) = frame {
            (frame.borrow_mut())(ease(easing, 0.0));
        }
        id
    }

    /// Move a percent-driven animation to `percent` and apply its frame.
    pub fn update(&self, id: AnimationId, percent: f32) -> Result<()> {
        let (frame, eased) = {
            let mut running = self.running.borrow_mut();
            let anim = running.get_mut(id).ok_or(CoreError::UnknownAnimation(id))?;
            if anim.drive != Drive::Interactive {
                return Err(CoreError::NotInteractive(id));
            }
            anim.percent = percent.clamp(0.0, 1.0);
            (anim.frame.clone(), ease(anim.easing, anim.percent))
        };

        if let Some(frame) = frame {
            (frame.borrow_mut())(eased);
        }
        Ok(())
    }

    /// Hand a percent-driven animation back to the clock, running to the end.
    pub fn finish(&self, id: AnimationId, speed: f32) -> Result<()> {
        self.release(id, Drive::Forward {
            speed: speed.max(f32::EPSILON),
        })
    }

    /// Hand a percent-driven animation back to the clock, reverting to the start.
    pub fn cancel(&self, id: AnimationId, speed: f32) -> Result<()> {
        self.release(id, Drive::Reverse {
            speed: speed.max(f32::EPSILON),
        })
    }

    fn release(&self, id: AnimationId, drive: Drive) -> Result<()> {
        let mut running = self.running.borrow_mut();
        let anim = running.get_mut(id).ok_or(CoreError::UnknownAnimation(id))?;
        if anim.drive != Drive::Interactive {
            return Err(CoreError::NotInteractive(id));
        }
        anim.drive = drive;
        tracing::trace!(target: targets::ANIMATOR, ?id, ?drive, percent = anim.percent, "interactive animation released");
        Ok(())
    }

    /// Current linear progress of an animation.
    pub fn percent(&self, id: AnimationId) -> Option<f32> {
        self.running.borrow().get(id).map(|a| a.percent)
    }

    /// Whether the animation is still scheduled.
    pub fn is_running(&self, id: AnimationId) -> bool {
        self.running.borrow().contains_key(id)
    }

    /// Whether the animation is waiting for percent updates.
    pub fn is_interactive(&self, id: AnimationId) -> bool {
        self.running
            .borrow()
            .get(id)
            .is_some_and(|a| a.drive == Drive::Interactive)
    }

    /// Number of scheduled animations, interactive ones included.
    pub fn len(&self) -> usize {
        self.running.borrow().len()
    }

    /// Whether nothing at all is scheduled.
    pub fn is_empty(&self) -> bool {
        self.running.borrow().is_empty()
    }

    /// Whether any animation will advance on the next tick.
    pub fn has_pending_ticks(&self) -> bool {
        self.running
            .borrow()
            .values()
            .any(|a| a.drive != Drive::Interactive)
    }

    /// Total number of ticks processed.
    pub fn tick_count(&self) -> u64 {
        self.ticks.get()
    }

    /// Advance every clock-driven animation by `dt`.
    ///
    /// Frames are applied first, then completion callbacks run in scheduling
    /// order. No internal borrow is held while callbacks run, so callbacks may
    /// schedule new animations; those start advancing on the following tick.
    ///
    /// Returns the number of animations that completed.
    pub fn tick(&self, dt: Duration) -> usize {
        self.ticks.set(self.ticks.get() + 1);

        let mut frames = Vec::new();
        let mut done = Vec::new();
        {
            let mut running = self.running.borrow_mut();
            for (id, anim) in running.iter_mut() {
                let step = if anim.duration.is_zero() {
                    f32::INFINITY
                } else {
                    dt.as_secs_f32() / anim.duration.as_secs_f32()
                };

                match anim.drive {
                    Drive::Interactive => continue,
                    Drive::Forward { speed } => {
                        anim.percent = (anim.percent + step * speed).min(1.0);
                        if anim.percent >= 1.0 {
                            done.push((id, true));
                        }
                    }
                    Drive::Reverse { speed } => {
                        anim.percent = (anim.percent - step * speed).max(0.0);
                        if anim.percent <= 0.0 {
                            done.push((id, false));
                        }
                    }
                }

                if let Some(frame) = &anim.frame {
                    frames.push((frame.clone(), ease(anim.easing, anim.percent)));
                }
            }
        }

        for (frame, progress) in frames {
            (frame.borrow_mut())(progress);
        }

        let finished: Vec<(FinishFn, bool)> = {
            let mut running = self.running.borrow_mut();
            done.into_iter()
                .filter_map(|(id, reached_end)| {
                    let anim = running.remove(id)?;
                    tracing::trace!(target: targets::ANIMATOR, ?id, reached_end, "animation finished");
                    anim.finish.map(|cb| (cb, reached_end))
                })
                .collect()
        };

        let count = finished.len();
        for (callback, reached_end) in finished {
            callback(reached_end);
        }
        count
    }

    /// Tick in `step` increments until only interactive animations remain.
    ///
    /// Returns the number of ticks performed.
    pub fn run_until_idle(&self, step: Duration) -> usize {
        let mut ticks = 0;
        while self.has_pending_ticks() && ticks < MAX_IDLE_TICKS {
            self.tick(step);
            ticks += 1;
        }
        if ticks == MAX_IDLE_TICKS {
            tracing::warn!(target: targets::ANIMATOR, "animator did not settle");
        }
        ticks
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<f32>>>, FrameFn) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, Box::new(move |p| sink.borrow_mut().push(p)))
    }

    fn outcome() -> (Rc<Cell<Option<bool>>>, FinishFn) {
        let slot = Rc::new(Cell::new(None));
        let sink = slot.clone();
        (slot, Box::new(move |finished| sink.set(Some(finished))))
    }

    #[test]
    fn test_timed_animation_applies_initial_frame() {
        let animator = Animator::new();
        let (frames, frame) = recorder();
        let (_, finish) = outcome();
        animator.animate(Duration::from_millis(100), Easing::Linear, Some(frame), finish);
        assert_eq!(*frames.borrow(), vec![0.0]);
    }

    #[test]
    fn test_timed_animation_completes_once() {
        let animator = Animator::new();
        let (frames, frame) = recorder();
        let (result, finish) = outcome();
        let id = animator.animate(Duration::from_millis(100), Easing::Linear, Some(frame), finish);

        assert_eq!(animator.tick(Duration::from_millis(40)), 0);
        assert_eq!(result.get(), None);
        assert_eq!(animator.tick(Duration::from_millis(80)), 1);
        assert_eq!(result.get(), Some(true));
        assert!(!animator.is_running(id));
        assert_eq!(frames.borrow().last().copied(), Some(1.0));

        assert_eq!(animator.tick(Duration::from_millis(80)), 0);
    }

    #[test]
    fn test_zero_duration_completes_on_next_tick() {
        let animator = Animator::new();
        let (result, finish) = outcome();
        animator.animate(Duration::ZERO, Easing::Linear, None, finish);
        assert_eq!(result.get(), None);
        animator.tick(Duration::ZERO);
        assert_eq!(result.get(), Some(true));
    }

    #[test]
    fn test_defer_runs_on_next_tick() {
        let animator = Animator::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        animator.defer(move || flag.set(true));
        assert!(!ran.get());
        animator.tick(Duration::from_millis(16));
        assert!(ran.get());
    }

    #[test]
    fn test_interactive_holds_until_released() {
        let animator = Animator::new();
        let (frames, frame) = recorder();
        let (result, finish) = outcome();
        let id = animator.begin_interactive(Duration::from_millis(100), Some(frame), finish);

        animator.tick(Duration::from_secs(1));
        assert!(animator.is_interactive(id));
        assert!(!animator.has_pending_ticks());

        animator.update(id, 0.4).unwrap();
        assert_eq!(frames.borrow().last().copied(), Some(0.4));

        animator.finish(id, 1.0).unwrap();
        animator.run_until_idle(Duration::from_millis(16));
        assert_eq!(result.get(), Some(true));
    }

    #[test]
    fn test_interactive_cancel_reverts_to_start() {
        let animator = Animator::new();
        let (frames, frame) = recorder();
        let (result, finish) = outcome();
        let id = animator.begin_interactive(Duration::from_millis(100), Some(frame), finish);

        animator.update(id, 0.3).unwrap();
        animator.cancel(id, 0.5).unwrap();
        animator.run_until_idle(Duration::from_millis(10));

        assert_eq!(result.get(), Some(false));
        assert_eq!(frames.borrow().last().copied(), Some(0.0));
    }

    #[test]
    fn test_update_rejects_timed_and_unknown() {
        let animator = Animator::new();
        let (_, finish) = outcome();
        let id = animator.animate(Duration::from_millis(10), Easing::Linear, None, finish);
        assert_eq!(animator.update(id, 0.5), Err(CoreError::NotInteractive(id)));

        animator.run_until_idle(Duration::from_millis(10));
        assert_eq!(animator.update(id, 0.5), Err(CoreError::UnknownAnimation(id)));
    }

    #[test]
    fn test_callbacks_may_schedule_more_work() {
        let animator = Rc::new(Animator::new());
        let second = Rc::new(Cell::new(false));
        let (chained, flag) = (animator.clone(), second.clone());
        animator.defer(move || {
            chained.defer(move || flag.set(true));
        });

        animator.tick(Duration::ZERO);
        assert!(!second.get());
        animator.tick(Duration::ZERO);
        assert!(second.get());
    }
}
