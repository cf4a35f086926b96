//! The transition state machine.
//!
//! A [`Transition`] drives exactly one show or dismiss animation:
//!
//! ```text
//! Idle ──arm──▶ Armed ──pan began──▶ Animating ──▶ Completed
//!   │                                     │
//!   └────────────run─────────────────────▶└──────▶ Cancelled
//! ```
//!
//! [`Transition::run`] animates on the clock. [`Transition::arm`] attaches a
//! pan handler to a screen; a pan that begins on one of the style's
//! interactive edges asks the navigator to start the dismissal, which then
//! calls [`Transition::begin_interactive`]. From there the gesture moves the
//! animation by percent until it ends, and the release decides between
//! finishing and cancelling.
//!
//! The completion callback fires exactly once, and every gesture handler the
//! transition attached is removed whichever way it ends.

mod context;
pub mod interactive;
mod style;
pub mod styles;

pub use context::{TransitionContext, TransitionOperation};
pub use interactive::{InteractiveTuning, PanPhase, PanSample};
pub use style::TransitionStyle;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use horizon_waypoint_core::logging::targets;
use horizon_waypoint_core::{AnimationId, Animator, Edges, FrameFn, Orientation, Point, Rect, Signal};

use crate::screen::{GestureId, Screen, ScreenRef};

/// Lifecycle of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    /// A gesture handler is attached and waiting.
    Armed,
    Animating,
    Completed,
    Cancelled,
}

/// State of the interactive part of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    InProgress,
    /// Released past the threshold, running to the end.
    Completing,
    /// Released short of the threshold or aborted, running back.
    Cancelled,
}

/// Terminal callback; `true` when the transition completed.
pub type TransitionCompletion = Box<dyn FnOnce(bool)>;

/// Asks the owner to start the underlying operation interactively.
pub type Starter = Rc<dyn Fn() -> bool>;

#[derive(Debug, Default)]
struct Interaction {
    state: InteractionState,
    start: Point,
    translation: Point,
    percent: f32,
    bounds: Rect,
    animation: Option<AnimationId>,
}

/// A single show or dismiss animation.
pub struct Transition {
    this: Weak<Transition>,
    style: Rc<dyn TransitionStyle>,
    animator: Rc<Animator>,
    tuning: InteractiveTuning,
    duration: Duration,
    operation: Cell<TransitionOperation>,
    phase: Cell<TransitionPhase>,
    interaction: RefCell<Interaction>,
    target: RefCell<Weak<Screen>>,
    starter: RefCell<Option<Starter>>,
    completion: RefCell<Option<TransitionCompletion>>,
    gestures: RefCell<Vec<(Weak<Screen>, GestureId)>>,
    progressed: Signal<f32>,
}

impl Transition {
    /// Create a transition for `operation`.
    ///
    /// `default_duration` applies when the style does not set its own.
    pub fn new(
        style: Rc<dyn TransitionStyle>,
        operation: TransitionOperation,
        animator: Rc<Animator>,
        tuning: InteractiveTuning,
        default_duration: Duration,
    ) -> Rc<Self> {
        let duration = style.duration().unwrap_or(default_duration);
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            style,
            animator,
            tuning,
            duration,
            operation: Cell::new(operation),
            phase: Cell::new(TransitionPhase::Idle),
            interaction: RefCell::new(Interaction::default()),
            target: RefCell::new(Weak::new()),
            starter: RefCell::new(None),
            completion: RefCell::new(None),
            gestures: RefCell::new(Vec::new()),
            progressed: Signal::new(),
        })
    }

    pub fn style_name(&self) -> &str {
        self.style.name()
    }

    pub fn operation(&self) -> TransitionOperation {
        self.operation.get()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.borrow().state
    }

    pub fn orientation(&self) -> Orientation {
        self.style.orientation()
    }

    pub fn interactive_edges(&self) -> Edges {
        self.style.interactive_edges()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether a gesture is driving the animation.
    pub fn is_interactive(&self) -> bool {
        self.interaction.borrow().animation.is_some()
    }

    /// Completion of the interactive part, `0.0` when not interactive.
    pub fn percent(&self) -> f32 {
        self.interaction.borrow().percent
    }

    /// Emitted with eased progress on every frame.
    pub fn progressed(&self) -> &Signal<f32> {
        &self.progressed
    }

    /// The screen whose gestures this transition listens to.
    pub fn target(&self) -> Option<ScreenRef> {
        self.target.borrow().upgrade()
    }

    /// Wait for a pan on `screen` to start the operation interactively.
    ///
    /// Returns `false` when the style has no interactive edges or the
    /// transition was already used; the transition can still be
    /// [`run`](Self::run) in that case.
    pub fn arm(&self, screen: &ScreenRef, starter: Starter) -> bool {
        if self.phase.get() != TransitionPhase::Idle {
            return false;
        }
        *self.target.borrow_mut() = Rc::downgrade(screen);
        if self.style.interactive_edges().is_empty() {
            return false;
        }
        *self.starter.borrow_mut() = Some(starter);

        let weak = self.this.clone();
        let id = screen.add_gesture(Rc::new(move |sample| {
            weak.upgrade()
                .is_some_and(|transition| transition.handle_pan(sample))
        }));
        self.gestures.borrow_mut().push((Rc::downgrade(screen), id));
        self.phase.set(TransitionPhase::Armed);
        tracing::trace!(target: targets::TRANSITION, style = self.style.name(), screen = %screen.id(), "armed");
        true
    }

    /// Animate on the clock.
    pub fn run(&self, context: TransitionContext, completion: TransitionCompletion) {
        if !self.begin(&context, completion) {
            return;
        }
        self.remove_gestures();
        let (frame, duration) = self.frame_for(&context);
        let Some(this) = self.this.upgrade() else {
            return;
        };
        tracing::trace!(target: targets::TRANSITION, style = self.style.name(), operation = %context.operation, ?duration, "running");
        self.animator.animate(
            duration,
            self.style.easing(),
            frame,
            Box::new(move |finished| this.complete(finished)),
        );
    }

    /// Start a percent-driven animation. Only valid while armed.
    pub fn begin_interactive(&self, context: TransitionContext, completion: TransitionCompletion) -> bool {
        if self.phase.get() != TransitionPhase::Armed {
            tracing::debug!(target: targets::TRANSITION, phase = ?self.phase.get(), "interactive start refused");
            return false;
        }
        if !self.begin(&context, completion) {
            return false;
        }
        let (frame, _) = self.frame_for(&context);
        let Some(this) = self.this.upgrade() else {
            return false;
        };
        let id = self.animator.begin_interactive(
            context.duration,
            frame,
            Box::new(move |finished| this.complete(finished)),
        );
        let mut interaction = self.interaction.borrow_mut();
        interaction.animation = Some(id);
        interaction.state = InteractionState::InProgress;
        tracing::trace!(target: targets::TRANSITION, style = self.style.name(), operation = %context.operation, "interactive");
        true
    }

    fn begin(&self, context: &TransitionContext, completion: TransitionCompletion) -> bool {
        match self.phase.get() {
            TransitionPhase::Idle | TransitionPhase::Armed => {}
            phase => {
                tracing::warn!(target: targets::TRANSITION, ?phase, "transition already used");
                return false;
            }
        }
        self.operation.set(context.operation);
        *self.completion.borrow_mut() = Some(completion);
        self.phase.set(TransitionPhase::Animating);
        true
    }

    fn frame_for(&self, context: &TransitionContext) -> (Option<FrameFn>, Duration) {
        let frame = if context.operation.is_modal() {
            self.style.animate_presentation(context)
        } else {
            self.style.animate_navigation(context)
        };
        match frame {
            Some(mut frame) => {
                let weak = self.this.clone();
                let reporting: FrameFn = Box::new(move |progress| {
                    frame(progress);
                    if let Some(transition) = weak.upgrade() {
                        transition.progressed.emit(progress);
                    }
                });
                (Some(reporting), context.duration)
            }
            None => {
                tracing::trace!(target: targets::TRANSITION, style = self.style.name(), "nothing to animate, completing on next tick");
                (None, Duration::ZERO)
            }
        }
    }

    fn interactive_animation(&self) -> Option<AnimationId> {
        let interaction = self.interaction.borrow();
        match interaction.state {
            InteractionState::InProgress => interaction.animation,
            _ => None,
        }
    }

    /// Feed a pan sample. Returns `true` if it was consumed.
    pub fn handle_pan(&self, sample: &PanSample) -> bool {
        match sample.phase {
            PanPhase::Began => self.pan_began(sample),
            PanPhase::Changed => {
                let Some(id) = self.interactive_animation() else {
                    return false;
                };
                let percent = {
                    let mut interaction = self.interaction.borrow_mut();
                    interaction.translation = sample.translation;
                    interaction.percent = interactive::percent_complete(
                        self.style.orientation(),
                        self.style.interactive_edges(),
                        sample.translation,
                        interaction.bounds.size,
                    );
                    interaction.percent
                };
                if let Err(err) = self.animator.update(id, percent) {
                    tracing::warn!(target: targets::TRANSITION, %err, "interactive update failed");
                }
                true
            }
            PanPhase::Ended => {
                let Some(id) = self.interactive_animation() else {
                    return false;
                };
                let (finish, percent) = {
                    let mut interaction = self.interaction.borrow_mut();
                    interaction.translation = sample.translation;
                    let finish = interactive::should_finish(
                        self.style.orientation(),
                        self.style.interactive_edges(),
                        sample.translation,
                        sample.velocity,
                        interaction.bounds.size,
                        &self.tuning,
                    );
                    interaction.state = if finish {
                        InteractionState::Completing
                    } else {
                        InteractionState::Cancelled
                    };
                    (finish, interaction.percent)
                };

                let released = if finish {
                    if let Some(target) = self.target() {
                        target
                            .active_leaf()
                            .notify("will_finish_gesture_dismiss", |c| c.will_finish_gesture_dismiss());
                    }
                    self.animator.finish(id, interactive::finish_speed(percent, &self.tuning))
                } else {
                    self.animator.cancel(id, self.tuning.cancel_speed)
                };
                tracing::trace!(target: targets::TRANSITION, finish, percent, "gesture released");
                if let Err(err) = released {
                    tracing::warn!(target: targets::TRANSITION, %err, "interactive release failed");
                }
                true
            }
            PanPhase::Cancelled | PanPhase::Failed => {
                let Some(id) = self.interactive_animation() else {
                    return false;
                };
                self.interaction.borrow_mut().state = InteractionState::Cancelled;
                if let Err(err) = self.animator.cancel(id, self.tuning.cancel_speed) {
                    tracing::warn!(target: targets::TRANSITION, %err, "interactive cancel failed");
                }
                true
            }
        }
    }

    fn pan_began(&self, sample: &PanSample) -> bool {
        if self.phase.get() != TransitionPhase::Armed {
            return false;
        }
        let Some(target) = self.target() else {
            return false;
        };
        let bounds = target.surface().frame();
        if !self
            .style
            .interactive_edges()
            .hit(bounds, sample.location, self.tuning.edge_zone)
        {
            return false;
        }
        let tracking = target.active_leaf().allows_interactive_dismiss();
        {
            let mut interaction = self.interaction.borrow_mut();
            interaction.start = sample.location;
            interaction.translation = Point::ZERO;
            interaction.percent = 0.0;
            interaction.bounds = bounds;
        }

        let starter = self.starter.borrow().clone();
        let started = starter.is_some_and(|start| start());
        if !started || !self.is_interactive() {
            return false;
        }
        if !tracking {
            tracing::debug!(target: targets::TRANSITION, screen = %target.id(), "screen refused interactive dismiss, finishing at once");
            self.finish_untracked(&target);
        }
        true
    }

    /// Complete a gesture-started dismissal without following the pan.
    fn finish_untracked(&self, target: &ScreenRef) {
        let Some(id) = self.interactive_animation() else {
            return;
        };
        self.interaction.borrow_mut().state = InteractionState::Completing;
        target
            .active_leaf()
            .notify("will_finish_gesture_dismiss", |c| c.will_finish_gesture_dismiss());
        if let Err(err) = self.animator.finish(id, 1.0) {
            tracing::warn!(target: targets::TRANSITION, %err, "untracked finish failed");
        }
    }

    fn complete(&self, finished: bool) {
        let Some(completion) = self.completion.borrow_mut().take() else {
            tracing::warn!(target: targets::TRANSITION, "transition completed twice");
            return;
        };
        self.phase.set(if finished {
            TransitionPhase::Completed
        } else {
            TransitionPhase::Cancelled
        });
        self.remove_gestures();
        self.starter.borrow_mut().take();

        let was_interactive = self.interaction.borrow_mut().animation.take().is_some();
        tracing::trace!(target: targets::TRANSITION, style = self.style.name(), finished, was_interactive, "completed");
        if was_interactive && finished {
            if let Some(target) = self.target() {
                target
                    .active_leaf()
                    .notify("did_finish_gesture_dismiss", |c| c.did_finish_gesture_dismiss());
            }
        }
        completion(finished);
    }

    fn remove_gestures(&self) {
        let gestures = std::mem::take(&mut *self.gestures.borrow_mut());
        for (screen, id) in gestures {
            if let Some(screen) = screen.upgrade() {
                screen.remove_gesture(id);
            }
        }
    }
}

impl Drop for Transition {
    fn drop(&mut self) {
        self.remove_gestures();
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("style", &self.style.name())
            .field("operation", &self.operation.get())
            .field("phase", &self.phase.get())
            .field("interaction", &self.interaction.borrow().state)
            .field("duration", &self.duration)
            .finish()
    }
}
