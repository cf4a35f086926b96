//! Navigators: the show / dismiss / goto / deep-link state machine.
//!
//! Each [`Navigator`] owns one [`NavigationStack`]. The root navigator
//! manages the window's root screen and its modal chain; scoped navigators
//! are created for the children of tab and split containers so that every
//! tab keeps its own history. A [`NavigationContext`] ties them together
//! with the registries, the animator and the "current navigator" pointer.
//!
//! Operations move through
//!
//! ```text
//! Idle ──▶ Resolving ──▶ Transitioning ──▶ Committing ──▶ Idle
//!                              │
//!                              └──▶ Cancelled ──▶ Idle   (aborted gesture)
//! ```
//!
//! The structural change of a show is committed before `open` returns; the
//! completion callback fires from the animator once the transition has
//! finished. Dismissals take their entries off the stack eagerly and put
//! them back if an interactive gesture is cancelled.

mod context;
mod deep_link;
mod dismiss;
mod goto;
mod show;

pub use context::{NavigationContext, UrlOpener, UrlResolver};

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_waypoint_core::logging::targets;

use crate::page::DisplayMode;
use crate::screen::{Screen, ScreenId, ScreenRef};
use crate::stack::NavigationStack;
use crate::transition::{Starter, TransitionOperation};
use crate::window::Window;

/// Phase of the operation a navigator is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigatorState {
    #[default]
    Idle,
    /// Instantiating screens and wiring containers.
    Resolving,
    /// Waiting for the transition to finish.
    Transitioning,
    /// Applying the result of a finished transition.
    Committing,
    /// An interactive dismissal was aborted; the stack is being restored.
    Cancelled,
}

/// Kind of an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Show,
    Dismiss,
}

/// Parameters of the operation in flight, for introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation {
    /// Monotonic per navigator.
    pub sequence: u64,
    pub kind: OperationKind,
    pub animated: bool,
    /// Requested mode of a show.
    pub mode: Option<DisplayMode>,
    /// Level of a dismissal.
    pub level: Option<isize>,
}

/// Notifications emitted on [`NavigationContext::events`].
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// A show finished its transition.
    Shown {
        screen: ScreenId,
        type_name: String,
        mode: DisplayMode,
    },
    /// A dismissal completed. Screens are listed bottom first.
    Dismissed { screens: Vec<ScreenId> },
    /// An interactive dismissal was aborted.
    DismissCancelled { screen: ScreenId },
    /// `goto` selected a child of a tab or split container.
    Selected { container: ScreenId, index: usize },
    /// A screen name did not resolve and a placeholder was used.
    ResolutionFailed { requested: String },
}

/// What [`Navigator::back_to`] returns to.
#[derive(Debug, Clone)]
pub enum BackTarget {
    /// A specific screen instance.
    Screen(ScreenRef),
    /// The most recent screen with this type name.
    Type(String),
}

impl From<ScreenRef> for BackTarget {
    fn from(screen: ScreenRef) -> Self {
        BackTarget::Screen(screen)
    }
}

impl From<&ScreenRef> for BackTarget {
    fn from(screen: &ScreenRef) -> Self {
        BackTarget::Screen(screen.clone())
    }
}

impl From<&str> for BackTarget {
    fn from(type_name: &str) -> Self {
        BackTarget::Type(type_name.to_string())
    }
}

impl From<String> for BackTarget {
    fn from(type_name: String) -> Self {
        BackTarget::Type(type_name)
    }
}

/// One navigation stack and the operations that change it.
///
/// Navigators are created by a [`NavigationContext`]: the root navigator
/// with the context, scoped ones while wiring tab and split containers.
/// They are UI-thread objects and are neither `Send` nor `Sync`.
pub struct Navigator {
    this: Weak<Navigator>,
    context: Weak<NavigationContext>,
    window: Weak<Window>,
    is_root: bool,
    root: RefCell<Weak<Screen>>,
    stack: RefCell<NavigationStack>,
    state: Cell<NavigatorState>,
    pending: RefCell<Option<PendingOperation>>,
    sequence: Cell<u64>,
}

impl Navigator {
    pub(crate) fn new(
        context: Weak<NavigationContext>,
        window: Weak<Window>,
        is_root: bool,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            context,
            window,
            is_root,
            root: RefCell::new(Weak::new()),
            stack: RefCell::new(NavigationStack::new()),
            state: Cell::new(NavigatorState::Idle),
            pending: RefCell::new(None),
            sequence: Cell::new(0),
        })
    }

    /// Whether this is the context's root navigator.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn context(&self) -> Option<Rc<NavigationContext>> {
        self.context.upgrade()
    }

    pub fn window(&self) -> Option<Rc<Window>> {
        self.window.upgrade()
    }

    /// The screen at the bottom of this navigator's stack.
    pub fn root_screen(&self) -> Option<ScreenRef> {
        self.root.borrow().upgrade()
    }

    pub fn state(&self) -> NavigatorState {
        self.state.get()
    }

    /// The operation currently in flight.
    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending.borrow().clone()
    }

    pub fn stack(&self) -> Ref<'_, NavigationStack> {
        self.stack.borrow()
    }

    /// Number of live stack entries.
    pub fn stack_len(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Live stack screens, bottom first.
    pub fn screens(&self) -> Vec<ScreenRef> {
        self.stack.borrow().screens()
    }

    pub fn top_screen(&self) -> Option<ScreenRef> {
        self.stack.borrow().top()
    }

    pub fn index_of(&self, screen: &ScreenRef) -> Option<usize> {
        self.stack.borrow().index_of(screen)
    }

    fn set_state(&self, state: NavigatorState) {
        let previous = self.state.replace(state);
        if previous != state {
            tracing::trace!(target: targets::NAVIGATOR, root = self.is_root, ?previous, ?state, "state");
        }
    }

    fn begin_pending(
        &self,
        kind: OperationKind,
        animated: bool,
        mode: Option<DisplayMode>,
        level: Option<isize>,
    ) -> u64 {
        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        *self.pending.borrow_mut() = Some(PendingOperation {
            sequence,
            kind,
            animated,
            mode,
            level,
        });
        sequence
    }

    /// Clear the pending record if it still belongs to `sequence`.
    fn end_pending(&self, sequence: u64) {
        let current = self
            .pending
            .borrow()
            .as_ref()
            .is_some_and(|pending| pending.sequence == sequence);
        if current {
            self.pending.borrow_mut().take();
            self.set_state(NavigatorState::Idle);
        }
    }

    /// Make `screen` the root of a scoped navigator.
    pub(crate) fn adopt_root(&self, screen: &ScreenRef) {
        *self.root.borrow_mut() = Rc::downgrade(screen);
        self.push_entry(screen, DisplayMode::Reset);
    }

    /// Track `screen` on the stack as shown by this navigator.
    pub(crate) fn push_entry(&self, screen: &ScreenRef, mode: DisplayMode) {
        screen.set_navigator(self.this.clone());
        screen.set_mode(mode);
        self.stack.borrow_mut().push(screen, mode);
    }

    /// Store a fresh dismiss transition on `screen`, armed for gestures when
    /// its style supports them.
    pub(crate) fn arm_dismiss(&self, context: &NavigationContext, screen: &ScreenRef) {
        let Some(mode) = screen.mode() else {
            return;
        };
        let operation = match mode {
            DisplayMode::Push => TransitionOperation::Pop,
            DisplayMode::Present | DisplayMode::Overlay => TransitionOperation::Dismiss,
            DisplayMode::Reset | DisplayMode::Goto => return,
        };
        let style = context.style_for(
            screen.transition_name().as_deref(),
            mode,
            screen.presentation().is_some(),
        );
        let transition = context.make_transition(style, operation);

        let navigator = self.this.clone();
        let target = Rc::downgrade(screen);
        let starter: Starter = Rc::new(move || match (navigator.upgrade(), target.upgrade()) {
            (Some(navigator), Some(screen)) => navigator.begin_interactive_dismiss(&screen),
            _ => false,
        });
        transition.arm(screen, starter);
        screen.set_dismiss_transition(Some(transition));
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("is_root", &self.is_root)
            .field("state", &self.state.get())
            .field("root", &self.root_screen().map(|s| s.id()))
            .field("stack", &self.stack_len())
            .finish_non_exhaustive()
    }
}
