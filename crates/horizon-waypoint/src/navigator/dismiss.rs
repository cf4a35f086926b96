//! Dismissing screens and the data handed back on the way.

use std::rc::{Rc, Weak};
use std::time::Duration;

use horizon_waypoint_core::logging::{span_names, targets};
use horizon_waypoint_core::PerfSpan;

use super::{BackTarget, NavigationEvent, Navigator, NavigatorState, OperationKind};
use crate::page::{Completion, DisplayMode, PageData};
use crate::presentation::PresentationHost;
use crate::screen::{ContainerKind, Screen, ScreenRef};
use crate::stack::StackEntry;
use crate::transition::{TransitionContext, TransitionOperation};

/// Everything a dismissal needs once its transition ends.
struct Departure {
    sequence: u64,
    /// Removed entries, bottom first, for restoring on cancel.
    entries: Vec<StackEntry>,
    /// Removed screens with their tagged modes, bottom first.
    screens: Vec<(ScreenRef, DisplayMode)>,
    /// The screen the dismissal reveals.
    revealed: Option<Weak<Screen>>,
    host: Option<Rc<PresentationHost>>,
    data: Option<PageData>,
    completion: Option<Completion>,
}

impl Navigator {
    /// Dismiss the top screen. Does nothing when only the root is left.
    pub fn close(&self, data: Option<PageData>, animated: bool, completion: Option<Completion>) -> bool {
        if self.stack_len() <= 1 {
            tracing::debug!(target: targets::NAVIGATOR, "close ignored, nothing above the root");
            return false;
        }
        self.dismiss(0, data, animated, completion)
    }

    /// Dismiss everything above `target`, leaving it on top.
    pub fn back_to(
        &self,
        target: impl Into<BackTarget>,
        data: Option<PageData>,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool {
        let level = {
            let stack = self.stack.borrow();
            let index = match target.into() {
                BackTarget::Screen(screen) => stack.index_of(&screen),
                BackTarget::Type(type_name) => stack.index_of_type(&type_name),
            };
            index.and_then(|index| stack.level_from_index(index))
        };
        match level {
            Some(level) => self.dismiss(level, data, animated, completion),
            None => {
                tracing::debug!(target: targets::NAVIGATOR, "back_to target not found or already on top");
                false
            }
        }
    }

    /// Dismiss everything above the root.
    pub fn back_to_root(
        &self,
        data: Option<PageData>,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool {
        self.dismiss(-1, data, animated, completion)
    }

    /// Dismiss `screen` and everything above it.
    pub fn dismiss_screen(&self, screen: &ScreenRef, animated: bool) -> bool {
        let level = {
            let stack = self.stack.borrow();
            stack
                .index_of(screen)
                .filter(|&index| index > 0)
                .and_then(|index| stack.level_at(index))
        };
        match level {
            Some(level) => self.dismiss(level, None, animated, None),
            None => false,
        }
    }

    /// Dismiss the entries from `level` to the top.
    ///
    /// Level `0` is the top, `-1` everything above the root, `-n` keeps the
    /// `n - 1` bottom entries. Levels that would reach the root or fall
    /// outside the stack are refused. Returns `false` when nothing was
    /// dismissed; the completion is then dropped without running.
    pub fn dismiss(
        &self,
        level: isize,
        data: Option<PageData>,
        animated: bool,
        completion: Option<Completion>,
    ) -> bool {
        self.dismiss_with(level, data, animated, completion, false)
    }

    /// Start dismissing `screen` under the control of a pan gesture.
    pub(crate) fn begin_interactive_dismiss(&self, screen: &ScreenRef) -> bool {
        if self.state.get() != NavigatorState::Idle {
            tracing::debug!(target: targets::NAVIGATOR, state = ?self.state.get(), "interactive dismiss refused while busy");
            return false;
        }
        let level = {
            let stack = self.stack.borrow();
            stack
                .index_of(screen)
                .filter(|&index| index > 0)
                .and_then(|index| stack.level_at(index))
        };
        match level {
            Some(level) => self.dismiss_with(level, None, true, None, true),
            None => false,
        }
    }

    fn dismiss_with(
        &self,
        level: isize,
        data: Option<PageData>,
        animated: bool,
        completion: Option<Completion>,
        interactive: bool,
    ) -> bool {
        let (Some(context), Some(window)) = (self.context(), self.window()) else {
            return false;
        };
        let _span = PerfSpan::new(span_names::DISMISS);

        let index = self.stack.borrow().index_from_level(level);
        if index.is_none_or(|index| index == 0) {
            tracing::debug!(target: targets::NAVIGATOR, level, "refusing to dismiss the root");
            return false;
        }

        self.set_state(NavigatorState::Resolving);
        let entries = self.stack.borrow_mut().drain(level);
        let screens: Vec<(ScreenRef, DisplayMode)> = entries
            .iter()
            .filter_map(|entry| entry.screen().map(|screen| (screen, entry.mode())))
            .collect();
        let Some((deepest, deepest_mode)) = screens.first().cloned() else {
            tracing::debug!(target: targets::NAVIGATOR, level, "nothing to dismiss");
            self.set_state(NavigatorState::Idle);
            return false;
        };
        let sequence = self.begin_pending(OperationKind::Dismiss, animated, None, Some(level));

        let new_top = self.stack.borrow().top();
        let revealed = new_top.as_ref().map(|top| revealed_leaf(top, &deepest));
        if let Some(leaf) = &revealed {
            leaf.notify("before_back", |c| c.before_back(data.as_ref()));
        }

        let operation = match deepest_mode {
            DisplayMode::Push => TransitionOperation::Pop,
            _ => TransitionOperation::Dismiss,
        };
        let moving = match deepest_mode {
            DisplayMode::Present | DisplayMode::Overlay => deepest.clone(),
            _ => screens
                .last()
                .map(|(screen, _)| screen.clone())
                .unwrap_or_else(|| deepest.clone()),
        };
        let host = deepest.presentation();
        let transition = match deepest.take_dismiss_transition() {
            Some(transition) => transition,
            None => {
                let style = context.style_for(
                    deepest.transition_name().as_deref(),
                    deepest_mode,
                    host.is_some(),
                );
                context.make_transition(style, operation)
            }
        };
        let duration = if animated {
            transition.duration()
        } else {
            Duration::ZERO
        };
        let transition_context = TransitionContext::new(operation, window.bounds(), duration)
            .with_from(Some(moving.surface().clone()))
            .with_to(revealed.as_ref().map(|leaf| leaf.surface().clone()))
            .with_backdrop(
                host.as_ref().map(|host| host.backdrop().clone()),
                context.config().backdrop_alpha,
            );

        tracing::debug!(
            target: targets::NAVIGATOR,
            level,
            removed = screens.len(),
            mode = %deepest_mode,
            style = transition.style_name(),
            animated,
            interactive,
            "dismissing"
        );

        let restore = entries.clone();
        let departure = Departure {
            sequence,
            entries,
            screens,
            revealed: revealed.as_ref().map(Rc::downgrade),
            host,
            data,
            completion,
        };
        let navigator = self.this.clone();
        let finish = Box::new(move |finished: bool| match navigator.upgrade() {
            Some(navigator) => navigator.finish_dismiss(finished, departure),
            None => {
                if let Some(completion) = departure.completion {
                    completion();
                }
            }
        });

        self.set_state(NavigatorState::Transitioning);
        if interactive {
            if !transition.begin_interactive(transition_context, finish) {
                self.stack.borrow_mut().restore(restore);
                self.end_pending(sequence);
                return false;
            }
        } else {
            transition.run(transition_context, finish);
        }
        true
    }

    fn finish_dismiss(&self, finished: bool, departure: Departure) {
        let Departure {
            sequence,
            entries,
            screens,
            revealed,
            host,
            data,
            completion,
        } = departure;
        let context = self.context();

        if finished {
            self.set_state(NavigatorState::Committing);
            let new_top = self.stack.borrow().top();
            self.commit_removal(&screens, new_top.as_ref());
            if let Some(host) = host {
                host.detach();
            }
            if let Some((deepest, _)) = screens.first() {
                deepest.set_presentation(None);
            }
            if let Some(leaf) = revealed.and_then(|leaf| leaf.upgrade()) {
                leaf.surface().settle();
                leaf.notify("after_back", |c| c.after_back(data.as_ref()));
            }
            if let Some(context) = &context {
                context.emit(NavigationEvent::Dismissed {
                    screens: screens.iter().map(|(screen, _)| screen.id()).collect(),
                });
                context.log_hierarchy();
            }
        } else {
            self.set_state(NavigatorState::Cancelled);
            self.stack.borrow_mut().restore(entries);
            if let Some((deepest, _)) = screens.first() {
                tracing::debug!(target: targets::NAVIGATOR, screen = %deepest.id(), "dismiss cancelled, stack restored");
                deepest.surface().settle();
                if let Some(context) = &context {
                    self.arm_dismiss(context, deepest);
                    context.emit(NavigationEvent::DismissCancelled {
                        screen: deepest.id(),
                    });
                }
            }
        }

        drop(data);
        self.end_pending(sequence);
        if let Some(completion) = completion {
            completion();
        }
    }

    /// Take the dismissed screens out of the hierarchy.
    fn commit_removal(&self, screens: &[(ScreenRef, DisplayMode)], new_top: Option<&ScreenRef>) {
        let Some((deepest, mode)) = screens.first() else {
            return;
        };
        match mode {
            DisplayMode::Present => dismiss_modal(deepest),
            DisplayMode::Overlay => remove_overlay(deepest),
            DisplayMode::Push => {
                let container = deepest
                    .parent()
                    .filter(|parent| parent.container_kind() == Some(ContainerKind::Stack));
                match container {
                    Some(container) => {
                        let removed = match new_top.filter(|top| container.index_of_child(top).is_some()) {
                            Some(top) => container.pop_children_to(top),
                            None => container.pop_children_to_root(),
                        };
                        tracing::trace!(target: targets::NAVIGATOR, container = %container.id(), popped = removed.len(), "stack container popped");
                    }
                    None => dismiss_modal(deepest),
                }
            }
            DisplayMode::Reset | DisplayMode::Goto => {}
        }

        for (screen, mode) in &screens[1..] {
            match mode {
                DisplayMode::Present => dismiss_modal(screen),
                DisplayMode::Overlay => remove_overlay(screen),
                DisplayMode::Push => {
                    pop_from_container(screen);
                }
                DisplayMode::Reset | DisplayMode::Goto => {}
            }
        }
    }

    /// Hand `data` to the top screen that did not leave through the system
    /// back gesture.
    pub fn send_data_after_back(&self, data: PageData) -> bool {
        let recipient = self
            .stack
            .borrow()
            .screens()
            .into_iter()
            .rev()
            .find(|screen| !screen.left_by_system_back())
            .map(|screen| unflagged_leaf(&screen));
        match recipient {
            Some(leaf) => {
                leaf.notify("after_back", |c| c.after_back(Some(&data)));
                true
            }
            None => false,
        }
    }

    /// The platform started its own back gesture on `screen`.
    pub fn native_back_began(&self, screen: &ScreenRef) {
        tracing::trace!(target: targets::NAVIGATOR, screen = %screen.id(), "system back began");
        screen.set_left_by_system_back(true);
    }

    /// The platform's back gesture on `screen` ended.
    ///
    /// A completed gesture already popped the platform's stack, so only the
    /// bookkeeping is mirrored here. A cancelled one clears the flag.
    pub fn native_back_finished(&self, screen: &ScreenRef, completed: bool) {
        if !completed {
            tracing::trace!(target: targets::NAVIGATOR, screen = %screen.id(), "system back cancelled");
            screen.set_left_by_system_back(false);
            return;
        }

        pop_from_container(screen);

        let removed = {
            let mut stack = self.stack.borrow_mut();
            let level = stack.index_of(screen).and_then(|index| stack.level_at(index));
            level.map(|level| stack.drain(level)).unwrap_or_default()
        };
        if removed.is_empty() {
            return;
        }
        tracing::debug!(target: targets::NAVIGATOR, screen = %screen.id(), removed = removed.len(), "system back completed");
        if let Some(context) = self.context() {
            context.emit(NavigationEvent::Dismissed {
                screens: removed
                    .iter()
                    .filter_map(StackEntry::screen)
                    .map(|screen| screen.id())
                    .collect(),
            });
        }
    }
}

/// Pop `screen` and everything above it off its stack container.
fn pop_from_container(screen: &ScreenRef) -> bool {
    let Some(container) = screen
        .parent()
        .filter(|parent| parent.container_kind() == Some(ContainerKind::Stack))
    else {
        return false;
    };
    let children = container.children();
    match children.iter().position(|child| Rc::ptr_eq(child, screen)) {
        Some(index) if index > 0 => {
            container.pop_children_to(&children[index - 1]);
            true
        }
        _ => false,
    }
}

fn dismiss_modal(screen: &ScreenRef) {
    match screen.presenting() {
        Some(presenter) => {
            presenter.unwind();
        }
        None => screen.detach_surfaces(),
    }
}

fn remove_overlay(screen: &ScreenRef) {
    match screen.overlay_host() {
        Some(host) => {
            host.remove_overlay(screen);
        }
        None => screen.detach_surfaces(),
    }
}

/// The screen that becomes visible once `deepest` and everything above it
/// are gone: the child below it in its stack container, or the new top.
fn revealed_leaf(new_top: &ScreenRef, deepest: &ScreenRef) -> ScreenRef {
    let container = deepest
        .parent()
        .filter(|parent| parent.container_kind() == Some(ContainerKind::Stack));
    if let Some(container) = container {
        let children = container.children();
        let position = children.iter().position(|child| Rc::ptr_eq(child, deepest));
        if let Some(index) = position.filter(|&index| index > 0) {
            return children[index - 1].active_leaf();
        }
    }
    new_top.active_leaf()
}

/// Active leaf of `screen`, stepping below children that left through the
/// system back gesture.
fn unflagged_leaf(screen: &ScreenRef) -> ScreenRef {
    let mut leaf = screen.active_leaf();
    while leaf.left_by_system_back() {
        let Some(parent) = leaf.parent() else {
            break;
        };
        let children = parent.children();
        match children.iter().position(|child| Rc::ptr_eq(child, &leaf)) {
            Some(index) if index > 0 => leaf = children[index - 1].active_leaf(),
            _ => break,
        }
    }
    leaf
}
