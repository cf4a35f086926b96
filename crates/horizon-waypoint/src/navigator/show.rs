//! Showing screens: resolution, container wiring and mode dispatch.

use std::rc::{Rc, Weak};
use std::time::Duration;

use horizon_waypoint_core::logging::{span_names, targets};
use horizon_waypoint_core::PerfSpan;

use super::{NavigationContext, NavigationEvent, Navigator, NavigatorState, OperationKind};
use crate::page::{Completion, DisplayMode, PageRequest};
use crate::presentation::{PopoverPlacement, PresentationHost, PresentationKind};
use crate::registry::builtin;
use crate::screen::{ContainerKind, Screen, ScreenRef};
use crate::transition::{TransitionContext, TransitionOperation};
use crate::window::Window;

/// Outcome of resolving one request.
struct Resolved {
    /// What gets shown: the target, or the container wrapping it.
    screen: ScreenRef,
    target: ScreenRef,
    /// Stack-container children above the first, tracked as pushes.
    pushed: Vec<ScreenRef>,
    /// Navigator that becomes current once the screen is shown.
    scope: Option<Rc<Navigator>>,
}

impl Navigator {
    /// Show `request` and make this navigator current.
    ///
    /// The screen is in the hierarchy and on the stack when this returns;
    /// `completion` runs after the transition finishes.
    ///
    /// # Panics
    ///
    /// Panics when the request's mode is [`DisplayMode::Goto`]; switching to
    /// an existing screen goes through [`goto`](Self::goto).
    pub fn open(&self, request: PageRequest, animated: bool, completion: Option<Completion>) {
        if let (Some(context), Some(this)) = (self.context(), self.this.upgrade()) {
            context.set_current(&this);
        }
        self.show(request, animated, completion);
    }

    pub(crate) fn show(
        &self,
        mut request: PageRequest,
        animated: bool,
        completion: Option<Completion>,
    ) -> Option<ScreenRef> {
        assert!(
            request.mode() != DisplayMode::Goto,
            "goto-mode requests cannot be shown; use goto to switch to an existing screen"
        );
        let (Some(context), Some(window)) = (self.context(), self.window()) else {
            tracing::warn!(target: targets::NAVIGATOR, "navigation context is gone, show ignored");
            return None;
        };
        let _span = PerfSpan::new(span_names::SHOW);

        if self.root_screen().is_none() && request.mode() != DisplayMode::Reset {
            tracing::debug!(target: targets::NAVIGATOR, mode = %request.mode(), "first screen becomes the root");
            request.set_mode(DisplayMode::Reset);
        }

        self.set_state(NavigatorState::Resolving);
        let sequence = self.begin_pending(OperationKind::Show, animated, Some(request.mode()), None);
        let request_completion = request.take_completion();
        let data = request.data().cloned();
        let composite = request.is_composite();

        let resolved = self.resolve(&context, &mut request);
        let screen = resolved.screen.clone();
        if !composite {
            resolved
                .target
                .active_leaf()
                .notify("before_show", |c| c.before_show(data.as_ref()));
        }

        let bounds = window.bounds();
        let from = self
            .top_screen()
            .or_else(|| window.top_screen())
            .map(|top| top.visible_top());

        let mut mode = request.mode();
        let host = match mode {
            DisplayMode::Reset => {
                self.install_root(&window, &screen);
                None
            }
            DisplayMode::Push => match from.as_ref().and_then(|top| top.nearest_stack_container()) {
                Some(container) => {
                    container.push_child(screen.clone());
                    screen.attach_surfaces(container.surface().frame());
                    None
                }
                None => {
                    tracing::debug!(target: targets::NAVIGATOR, screen = %screen.id(), "no stack container to push onto, presenting");
                    mode = DisplayMode::Present;
                    self.present(&context, &window, &screen, &request)
                }
            },
            DisplayMode::Present => self.present(&context, &window, &screen, &request),
            DisplayMode::Overlay => self.overlay(&context, &window, &screen, &request),
            DisplayMode::Goto => unreachable!("goto requests are rejected above"),
        };

        let style = context.style_for(request.transition(), mode, request.source().is_some());
        screen.set_transition_name(Some(style.name().to_string()));
        resolved.target.set_navigator(self.this.clone());
        self.push_entry(&screen, mode);
        for pushed in &resolved.pushed {
            self.push_entry(pushed, DisplayMode::Push);
        }
        match &resolved.scope {
            Some(scope) => context.set_current(scope),
            None => {
                if let Some(this) = self.this.upgrade() {
                    context.set_current(&this);
                }
            }
        }
        tracing::debug!(
            target: targets::NAVIGATOR,
            screen = %screen.id(),
            type_name = screen.type_name(),
            mode = %mode,
            style = style.name(),
            animated,
            "showing"
        );

        let operation = match mode {
            DisplayMode::Push => TransitionOperation::Push,
            _ => TransitionOperation::Present,
        };
        let transition = context.make_transition(style, operation);
        let duration = if animated {
            transition.duration()
        } else {
            Duration::ZERO
        };
        let transition_context = TransitionContext::new(operation, bounds, duration)
            .with_from(from.map(|top| top.surface().clone()))
            .with_to(Some(screen.surface().clone()))
            .with_backdrop(
                host.as_ref().map(|host| host.backdrop().clone()),
                context.config().backdrop_alpha,
            );

        self.set_state(NavigatorState::Transitioning);
        let navigator = self.this.clone();
        let shown = Rc::downgrade(&screen);
        transition.run(
            transition_context,
            Box::new(move |_| match navigator.upgrade() {
                Some(navigator) => {
                    navigator.finish_show(sequence, shown, mode, request_completion, completion)
                }
                None => {
                    request_completion.into_iter().chain(completion).for_each(|c| c());
                }
            }),
        );
        Some(screen)
    }

    fn finish_show(
        &self,
        sequence: u64,
        screen: Weak<Screen>,
        mode: DisplayMode,
        request_completion: Option<Completion>,
        completion: Option<Completion>,
    ) {
        self.set_state(NavigatorState::Committing);
        if let (Some(screen), Some(context)) = (screen.upgrade(), self.context()) {
            screen.surface().settle();
            self.arm_dismiss(&context, &screen);
            context.emit(NavigationEvent::Shown {
                screen: screen.id(),
                type_name: screen.type_name().to_string(),
                mode,
            });
            context.log_hierarchy();
        }
        self.end_pending(sequence);
        if let Some(completion) = request_completion {
            completion();
        }
        if let Some(completion) = completion {
            completion();
        }
    }

    /// Instantiate, wrap and wire the children of `request`.
    fn resolve(&self, context: &NavigationContext, request: &mut PageRequest) -> Resolved {
        let target = context.instantiate(request);
        if let Some(title) = request.title() {
            target.set_title(Some(title.to_string()));
        }
        target.notify("did_receive_request", |c| c.did_receive_request(request));

        let children = request.take_children();
        let (pushed, scope) = if children.is_empty() {
            (Vec::new(), None)
        } else {
            self.attach_children(context, &target, children)
        };

        let screen = self.wrap(context, request, &target);
        Resolved {
            screen,
            target,
            pushed,
            scope,
        }
    }

    /// Wrap `target` in the requested container, or in a stack container for
    /// plain modal presentations.
    fn wrap(&self, context: &NavigationContext, request: &PageRequest, target: &ScreenRef) -> ScreenRef {
        let name = match request.container_name() {
            Some(name) if name == target.type_name() => return target.clone(),
            Some(name) => name.to_string(),
            None if request.mode() == DisplayMode::Present
                && context.config().auto_wrap_presented
                && !target.is_container() =>
            {
                builtin::STACK_CONTAINER.to_string()
            }
            None => return target.clone(),
        };

        let wrapper = context.screens().instantiate_container(&name);
        match wrapper {
            Ok(wrapper) => {
                tracing::trace!(target: targets::NAVIGATOR, container = %name, screen = %target.id(), "wrapped");
                wrapper.set_children(vec![target.clone()]);
                wrapper
            }
            Err(err) => {
                tracing::warn!(target: targets::REGISTRY, %err, "showing the screen unwrapped");
                target.clone()
            }
        }
    }

    /// Resolve child requests into `container`.
    ///
    /// Tab and split children each get a scoped navigator; stack children
    /// above the first are returned to be tracked as pushes. Also returns
    /// the navigator of the first child, which becomes current.
    fn attach_children(
        &self,
        context: &NavigationContext,
        container: &ScreenRef,
        requests: Vec<PageRequest>,
    ) -> (Vec<ScreenRef>, Option<Rc<Navigator>>) {
        let Some(kind) = container.container_kind() else {
            tracing::debug!(target: targets::NAVIGATOR, screen = %container.id(), "children ignored on a plain screen");
            return (Vec::new(), None);
        };

        let mut resolved = Vec::with_capacity(requests.len());
        for mut child in requests {
            let data = child.data().cloned();
            let composite = child.is_composite();
            let entry = self.resolve(context, &mut child);
            if !composite {
                entry
                    .target
                    .active_leaf()
                    .notify("before_show", |c| c.before_show(data.as_ref()));
            }
            resolved.push(entry);
        }
        container.set_children(resolved.iter().map(|entry| entry.screen.clone()).collect());

        match kind {
            ContainerKind::Stack => {
                for entry in &resolved {
                    entry.screen.set_navigator(self.this.clone());
                }
                let mut entries = resolved.into_iter();
                let scope = entries.next().and_then(|first| first.scope);
                (entries.map(|entry| entry.screen).collect(), scope)
            }
            ContainerKind::Tab | ContainerKind::Split => {
                let mut current = None;
                for (index, entry) in resolved.into_iter().enumerate() {
                    let scope = context.new_scope(&entry.screen);
                    if entry.screen.container_kind() == Some(ContainerKind::Stack) {
                        for child in entry.screen.children() {
                            child.set_navigator(Rc::downgrade(&scope));
                        }
                    }
                    for pushed in &entry.pushed {
                        scope.push_entry(pushed, DisplayMode::Push);
                    }
                    if index == 0 {
                        current = Some(entry.scope.unwrap_or(scope));
                    }
                }
                (Vec::new(), current)
            }
        }
    }

    /// Replace this navigator's root screen.
    fn install_root(&self, window: &Window, screen: &ScreenRef) {
        let old = self.root_screen();
        let slot = old
            .as_ref()
            .filter(|_| !self.is_root)
            .and_then(|old| old.parent().map(|parent| (old.clone(), parent)));
        match slot {
            Some((old, parent)) => {
                screen.set_scoped_navigator(old.scoped_navigator());
                old.detach_surfaces();
                parent.replace_child(&old, screen.clone());
                screen.attach_surfaces(parent.surface().frame());
            }
            None => {
                window.set_root(screen.clone());
            }
        }
        self.stack.borrow_mut().clear();
        *self.root.borrow_mut() = Rc::downgrade(screen);
    }

    fn present(
        &self,
        context: &NavigationContext,
        window: &Window,
        screen: &ScreenRef,
        request: &PageRequest,
    ) -> Option<Rc<PresentationHost>> {
        let bounds = window.bounds();
        let Some(presenter) = window.top_presenter() else {
            window.set_root(screen.clone());
            return None;
        };
        presenter.present(screen);

        match request.source() {
            Some(source) => {
                let host = PresentationHost::new(
                    PresentationKind::Popover {
                        placement: PopoverPlacement::default(),
                    },
                    screen,
                    context.config().backdrop_alpha,
                    request.dismisses_on_tap_outside(),
                    Some(source.window_rect()),
                );
                host.attach(bounds);
                screen.set_presentation(Some(host.clone()));
                Some(host)
            }
            None => {
                screen.attach_surfaces(bounds);
                None
            }
        }
    }

    fn overlay(
        &self,
        context: &NavigationContext,
        window: &Window,
        screen: &ScreenRef,
        request: &PageRequest,
    ) -> Option<Rc<PresentationHost>> {
        let bounds = window.bounds();
        let Some(host_screen) = window.top_screen() else {
            window.set_root(screen.clone());
            return None;
        };
        host_screen.add_overlay(screen);

        let host = PresentationHost::new(
            PresentationKind::Overlay,
            screen,
            context.config().backdrop_alpha,
            request.dismisses_on_tap_outside(),
            None,
        );
        host.attach(bounds);
        screen.set_presentation(Some(host.clone()));
        Some(host)
    }
}
