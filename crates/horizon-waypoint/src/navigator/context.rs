//! The navigation context.
//!
//! A [`NavigationContext`] owns everything navigators share: the window,
//! the animator, the screen and transition registries, the root navigator
//! and the set of scoped navigators, plus the process-wide "current
//! navigator" pointer that `goto` and deep links start from.
//!
//! The context can be installed per thread so screens can reach navigation
//! without threading a handle through every call:
//!
//! ```ignore
//! let context = NavigationContext::new(Window::new(bounds), NavigatorConfig::default());
//! context.install();
//! // later, anywhere on the UI thread
//! NavigationContext::installed().map(|ctx| ctx.goto("Inbox", None, true));
//! ```
//!
//! Tests construct private contexts instead and never install them.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use horizon_waypoint_core::logging::{span_names, targets};
use horizon_waypoint_core::{Animator, PerfSpan, Point, Signal};
use url::Url;

use super::{NavigationEvent, Navigator};
use crate::config::NavigatorConfig;
use crate::debug::ScreenTreeDebug;
use crate::error::Result;
use crate::page::{DisplayMode, PageData, PageRequest, ScreenTarget};
use crate::registry::{builtin, ScreenRegistry, TransitionRegistry};
use crate::screen::{ContainerKind, NotFound, Screen, ScreenContent, ScreenRef};
use crate::transition::styles::NoTransition;
use crate::transition::{InteractiveTuning, Transition, TransitionOperation, TransitionStyle};
use crate::window::Window;

/// Turns a URL into the request chain it stands for.
pub type UrlResolver = Rc<dyn Fn(&Url) -> Option<PageRequest>>;

/// Generic handler for URLs no resolver claimed. Returns whether it handled it.
pub type UrlOpener = Rc<dyn Fn(&Url) -> bool>;

/// Step used by [`NavigationContext::run_until_idle`].
const FRAME: Duration = Duration::from_millis(16);

thread_local! {
    static INSTALLED: RefCell<Option<Rc<NavigationContext>>> = const { RefCell::new(None) };
}

/// Shared state of all navigators attached to one window.
pub struct NavigationContext {
    this: Weak<NavigationContext>,
    config: NavigatorConfig,
    window: Rc<Window>,
    animator: Rc<Animator>,
    screens: RefCell<ScreenRegistry>,
    transitions: RefCell<TransitionRegistry>,
    root: Rc<Navigator>,
    current: RefCell<Weak<Navigator>>,
    scopes: RefCell<Vec<Weak<Navigator>>>,
    resolver: RefCell<Option<UrlResolver>>,
    opener: RefCell<Option<UrlOpener>>,
    events: Signal<NavigationEvent>,
}

impl NavigationContext {
    /// Create a context with the built-in registries.
    pub fn new(window: Rc<Window>, config: NavigatorConfig) -> Rc<Self> {
        Self::with_registries(window, config, ScreenRegistry::new(), TransitionRegistry::new())
    }

    pub fn with_registries(
        window: Rc<Window>,
        config: NavigatorConfig,
        screens: ScreenRegistry,
        transitions: TransitionRegistry,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let root = Navigator::new(this.clone(), Rc::downgrade(&window), true);
            Self {
                this: this.clone(),
                config,
                window,
                animator: Rc::new(Animator::new()),
                screens: RefCell::new(screens),
                transitions: RefCell::new(transitions),
                current: RefCell::new(Rc::downgrade(&root)),
                root,
                scopes: RefCell::new(Vec::new()),
                resolver: RefCell::new(None),
                opener: RefCell::new(None),
                events: Signal::new(),
            }
        })
    }

    // =========================================================================
    // Thread-local installation
    // =========================================================================

    /// Make this the context returned by [`installed`](Self::installed) on
    /// this thread. Returns the previously installed context.
    pub fn install(self: &Rc<Self>) -> Option<Rc<Self>> {
        tracing::debug!(target: targets::NAVIGATOR, "navigation context installed");
        INSTALLED.with(|slot| slot.borrow_mut().replace(self.clone()))
    }

    pub fn installed() -> Option<Rc<Self>> {
        INSTALLED.with(|slot| slot.borrow().clone())
    }

    pub fn uninstall() -> Option<Rc<Self>> {
        INSTALLED.with(|slot| slot.borrow_mut().take())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn window(&self) -> &Rc<Window> {
        &self.window
    }

    pub fn animator(&self) -> &Rc<Animator> {
        &self.animator
    }

    /// Navigation notifications.
    pub fn events(&self) -> &Signal<NavigationEvent> {
        &self.events
    }

    pub fn root_navigator(&self) -> Rc<Navigator> {
        self.root.clone()
    }

    /// The navigator that last initiated an operation, or the root.
    pub fn current(&self) -> Rc<Navigator> {
        self.current
            .borrow()
            .upgrade()
            .unwrap_or_else(|| self.root.clone())
    }

    pub(crate) fn set_current(&self, navigator: &Rc<Navigator>) {
        let changed = !Weak::ptr_eq(&self.current.borrow(), &Rc::downgrade(navigator));
        if changed {
            tracing::trace!(target: targets::NAVIGATOR, root = navigator.is_root(), "current navigator changed");
            *self.current.borrow_mut() = Rc::downgrade(navigator);
        }
    }

    /// Live scoped navigators, in creation order.
    pub fn scopes(&self) -> Vec<Rc<Navigator>> {
        let mut scopes = self.scopes.borrow_mut();
        scopes.retain(|scope| scope.strong_count() > 0);
        scopes.iter().filter_map(Weak::upgrade).collect()
    }

    /// Create a navigator scoped to `root`, a child of a tab or split container.
    pub(crate) fn new_scope(&self, root: &ScreenRef) -> Rc<Navigator> {
        let scope = Navigator::new(self.this.clone(), Rc::downgrade(&self.window), false);
        scope.adopt_root(root);
        root.set_scoped_navigator(Some(scope.clone()));
        self.scopes.borrow_mut().push(Rc::downgrade(&scope));
        tracing::trace!(target: targets::NAVIGATOR, root = %root.id(), "scoped navigator created");
        scope
    }

    /// The topmost visible screen.
    pub fn top_screen(&self) -> Option<ScreenRef> {
        self.window.top_screen()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    pub fn screens(&self) -> Ref<'_, ScreenRegistry> {
        self.screens.borrow()
    }

    pub fn transitions(&self) -> Ref<'_, TransitionRegistry> {
        self.transitions.borrow()
    }

    pub fn register_screen<C, F>(&self, name: impl Into<String>, factory: F) -> Result<()>
    where
        C: ScreenContent,
        F: Fn() -> C + 'static,
    {
        self.screens.borrow_mut().register(name, factory)?;
        Ok(())
    }

    pub fn register_container(&self, name: impl Into<String>, kind: ContainerKind) -> Result<()> {
        self.screens.borrow_mut().register_container(name, kind)?;
        Ok(())
    }

    pub fn register_transition(&self, style: impl TransitionStyle + 'static) -> Result<()> {
        self.transitions.borrow_mut().register(style)?;
        Ok(())
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Build the screen a request targets, falling back to the request's
    /// fallback name and then to the not-found placeholder.
    pub(crate) fn instantiate(&self, request: &PageRequest) -> ScreenRef {
        let resolved = match request.target() {
            ScreenTarget::Factory(factory) => Ok(factory()),
            ScreenTarget::Named(name) => self.screens.borrow().instantiate(name),
        };
        match resolved {
            Ok(screen) => screen,
            Err(err) => {
                tracing::warn!(target: targets::REGISTRY, %err, fallback = ?request.fallback(), "screen resolution failed");
                self.events.emit(NavigationEvent::ResolutionFailed {
                    requested: request.target().name().to_string(),
                });
                self.fallback_screen(request.fallback())
            }
        }
    }

    fn fallback_screen(&self, fallback: Option<&str>) -> ScreenRef {
        let screens = self.screens.borrow();
        if let Some(name) = fallback {
            match screens.instantiate(name) {
                Ok(screen) => return screen,
                Err(err) => {
                    tracing::warn!(target: targets::REGISTRY, %err, "fallback screen failed to resolve");
                }
            }
        }
        screens
            .instantiate(builtin::NOT_FOUND)
            .unwrap_or_else(|_| Screen::new(builtin::NOT_FOUND, NotFound::default()))
    }

    /// The style named `name`, or the configured default, or the stock
    /// style for `mode`.
    pub(crate) fn style_for(
        &self,
        name: Option<&str>,
        mode: DisplayMode,
        anchored: bool,
    ) -> Rc<dyn TransitionStyle> {
        let transitions = self.transitions.borrow();
        let requested = name.or(self.config.default_transition.as_deref());
        if let Some(name) = requested {
            match transitions.get(name) {
                Some(style) => return style,
                None => {
                    tracing::warn!(target: targets::REGISTRY, name, "unknown transition style, using the default");
                }
            }
        }
        let stock = match mode {
            DisplayMode::Reset => builtin::FADE,
            DisplayMode::Push => builtin::SLIDE,
            DisplayMode::Present if anchored => builtin::POPOVER,
            DisplayMode::Present => builtin::COVER,
            DisplayMode::Overlay => builtin::OVERLAY,
            DisplayMode::Goto => builtin::NONE,
        };
        transitions
            .get(stock)
            .unwrap_or_else(|| Rc::new(NoTransition) as Rc<dyn TransitionStyle>)
    }

    pub(crate) fn make_transition(
        &self,
        style: Rc<dyn TransitionStyle>,
        operation: TransitionOperation,
    ) -> Rc<Transition> {
        Transition::new(
            style,
            operation,
            self.animator.clone(),
            InteractiveTuning::from(&self.config),
            self.config.animation_duration(),
        )
    }

    pub(crate) fn emit(&self, event: NavigationEvent) {
        self.events.emit(event);
    }

    /// Trace the screen tree when hierarchy logging is on.
    pub(crate) fn log_hierarchy(&self) {
        if !self.config.log_hierarchy {
            return;
        }
        if let Some(root) = self.window.root() {
            let tree = ScreenTreeDebug::new().format_tree(&root);
            tracing::trace!(target: targets::NAVIGATOR, "screen tree:\n{tree}");
        }
    }

    /// Render the current screen tree.
    pub fn format_tree(&self) -> String {
        match self.window.root() {
            Some(root) => ScreenTreeDebug::new().format_tree(&root),
            None => String::from("(no root)\n"),
        }
    }

    /// Select every tab or split ancestor of `screen` so it becomes visible.
    pub(crate) fn reveal(&self, screen: &ScreenRef) {
        let mut child = screen.clone();
        while let Some(parent) = child.parent() {
            if matches!(parent.container_kind(), Some(ContainerKind::Tab | ContainerKind::Split))
                && let Some(index) = parent.index_of_child(&child)
                && parent.selected_index() != index
                && parent.select(index)
            {
                self.emit(NavigationEvent::Selected {
                    container: parent.id(),
                    index,
                });
            }
            child = parent;
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Switch to a screen that already exists.
    ///
    /// Searches the children of the root container first, then the stacks
    /// of every scoped navigator. Returns whether the target was found.
    pub fn goto(&self, type_name: &str, data: Option<PageData>, animated: bool) -> bool {
        let _span = PerfSpan::new(span_names::GOTO);
        if self.root.goto_child(type_name, data.clone(), animated) {
            return true;
        }
        for scope in self.scopes() {
            if scope.goto_in_stack(type_name, data.clone(), animated) {
                if let Some(root) = scope.root_screen() {
                    self.reveal(&root);
                }
                return true;
            }
        }
        tracing::warn!(target: targets::NAVIGATOR, type_name, "goto target not found");
        false
    }

    /// Route a request chain to the navigator that should run it.
    ///
    /// Reset-mode chains go to the root navigator, everything else to the
    /// current one.
    pub fn deep_link(&self, request: PageRequest) {
        match request.mode() {
            DisplayMode::Reset => self.root.deep_link(request),
            _ => self.current().follow(request),
        }
    }

    pub fn set_url_resolver<F>(&self, resolver: F)
    where
        F: Fn(&Url) -> Option<PageRequest> + 'static,
    {
        *self.resolver.borrow_mut() = Some(Rc::new(resolver));
    }

    pub fn set_url_opener<F>(&self, opener: F)
    where
        F: Fn(&Url) -> bool + 'static,
    {
        *self.opener.borrow_mut() = Some(Rc::new(opener));
    }

    /// Follow `url` through the resolver, or hand it to the opener.
    ///
    /// Returns whether anything handled it.
    pub fn open_url(&self, url: &Url) -> bool {
        let resolver = self.resolver.borrow().clone();
        if let Some(request) = resolver.and_then(|resolve| resolve(url)) {
            tracing::info!(target: targets::NAVIGATOR, %url, hops = request.chain_len(), "deep link resolved");
            self.deep_link(request);
            return true;
        }
        let opener = self.opener.borrow().clone();
        match opener {
            Some(open) => open(url),
            None => {
                tracing::debug!(target: targets::NAVIGATOR, %url, "no route for url");
                false
            }
        }
    }

    /// Parse `text` and [`open_url`](Self::open_url) it.
    pub fn open_url_str(&self, text: &str) -> bool {
        match Url::parse(text) {
            Ok(url) => self.open_url(&url),
            Err(err) => {
                tracing::warn!(target: targets::NAVIGATOR, %err, text, "malformed deep link");
                false
            }
        }
    }

    /// Dismiss the topmost overlay or popover if `point` falls outside it
    /// and it was shown with tap-outside dismissal.
    pub fn handle_tap(&self, point: Point) -> bool {
        let mut current = self.window.top_screen();
        while let Some(screen) = current {
            if let Some(host) = screen.presentation() {
                if !host.should_dismiss_for_tap(point) {
                    return false;
                }
                return match screen.navigator() {
                    Some(navigator) => navigator.dismiss_screen(&screen, true),
                    None => false,
                };
            }
            current = screen.parent();
        }
        false
    }

    /// Advance animations by `dt`.
    pub fn tick(&self, dt: Duration) -> usize {
        self.animator.tick(dt)
    }

    /// Tick until only interactive animations remain.
    pub fn run_until_idle(&self) -> usize {
        self.animator.run_until_idle(FRAME)
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("config", &self.config)
            .field("window", &self.window)
            .field("root", &self.root)
            .field("scopes", &self.scopes.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_waypoint_core::Rect;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn context() -> Rc<NavigationContext> {
        NavigationContext::new(
            Window::new(Rect::new(0.0, 0.0, 400.0, 800.0)),
            NavigatorConfig::default(),
        )
    }

    #[test]
    fn test_current_defaults_to_root() {
        let ctx = context();
        assert!(Rc::ptr_eq(&ctx.current(), &ctx.root_navigator()));
        assert!(ctx.root_navigator().is_root());
    }

    #[test]
    fn test_install_and_uninstall() {
        let ctx = context();
        assert!(ctx.install().is_none());
        let installed = NavigationContext::installed().unwrap();
        assert!(Rc::ptr_eq(&installed, &ctx));
        assert!(NavigationContext::uninstall().is_some());
        assert!(NavigationContext::installed().is_none());
    }

    #[test]
    fn test_style_selection() {
        let ctx = context();
        assert_eq!(ctx.style_for(None, DisplayMode::Push, false).name(), builtin::SLIDE);
        assert_eq!(ctx.style_for(None, DisplayMode::Present, false).name(), builtin::COVER);
        assert_eq!(ctx.style_for(None, DisplayMode::Present, true).name(), builtin::POPOVER);
        assert_eq!(ctx.style_for(None, DisplayMode::Reset, false).name(), builtin::FADE);
        assert_eq!(ctx.style_for(Some("fade"), DisplayMode::Push, false).name(), builtin::FADE);
        assert_eq!(
            ctx.style_for(Some("wobble"), DisplayMode::Overlay, false).name(),
            builtin::OVERLAY
        );
    }

    #[test]
    fn test_configured_default_transition() {
        let config = NavigatorConfig {
            default_transition: Some(builtin::NONE.to_string()),
            ..NavigatorConfig::default()
        };
        let ctx = NavigationContext::new(Window::new(Rect::new(0.0, 0.0, 10.0, 10.0)), config);
        assert_eq!(ctx.style_for(None, DisplayMode::Push, false).name(), builtin::NONE);
    }

    #[test]
    fn test_unknown_screen_falls_back() {
        let ctx = context();
        let failed = Arc::new(Mutex::new(Vec::new()));
        let sink = failed.clone();
        ctx.events().connect(move |event: &NavigationEvent| {
            if let NavigationEvent::ResolutionFailed { requested } = event {
                sink.lock().push(requested.clone());
            }
        });

        let screen = ctx.instantiate(&PageRequest::new("Missing"));
        assert_eq!(screen.type_name(), builtin::NOT_FOUND);
        assert_eq!(*failed.lock(), vec!["Missing".to_string()]);

        ctx.register_screen("Help", || crate::screen::Blank).unwrap();
        let screen = ctx.instantiate(&PageRequest::new("Gone").with_fallback("Help"));
        assert_eq!(screen.type_name(), "Help");
    }

    #[test]
    fn test_open_url_without_routes() {
        let ctx = context();
        assert!(!ctx.open_url_str("app://nowhere"));
        assert!(!ctx.open_url_str("not a url"));

        ctx.set_url_opener(|url| url.scheme() == "https");
        assert!(ctx.open_url_str("https://example.com/"));
    }
}
