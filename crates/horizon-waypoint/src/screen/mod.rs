//! Screens: content plus the navigation state attached to it.
//!
//! A [`Screen`] is the engine's handle on one unit of UI. It owns the
//! application's [`ScreenContent`], its animatable [`Surface`], and the
//! hierarchy links the engine maintains:
//!
//! - container children (tab, split or stack containers, see [`ContainerKind`])
//! - the modally presented screen and the screen presenting this one
//! - overlays layered above this screen
//!
//! Strong references run downward only: a container owns its children, a
//! presenting screen owns what it presents, a host owns its overlays. Every
//! upward link is weak, so dropping a subtree releases it.
//!
//! Navigation bookkeeping that a platform would attach to a view controller
//! at runtime (owning navigator, display mode, dismiss transition, context
//! dictionary) lives in plain fields here.

mod container;
mod content;
mod surface;

pub use container::ContainerKind;
pub use content::{Blank, NotFound, ScreenContent};
pub use surface::Surface;

use std::any::Any;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_waypoint_core::logging::targets;
use slotmap::{new_key_type, Key, SlotMap};
use horizon_waypoint_core::{Rect, Size};

use crate::navigator::Navigator;
use crate::page::{DisplayMode, PageData};
use crate::presentation::PresentationHost;
use crate::transition::{PanSample, Transition};

/// Shared handle to a screen.
pub type ScreenRef = Rc<Screen>;

new_key_type! {
    /// Identifies a live screen.
    ///
    /// Ids come from a per-thread registry and are released when the screen
    /// drops; a stale id never matches a newer screen.
    pub struct ScreenId;

    /// Identifies a gesture handler attached to a screen.
    pub struct GestureId;
}

impl ScreenId {
    pub fn as_u64(self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.data())
    }
}

thread_local! {
    static LIVE_SCREENS: RefCell<SlotMap<ScreenId, String>> = RefCell::new(SlotMap::with_key());
}

fn register_screen(type_name: &str) -> ScreenId {
    LIVE_SCREENS.with(|live| live.borrow_mut().insert(type_name.to_string()))
}

/// Number of screens alive on this thread.
pub fn live_screen_count() -> usize {
    LIVE_SCREENS.with(|live| live.borrow().len())
}

type GestureHandler = Rc<dyn Fn(&PanSample) -> bool>;

/// A unit of UI and its navigation state.
pub struct Screen {
    this: Weak<Screen>,
    id: ScreenId,
    type_name: String,
    title: RefCell<Option<String>>,
    content: RefCell<Box<dyn ScreenContent>>,
    surface: Rc<Surface>,

    container: Option<ContainerKind>,
    children: RefCell<Vec<ScreenRef>>,
    selected: Cell<usize>,
    parent: RefCell<Weak<Screen>>,
    presented: RefCell<Option<ScreenRef>>,
    presenting: RefCell<Weak<Screen>>,
    overlays: RefCell<Vec<ScreenRef>>,
    overlay_host: RefCell<Weak<Screen>>,

    navigator: RefCell<Weak<Navigator>>,
    scoped_navigator: RefCell<Option<Rc<Navigator>>>,
    mode: Cell<Option<DisplayMode>>,
    transition_name: RefCell<Option<String>>,
    dismiss_transition: RefCell<Option<Rc<Transition>>>,
    presentation: RefCell<Option<Rc<PresentationHost>>>,
    left_by_system_back: Cell<bool>,
    context: RefCell<HashMap<String, PageData>>,
    gestures: RefCell<SlotMap<GestureId, GestureHandler>>,
}

impl Screen {
    /// Create a plain screen.
    pub fn new(type_name: impl Into<String>, content: impl ScreenContent) -> ScreenRef {
        Self::build(type_name.into(), Box::new(content), None)
    }

    /// Create a plain screen with [`Blank`] content.
    pub fn blank(type_name: impl Into<String>) -> ScreenRef {
        Self::build(type_name.into(), Box::new(Blank), None)
    }

    /// Create an empty container.
    pub fn container(kind: ContainerKind, type_name: impl Into<String>) -> ScreenRef {
        Self::build(type_name.into(), Box::new(Blank), Some(kind))
    }

    pub(crate) fn build(
        type_name: String,
        content: Box<dyn ScreenContent>,
        container: Option<ContainerKind>,
    ) -> ScreenRef {
        let id = register_screen(&type_name);
        Rc::new_cyclic(|this| Screen {
            this: this.clone(),
            id,
            type_name,
            title: RefCell::new(None),
            content: RefCell::new(content),
            surface: Rc::new(Surface::new()),
            container,
            children: RefCell::new(Vec::new()),
            selected: Cell::new(0),
            parent: RefCell::new(Weak::new()),
            presented: RefCell::new(None),
            presenting: RefCell::new(Weak::new()),
            overlays: RefCell::new(Vec::new()),
            overlay_host: RefCell::new(Weak::new()),
            navigator: RefCell::new(Weak::new()),
            scoped_navigator: RefCell::new(None),
            mode: Cell::new(None),
            transition_name: RefCell::new(None),
            dismiss_transition: RefCell::new(None),
            presentation: RefCell::new(None),
            left_by_system_back: Cell::new(false),
            context: RefCell::new(HashMap::new()),
            gestures: RefCell::new(SlotMap::with_key()),
        })
    }

    // =========================================================================
    // Identity and content
    // =========================================================================

    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Runtime type name used by `back_to` and `goto` lookups.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn title(&self) -> Option<String> {
        self.title.borrow().clone()
    }

    pub fn set_title(&self, title: Option<String>) {
        *self.title.borrow_mut() = title;
    }

    pub fn surface(&self) -> &Rc<Surface> {
        &self.surface
    }

    /// Borrow the content as `T`.
    pub fn content<T: ScreenContent>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.content.borrow(), |content| {
            let any: &dyn Any = &**content;
            any.downcast_ref::<T>()
        })
        .ok()
    }

    /// Mutably borrow the content as `T` for the duration of `f`.
    pub fn with_content_mut<T: ScreenContent, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut content = self.content.try_borrow_mut().ok()?;
        let any: &mut dyn Any = &mut **content;
        any.downcast_mut::<T>().map(f)
    }

    /// Run a hook on the content.
    pub(crate) fn notify(&self, hook: &'static str, f: impl FnOnce(&mut dyn ScreenContent)) {
        match self.content.try_borrow_mut() {
            Ok(mut content) => f(&mut **content),
            Err(_) => {
                tracing::warn!(target: targets::NAVIGATOR, screen = %self.id, hook, "content is busy, notification skipped");
            }
        }
    }

    pub fn allows_interactive_dismiss(&self) -> bool {
        self.content
            .try_borrow()
            .map(|content| content.allows_interactive_dismiss())
            .unwrap_or(false)
    }

    pub fn preferred_size(&self) -> Option<Size> {
        self.content
            .try_borrow()
            .ok()
            .and_then(|content| content.preferred_size())
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    pub fn container_kind(&self) -> Option<ContainerKind> {
        self.container
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn children(&self) -> Vec<ScreenRef> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn parent(&self) -> Option<ScreenRef> {
        self.parent.borrow().upgrade()
    }

    pub(crate) fn set_parent(&self, parent: Option<&Screen>) {
        *self.parent.borrow_mut() = parent.map(|p| p.this.clone()).unwrap_or_default();
    }

    /// The screen this one presents modally.
    pub fn presented(&self) -> Option<ScreenRef> {
        self.presented.borrow().clone()
    }

    /// The screen presenting this one.
    pub fn presenting(&self) -> Option<ScreenRef> {
        self.presenting.borrow().upgrade()
    }

    pub fn overlays(&self) -> Vec<ScreenRef> {
        self.overlays.borrow().clone()
    }

    /// The screen this overlay is layered on.
    pub fn overlay_host(&self) -> Option<ScreenRef> {
        self.overlay_host.borrow().upgrade()
    }

    /// Descend through containers to the screen the user sees.
    pub fn active_leaf(self: &Rc<Self>) -> ScreenRef {
        let mut screen = self.clone();
        while let Some(child) = screen.active_child() {
            screen = child;
        }
        screen
    }

    /// End of the presented chain starting here.
    pub fn top_presenter(self: &Rc<Self>) -> ScreenRef {
        let mut screen = self.clone();
        while let Some(presented) = screen.presented() {
            screen = presented;
        }
        screen
    }

    /// The topmost visible screen: presented chain, then containers, then overlays.
    pub fn visible_top(self: &Rc<Self>) -> ScreenRef {
        let mut leaf = self.top_presenter().active_leaf();
        loop {
            let overlay = leaf.overlays.borrow().last().cloned();
            match overlay {
                Some(overlay) => leaf = overlay.top_presenter().active_leaf(),
                None => return leaf,
            }
        }
    }

    /// This screen or its closest parent that is a stack container.
    pub fn nearest_stack_container(self: &Rc<Self>) -> Option<ScreenRef> {
        let mut current = Some(self.clone());
        while let Some(screen) = current {
            if screen.container == Some(ContainerKind::Stack) {
                return Some(screen);
            }
            current = screen.parent();
        }
        None
    }

    /// Whether `other` is this screen or sits below it in the container tree.
    pub fn contains(self: &Rc<Self>, other: &ScreenRef) -> bool {
        let mut current = Some(other.clone());
        while let Some(screen) = current {
            if Rc::ptr_eq(&screen, self) {
                return true;
            }
            current = screen.parent();
        }
        false
    }

    /// Present `screen` modally from this screen.
    pub(crate) fn present(&self, screen: &ScreenRef) {
        *screen.presenting.borrow_mut() = self.this.clone();
        if let Some(previous) = self.presented.borrow_mut().replace(screen.clone()) {
            tracing::warn!(target: targets::NAVIGATOR, screen = %previous.id, "replacing a presented screen");
        }
    }

    /// Dismiss whatever this screen presents, and everything above it.
    ///
    /// Returns the removed screens from the bottom of the chain up.
    pub(crate) fn unwind(&self) -> Vec<ScreenRef> {
        let mut removed = Vec::new();
        let mut next = self.presented.borrow_mut().take();
        while let Some(screen) = next {
            next = screen.presented.borrow_mut().take();
            *screen.presenting.borrow_mut() = Weak::new();
            screen.detach_surfaces();
            removed.push(screen);
        }
        removed
    }

    pub(crate) fn add_overlay(&self, overlay: &ScreenRef) {
        *overlay.overlay_host.borrow_mut() = self.this.clone();
        self.overlays.borrow_mut().push(overlay.clone());
    }

    pub(crate) fn remove_overlay(&self, overlay: &ScreenRef) -> bool {
        let position = self
            .overlays
            .borrow()
            .iter()
            .position(|o| Rc::ptr_eq(o, overlay));
        match position {
            Some(position) => {
                let removed = self.overlays.borrow_mut().remove(position);
                *removed.overlay_host.borrow_mut() = Weak::new();
                removed.unwind();
                removed.detach_surfaces();
                true
            }
            None => false,
        }
    }

    /// Attach this screen and its container subtree to the visual hierarchy.
    pub(crate) fn attach_surfaces(&self, frame: Rect) {
        self.surface.attach(frame);
        for child in self.children.borrow().iter() {
            child.attach_surfaces(frame);
        }
    }

    /// Detach this screen, its container subtree and its overlays.
    pub(crate) fn detach_surfaces(&self) {
        self.surface.detach();
        for child in self.children.borrow().iter() {
            child.detach_surfaces();
        }
        for overlay in self.overlays.borrow().iter() {
            overlay.detach_surfaces();
        }
    }

    // =========================================================================
    // Navigation attachments
    // =========================================================================

    /// The navigator that showed this screen.
    pub fn navigator(&self) -> Option<Rc<Navigator>> {
        self.navigator.borrow().upgrade()
    }

    pub(crate) fn set_navigator(&self, navigator: Weak<Navigator>) {
        *self.navigator.borrow_mut() = navigator;
    }

    /// The child navigator scoped to this container child, if any.
    pub fn scoped_navigator(&self) -> Option<Rc<Navigator>> {
        self.scoped_navigator.borrow().clone()
    }

    pub(crate) fn set_scoped_navigator(&self, navigator: Option<Rc<Navigator>>) {
        *self.scoped_navigator.borrow_mut() = navigator;
    }

    /// The mode this screen was shown with.
    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode.get()
    }

    pub(crate) fn set_mode(&self, mode: DisplayMode) {
        self.mode.set(Some(mode));
    }

    /// Name of the transition style this screen was shown with.
    pub fn transition_name(&self) -> Option<String> {
        self.transition_name.borrow().clone()
    }

    pub(crate) fn set_transition_name(&self, name: Option<String>) {
        *self.transition_name.borrow_mut() = name;
    }

    pub(crate) fn set_dismiss_transition(&self, transition: Option<Rc<Transition>>) {
        *self.dismiss_transition.borrow_mut() = transition;
    }

    pub(crate) fn take_dismiss_transition(&self) -> Option<Rc<Transition>> {
        self.dismiss_transition.borrow_mut().take()
    }

    /// Whether an armed dismiss transition is waiting for a gesture.
    pub fn has_dismiss_transition(&self) -> bool {
        self.dismiss_transition.borrow().is_some()
    }

    pub fn presentation(&self) -> Option<Rc<PresentationHost>> {
        self.presentation.borrow().clone()
    }

    pub(crate) fn set_presentation(&self, host: Option<Rc<PresentationHost>>) {
        *self.presentation.borrow_mut() = host;
    }

    /// Whether the platform's own back gesture is removing this screen.
    pub fn left_by_system_back(&self) -> bool {
        self.left_by_system_back.get()
    }

    pub(crate) fn set_left_by_system_back(&self, flag: bool) {
        self.left_by_system_back.set(flag);
    }

    pub fn context_value(&self, key: &str) -> Option<PageData> {
        self.context.borrow().get(key).cloned()
    }

    pub fn set_context_value(&self, key: impl Into<String>, value: PageData) {
        self.context.borrow_mut().insert(key.into(), value);
    }

    pub fn remove_context_value(&self, key: &str) -> Option<PageData> {
        self.context.borrow_mut().remove(key)
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    pub(crate) fn add_gesture(&self, handler: GestureHandler) -> GestureId {
        self.gestures.borrow_mut().insert(handler)
    }

    pub(crate) fn remove_gesture(&self, id: GestureId) -> bool {
        self.gestures.borrow_mut().remove(id).is_some()
    }

    /// Number of gesture handlers currently attached.
    pub fn gesture_count(&self) -> usize {
        self.gestures.borrow().len()
    }

    /// Feed a pan sample to the attached gesture handlers.
    ///
    /// Returns `true` if a handler consumed it.
    pub fn handle_pan(&self, sample: &PanSample) -> bool {
        let handlers: Vec<GestureHandler> = self
            .gestures
            .borrow()
            .values()
            .cloned()
            .collect();
        let mut consumed = false;
        for handler in handlers {
            consumed |= handler(sample);
        }
        consumed
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("container", &self.container)
            .field("children", &self.children.borrow().len())
            .field("mode", &self.mode.get())
            .finish()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let id = self.id;
        let _ = LIVE_SCREENS.try_with(|live| live.borrow_mut().remove(id));
    }
}
