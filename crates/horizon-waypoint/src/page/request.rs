//! Page requests: "show this screen, this way".
//!
//! A [`PageRequest`] names a target screen, the [`DisplayMode`] used to show
//! it and a list of options. Requests can be linked with
//! [`PageRequest::append`] into a chain that a deep link walks hop by hop.
//!
//! # Example
//!
//! ```
//! use horizon_waypoint::{DisplayMode, PageOption, PageRequest};
//!
//! let request = PageRequest::new("Home")
//!     .with_mode(DisplayMode::Reset)
//!     .with_options([PageOption::Title("Home".into()), PageOption::Title("Start".into())])
//!     .append(PageRequest::new("Detail"))
//!     .append(PageRequest::new("Comments"));
//!
//! assert_eq!(request.title(), Some("Start"));
//! assert_eq!(request.chain_len(), 3);
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use horizon_waypoint_core::Rect;

use crate::page::PageData;
use crate::screen::{Screen, ScreenRef};

/// How a screen is put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Replace the visible root, unwinding any modal chain first.
    Reset,
    /// Push onto the nearest stack container.
    #[default]
    Push,
    /// Present modally over the current top.
    Present,
    /// Layer above the current top as a child, driven by a transition.
    Overlay,
    /// Switch to a screen that already exists. Only valid through `goto`.
    Goto,
}

impl DisplayMode {
    /// Short lowercase name, used in logs and debug trees.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Reset => "reset",
            DisplayMode::Push => "push",
            DisplayMode::Present => "present",
            DisplayMode::Overlay => "overlay",
            DisplayMode::Goto => "goto",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factory closure producing a ready screen.
pub type ScreenFactory = Rc<dyn Fn() -> ScreenRef>;

/// The screen a request asks for.
#[derive(Clone)]
pub enum ScreenTarget {
    /// A name looked up in the screen registry.
    Named(String),
    /// A closure that builds the screen directly.
    Factory(ScreenFactory),
}

impl ScreenTarget {
    /// The registry name, or `"<factory>"` for closures.
    pub fn name(&self) -> &str {
        match self {
            ScreenTarget::Named(name) => name,
            ScreenTarget::Factory(_) => "<factory>",
        }
    }
}

impl fmt::Debug for ScreenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenTarget::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ScreenTarget::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<&str> for ScreenTarget {
    fn from(name: &str) -> Self {
        ScreenTarget::Named(name.to_string())
    }
}

impl From<String> for ScreenTarget {
    fn from(name: String) -> Self {
        ScreenTarget::Named(name)
    }
}

/// Anchor of a popover-style presentation.
#[derive(Clone, Default)]
pub struct SourceGeometry {
    /// The screen the rectangle is relative to. `None` means window coordinates.
    pub view: Option<Weak<Screen>>,
    /// The anchor rectangle.
    pub rect: Rect,
}

impl SourceGeometry {
    /// An anchor in window coordinates.
    pub fn in_window(rect: Rect) -> Self {
        Self { view: None, rect }
    }

    /// An anchor relative to `view`.
    pub fn in_view(view: &ScreenRef, rect: Rect) -> Self {
        Self {
            view: Some(Rc::downgrade(view)),
            rect,
        }
    }

    /// The anchor in window coordinates. A dead view falls back to the raw rect.
    pub fn window_rect(&self) -> Rect {
        match self.view.as_ref().and_then(Weak::upgrade) {
            Some(view) => {
                let frame = view.surface().frame();
                Rect::new(
                    frame.origin.x + self.rect.origin.x,
                    frame.origin.y + self.rect.origin.y,
                    self.rect.width(),
                    self.rect.height(),
                )
            }
            None => self.rect,
        }
    }
}

impl fmt::Debug for SourceGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceGeometry")
            .field("has_view", &self.view.is_some())
            .field("rect", &self.rect)
            .finish()
    }
}

/// Callback fired once when an operation finishes.
pub type Completion = Box<dyn FnOnce()>;

/// One option of a [`PageRequest`]. Later options overwrite earlier ones.
pub enum PageOption {
    /// Wrap the target in a container registered under this name.
    Container(String),
    Title(String),
    Data(PageData),
    Completion(Completion),
    /// Name of a registered transition style.
    Transition(String),
    Source(SourceGeometry),
    DismissOnTapOutside(bool),
    /// Screen shown when the target cannot be resolved.
    Fallback(String),
    /// Child requests of a composite container.
    Children(Vec<PageRequest>),
}

impl fmt::Debug for PageOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageOption::Container(name) => f.debug_tuple("Container").field(name).finish(),
            PageOption::Title(title) => f.debug_tuple("Title").field(title).finish(),
            PageOption::Data(data) => f.debug_tuple("Data").field(data).finish(),
            PageOption::Completion(_) => f.write_str("Completion(..)"),
            PageOption::Transition(name) => f.debug_tuple("Transition").field(name).finish(),
            PageOption::Source(source) => f.debug_tuple("Source").field(source).finish(),
            PageOption::DismissOnTapOutside(flag) => {
                f.debug_tuple("DismissOnTapOutside").field(flag).finish()
            }
            PageOption::Fallback(name) => f.debug_tuple("Fallback").field(name).finish(),
            PageOption::Children(children) => {
                f.debug_tuple("Children").field(&children.len()).finish()
            }
        }
    }
}

/// A request to show a screen.
pub struct PageRequest {
    target: ScreenTarget,
    mode: DisplayMode,
    container: Option<String>,
    title: Option<String>,
    data: Option<PageData>,
    completion: Option<Completion>,
    transition: Option<String>,
    source: Option<SourceGeometry>,
    dismiss_on_tap_outside: bool,
    fallback: Option<String>,
    children: Vec<PageRequest>,
    next: Option<Box<PageRequest>>,
}

impl PageRequest {
    /// A push request for `target`.
    pub fn new(target: impl Into<ScreenTarget>) -> Self {
        Self {
            target: target.into(),
            mode: DisplayMode::default(),
            container: None,
            title: None,
            data: None,
            completion: None,
            transition: None,
            source: None,
            dismiss_on_tap_outside: false,
            fallback: None,
            children: Vec::new(),
            next: None,
        }
    }

    /// A request whose screen is built by `factory`.
    pub fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> ScreenRef + 'static,
    {
        Self::new(ScreenTarget::Factory(Rc::new(factory)))
    }

    /// Set the display mode.
    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply options in order.
    pub fn with_options(mut self, options: impl IntoIterator<Item = PageOption>) -> Self {
        for option in options {
            self.apply(option);
        }
        self
    }

    /// Apply a single option, overwriting any earlier value for the same field.
    pub fn apply(&mut self, option: PageOption) {
        match option {
            PageOption::Container(name) => self.container = Some(name),
            PageOption::Title(title) => self.title = Some(title),
            PageOption::Data(data) => self.data = Some(data),
            PageOption::Completion(callback) => self.completion = Some(callback),
            PageOption::Transition(name) => self.transition = Some(name),
            PageOption::Source(source) => self.source = Some(source),
            PageOption::DismissOnTapOutside(flag) => self.dismiss_on_tap_outside = flag,
            PageOption::Fallback(name) => self.fallback = Some(name),
            PageOption::Children(children) => self.children = children,
        }
    }

    pub fn container(self, name: impl Into<String>) -> Self {
        self.with_options([PageOption::Container(name.into())])
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_options([PageOption::Title(title.into())])
    }

    pub fn with_data(self, data: PageData) -> Self {
        self.with_options([PageOption::Data(data)])
    }

    pub fn with_completion<F: FnOnce() + 'static>(self, completion: F) -> Self {
        self.with_options([PageOption::Completion(Box::new(completion))])
    }

    pub fn with_transition(self, name: impl Into<String>) -> Self {
        self.with_options([PageOption::Transition(name.into())])
    }

    pub fn with_source(self, source: SourceGeometry) -> Self {
        self.with_options([PageOption::Source(source)])
    }

    pub fn dismiss_on_tap_outside(self, flag: bool) -> Self {
        self.with_options([PageOption::DismissOnTapOutside(flag)])
    }

    pub fn with_fallback(self, name: impl Into<String>) -> Self {
        self.with_options([PageOption::Fallback(name.into())])
    }

    pub fn with_children(self, children: Vec<PageRequest>) -> Self {
        self.with_options([PageOption::Children(children)])
    }

    /// Attach `next` at the tail of this request's chain.
    pub fn append(mut self, next: PageRequest) -> Self {
        self.attach_to_tail(next);
        self
    }

    fn attach_to_tail(&mut self, next: PageRequest) {
        match self.next {
            Some(ref mut successor) => successor.attach_to_tail(next),
            None => self.next = Some(Box::new(next)),
        }
    }

    pub fn target(&self) -> &ScreenTarget {
        &self.target
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Coerce the mode. Used when the first screen ever shown becomes the root.
    pub(crate) fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn container_name(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn data(&self) -> Option<&PageData> {
        self.data.as_ref()
    }

    pub fn transition(&self) -> Option<&str> {
        self.transition.as_deref()
    }

    pub fn source(&self) -> Option<&SourceGeometry> {
        self.source.as_ref()
    }

    pub fn dismisses_on_tap_outside(&self) -> bool {
        self.dismiss_on_tap_outside
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn children(&self) -> &[PageRequest] {
        &self.children
    }

    /// Whether this request describes a composite container.
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// The next hop of the chain.
    pub fn next(&self) -> Option<&PageRequest> {
        self.next.as_deref()
    }

    /// Number of requests in the chain, this one included.
    pub fn chain_len(&self) -> usize {
        let mut len = 1;
        let mut node = self.next();
        while let Some(request) = node {
            len += 1;
            node = request.next();
        }
        len
    }

    /// Detach and return the rest of the chain.
    pub fn take_next(&mut self) -> Option<PageRequest> {
        self.next.take().map(|next| *next)
    }

    pub(crate) fn take_children(&mut self) -> Vec<PageRequest> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }
}

impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("target", &self.target)
            .field("mode", &self.mode)
            .field("container", &self.container)
            .field("title", &self.title)
            .field("data", &self.data)
            .field("has_completion", &self.completion.is_some())
            .field("transition", &self.transition)
            .field("source", &self.source)
            .field("dismiss_on_tap_outside", &self.dismiss_on_tap_outside)
            .field("fallback", &self.fallback)
            .field("children", &self.children.len())
            .field("next", &self.next.as_ref().map(|n| n.target.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new("Home");
        assert_eq!(request.mode(), DisplayMode::Push);
        assert_eq!(request.target().name(), "Home");
        assert!(!request.is_composite());
        assert!(request.next().is_none());
        assert!(!request.dismisses_on_tap_outside());
    }

    #[test]
    fn test_options_last_wins() {
        let request = PageRequest::new("Detail").with_options([
            PageOption::Container("StackContainer".into()),
            PageOption::Transition("fade".into()),
            PageOption::DismissOnTapOutside(true),
            PageOption::Transition("slide".into()),
            PageOption::DismissOnTapOutside(false),
        ]);
        assert_eq!(request.container_name(), Some("StackContainer"));
        assert_eq!(request.transition(), Some("slide"));
        assert!(!request.dismisses_on_tap_outside());
    }

    #[test]
    fn test_append_links_to_tail() {
        let chain = PageRequest::new("A")
            .append(PageRequest::new("B"))
            .append(PageRequest::new("C"));

        let b = chain.next().unwrap();
        let c = b.next().unwrap();
        assert_eq!(chain.target().name(), "A");
        assert_eq!(b.target().name(), "B");
        assert_eq!(c.target().name(), "C");
        assert!(c.next().is_none());
    }

    #[test]
    fn test_append_extends_existing_chain() {
        let tail = PageRequest::new("C").append(PageRequest::new("D"));
        let chain = PageRequest::new("A")
            .append(PageRequest::new("B"))
            .append(tail)
            .append(PageRequest::new("E"));
        assert_eq!(chain.chain_len(), 5);
    }

    #[test]
    fn test_take_next_severs_chain() {
        let mut chain = PageRequest::new("A").append(PageRequest::new("B"));
        let next = chain.take_next().unwrap();
        assert_eq!(next.target().name(), "B");
        assert!(chain.next().is_none());
        assert_eq!(chain.chain_len(), 1);
    }

    #[test]
    fn test_children_make_composite() {
        let request = PageRequest::new("TabContainer").with_children(vec![
            PageRequest::new("Feed"),
            PageRequest::new("Profile"),
        ]);
        assert!(request.is_composite());
        assert_eq!(request.children().len(), 2);
    }

    #[test]
    fn test_debug_hides_closures() {
        let request = PageRequest::new("A").with_completion(|| {});
        let text = format!("{request:?}");
        assert!(text.contains("has_completion: true"));
    }
}
