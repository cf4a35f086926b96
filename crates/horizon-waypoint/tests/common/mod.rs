//! Shared fixtures for the navigation integration tests.

#![allow(dead_code)]

use std::cell::{Cell, Ref};
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_waypoint::prelude::*;
use horizon_waypoint::Completion;

pub const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

/// Content that records every hook it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub received: usize,
    pub shown: Vec<Option<String>>,
    pub before_back: Vec<Option<String>>,
    pub after_back: Vec<Option<String>>,
    pub will_finish: usize,
    pub did_finish: usize,
    pub locked: bool,
}

fn text(data: Option<&PageData>) -> Option<String> {
    data.and_then(|data| data.get::<String>().cloned())
}

impl ScreenContent for Recorder {
    fn did_receive_request(&mut self, _request: &PageRequest) {
        self.received += 1;
    }

    fn before_show(&mut self, data: Option<&PageData>) {
        self.shown.push(text(data));
    }

    fn before_back(&mut self, data: Option<&PageData>) {
        self.before_back.push(text(data));
    }

    fn after_back(&mut self, data: Option<&PageData>) {
        self.after_back.push(text(data));
    }

    fn allows_interactive_dismiss(&self) -> bool {
        !self.locked
    }

    fn will_finish_gesture_dismiss(&mut self) {
        self.will_finish += 1;
    }

    fn did_finish_gesture_dismiss(&mut self) {
        self.did_finish += 1;
    }
}

/// Small content for overlays and popovers.
#[derive(Debug, Default)]
pub struct Toast;

impl ScreenContent for Toast {
    fn preferred_size(&self) -> Option<Size> {
        Some(Size::new(200.0, 100.0))
    }
}

pub const SCREENS: [&str; 7] = ["Home", "Detail", "Settings", "Profile", "Inbox", "Message", "Compose"];

/// A context with a 400x800 window and every test screen registered.
pub fn setup() -> Rc<NavigationContext> {
    let context = NavigationContext::new(Window::new(BOUNDS), NavigatorConfig::default());
    for name in SCREENS {
        context.register_screen(name, Recorder::default).unwrap();
    }
    context.register_screen("Toast", Toast::default).unwrap();
    context
}

/// A context whose root is a stack container holding `Home`.
pub fn setup_with_home() -> Rc<NavigationContext> {
    let context = setup();
    context.root_navigator().open(
        PageRequest::new("Home")
            .container(builtin::STACK_CONTAINER)
            .with_mode(DisplayMode::Reset),
        false,
        None,
    );
    context.run_until_idle();
    context
}

pub fn recorder(screen: &ScreenRef) -> Ref<'_, Recorder> {
    screen.content::<Recorder>().unwrap()
}

pub fn data(text: &str) -> PageData {
    PageData::new(text.to_string())
}

/// Collect every event the context emits from now on.
pub fn record_events(context: &NavigationContext) -> Arc<Mutex<Vec<NavigationEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    context.events().connect(move |event: &NavigationEvent| {
        sink.lock().push(event.clone());
    });
    seen
}

/// Completion that counts how often it ran.
pub fn counter() -> (Rc<Cell<usize>>, Completion) {
    let count = Rc::new(Cell::new(0));
    let inner = count.clone();
    (count, Box::new(move || inner.set(inner.get() + 1)))
}
