//! Gesture-driven dismissal: edge pans on pushed screens and swipes on modals.

mod common;

use std::time::Duration;

use common::{record_events, recorder, setup_with_home};
use horizon_waypoint::prelude::*;
use horizon_waypoint::NavigatorState;

fn push_detail(context: &NavigationContext) -> (ScreenRef, ScreenRef) {
    let root = context.root_navigator();
    let home = context.window().root().unwrap().children()[0].clone();
    root.open(PageRequest::new("Detail"), true, None);
    context.run_until_idle();
    (home, root.top_screen().unwrap())
}

#[test]
fn test_short_pan_cancels_and_rearms() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    let (home, detail) = push_detail(&context);
    assert!(detail.has_dismiss_transition());
    let events = record_events(&context);

    assert!(detail.handle_pan(&PanSample::began(Point::new(10.0, 400.0))));
    assert_eq!(root.state(), NavigatorState::Transitioning);
    assert_eq!(root.stack_len(), 1);
    assert_eq!(recorder(&home).before_back, vec![None]);

    assert!(detail.handle_pan(&PanSample::changed(Point::new(100.0, 0.0))));
    assert_eq!(detail.surface().offset().x, 100.0);

    assert!(detail.handle_pan(&PanSample::ended(Point::new(100.0, 0.0), Point::ZERO)));
    context.run_until_idle();

    assert_eq!(root.stack_len(), 2);
    assert_eq!(root.state(), NavigatorState::Idle);
    assert_eq!(container.child_count(), 2);
    assert!(detail.surface().is_attached());
    assert_eq!(detail.surface().offset().x, 0.0);
    assert!(recorder(&home).after_back.is_empty());
    assert_eq!(recorder(&detail).will_finish, 0);
    assert!(detail.has_dismiss_transition());
    let seen: Vec<NavigationEvent> = std::mem::take(&mut *events.lock());
    assert_eq!(seen, vec![NavigationEvent::DismissCancelled { screen: detail.id() }]);

    // The re-armed transition accepts a second gesture that completes.
    assert!(detail.handle_pan(&PanSample::began(Point::new(10.0, 400.0))));
    assert!(detail.handle_pan(&PanSample::changed(Point::new(300.0, 0.0))));
    assert!(detail.handle_pan(&PanSample::ended(Point::new(300.0, 0.0), Point::ZERO)));
    assert_eq!(recorder(&detail).will_finish, 1);
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert_eq!(container.child_count(), 1);
    assert!(!detail.surface().is_attached());
    assert_eq!(recorder(&home).after_back, vec![None]);
    assert_eq!(recorder(&detail).did_finish, 1);
}

#[test]
fn test_fast_flick_finishes_short_pan() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let (home, detail) = push_detail(&context);

    assert!(detail.handle_pan(&PanSample::began(Point::new(5.0, 300.0))));
    assert!(detail.handle_pan(&PanSample::changed(Point::new(80.0, 0.0))));
    assert!(detail.handle_pan(&PanSample::ended(
        Point::new(80.0, 0.0),
        Point::new(2000.0, 0.0)
    )));
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert_eq!(recorder(&home).after_back.len(), 1);
}

#[test]
fn test_pan_away_from_edge_is_ignored() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let (_, detail) = push_detail(&context);

    assert!(!detail.handle_pan(&PanSample::began(Point::new(200.0, 400.0))));
    assert!(!detail.handle_pan(&PanSample::changed(Point::new(300.0, 0.0))));
    assert_eq!(root.stack_len(), 2);
    assert_eq!(root.state(), NavigatorState::Idle);
}

#[test]
fn test_refused_tracking_still_dismisses() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    let (home, detail) = push_detail(&context);
    detail.with_content_mut::<common::Recorder, _>(|content| content.locked = true);

    assert!(detail.handle_pan(&PanSample::began(Point::new(10.0, 400.0))));
    assert_eq!(root.stack_len(), 1);
    assert_eq!(recorder(&detail).will_finish, 1);
    assert!(!detail.handle_pan(&PanSample::changed(Point::new(50.0, 0.0))));
    assert!(!detail.handle_pan(&PanSample::cancelled()));
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert_eq!(container.child_count(), 1);
    assert!(!detail.surface().is_attached());
    assert_eq!(recorder(&home).after_back, vec![None]);
    assert_eq!(recorder(&detail).did_finish, 1);
}

#[test]
fn test_cancelled_pan_keeps_screen() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let (_, detail) = push_detail(&context);

    assert!(detail.handle_pan(&PanSample::began(Point::new(10.0, 400.0))));
    assert!(detail.handle_pan(&PanSample::cancelled()));
    context.run_until_idle();
    assert_eq!(root.stack_len(), 2);
    assert!(detail.surface().is_attached());
}

#[test]
fn test_gesture_refused_while_busy() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let (_, detail) = push_detail(&context);

    root.open(PageRequest::new("Settings"), true, None);
    context.tick(Duration::from_millis(16));
    assert_eq!(root.state(), NavigatorState::Transitioning);
    assert!(!detail.handle_pan(&PanSample::began(Point::new(10.0, 400.0))));

    context.run_until_idle();
    assert_eq!(root.stack_len(), 3);
}

#[test]
fn test_swipe_down_dismisses_modal() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let window_root = context.window().root().unwrap();
    let home = window_root.children()[0].clone();

    root.open(PageRequest::new("Compose").with_mode(DisplayMode::Present), true, None);
    context.run_until_idle();
    let wrapper = window_root.presented().unwrap();
    let compose = wrapper.children()[0].clone();
    assert_eq!(wrapper.transition_name().as_deref(), Some(builtin::COVER));

    assert!(!wrapper.handle_pan(&PanSample::began(Point::new(5.0, 400.0))));
    assert!(wrapper.handle_pan(&PanSample::began(Point::new(200.0, 10.0))));
    assert!(wrapper.handle_pan(&PanSample::changed(Point::new(0.0, 500.0))));
    assert_eq!(wrapper.surface().offset().y, 500.0);
    assert!(wrapper.handle_pan(&PanSample::ended(Point::new(0.0, 500.0), Point::ZERO)));
    context.run_until_idle();

    assert!(window_root.presented().is_none());
    assert_eq!(root.stack_len(), 1);
    assert_eq!(recorder(&home).after_back, vec![None]);
    assert_eq!(recorder(&compose).did_finish, 1);
}
