//! End-to-end show and dismiss flows on a navigation context.

mod common;

use std::rc::Rc;
use std::time::Duration;

use common::{counter, data, recorder, record_events, setup, setup_with_home};
use horizon_waypoint::prelude::*;
use horizon_waypoint::screen::NotFound;
use horizon_waypoint::NavigatorState;

#[test]
fn test_first_show_becomes_root() {
    let context = setup();
    let root = context.root_navigator();
    root.open(PageRequest::new("Home"), true, None);
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert_eq!(root.stack().top_entry().unwrap().mode(), DisplayMode::Reset);
    assert_eq!(context.window().root().unwrap().type_name(), "Home");
    assert_eq!(root.state(), NavigatorState::Idle);
}

#[test]
fn test_push_and_close_hand_back_data() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    let home = container.children()[0].clone();

    root.open(PageRequest::new("Detail").with_data(data("id-7")), true, None);
    context.run_until_idle();
    let detail = root.top_screen().unwrap();
    assert_eq!(detail.type_name(), "Detail");
    assert_eq!(recorder(&detail).shown, vec![Some("id-7".to_string())]);
    assert!(Rc::ptr_eq(&detail.parent().unwrap(), &container));
    assert_eq!(detail.mode(), Some(DisplayMode::Push));

    let (done, completion) = counter();
    assert!(root.close(Some(data("saved")), true, Some(completion)));
    assert_eq!(root.stack_len(), 1);
    assert_eq!(recorder(&home).before_back, vec![Some("saved".to_string())]);
    assert!(recorder(&home).after_back.is_empty());
    assert_eq!(done.get(), 0);

    context.run_until_idle();
    assert_eq!(recorder(&home).after_back, vec![Some("saved".to_string())]);
    assert_eq!(done.get(), 1);
    assert_eq!(container.child_count(), 1);
    assert!(!detail.surface().is_attached());
}

#[test]
fn test_close_on_root_is_noop() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let (done, completion) = counter();

    assert!(!root.close(None, true, Some(completion)));
    context.run_until_idle();
    assert_eq!(done.get(), 0);
    assert_eq!(root.stack_len(), 1);
    assert!(!root.back_to_root(None, true, None));
}

#[test]
fn test_present_wraps_in_stack_container() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let window_root = context.window().root().unwrap();
    let home = window_root.children()[0].clone();

    root.open(
        PageRequest::new("Detail")
            .with_mode(DisplayMode::Present)
            .with_data(data("hi")),
        true,
        None,
    );
    let wrapper = window_root.presented().unwrap();
    assert_eq!(wrapper.type_name(), builtin::STACK_CONTAINER);
    assert_eq!(wrapper.children()[0].type_name(), "Detail");
    assert!(Rc::ptr_eq(&root.top_screen().unwrap(), &wrapper));
    assert_eq!(recorder(&wrapper.children()[0]).shown, vec![Some("hi".to_string())]);

    context.run_until_idle();
    assert!(root.close(None, true, None));
    context.run_until_idle();
    assert!(window_root.presented().is_none());
    assert!(!wrapper.surface().is_attached());
    assert_eq!(recorder(&home).after_back, vec![None]);
}

#[test]
fn test_push_inside_presented_wrapper() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let window_root = context.window().root().unwrap();

    root.open(PageRequest::new("Compose").with_mode(DisplayMode::Present), false, None);
    root.open(PageRequest::new("Detail"), false, None);
    context.run_until_idle();

    let wrapper = window_root.presented().unwrap();
    assert_eq!(wrapper.child_count(), 2);
    assert_eq!(root.stack_len(), 3);

    // Dismissing the presented wrapper takes the push above it along.
    assert!(root.dismiss(1, None, false, None));
    context.run_until_idle();
    assert_eq!(root.stack_len(), 1);
    assert!(window_root.presented().is_none());
    assert_eq!(wrapper.child_count(), 1);
}

#[test]
fn test_dismiss_never_removes_root() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    root.open(PageRequest::new("Detail"), false, None);
    context.run_until_idle();
    assert_eq!(root.stack_len(), 2);

    let (done, completion) = counter();
    assert!(!root.dismiss(1, None, false, Some(completion)));
    assert!(!root.dismiss(5, None, false, None));
    assert!(!root.dismiss(-3, None, false, None));
    context.run_until_idle();

    assert_eq!(done.get(), 0);
    assert_eq!(root.stack_len(), 2);
    assert_eq!(container.child_count(), 2);
    assert_eq!(root.state(), NavigatorState::Idle);
}

#[test]
fn test_back_to_by_type() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    for name in ["Detail", "Settings", "Profile"] {
        root.open(PageRequest::new(name), false, None);
    }
    context.run_until_idle();
    assert_eq!(root.stack_len(), 4);

    assert!(!root.back_to("Inbox", None, true, None));
    assert!(root.back_to("Detail", Some(data("back")), true, None));
    context.run_until_idle();

    assert_eq!(root.stack_len(), 2);
    let names: Vec<String> = container
        .children()
        .iter()
        .map(|child| child.type_name().to_string())
        .collect();
    assert_eq!(names, ["Home", "Detail"]);
    let detail = root.top_screen().unwrap();
    assert_eq!(recorder(&detail).after_back, vec![Some("back".to_string())]);
}

#[test]
fn test_back_to_root() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    root.open(PageRequest::new("Detail"), false, None);
    root.open(PageRequest::new("Settings"), false, None);
    context.run_until_idle();

    let events = record_events(&context);
    assert!(root.back_to_root(None, false, None));
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert_eq!(container.child_count(), 1);
    let dismissed: Vec<NavigationEvent> = std::mem::take(&mut *events.lock());
    assert!(matches!(
        dismissed.as_slice(),
        [NavigationEvent::Dismissed { screens }] if screens.len() == 2
    ));
}

#[test]
fn test_goto_selects_tab_and_pops_scope() {
    let context = setup();
    let root = context.root_navigator();
    root.open(
        PageRequest::new(builtin::TAB_CONTAINER)
            .with_mode(DisplayMode::Reset)
            .with_children(vec![
                PageRequest::new("Home").container(builtin::STACK_CONTAINER),
                PageRequest::new("Settings").container(builtin::STACK_CONTAINER),
            ]),
        false,
        None,
    );
    context.run_until_idle();

    let tabs = context.window().root().unwrap();
    assert_eq!(tabs.container_kind(), Some(ContainerKind::Tab));
    let home_scope = tabs.children()[0].scoped_navigator().unwrap();
    let settings_scope = tabs.children()[1].scoped_navigator().unwrap();
    assert!(Rc::ptr_eq(&context.current(), &home_scope));

    context.current().open(PageRequest::new("Detail"), false, None);
    context.run_until_idle();
    assert_eq!(home_scope.stack_len(), 2);

    assert!(context.goto("Settings", Some(data("tab")), false));
    assert!(!context.goto("Nowhere", None, false));
    assert_eq!(tabs.selected_index(), 1);
    assert!(Rc::ptr_eq(&context.current(), &settings_scope));

    let settings = tabs.children()[1].children()[0].clone();
    assert_eq!(recorder(&settings).shown, vec![None, Some("tab".to_string())]);

    context.run_until_idle();
    assert_eq!(home_scope.stack_len(), 1);
    assert_eq!(tabs.children()[0].child_count(), 1);
}

#[test]
fn test_goto_pops_within_scope_stack() {
    let context = setup();
    context.root_navigator().open(
        PageRequest::new(builtin::TAB_CONTAINER)
            .with_mode(DisplayMode::Reset)
            .with_children(vec![
                PageRequest::new("Home").container(builtin::STACK_CONTAINER),
                PageRequest::new("Settings").container(builtin::STACK_CONTAINER),
            ]),
        false,
        None,
    );
    let scope = context.current();
    scope.open(PageRequest::new("Inbox"), false, None);
    scope.open(PageRequest::new("Message"), false, None);
    context.run_until_idle();
    assert_eq!(scope.stack_len(), 3);

    assert!(context.goto("Inbox", None, false));
    context.run_until_idle();
    assert_eq!(scope.stack_len(), 2);
    assert_eq!(scope.top_screen().unwrap().type_name(), "Inbox");
}

#[test]
fn test_unknown_screen_falls_back() {
    let context = setup_with_home();
    let root = context.root_navigator();

    root.open(PageRequest::new("Ghost"), false, None);
    let placeholder = root.top_screen().unwrap();
    assert_eq!(placeholder.type_name(), builtin::NOT_FOUND);
    assert_eq!(placeholder.content::<NotFound>().unwrap().requested, "Ghost");

    root.open(PageRequest::new("Ghost").with_fallback("Profile"), false, None);
    assert_eq!(root.top_screen().unwrap().type_name(), "Profile");
    context.run_until_idle();
}

#[test]
fn test_overlay_dismissed_by_tap_outside() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let events = record_events(&context);

    root.open(
        PageRequest::new("Toast")
            .with_mode(DisplayMode::Overlay)
            .dismiss_on_tap_outside(true),
        true,
        None,
    );
    context.run_until_idle();

    let toast = root.top_screen().unwrap();
    let host = toast.presentation().unwrap();
    assert_eq!(host.content_frame(), Rect::new(100.0, 350.0, 200.0, 100.0));
    assert!(host.backdrop().is_attached());

    assert!(!context.handle_tap(Point::new(200.0, 400.0)));
    assert!(context.handle_tap(Point::new(10.0, 10.0)));
    context.tick(Duration::from_millis(16));
    assert!(host.backdrop().is_attached());
    let alpha = host.backdrop().alpha();
    assert!(alpha > 0.0 && alpha < 0.4, "backdrop alpha {alpha}");
    context.run_until_idle();

    assert_eq!(root.stack_len(), 1);
    assert!(!host.backdrop().is_attached());
    assert!(toast.overlay_host().is_none());
    let seen: Vec<NavigationEvent> = std::mem::take(&mut *events.lock());
    assert!(matches!(seen.first(), Some(NavigationEvent::Shown { mode: DisplayMode::Overlay, .. })));
    assert!(matches!(seen.last(), Some(NavigationEvent::Dismissed { .. })));
}

#[test]
fn test_data_after_native_back() {
    let context = setup_with_home();
    let root = context.root_navigator();
    let container = context.window().root().unwrap();
    let home = container.children()[0].clone();
    root.open(PageRequest::new("Detail"), false, None);
    context.run_until_idle();
    let detail = root.top_screen().unwrap();

    root.native_back_began(&detail);
    assert!(root.send_data_after_back(data("picked")));
    assert_eq!(recorder(&home).after_back, vec![Some("picked".to_string())]);
    assert!(recorder(&detail).after_back.is_empty());

    root.native_back_finished(&detail, false);
    assert!(!detail.left_by_system_back());

    root.native_back_began(&detail);
    root.native_back_finished(&detail, true);
    assert_eq!(root.stack_len(), 1);
    assert_eq!(container.child_count(), 1);
}
