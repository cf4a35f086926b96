//! Switching to screens that already exist.

use horizon_waypoint_core::logging::{span_names, targets};
use horizon_waypoint_core::PerfSpan;

use super::{NavigationEvent, Navigator};
use crate::page::PageData;
use crate::screen::{ContainerKind, ScreenRef};

/// Whether `child` is, or is a stack container rooted at, a `type_name` screen.
fn matches_type(child: &ScreenRef, type_name: &str) -> bool {
    if child.type_name() == type_name {
        return true;
    }
    child.container_kind() == Some(ContainerKind::Stack)
        && child
            .children()
            .first()
            .is_some_and(|first| first.type_name() == type_name)
}

/// Selection path from `root` to the child matching `type_name`.
///
/// Only the immediate children of the root container are searched, plus the
/// children of a split container sitting directly inside it.
fn find_child(root: &ScreenRef, type_name: &str) -> Option<(Vec<(ScreenRef, usize)>, ScreenRef)> {
    if !root.is_container() {
        return None;
    }
    let children = root.children();
    if let Some(index) = children.iter().position(|child| matches_type(child, type_name)) {
        return Some((vec![(root.clone(), index)], children[index].clone()));
    }
    for (index, child) in children.iter().enumerate() {
        if child.container_kind() != Some(ContainerKind::Split) {
            continue;
        }
        let panes = child.children();
        if let Some(pane) = panes.iter().position(|pane| matches_type(pane, type_name)) {
            let path = vec![(root.clone(), index), (child.clone(), pane)];
            return Some((path, panes[pane].clone()));
        }
    }
    None
}

impl Navigator {
    /// Switch to an existing screen named `type_name` within this
    /// navigator's scope.
    ///
    /// The root navigator selects among its container's children; any other
    /// navigator searches its own stack. Never creates a screen.
    pub fn goto(&self, type_name: &str, data: Option<PageData>, animated: bool) -> bool {
        let _span = PerfSpan::new(span_names::GOTO);
        if self.is_root {
            self.goto_child(type_name, data, animated)
        } else {
            self.goto_in_stack(type_name, data, animated)
        }
    }

    pub(crate) fn goto_child(&self, type_name: &str, data: Option<PageData>, animated: bool) -> bool {
        let (Some(context), Some(root)) = (self.context(), self.root_screen()) else {
            return false;
        };
        let Some((path, found)) = find_child(&root, type_name) else {
            tracing::debug!(target: targets::NAVIGATOR, type_name, "not among the root container's children");
            return false;
        };

        for (container, index) in &path {
            if container.select(*index) {
                context.emit(NavigationEvent::Selected {
                    container: container.id(),
                    index: *index,
                });
            }
        }
        context.current().back_to_root(None, animated, None);

        let scope = found.scoped_navigator();
        match &scope {
            Some(scope) => context.set_current(scope),
            None => {
                if let Some(this) = self.this.upgrade() {
                    context.set_current(&this);
                }
            }
        }
        found
            .active_leaf()
            .notify("before_show", |c| c.before_show(data.as_ref()));
        tracing::debug!(target: targets::NAVIGATOR, type_name, screen = %found.id(), "goto selected");
        true
    }

    pub(crate) fn goto_in_stack(&self, type_name: &str, data: Option<PageData>, animated: bool) -> bool {
        let (index, level) = {
            let stack = self.stack.borrow();
            match stack.index_of_type(type_name).filter(|&index| index > 0) {
                Some(index) => (index, stack.level_from_index(index)),
                None => return false,
            }
        };
        if let Some(level) = level {
            self.dismiss(level, None, animated, None);
        }

        let Some(screen) = self.stack.borrow().get(index).and_then(|entry| entry.screen()) else {
            return false;
        };
        if let (Some(context), Some(this)) = (self.context(), self.this.upgrade()) {
            context.set_current(&this);
        }
        screen
            .active_leaf()
            .notify("before_show", |c| c.before_show(data.as_ref()));
        tracing::debug!(target: targets::NAVIGATOR, type_name, index, "goto popped to screen");
        true
    }
}
