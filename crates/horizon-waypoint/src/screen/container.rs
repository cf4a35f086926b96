//! Container behavior: tab, split and stack screens.

use std::rc::Rc;

use super::{Screen, ScreenRef};

/// The three container categories the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// A navigation stack; the last child is on top.
    Stack,
    /// A tab bar; one selected child is visible.
    Tab,
    /// A split view; the last child is the detail pane.
    Split,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Stack => "stack",
            ContainerKind::Tab => "tab",
            ContainerKind::Split => "split",
        }
    }
}

impl Screen {
    /// Replace the children of a container.
    ///
    /// Previous children lose their parent link. Selection resets to the
    /// first child. Ignored on non-container screens.
    pub fn set_children(&self, children: Vec<ScreenRef>) {
        if self.container.is_none() {
            tracing::debug!(target: crate::logging::targets::NAVIGATOR, screen = %self.id, "set_children on a plain screen ignored");
            return;
        }
        let old = std::mem::take(&mut *self.children.borrow_mut());
        for child in &old {
            child.set_parent(None);
        }
        for child in &children {
            child.set_parent(Some(self));
        }
        *self.children.borrow_mut() = children;
        self.selected.set(0);
    }

    /// Append a child. On a stack container this is a push.
    pub fn push_child(&self, child: ScreenRef) {
        child.set_parent(Some(self));
        self.children.borrow_mut().push(child);
    }

    /// Remove every child above `keep`.
    ///
    /// If `keep` is not a child, everything above the first child is removed.
    /// Returns the removed children in bottom-to-top order.
    pub fn pop_children_to(&self, keep: &ScreenRef) -> Vec<ScreenRef> {
        let position = self.index_of_child(keep).unwrap_or(0);
        self.truncate_children(position + 1)
    }

    /// Remove every child above the first.
    pub fn pop_children_to_root(&self) -> Vec<ScreenRef> {
        self.truncate_children(1)
    }

    fn truncate_children(&self, len: usize) -> Vec<ScreenRef> {
        let removed = {
            let mut children = self.children.borrow_mut();
            if children.len() <= len {
                return Vec::new();
            }
            children.split_off(len)
        };
        for child in &removed {
            child.set_parent(None);
            child.detach_surfaces();
        }
        let count = self.children.borrow().len();
        if self.selected.get() >= count {
            self.selected.set(count.saturating_sub(1));
        }
        removed
    }

    /// Swap `old` for `new` in place. Returns `false` if `old` is not a child.
    pub fn replace_child(&self, old: &ScreenRef, new: ScreenRef) -> bool {
        let Some(position) = self.index_of_child(old) else {
            return false;
        };
        old.set_parent(None);
        new.set_parent(Some(self));
        self.children.borrow_mut()[position] = new;
        true
    }

    /// Remove a single child. Returns `false` if it is not a child.
    pub fn remove_child(&self, child: &ScreenRef) -> bool {
        let Some(position) = self.index_of_child(child) else {
            return false;
        };
        self.children.borrow_mut().remove(position);
        child.set_parent(None);
        let count = self.children.borrow().len();
        if self.selected.get() >= count {
            self.selected.set(count.saturating_sub(1));
        }
        true
    }

    pub fn index_of_child(&self, child: &ScreenRef) -> Option<usize> {
        self.children.borrow().iter().position(|c| Rc::ptr_eq(c, child))
    }

    /// Select the child at `index`. Only tab and split containers select.
    pub fn select(&self, index: usize) -> bool {
        match self.container {
            Some(ContainerKind::Tab) | Some(ContainerKind::Split) => {}
            _ => return false,
        }
        if index >= self.children.borrow().len() {
            return false;
        }
        self.selected.set(index);
        true
    }

    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    /// The child currently shown: selected tab, detail pane or stack top.
    pub fn active_child(&self) -> Option<ScreenRef> {
        let children = self.children.borrow();
        match self.container? {
            ContainerKind::Tab => children.get(self.selected.get()).cloned(),
            ContainerKind::Split | ContainerKind::Stack => children.last().cloned(),
        }
    }

    /// Top of a stack container.
    pub fn top_child(&self) -> Option<ScreenRef> {
        self.children.borrow().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[&str]) -> (ScreenRef, Vec<ScreenRef>) {
        let stack = Screen::container(ContainerKind::Stack, "StackContainer");
        let children: Vec<ScreenRef> = names.iter().map(|n| Screen::blank(*n)).collect();
        stack.set_children(children.clone());
        (stack, children)
    }

    #[test]
    fn test_set_children_links_parents() {
        let (stack, children) = stack_of(&["A", "B"]);
        assert!(Rc::ptr_eq(&children[1].parent().unwrap(), &stack));
        assert_eq!(stack.child_count(), 2);

        stack.set_children(vec![Screen::blank("C")]);
        assert!(children[0].parent().is_none());
    }

    #[test]
    fn test_pop_children_to() {
        let (stack, children) = stack_of(&["A", "B", "C", "D"]);
        let removed = stack.pop_children_to(&children[1]);
        assert_eq!(removed.len(), 2);
        assert!(Rc::ptr_eq(&stack.top_child().unwrap(), &children[1]));
    }

    #[test]
    fn test_pop_children_to_unknown_falls_back_to_root() {
        let (stack, children) = stack_of(&["A", "B", "C"]);
        let stranger = Screen::blank("X");
        stack.pop_children_to(&stranger);
        assert_eq!(stack.child_count(), 1);
        assert!(Rc::ptr_eq(&stack.top_child().unwrap(), &children[0]));
    }

    #[test]
    fn test_select_only_on_tab_and_split() {
        let tab = Screen::container(ContainerKind::Tab, "TabContainer");
        tab.set_children(vec![Screen::blank("Feed"), Screen::blank("Profile")]);
        assert!(tab.select(1));
        assert_eq!(tab.active_child().unwrap().type_name(), "Profile");
        assert!(!tab.select(5));

        let (stack, _) = stack_of(&["A", "B"]);
        assert!(!stack.select(0));
    }

    #[test]
    fn test_replace_child() {
        let (stack, children) = stack_of(&["A"]);
        let replacement = Screen::blank("B");
        assert!(stack.replace_child(&children[0], replacement.clone()));
        assert!(children[0].parent().is_none());
        assert!(Rc::ptr_eq(&replacement.parent().unwrap(), &stack));
    }
}
