//! The weak navigation stack of one navigator.
//!
//! Entries are kept bottom-first: index `0` is the root, the last entry is
//! the top. Two addressing schemes exist:
//!
//! - **index**: bottom-relative, `0` is the root.
//! - **level**: top-relative, `0` is the current top. Negative levels count
//!   from the bottom: `-1` means "everything except the root", `-2` and
//!   below address `count + level`.
//!
//! The stack never keeps a screen alive. Entries whose screen has been
//! dropped are skipped by every read and compacted out by every write.
//! Out-of-range addresses saturate to "nothing": no entry, an empty list,
//! or no change.

use std::fmt;
use std::rc::{Rc, Weak};

use horizon_waypoint_core::logging::targets;

use crate::page::DisplayMode;
use crate::screen::{Screen, ScreenRef};

/// A weak reference to a shown screen and the mode it was shown with.
#[derive(Clone)]
pub struct StackEntry {
    screen: Weak<Screen>,
    mode: DisplayMode,
}

impl StackEntry {
    pub fn new(screen: &ScreenRef, mode: DisplayMode) -> Self {
        Self {
            screen: Rc::downgrade(screen),
            mode,
        }
    }

    pub fn screen(&self) -> Option<ScreenRef> {
        self.screen.upgrade()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_alive(&self) -> bool {
        self.screen.strong_count() > 0
    }

    fn is(&self, screen: &ScreenRef) -> bool {
        std::ptr::eq(self.screen.as_ptr(), Rc::as_ptr(screen))
    }
}

impl fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("StackEntry");
        match self.screen() {
            Some(screen) => s.field("screen", &screen.type_name()),
            None => s.field("screen", &"<dropped>"),
        };
        s.field("mode", &self.mode).finish()
    }
}

/// Ordered, weakly-owned history of one navigator.
#[derive(Debug, Default)]
pub struct NavigationStack {
    entries: Vec<StackEntry>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self) -> impl DoubleEndedIterator<Item = &StackEntry> {
        self.entries.iter().filter(|entry| entry.is_alive())
    }

    /// Drop entries whose screen is gone. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(StackEntry::is_alive);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::trace!(target: targets::STACK, removed, "compacted dead entries");
        }
        removed
    }

    /// Push `screen` on top.
    pub fn push(&mut self, screen: &ScreenRef, mode: DisplayMode) {
        self.compact();
        self.entries.push(StackEntry::new(screen, mode));
        tracing::trace!(target: targets::STACK, screen = %screen.id(), %mode, count = self.entries.len(), "pushed");
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries, bottom first.
    pub fn entries(&self) -> Vec<StackEntry> {
        self.live().cloned().collect()
    }

    /// Live screens, bottom first.
    pub fn screens(&self) -> Vec<ScreenRef> {
        self.live().filter_map(StackEntry::screen).collect()
    }

    pub fn get(&self, index: usize) -> Option<StackEntry> {
        self.live().nth(index).cloned()
    }

    pub fn top(&self) -> Option<ScreenRef> {
        self.live().rev().find_map(StackEntry::screen)
    }

    pub fn top_entry(&self) -> Option<StackEntry> {
        self.live().next_back().cloned()
    }

    pub fn root(&self) -> Option<ScreenRef> {
        self.live().find_map(StackEntry::screen)
    }

    /// Absolute index addressed by `level`, if in range.
    pub fn index_from_level(&self, level: isize) -> Option<usize> {
        let count = self.len() as isize;
        let index = match level {
            0.. => count - 1 - level,
            -1 => 1,
            _ => count + level,
        };
        (0..count).contains(&index).then_some(index as usize)
    }

    /// The level that removes `index` and everything above it.
    pub fn level_at(&self, index: usize) -> Option<isize> {
        let count = self.len();
        (index < count).then(|| (count - 1 - index) as isize)
    }

    /// The level that removes everything above `index`, keeping `index` on top.
    ///
    /// `None` when `index` is out of range or already the top.
    pub fn level_from_index(&self, index: usize) -> Option<isize> {
        let count = self.len();
        (index + 1 < count).then(|| (count - 2 - index) as isize)
    }

    /// Remove the entries from `level` to the top, returning them bottom first.
    pub fn drain(&mut self, level: isize) -> Vec<StackEntry> {
        self.compact();
        let Some(index) = self.index_from_level(level) else {
            tracing::trace!(target: targets::STACK, level, count = self.entries.len(), "drain out of range");
            return Vec::new();
        };
        let removed = self.entries.split_off(index);
        tracing::trace!(target: targets::STACK, level, index, removed = removed.len(), "drained");
        removed
    }

    /// Remove the entries from `level` to the top, returning the deepest removed.
    pub fn pop(&mut self, level: isize) -> Option<StackEntry> {
        self.drain(level).into_iter().next()
    }

    /// Live entries from the top down to `level`, top first.
    pub fn peek(&self, level: isize) -> Vec<StackEntry> {
        match self.index_from_level(level) {
            Some(index) => {
                let live = self.entries();
                live[index..].iter().rev().cloned().collect()
            }
            None => Vec::new(),
        }
    }

    pub fn index_of(&self, screen: &ScreenRef) -> Option<usize> {
        self.live().position(|entry| entry.is(screen))
    }

    /// Index of the most recently pushed screen with this type name.
    pub fn index_of_type(&self, type_name: &str) -> Option<usize> {
        let entries: Vec<&StackEntry> = self.live().collect();
        entries.iter().rposition(|entry| {
            entry
                .screen()
                .is_some_and(|screen| screen.type_name() == type_name)
        })
    }

    pub fn contains(&self, screen: &ScreenRef) -> bool {
        self.index_of(screen).is_some()
    }

    /// Put previously drained entries back on top.
    pub fn restore(&mut self, entries: Vec<StackEntry>) {
        self.compact();
        self.entries.extend(entries.into_iter().filter(StackEntry::is_alive));
        tracing::trace!(target: targets::STACK, count = self.entries.len(), "restored");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_with(names: &[&str]) -> (NavigationStack, Vec<ScreenRef>) {
        let mut stack = NavigationStack::new();
        let screens: Vec<ScreenRef> = names.iter().map(|n| Screen::blank(*n)).collect();
        for (i, screen) in screens.iter().enumerate() {
            let mode = if i == 0 { DisplayMode::Reset } else { DisplayMode::Push };
            stack.push(screen, mode);
        }
        (stack, screens)
    }

    fn names(entries: &[StackEntry]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| e.screen().map(|s| s.type_name().to_string()))
            .collect()
    }

    const FIVE: [&str; 5] = ["Tab", "Screen2", "Screen3", "Screen4", "Screen5"];

    #[test]
    fn test_count_excludes_dropped_screens() {
        let (mut stack, mut screens) = stack_with(&["A", "B", "C"]);
        assert_eq!(stack.len(), 3);
        screens.remove(1);
        assert_eq!(stack.len(), 2);
        assert_eq!(names(&stack.entries()), ["A", "C"]);

        let d = Screen::blank("D");
        stack.push(&d, DisplayMode::Push);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.compact(), 0);
    }

    #[test]
    fn test_pop_level_zero_removes_top() {
        let (mut stack, _screens) = stack_with(&FIVE);
        let removed = stack.pop(0).unwrap();
        assert_eq!(removed.screen().unwrap().type_name(), "Screen5");
        assert_eq!(stack.len(), 4);
    }

    #[test]
    fn test_pop_level_minus_one_keeps_root() {
        let (mut stack, _screens) = stack_with(&FIVE);
        let removed = stack.pop(-1).unwrap();
        assert_eq!(removed.screen().unwrap().type_name(), "Screen2");
        assert_eq!(names(&stack.entries()), ["Tab"]);
    }

    #[test]
    fn test_pop_level_one_returns_deepest_removed() {
        let (mut stack, _screens) = stack_with(&FIVE);
        let removed = stack.pop(1).unwrap();
        assert_eq!(removed.screen().unwrap().type_name(), "Screen4");
        assert_eq!(names(&stack.entries()), ["Tab", "Screen2", "Screen3"]);
    }

    #[test]
    fn test_pop_level_minus_two_counts_from_bottom() {
        let (mut stack, _screens) = stack_with(&FIVE);
        let removed = stack.drain(-2);
        assert_eq!(names(&removed), ["Screen4", "Screen5"]);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_out_of_range_saturates() {
        let (mut stack, _screens) = stack_with(&["A", "B"]);
        assert!(stack.pop(7).is_none());
        assert!(stack.pop(-9).is_none());
        assert!(stack.peek(5).is_empty());
        assert_eq!(stack.index_from_level(2), None);
        assert_eq!(stack.level_from_index(1), None);
        assert_eq!(stack.level_at(4), None);
        assert_eq!(stack.len(), 2);

        let mut empty = NavigationStack::new();
        assert!(empty.pop(0).is_none());
        assert!(empty.pop(-1).is_none());
        assert!(empty.top().is_none());
    }

    #[test]
    fn test_peek_is_top_first_and_read_only() {
        let (stack, _screens) = stack_with(&["A", "B", "C", "D"]);
        assert_eq!(names(&stack.peek(0)), ["D"]);
        assert_eq!(names(&stack.peek(2)), ["D", "C", "B"]);
        assert_eq!(names(&stack.peek(-1)), ["D", "C", "B"]);
        assert_eq!(stack.len(), 4);
    }

    #[test]
    fn test_index_of_type_prefers_most_recent() {
        let (stack, screens) = stack_with(&["List", "Detail", "List", "Detail"]);
        assert_eq!(stack.index_of_type("List"), Some(2));
        assert_eq!(stack.index_of_type("Detail"), Some(3));
        assert_eq!(stack.index_of_type("Missing"), None);
        assert_eq!(stack.index_of(&screens[1]), Some(1));
        assert_eq!(stack.index_of(&Screen::blank("List")), None);
    }

    #[test]
    fn test_level_from_index_keeps_target_on_top() {
        for target in 0..4 {
            let (mut stack, screens) = stack_with(&FIVE);
            let index = stack.index_of(&screens[target]).unwrap();
            let level = stack.level_from_index(index).unwrap();
            stack.drain(level);
            assert_eq!(stack.len(), index + 1);
            assert!(Rc::ptr_eq(&stack.top().unwrap(), &screens[target]));
        }
    }

    #[test]
    fn test_level_at_removes_target() {
        let (mut stack, screens) = stack_with(&FIVE);
        let level = stack.level_at(2).unwrap();
        let removed = stack.pop(level).unwrap();
        assert!(Rc::ptr_eq(&removed.screen().unwrap(), &screens[2]));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_restore_after_drain() {
        let (mut stack, _screens) = stack_with(&["A", "B", "C"]);
        let removed = stack.drain(0);
        stack.restore(removed);
        assert_eq!(names(&stack.entries()), ["A", "B", "C"]);
        assert_eq!(stack.top_entry().unwrap().mode(), DisplayMode::Push);
    }
}
