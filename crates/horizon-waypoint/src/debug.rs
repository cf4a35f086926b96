//! Debug visualization of the screen hierarchy.
//!
//! [`ScreenTreeDebug`] renders a screen and everything hanging off it:
//! container children, overlays and the modally presented chain.
//!
//! ```ignore
//! use horizon_waypoint::debug::ScreenTreeDebug;
//!
//! println!("{}", ScreenTreeDebug::new().format_tree(&window.root().unwrap()));
//! ```
//!
//! The navigator traces the same output after every committed operation
//! when [`NavigatorConfig::log_hierarchy`](crate::NavigatorConfig) is set.

use std::fmt::Write as _;

use crate::screen::ScreenRef;

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

/// Configuration for tree output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show screen ids.
    pub show_ids: bool,
    /// Show the display mode each screen was shown with.
    pub show_modes: bool,
    /// Show titles.
    pub show_titles: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_modes: true,
            show_titles: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Type names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_modes: false,
            show_titles: false,
            ..Default::default()
        }
    }
}

/// How a node hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Root,
    Child,
    Overlay,
    Presented,
}

/// Renders screen trees.
#[derive(Debug, Clone, Default)]
pub struct ScreenTreeDebug {
    options: TreeFormatOptions,
}

impl ScreenTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the tree rooted at `root`.
    pub fn format_tree(&self, root: &ScreenRef) -> String {
        let mut output = String::new();
        let mut lasts = Vec::new();
        self.format_node(root, Relation::Root, &mut lasts, &mut output);
        output
    }

    fn format_node(&self, screen: &ScreenRef, relation: Relation, lasts: &mut Vec<bool>, output: &mut String) {
        let depth = lasts.len();
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        output.push_str(&self.build_prefix(lasts));
        match relation {
            Relation::Overlay => output.push_str("overlay: "),
            Relation::Presented => output.push_str("presents: "),
            Relation::Root | Relation::Child => {}
        }
        output.push_str(screen.type_name());
        if self.options.show_ids {
            let _ = write!(output, " [{}]", screen.id());
        }
        if let Some(kind) = screen.container_kind() {
            let _ = write!(output, " ({})", kind.as_str());
        }
        if self.options.show_modes
            && let Some(mode) = screen.mode()
        {
            let _ = write!(output, " {{{mode}}}");
        }
        if self.options.show_titles
            && let Some(title) = screen.title()
        {
            let _ = write!(output, " \"{title}\"");
        }
        output.push('\n');

        let mut nodes: Vec<(ScreenRef, Relation)> = screen
            .children()
            .into_iter()
            .map(|child| (child, Relation::Child))
            .collect();
        nodes.extend(screen.overlays().into_iter().map(|o| (o, Relation::Overlay)));
        nodes.extend(screen.presented().map(|p| (p, Relation::Presented)));

        let count = nodes.len();
        for (i, (node, relation)) in nodes.into_iter().enumerate() {
            lasts.push(i + 1 == count);
            self.format_node(&node, relation, lasts, output);
            lasts.pop();
        }
    }

    /// Prefix for a node whose ancestors' "is last child" flags are `lasts`.
    fn build_prefix(&self, lasts: &[bool]) -> String {
        let Some((&is_last, ancestors)) = lasts.split_last() else {
            return String::new();
        };
        let pad = " ".repeat(self.options.indent_size);
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "", ""),
        };

        let mut prefix = String::new();
        for &ancestor_last in ancestors {
            match self.options.style {
                TreeStyle::Compact => prefix.push_str(&pad),
                _ if ancestor_last => {
                    prefix.push(' ');
                    prefix.push_str(&pad);
                }
                _ => {
                    prefix.push_str(branch);
                    prefix.push_str(&pad);
                }
            }
        }
        match self.options.style {
            TreeStyle::Compact => prefix.push_str(&pad),
            _ => {
                prefix.push_str(if is_last { corner } else { tee });
                prefix.push(' ');
            }
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ContainerKind, Screen};

    fn tree() -> ScreenRef {
        let tabs = Screen::container(ContainerKind::Tab, "Tabs");
        let stack = Screen::container(ContainerKind::Stack, "Stack");
        stack.set_children(vec![Screen::blank("Home")]);
        tabs.set_children(vec![stack, Screen::blank("Settings")]);
        tabs.present(&Screen::blank("Login"));
        tabs
    }

    #[test]
    fn test_ascii_tree() {
        let debug = ScreenTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        });
        let output = debug.format_tree(&tree());
        let expected = "\
Tabs (tab)
+-- Stack (stack)
|  `-- Home
+-- Settings
`-- presents: Login
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_compact_and_max_depth() {
        let debug = ScreenTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Compact,
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        });
        let output = debug.format_tree(&tree());
        assert_eq!(output, "Tabs (tab)\n  Stack (stack)\n  Settings\n  presents: Login\n");
    }

    #[test]
    fn test_ids_and_titles() {
        let screen = Screen::blank("Profile");
        screen.set_title(Some("Me".to_string()));
        let debug = ScreenTreeDebug::with_options(TreeFormatOptions {
            show_titles: true,
            ..TreeFormatOptions::default()
        });
        let output = debug.format_tree(&screen);
        assert_eq!(output, format!("Profile [{}] \"Me\"\n", screen.id()));
    }
}
