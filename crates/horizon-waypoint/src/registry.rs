//! Name-to-factory registries for screens and transition styles.
//!
//! Screens and transitions are requested by name. Both registries are filled
//! at startup; the navigation context owns one of each. Built-in containers,
//! the not-found placeholder and the stock transition styles are registered
//! by [`ScreenRegistry::new`] and [`TransitionRegistry::new`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use horizon_waypoint_core::logging::targets;

use crate::error::{RegistryError, ResolveError};
use crate::screen::{Blank, ContainerKind, NotFound, Screen, ScreenContent, ScreenRef};
use crate::transition::styles::{Cover, Fade, NoTransition, OverlayStyle, PopoverStyle, Slide};
use crate::transition::TransitionStyle;

/// Names of everything registered out of the box.
pub mod builtin {
    pub const STACK_CONTAINER: &str = "StackContainer";
    pub const TAB_CONTAINER: &str = "TabContainer";
    pub const SPLIT_CONTAINER: &str = "SplitContainer";
    pub const NOT_FOUND: &str = "NotFound";

    pub const NONE: &str = "none";
    pub const FADE: &str = "fade";
    pub const SLIDE: &str = "slide";
    pub const COVER: &str = "cover";
    pub const OVERLAY: &str = "overlay";
    pub const POPOVER: &str = "popover";
}

/// Builds fresh screen content.
pub type ContentFactory = Rc<dyn Fn() -> Box<dyn ScreenContent>>;

#[derive(Clone)]
struct ScreenSpec {
    container: Option<ContainerKind>,
    factory: ContentFactory,
}

/// Maps screen names to factories.
#[derive(Clone)]
pub struct ScreenRegistry {
    specs: HashMap<String, ScreenSpec>,
}

impl ScreenRegistry {
    /// A registry holding the built-in containers and placeholder.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, kind) in [
            (builtin::STACK_CONTAINER, ContainerKind::Stack),
            (builtin::TAB_CONTAINER, ContainerKind::Tab),
            (builtin::SPLIT_CONTAINER, ContainerKind::Split),
        ] {
            registry.insert(name, Some(kind), Rc::new(|| Box::new(Blank) as Box<dyn ScreenContent>));
        }
        registry.insert(
            builtin::NOT_FOUND,
            None,
            Rc::new(|| Box::new(NotFound::default()) as Box<dyn ScreenContent>),
        );
        registry
    }

    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    fn insert(&mut self, name: &str, container: Option<ContainerKind>, factory: ContentFactory) {
        self.specs
            .insert(name.to_string(), ScreenSpec { container, factory });
    }

    /// Register a plain screen built by `factory`.
    pub fn register<C, F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        C: ScreenContent,
        F: Fn() -> C + 'static,
    {
        let name = name.into();
        if self.specs.contains_key(&name) {
            return Err(RegistryError::DuplicateScreen(name));
        }
        tracing::debug!(target: targets::REGISTRY, %name, "screen registered");
        self.insert(&name, None, Rc::new(move || Box::new(factory()) as Box<dyn ScreenContent>));
        Ok(())
    }

    /// Register a container type under `name`.
    pub fn register_container(
        &mut self,
        name: impl Into<String>,
        kind: ContainerKind,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.specs.contains_key(&name) {
            return Err(RegistryError::DuplicateScreen(name));
        }
        tracing::debug!(target: targets::REGISTRY, %name, kind = kind.as_str(), "container registered");
        self.insert(&name, Some(kind), Rc::new(|| Box::new(Blank) as Box<dyn ScreenContent>));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Container kind registered under `name`, if it is a container.
    pub fn container_kind(&self, name: &str) -> Option<ContainerKind> {
        self.specs.get(name).and_then(|spec| spec.container)
    }

    /// Build a new screen registered under `name`.
    pub fn instantiate(&self, name: &str) -> Result<ScreenRef, ResolveError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| ResolveError::UnknownScreen(name.to_string()))?;
        Ok(Screen::build(name.to_string(), (spec.factory)(), spec.container))
    }

    /// Build a new container registered under `name`.
    pub fn instantiate_container(&self, name: &str) -> Result<ScreenRef, ResolveError> {
        match self.specs.get(name) {
            None => Err(ResolveError::UnknownScreen(name.to_string())),
            Some(spec) if spec.container.is_none() => {
                Err(ResolveError::NotAContainer(name.to_string()))
            }
            Some(_) => self.instantiate(name),
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.specs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ScreenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Maps transition style names to styles.
#[derive(Clone)]
pub struct TransitionRegistry {
    styles: HashMap<String, Rc<dyn TransitionStyle>>,
}

impl TransitionRegistry {
    /// A registry holding the stock styles.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let stock: [Rc<dyn TransitionStyle>; 6] = [
            Rc::new(NoTransition),
            Rc::new(Fade),
            Rc::new(Slide),
            Rc::new(Cover),
            Rc::new(OverlayStyle),
            Rc::new(PopoverStyle),
        ];
        for style in stock {
            registry.styles.insert(style.name().to_string(), style);
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    /// Register a style under its own name.
    pub fn register(&mut self, style: impl TransitionStyle + 'static) -> Result<(), RegistryError> {
        let name = style.name().to_string();
        if self.styles.contains_key(&name) {
            return Err(RegistryError::DuplicateTransition(name));
        }
        tracing::debug!(target: targets::REGISTRY, %name, "transition registered");
        self.styles.insert(name, Rc::new(style));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn TransitionStyle>> {
        self.styles.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRegistry")
            .field("names", &self.names())
            .finish()
    }
}
