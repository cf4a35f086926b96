//! Opaque business data carried between screens.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

/// A reference-counted, type-erased payload.
///
/// The engine never looks inside; screens downcast to the type they expect.
/// Cloning is cheap and shares the payload.
#[derive(Clone)]
pub struct PageData {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

impl PageData {
    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Borrow the payload as `T`, if that is what it holds.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether two handles share the same payload.
    pub fn ptr_eq(&self, other: &PageData) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for PageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PageData").field(&self.type_name).finish()
    }
}
