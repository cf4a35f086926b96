//! Page requests and the data they carry.

mod data;
mod request;

pub use data::PageData;
pub use request::{
    Completion, DisplayMode, PageOption, PageRequest, ScreenFactory, ScreenTarget, SourceGeometry,
};
