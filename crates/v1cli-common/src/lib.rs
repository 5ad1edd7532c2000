#![deny(clippy::all)]

mod color;
mod json_ext;

pub use color::Colors;
pub use color::init as color_init;
pub use color::is_disabled as color_is_disabled;
pub use json_ext::ValueExt;
