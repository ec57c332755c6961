pub mod common;
pub mod image;
pub mod upload;

pub use common::*;
pub use image::*;
pub use upload::*;
