//! Page images and where they come from.
//!
//! An [`ImageSet`] is the hand-off point between fetching and document
//! assembly: providers produce one, the sinks only ever read it.

mod image;
pub use self::image::*;

mod image_set;
pub use image_set::*;

mod providers;
pub use providers::*;
