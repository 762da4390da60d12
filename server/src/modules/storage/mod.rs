pub mod media;

pub use media::{MediaError, MediaStore};
