//! External content providers: AI text generation and stock-image fetch.
//!
//! Both providers hold an ordered list of backends and fall through on
//! failure. Text exhausting every backend is a provider error surfaced to
//! the caller; image exhausting every backend degrades to a generated
//! placeholder so an export never fails for lack of a picture.

pub mod image;
pub mod text;

pub use image::ImageProvider;
pub use text::{SectionOutline, TextProvider};
