//! The export pipeline: raw section text is cleaned into bounded lines,
//! the project's style descriptor is resolved into concrete colors/fonts,
//! image geometry is computed from the rendered line count, and the
//! composers turn the result into an in-memory render model that the
//! `ooxml` writer serializes into a .pptx or .docx byte stream.
//!
//! Nothing in this module touches the database or mutates sections;
//! everything here is recomputed fresh on every export call.

pub mod assembler;
pub mod cleaner;
pub mod layout;
pub mod pages;
pub mod slides;
pub mod style;
