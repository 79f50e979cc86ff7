//! Paper input: TeX section extraction and document loading

pub mod input;
pub mod sections;

pub use input::{tex_to_json, InputFormat, PaperContent, PaperError};
pub use sections::{extract_sections, sections_to_json, Section};
