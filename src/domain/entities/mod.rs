//! Domain Entities
//!
//! Core data of a build: the recipe, manifest and source tree that go in,
//! and the layer and image records that come out.

mod image;
mod layer;
mod manifest;
mod recipe;
mod source_tree;

pub use image::{ImageLayer, ImageRecord, IMAGE_RECORD_VERSION};
pub use layer::LayerRecord;
pub use manifest::Manifest;
pub use recipe::Recipe;
pub use source_tree::{SourceFile, SourceTree};
