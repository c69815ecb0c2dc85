//! Domain Layer
//!
//! The core of strata: build inputs, stage planning and cache keys, without
//! I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Recipe, Manifest, SourceTree, LayerRecord, ImageRecord
//! - `value_objects/` - Immutable value types (BaseImage, Workdir, CacheKey)
//! - `services/` - Stage planner, requirement parser, build file renderer
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
