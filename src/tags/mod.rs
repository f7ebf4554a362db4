//! Block tags and the registry the compiler looks them up in
//!
//! Tags are registered explicitly before compilation:
//!
//! ```rust
//! use remora_template::tags::{remora, TagRegistry};
//!
//! let mut registry = TagRegistry::new();
//! remora::register(&mut registry).unwrap();
//! assert!(registry.contains("remora"));
//! ```

pub mod remora;
mod registry;

pub use registry::{TagError, TagParser, TagRegistry};
