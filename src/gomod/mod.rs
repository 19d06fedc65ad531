// Go module metadata: manifest parsing and module-cache location

pub mod cache;
pub mod manifest;

pub use cache::{dependency_targets, discover_gomodcache, escape_module_path};
pub use manifest::{Manifest, Requirement};
