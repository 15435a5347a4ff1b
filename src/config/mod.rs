//! Configuration documents: YAML parsing into a variant tree and
//! case-insensitive key resolution over it.
//!
//! - [`value`]: the [`Value`] tree
//! - [`lookup`]: single-key and dotted-path lookups that return `None`
//!   instead of failing
//! - [`loader`]: read and parse a document from disk
//! - [`install`]: views over `install.yaml` for the install programs
//! - [`profile`]: `configuration_profile` toggles and the extension list
pub mod install;
pub mod loader;
pub mod lookup;
pub mod profile;
pub mod value;

pub use loader::load;
pub use value::{Mapping, Value};
