//! jdesc - JVM class describer
//!
//! Reads compiled `.class` files from a class path and reports the public method
//! surface of a type, inherited methods included, as pretty-printed JSON.

mod error;

pub mod classfile;
pub mod classpath;
pub mod collector;
pub mod config;
pub mod describer;
pub mod surface;

#[cfg(test)]
mod fixture;

pub use classfile::ClassFile;
pub use classpath::{ClassPath, ClassPathEntry, ClassSource};
pub use collector::{ChainLink, DeclaredMethod, MethodCollector};
pub use config::Config;
pub use describer::{MethodDescription, describe};
pub use error::{Error, Result};
pub use surface::{InspectOptions, Inspector, PublicApi, describe_public};
