//! Tool installation registry and resolution.
//!
//! - [`InstallationRegistry`] - shared, snapshot-swapped list of installations
//! - [`InstallationTemplate`] - an installation as registered
//! - [`ResolvedInstallation`] - an installation resolved for one build
//! - [`resolve`] - look up and resolve an installation by name
//!
//! # Example
//!
//! ```
//! use exerun::node::LocalNode;
//! use exerun::registry::{resolve, InstallationRegistry, InstallationTemplate};
//! use std::collections::HashMap;
//!
//! let registry = InstallationRegistry::with_installations(vec![
//!     InstallationTemplate::new("echo", "${TOOLS}/echo", None),
//! ]).unwrap();
//!
//! let mut env = HashMap::new();
//! env.insert("TOOLS".to_string(), "/bin".to_string());
//!
//! let resolved = resolve(&registry, "echo", &LocalNode::new(), &env).unwrap();
//! assert_eq!(resolved.home_path(), "/bin/echo");
//! ```

pub mod installation;
pub mod resolver;
pub mod store;

pub use installation::{InstallationTemplate, ResolvedInstallation};
pub use resolver::resolve;
pub use store::{InstallationRegistry, Snapshot};
