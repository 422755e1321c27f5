//! File-backed manifests describing the active plugins of a host application.
//!
//! Three files are kept side by side:
//! - `namespaces` — one plugin namespace per line
//! - `bundles` — one fully-qualified bundle class name per line
//! - `routing.yml` — routing resources keyed by `<ClassName>_<pathKey>`
//!
//! ```text
//! app/config/local/plugin/
//! ├── namespaces
//! ├── bundles
//! └── routing.yml
//! ```
//!
//! Writes replace the whole file. Nothing here locks; callers serialize install and uninstall.

mod bundle;
mod error;
pub mod fs;
mod registry;
pub mod routing;
mod store;
mod vendor;

pub use bundle::{BundleName, NAMESPACE_SEP, normalize_fqcn, vendor_of};
pub use error::ManifestError;
pub use registry::ManifestRegistry;
pub use routing::{RoutingManifest, RoutingMap, RoutingResource};
pub use store::LineStore;
pub use vendor::shared_vendors;
