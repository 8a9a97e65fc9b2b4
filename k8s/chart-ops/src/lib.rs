//! Drives the helm command line to install, upgrade, template and uninstall chart releases, and
//! to register chart repositories, against the cluster of a rebindable kubeconfig.
//!
//! ```no_run
//! use chart_ops::{ChartRequest, HelmClient, SearchPath};
//!
//! # async fn deploy() -> chart_ops::Result<()> {
//! let helm = HelmClient::create("/tmp/kubeconfig", &SearchPath::default()).await?;
//! helm.install(&ChartRequest::new("redis", "bitnami/redis").with_wait(true))
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// Contains constants, errors and macros.
pub mod common;
/// Contains the command executor seam.
pub mod exec;
/// Contains the helm client and the types it is driven with.
pub mod helm;
/// Contains the binary provisioner seam.
pub mod provision;
/// Contains the template renderer seam.
pub mod render;

#[cfg(test)]
mod test_utils;

pub use common::{
    constants::{DEFAULT_NAMESPACE, HELM_BINARY},
    error::{Error, ErrorKind, Result},
};
pub use exec::{CommandExecutor, ProcessExecutor};
pub use helm::{
    args::ChartAction,
    client::{HelmClient, HelmClientBuilder},
    repo::RepositoryEntry,
    request::{ChartRequest, ValuesTemplate},
    values::ValuesFile,
};
pub use provision::{BinaryProvisioner, FixedPath, SearchPath};
pub use render::{TemplateRenderer, TeraRenderer, ValuesData};
