/// This is the name of the helm binary, as resolved by a binary provisioner.
pub const HELM_BINARY: &str = "helm";

/// This is the Namespace which `helm del` targets when the caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Rendered values files are named `values-<random>.yaml`.
pub(crate) const VALUES_FILE_PREFIX: &str = "values-";
pub(crate) const VALUES_FILE_SUFFIX: &str = ".yaml";

/// This is the only helm major version whose command line this crate speaks.
pub(crate) const SUPPORTED_HELM_MAJOR_VERSION: u64 = 3;

/// This is the name of the flag which carries the kubeconfig path. It is appended to every
/// helm command as `--kubeconfig=<path>`.
pub(crate) const KUBECONFIG_FLAG: &str = "--kubeconfig";
