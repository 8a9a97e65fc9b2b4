use crate::{
    common::{
        constants::KUBECONFIG_FLAG,
        error::{Error, UnknownAction},
    },
    helm::{repo::RepositoryEntry, request::ChartRequest},
    vec_to_strings,
};
use std::{fmt, path::Path, str::FromStr};

/// The chart operations which share the request flags. They differ only in the helm verb and
/// in whether helm may install the release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartAction {
    /// `helm upgrade --install`, creates or updates the release.
    Install,
    /// `helm template`, renders the release manifests without touching the cluster.
    Template,
}

impl ChartAction {
    /// This is the helm sub-command for the action.
    pub fn verb(&self) -> &'static str {
        match self {
            ChartAction::Install => "upgrade",
            ChartAction::Template => "template",
        }
    }

    /// This is a predicate to decide if `--install` is passed.
    pub fn installs(&self) -> bool {
        matches!(self, ChartAction::Install)
    }
}

impl FromStr for ChartAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(ChartAction::Install),
            "template" => Ok(ChartAction::Template),
            other => UnknownAction { action: other }.fail(),
        }
    }
}

impl fmt::Display for ChartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartAction::Install => write!(f, "install"),
            ChartAction::Template => write!(f, "template"),
        }
    }
}

/// Builds `<verb> <name> <chart> [--install] [--wait] [--namespace <ns>] [--values <file>]
/// [--version <v>]`. The kubeconfig flag is not included.
pub(crate) fn chart_args(
    action: ChartAction,
    request: &ChartRequest,
    values_file: Option<&Path>,
) -> Vec<String> {
    let mut args: Vec<String> = vec_to_strings![action.verb(), request.name(), request.chart()];
    if action.installs() {
        args.push("--install".to_string());
    }
    args.extend(request_flags(request, values_file));
    args
}

/// The flags shared by every ChartAction, in helm argument order.
fn request_flags(request: &ChartRequest, values_file: Option<&Path>) -> Vec<String> {
    let mut flags: Vec<String> = Vec::new();

    if request.wait() {
        flags.push("--wait".to_string());
    }
    if let Some(namespace) = request.namespace() {
        flags.extend(vec_to_strings!["--namespace", namespace]);
    }
    if let Some(values_file) = values_file {
        flags.extend(vec_to_strings!["--values", values_file.to_string_lossy()]);
    }
    if let Some(version) = request.version() {
        flags.extend(vec_to_strings!["--version", version]);
    }

    flags
}

/// Builds `del -n <namespace> <name>`.
pub(crate) fn uninstall_args(name: &str, namespace: &str) -> Vec<String> {
    vec_to_strings!["del", "-n", namespace, name]
}

/// Builds `repo add <name> <url>`.
pub(crate) fn repo_add_args(repository: &RepositoryEntry) -> Vec<String> {
    vec_to_strings!["repo", "add", repository.name(), repository.url()]
}

/// Builds `repo update`.
pub(crate) fn repo_update_args() -> Vec<String> {
    vec_to_strings!["repo", "update"]
}

/// Builds `version --short`.
pub(crate) fn version_args() -> Vec<String> {
    vec_to_strings!["version", "--short"]
}

/// Builds `--kubeconfig=<path>`.
pub(crate) fn kubeconfig_flag(kubeconfig: &Path) -> String {
    format!("{KUBECONFIG_FLAG}={}", kubeconfig.display())
}
