use chart_ops::{
    common::error::{ReadingFile, YamlParseFromFile},
    ChartRequest, RepositoryEntry, Result, ValuesData, ValuesTemplate,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use snafu::ResultExt;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// These are the supported cli configuration options for chart-ops.
#[derive(Parser)]
#[command(name = "chart-ops", version)]
#[command(about = "Installs, templates and uninstalls helm chart releases", long_about = None)]
pub(crate) struct CliArgs {
    /// This is the kubeconfig of the cluster which the helm commands target.
    #[arg(long, global = true, env = "KUBECONFIG", value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// This is the path to the helm binary. If not set, helm is looked up in $PATH.
    #[arg(long, global = true, env = "HELM_BINARY", value_name = "PATH")]
    helm_binary: Option<PathBuf>,

    /// Formatting style to be used while logging.
    #[arg(long, global = true, value_enum, default_value_t = FmtStyle::Pretty)]
    fmt_style: FmtStyle,

    /// Use ANSI colors for the logs.
    #[arg(long, global = true, default_value_t = true, action = ArgAction::Set)]
    ansi_colors: bool,

    #[command(subcommand)]
    operation: Operation,
}

impl CliArgs {
    /// This returns the kubeconfig path, if one was given.
    pub(crate) fn kubeconfig(&self) -> Option<PathBuf> {
        self.kubeconfig.clone()
    }

    /// This returns the helm binary path, if one was given.
    pub(crate) fn helm_binary(&self) -> Option<PathBuf> {
        self.helm_binary.clone()
    }

    /// This returns formatting style to be used.
    pub(crate) fn fmt_style(&self) -> FmtStyle {
        self.fmt_style
    }

    /// This returns ansi_colours arg.
    pub(crate) fn ansi_colours(&self) -> bool {
        self.ansi_colors
    }

    pub(crate) fn operation(&self) -> &Operation {
        &self.operation
    }
}

/// The log formats which the tracing subscriber supports.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FmtStyle {
    Pretty,
    Compact,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Operation {
    /// Installs a chart release, or upgrades it if it exists.
    Install(ChartArgs),
    /// Renders the manifests of a chart release to standard output.
    Template(ChartArgs),
    /// Uninstalls a chart release.
    Uninstall(UninstallArgs),
    /// Registers chart repositories and updates the local repository index.
    RepoAdd(RepoArgs),
    /// Prints the version of the helm binary, which must be helm v3.
    Version,
}

#[derive(Args)]
pub(crate) struct ChartArgs {
    /// The release name.
    name: String,

    /// The chart, either a local chart directory or '<repo>/<chart>'.
    chart: String,

    /// The Kubernetes Namespace of the release.
    #[arg(short, long)]
    namespace: Option<String>,

    /// The chart version constraint.
    #[arg(long = "version", value_name = "VERSION")]
    chart_version: Option<String>,

    /// Wait until the release resources are ready.
    #[arg(long, default_value_t = false)]
    wait: bool,

    /// A values template, rendered with the --set and --values-data values.
    #[arg(long, value_name = "PATH")]
    values_template: Option<PathBuf>,

    /// Template data (can specify multiple: --set key1=val1 --set key2=val2). Values are read
    /// as YAML, so 'replicas=5' sets the number 5.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set_value, requires = "values_template")]
    set: Vec<(String, serde_json::Value)>,

    /// A YAML file with template data. The --set values take precedence.
    #[arg(long, value_name = "FILE", requires = "values_template")]
    values_data: Option<PathBuf>,
}

impl ChartArgs {
    /// Builds the chart request, reading the template data file if there is one.
    pub(crate) fn chart_request(&self) -> Result<ChartRequest> {
        let mut request = ChartRequest::new(&self.name, &self.chart).with_wait(self.wait);
        if let Some(namespace) = self.namespace.as_ref() {
            request = request.with_namespace(namespace);
        }
        if let Some(version) = self.chart_version.as_ref() {
            request = request.with_version(version);
        }

        if let Some(template) = self.values_template.as_ref() {
            let mut data = match self.values_data.as_ref() {
                Some(filepath) => read_yaml_file::<ValuesData>(filepath)?,
                None => ValuesData::new(),
            };
            data.extend(self.set.iter().cloned());
            request = request.with_values_template(ValuesTemplate::new(template, data));
        }

        Ok(request)
    }
}

#[derive(Args)]
pub(crate) struct UninstallArgs {
    /// The release name.
    name: String,

    /// The Kubernetes Namespace of the release, 'default' if not set.
    #[arg(short, long)]
    namespace: Option<String>,
}

impl UninstallArgs {
    pub(crate) fn name(&self) -> &str {
        self.name.as_str()
    }

    pub(crate) fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[derive(Args)]
pub(crate) struct RepoArgs {
    /// A chart repository (can specify multiple: --repo name1=url1 --repo name2=url2).
    #[arg(long = "repo", value_name = "NAME=URL", value_parser = parse_key_val)]
    repos: Vec<(String, String)>,

    /// A YAML file with a list of '{name, url}' chart repositories, registered before the --repo
    /// ones.
    #[arg(long, value_name = "FILE")]
    repo_file: Option<PathBuf>,
}

impl RepoArgs {
    /// Collects the repositories, in registration order.
    pub(crate) fn repositories(&self) -> Result<Vec<RepositoryEntry>> {
        let mut repositories = match self.repo_file.as_ref() {
            Some(filepath) => read_yaml_file::<Vec<RepositoryEntry>>(filepath)?,
            None => Vec::new(),
        };
        for (name, url) in self.repos.iter() {
            repositories.push(RepositoryEntry::new(name, url)?);
        }
        Ok(repositories)
    }
}

fn read_yaml_file<T>(filepath: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let contents = fs::read(filepath).context(ReadingFile {
        filepath: filepath.to_path_buf(),
    })?;
    serde_yaml::from_slice(contents.as_slice()).context(YamlParseFromFile {
        filepath: filepath.to_path_buf(),
    })
}

/// Parses 'key=value'.
fn parse_key_val(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

/// Parses 'key=value', where value is a YAML scalar or flow collection.
fn parse_set_value(arg: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (key, value) = parse_key_val(arg)?;
    let value = serde_yaml::from_str::<serde_json::Value>(value.as_str())
        .unwrap_or(serde_json::Value::String(value));
    Ok((key, value))
}
