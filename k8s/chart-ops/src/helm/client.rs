use crate::{
    common::{
        constants::{DEFAULT_NAMESPACE, HELM_BINARY, SUPPORTED_HELM_MAJOR_VERSION},
        error::{
            HelmVersion, HelmVersionParse, InvalidRequest, KubeconfigNotSet, NoBinaryPath,
            RegexCompile, Result, SemverParse,
        },
    },
    exec::{CommandExecutor, ProcessExecutor},
    helm::{
        args::{
            chart_args, kubeconfig_flag, repo_add_args, repo_update_args, uninstall_args,
            version_args, ChartAction,
        },
        repo::RepositoryEntry,
        request::ChartRequest,
        values::ValuesFile,
    },
    provision::BinaryProvisioner,
    render::{TemplateRenderer, TeraRenderer},
};
use regex::Regex;
use semver::Version;
use snafu::{ensure, OptionExt, ResultExt};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, info, warn};

/// This is a builder for HelmClient.
#[derive(Default)]
pub struct HelmClientBuilder {
    binary_path: Option<PathBuf>,
    kubeconfig: Option<PathBuf>,
    executor: Option<Arc<dyn CommandExecutor>>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    values_dir: Option<PathBuf>,
}

impl HelmClientBuilder {
    /// This is a builder option to set the path to the helm binary. This is mandatory.
    #[must_use]
    pub fn with_binary_path<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.binary_path = Some(path.into());
        self
    }

    /// This is a builder option to bind the client to a cluster. If it is skipped, the client
    /// has to be bound with HelmClient::set_kubeconfig() before it runs any command.
    #[must_use]
    pub fn with_kubeconfig<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.kubeconfig = Some(path.into());
        self
    }

    /// This is a builder option to replace the default ProcessExecutor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// This is a builder option to replace the default TeraRenderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// This is a builder option to create values files in `dir` instead of the system temporary
    /// directory.
    #[must_use]
    pub fn with_values_dir<P>(mut self, dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.values_dir = Some(dir.into());
        self
    }

    /// Build the HelmClient.
    pub fn build(self) -> Result<HelmClient> {
        let binary_path = self.binary_path.ok_or(NoBinaryPath.build())?;

        Ok(HelmClient {
            binary_path,
            kubeconfig: RwLock::new(self.kubeconfig),
            executor: self
                .executor
                .unwrap_or_else(|| Arc::new(ProcessExecutor::new().with_verbose(true))),
            renderer: self.renderer.unwrap_or_else(|| Arc::new(TeraRenderer)),
            values_dir: self.values_dir,
        })
    }
}

/// This type runs helm commands against the cluster of its kubeconfig, to install, template and
/// uninstall chart releases and to register chart repositories.
///
/// The kubeconfig may be rebound at any time with HelmClient::set_kubeconfig(). Every command
/// carries the kubeconfig which is bound when the command is built. Rebinding while another
/// operation is in flight is not ordered against it, so a single writer is assumed.
pub struct HelmClient {
    binary_path: PathBuf,
    kubeconfig: RwLock<Option<PathBuf>>,
    executor: Arc<dyn CommandExecutor>,
    renderer: Arc<dyn TemplateRenderer>,
    values_dir: Option<PathBuf>,
}

impl HelmClient {
    /// This creates an empty builder.
    pub fn builder() -> HelmClientBuilder {
        HelmClientBuilder::default()
    }

    /// Resolves the helm binary with the provisioner and creates a client bound to `kubeconfig`.
    pub async fn create<P>(kubeconfig: P, provisioner: &dyn BinaryProvisioner) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let binary_path = provisioner.path(HELM_BINARY).await?;
        Self::builder()
            .with_binary_path(binary_path)
            .with_kubeconfig(kubeconfig)
            .build()
    }

    /// Resolves the helm binary with the provisioner and creates a client which is not bound to
    /// any cluster yet.
    pub async fn create_bare(provisioner: &dyn BinaryProvisioner) -> Result<Self> {
        let binary_path = provisioner.path(HELM_BINARY).await?;
        Self::builder().with_binary_path(binary_path).build()
    }

    /// This is the path to the helm binary.
    pub fn binary_path(&self) -> &Path {
        self.binary_path.as_path()
    }

    /// This is the currently bound kubeconfig, if any.
    pub fn kubeconfig(&self) -> Option<PathBuf> {
        self.kubeconfig
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Binds the client to the cluster of `kubeconfig`, for all subsequent commands.
    pub fn set_kubeconfig<P>(&self, kubeconfig: P)
    where
        P: Into<PathBuf>,
    {
        let kubeconfig = kubeconfig.into();
        info!(kubeconfig = %kubeconfig.display(), "Binding helm client to kubeconfig");
        *self
            .kubeconfig
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(kubeconfig);
    }

    /// Runs `helm upgrade <name> <chart> --install ...`, which creates the release or upgrades
    /// it if it exists. Returns the helm output.
    pub async fn install(&self, request: &ChartRequest) -> Result<String> {
        self.run(ChartAction::Install, request).await
    }

    /// Runs `helm template <name> <chart> ...` and returns the rendered manifests as helm printed
    /// them.
    pub async fn template(&self, request: &ChartRequest) -> Result<String> {
        self.run(ChartAction::Template, request).await
    }

    /// Runs a chart action for the request. If the request carries a values template, it is
    /// rendered into a values file which exists only until the helm command returns.
    pub async fn run(&self, action: ChartAction, request: &ChartRequest) -> Result<String> {
        request.validate()?;
        // Fail before the values file is created.
        self.current_kubeconfig()?;

        let values_file = match request.values_template() {
            Some(template) => Some(ValuesFile::render(
                self.renderer.as_ref(),
                template,
                self.values_dir.as_deref(),
            )?),
            None => None,
        };

        let result = self
            .exec(chart_args(
                action,
                request,
                values_file.as_ref().map(ValuesFile::path),
            ))
            .await;

        if let Some(values_file) = values_file {
            if let Err(error) = values_file.release() {
                warn!(%error, "Failed to clean up values file");
            }
        }

        let output = result?;
        info!(
            %action,
            release = request.name(),
            chart = request.chart(),
            "Helm chart action succeeded"
        );
        Ok(output)
    }

    /// Runs `helm del -n <namespace> <name>`. The namespace is 'default' if none is given.
    pub async fn uninstall(&self, name: &str, namespace: Option<&str>) -> Result<()> {
        ensure!(
            !name.trim().is_empty(),
            InvalidRequest {
                field: "release name"
            }
        );
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);

        self.exec(uninstall_args(name, namespace)).await?;

        info!(release = name, %namespace, "Uninstalled helm release");
        Ok(())
    }

    /// Uninstalls the release of a request from the request's namespace, so that it pairs with
    /// the HelmClient::install() call for the same request.
    pub async fn uninstall_request(&self, request: &ChartRequest) -> Result<()> {
        self.uninstall(request.name(), request.namespace()).await
    }

    /// Runs `helm repo add <name> <url>` for every repository, in order, followed by a single
    /// `helm repo update`. The first failure stops the sequence.
    pub async fn add_repos(&self, repositories: &[RepositoryEntry]) -> Result<()> {
        for repository in repositories {
            repository.validate()?;
        }
        self.current_kubeconfig()?;

        for repository in repositories {
            self.exec(repo_add_args(repository)).await?;
            debug!(
                name = repository.name(),
                url = repository.url(),
                "Added helm repository"
            );
        }
        self.exec(repo_update_args()).await?;

        info!(count = repositories.len(), "Updated helm repositories");
        Ok(())
    }

    /// Runs `helm version --short` and returns the semantic version of the helm binary.
    /// Like every other command it carries the bound kubeconfig, so an unbound client fails with
    /// KubeconfigNotSet even though helm does not contact the cluster for it.
    pub async fn version(&self) -> Result<Version> {
        let output = self.exec(version_args()).await?;
        parse_helm_version(output.as_str())
    }

    /// Validate that the helm binary is helm v3.x.y.
    pub async fn ensure_v3(&self) -> Result<Version> {
        let version = self.version().await?;
        ensure!(
            version.major == SUPPORTED_HELM_MAJOR_VERSION,
            HelmVersion {
                version: version.to_string()
            }
        );
        Ok(version)
    }

    fn current_kubeconfig(&self) -> Result<PathBuf> {
        self.kubeconfig().context(KubeconfigNotSet)
    }

    /// Appends the kubeconfig flag, as bound right now, and runs helm.
    async fn exec(&self, mut args: Vec<String>) -> Result<String> {
        let kubeconfig = self.current_kubeconfig()?;
        args.push(kubeconfig_flag(kubeconfig.as_path()));

        debug!(command = %self.binary_path.display(), ?args, "Helm command");
        self.executor.exec(self.binary_path.as_path(), &args).await
    }
}

/// Picks the semantic version out of `helm version --short` output, e.g. 'v3.2.1+ge29ce2a'.
fn parse_helm_version(output: &str) -> Result<Version> {
    let expression = r"v?([0-9]+\.[0-9]+\.[0-9]+(-[0-9A-Za-z.-]+)?)";
    let regex = Regex::new(expression).context(RegexCompile { expression })?;

    let version_string = regex
        .captures(output.trim())
        .and_then(|captures| captures.get(1))
        .map(|version| version.as_str().to_string())
        .context(HelmVersionParse { output })?;

    Version::parse(version_string.as_str()).context(SemverParse { version_string })
}
