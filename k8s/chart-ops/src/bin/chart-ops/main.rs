use crate::opts::{CliArgs, FmtStyle, Operation};
use chart_ops::{common::error::WriteOutput, FixedPath, HelmClient, Result, SearchPath};
use clap::Parser;
use snafu::ResultExt;
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod opts;

#[tokio::main]
async fn main() -> Result<()> {
    let opts = CliArgs::parse();
    init_logging(opts.fmt_style(), opts.ansi_colours());

    run(&opts).await.map_err(|error| {
        error!(%error, kind = ?error.kind(), "Failed to run helm chart operation");
        error
    })
}

/// Initialize logging components -- tracing. Logs go to standard error, so that standard output
/// carries only command results, e.g. the manifests of `chart-ops template`.
fn init_logging(style: FmtStyle, ansi_colours: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi_colours)
        .with_writer(std::io::stderr);

    match style {
        FmtStyle::Pretty => builder.pretty().init(),
        FmtStyle::Compact => builder.compact().init(),
        FmtStyle::Json => builder.json().init(),
    }
}

/// Creates the helm client from the cli options. The client is created unbound and then bound to
/// the kubeconfig, if there is one, so that a missing kubeconfig surfaces as an error of the
/// operation which needs it.
async fn helm_client(opts: &CliArgs) -> Result<HelmClient> {
    let client = match opts.helm_binary() {
        Some(path) => HelmClient::create_bare(&FixedPath::new(path)).await?,
        None => HelmClient::create_bare(&SearchPath::default()).await?,
    };

    if let Some(kubeconfig) = opts.kubeconfig() {
        client.set_kubeconfig(kubeconfig);
    }

    Ok(client)
}

async fn run(opts: &CliArgs) -> Result<()> {
    let client = helm_client(opts).await?;

    match opts.operation() {
        Operation::Install(args) => {
            let output = client.install(&args.chart_request()?).await?;
            info!(output = %output.trim_end(), "Helm install output");
        }
        Operation::Template(args) => {
            let manifests = client.template(&args.chart_request()?).await?;
            write_output(&mut io::stdout().lock(), manifests.as_str())?;
        }
        Operation::Uninstall(args) => {
            client.uninstall(args.name(), args.namespace()).await?;
        }
        Operation::RepoAdd(args) => {
            client.add_repos(&args.repositories()?).await?;
        }
        Operation::Version => {
            let version = client.ensure_v3().await?;
            write_output(&mut io::stdout().lock(), format!("v{version}\n").as_str())?;
        }
    }

    Ok(())
}

/// Writes command output to the writer. A closed pipe, e.g. `| head`, is not a failure of the
/// operation, any other write error is.
fn write_output<W: Write>(writer: &mut W, output: &str) -> Result<()> {
    match writer
        .write_all(output.as_bytes())
        .and_then(|()| writer.flush())
    {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context(WriteOutput),
    }
}
