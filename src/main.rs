use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use kubeglance_aggregate::KubeDashboard;
use kubeglance_k8s::KubeConnector;
use kubeglance_web::{Renderer, create_app_state};

mod cli;
mod settings;

use cli::{Cli, Command, ContextsArgs, ServeArgs};
use settings::{ServeSettings, SettingsFile};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Contexts(args) => run_contexts(args),
    };

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let file = SettingsFile::discover(args.config.as_deref())?;
    let settings = ServeSettings::resolve(&args, file)?;
    tracing::debug!(?settings, "resolved settings");

    let dashboard = KubeDashboard::new(settings.kubeconfig.clone())
        .with_context_timeout(settings.context_timeout);
    let renderer = Renderer::new().context("Failed to load page template")?;
    let state = create_app_state(Arc::new(dashboard), renderer, &settings.title)?;

    let listener = bind_listener(&settings.bind_candidates())
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        kubeconfig = %settings
            .kubeconfig
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "default".to_string()),
        "serving dashboard"
    );

    kubeglance_web::serve(listener, state)
        .await
        .context("HTTP server failed")
}

/// Bind the first address that works
async fn bind_listener(candidates: &[String]) -> std::io::Result<TcpListener> {
    let mut last_err = None;
    for addr in candidates {
        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "bind failed, trying next address");
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "no bind address")
    }))
}

fn run_contexts(args: ContextsArgs) -> Result<()> {
    let kubeconfig = args.kubeconfig.or_else(settings::default_kubeconfig);
    let connector = KubeConnector::load(kubeconfig.as_deref())?;

    for ctx in connector.get_contexts() {
        let marker = if ctx.is_current { "*" } else { " " };
        println!(
            "{} {}\tcluster={}\tuser={}\tnamespace={}",
            marker,
            ctx.name,
            ctx.cluster,
            ctx.user,
            ctx.namespace.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
