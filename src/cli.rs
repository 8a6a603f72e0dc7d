use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// kubeglance - A read-only web dashboard of pods across every kubeconfig context
#[derive(Parser, Debug)]
#[command(name = "kubeglance")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the dashboard over HTTP
    Serve(ServeArgs),

    /// List the contexts the dashboard would visit
    Contexts(ContextsArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// The address for which the http server will bind to [default: :8080]
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Absolute path to the kubeconfig file [default: ~/.kube/config]
    #[arg(short, long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Page title [default: pods]
    #[arg(long)]
    pub title: Option<String>,

    /// Seconds allowed per context before it is shown as unavailable, 0 disables [default: 10]
    #[arg(long, value_name = "SECS")]
    pub context_timeout: Option<u64>,

    /// Settings file [default: <config dir>/kubeglance/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ContextsArgs {
    /// Absolute path to the kubeconfig file [default: ~/.kube/config]
    #[arg(short, long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,
}
