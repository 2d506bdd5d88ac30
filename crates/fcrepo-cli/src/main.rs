//! # fcrepo CLI
//!
//! Operator commands against a Fedora Commons 3.x repository. Connection
//! settings come from the `FEDORA_*` environment variables; output is JSON
//! except for raw XML responses.

use anyhow::{Context, Result};
use fcrepo_client::{QueryParams, RepositoryClient, RepositoryConfig};
use fcrepo_core::{datastream_path, object_path};
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "path" => {
            let Some(pid) = args.get(2) else {
                usage("path <pid> [dsid]");
            };
            let path = match args.get(3) {
                Some(dsid) => datastream_path(Some(pid), Some(dsid), &QueryParams::new())
                    .context("Failed to build datastream path")?,
                None => object_path(Some(pid), &QueryParams::new()),
            };
            println!("{path}");
        }
        "describe" => {
            let client = connect()?;
            let profile = client
                .repository_profile()
                .await
                .context("Repository profile unavailable")?;
            print_json(&profile)?;
        }
        "next-pid" => {
            let client = connect()?;
            let xml = client
                .next_pid(&QueryParams::new())
                .await
                .context("Failed to allocate pid")?;
            println!("{xml}");
        }
        "object" => {
            let Some(pid) = args.get(2) else {
                usage("object <pid>");
            };
            let client = connect()?;
            let profile = client
                .object_profile(pid, None)
                .await
                .with_context(|| format!("Failed to fetch object {pid}"))?;
            print_json(&profile)?;
        }
        "datastream" => {
            let (Some(pid), Some(dsid)) = (args.get(2), args.get(3)) else {
                usage("datastream <pid> <dsid>");
            };
            let client = connect()?;
            let profile = client
                .datastream_profile(pid, dsid, false, None)
                .await
                .with_context(|| format!("Failed to fetch datastream {dsid} of {pid}"))?;
            print_json(&profile)?;
        }
        "versions" => {
            let Some(pid) = args.get(2) else {
                usage("versions <pid> [dsid]");
            };
            let client = connect()?;
            match args.get(3) {
                Some(dsid) => {
                    let history = client
                        .datastream_history(pid, dsid)
                        .await
                        .with_context(|| format!("Failed to fetch versions of {dsid} of {pid}"))?;
                    print_json(&history)?;
                }
                None => {
                    let history = client
                        .object_history(pid)
                        .await
                        .with_context(|| format!("Failed to fetch versions of {pid}"))?;
                    print_json(&history)?;
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect() -> Result<RepositoryClient> {
    let config = RepositoryConfig::from_env().context("Invalid FEDORA_* configuration")?;
    tracing::debug!(url = %config.url, "Connecting to repository");
    RepositoryClient::new(config).context("Failed to create repository client")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn usage(command: &str) -> ! {
    eprintln!("Usage: fcrepo {command}");
    std::process::exit(1);
}

fn print_help() {
    println!(
        r#"fcrepo CLI

USAGE:
    fcrepo <COMMAND> [ARGS]

COMMANDS:
    describe                 Print the repository profile
    next-pid                 Allocate a new pid
    object <pid>             Print an object profile
    datastream <pid> <dsid>  Print a datastream profile
    versions <pid> [dsid]    Print object change dates or datastream versions
    path <pid> [dsid]        Print the REST path of an object or datastream
    help                     Show this help message

ENVIRONMENT:
    FEDORA_URL               Repository base URL (default http://localhost:8080/fedora)
    FEDORA_USER              User name (default fedoraAdmin)
    FEDORA_PASSWORD          Password (default fedoraAdmin)
    FEDORA_TIMEOUT_SECS      Request timeout in seconds (default 60)
    RUST_LOG                 Log filter (default info)

EXAMPLES:
    fcrepo object demo:1
    fcrepo path "info:fedora/demo:1" DC
"#
    );
}
