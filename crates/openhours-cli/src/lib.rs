pub mod cli;
pub mod http;
pub mod render;

use std::ffi::OsString;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use openhours_core::ApiClient;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::Cli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting openhours CLI"
    );

    let settings = cli::load_settings(&cli)?;
    debug!(?settings, "resolved settings");

    let transport =
        http::ReqwestTransport::new(Duration::from_secs(settings.request_timeout_secs))?;
    let client = ApiClient::new(
        settings.endpoint.clone(),
        settings.language.clone(),
        transport,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed starting async runtime")?;
    let output = runtime.block_on(render::execute(&cli, &settings, client))?;

    println!("{output}");
    Ok(())
}
