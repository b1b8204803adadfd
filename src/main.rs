use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use user_lookup::application_port::LookupError;
use user_lookup::logger::*;
use user_lookup::server::*;
use user_lookup::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let server = Server::try_new(&project_settings).await?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling lookups");
            on_ctrl_c.cancel();
        }
    });

    let mut failures = 0usize;
    for user_id in &cli.ids {
        match server
            .user_service
            .lookup_username_cancellable(*user_id, &cancel)
            .await
        {
            Ok(username) => println!("{}\t{}", user_id, username),
            Err(LookupError::Cancelled) => break,
            Err(_) => failures += 1,
        }
    }

    let shutdown_timeout = Duration::from_secs(10);
    if tokio::time::timeout(shutdown_timeout, server.shutdown())
        .await
        .is_err()
    {
        error!("server shutdown timed out");
    }

    if cancel.is_cancelled() {
        return Err(anyhow::anyhow!("lookup cancelled"));
    }
    if failures > 0 {
        return Err(anyhow::anyhow!("{} of {} lookups failed", failures, cli.ids.len()));
    }

    Ok(())
}
