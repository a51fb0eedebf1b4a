use tracing::debug;

use crate::config::AppConfig;
use crate::server;

pub async fn handle(verbose: bool) -> anyhow::Result<()> {
    if verbose {
        debug!("Starting web server from the command line");
    }
    server::serve(AppConfig::from_env()).await
}
