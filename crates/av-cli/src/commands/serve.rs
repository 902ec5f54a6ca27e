//! Serve command implementation

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use av_core::config::ServerConfig;

use crate::output::print_info;

/// Run the launcher service in the foreground until interrupted
pub async fn serve_command(mut config: ServerConfig, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.bind_address = bind;
    }

    print_info(&format!("Serving on {} (Ctrl+C to stop)", config.bind_address));

    let cancel = CancellationToken::new();
    av_server::daemon::spawn_signal_handler(cancel.clone());
    av_server::daemon::run(config, cancel).await
}
