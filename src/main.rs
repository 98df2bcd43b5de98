use anyhow::{Context, Result};
use ccy_swap_lib::core::config::{load_settings_or_default, CONFIG_PATH};
use ccy_swap_lib::core::logger::{init_logger, print_info};
use ccy_swap_lib::rest_api::proxy_server::ProxyServer;

#[actix_web::main]
async fn main() -> Result<()> {
    init_logger();

    let settings = load_settings_or_default(CONFIG_PATH)?;
    let proxy_server = ProxyServer::new(&settings.proxy);
    let (server, _) = proxy_server.start()?;
    let server_task = actix_web::rt::spawn(server);

    tokio::signal::ctrl_c()
        .await
        .context("Unable to listen for shutdown signal")?;

    print_info("Ctrl-C received, stopping proxy server");
    proxy_server.stop().await;

    server_task
        .await
        .context("Proxy server task failed")?
        .context("Proxy server finished with error")
}
