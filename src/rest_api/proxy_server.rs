use actix_web::dev::{Server, ServerHandle};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;

use super::endpoints;
use super::upstream::{CoinGeckoUpstream, Upstream};
use crate::core::logger::print_info;
use crate::core::settings::ProxySettings;

pub struct ProxyServer {
    address: String,
    upstream: Arc<dyn Upstream>,
    server_handle: Mutex<Option<ServerHandle>>,
}

impl ProxyServer {
    pub fn new(settings: &ProxySettings) -> Arc<Self> {
        Self::with_upstream(
            &settings.address,
            Arc::new(CoinGeckoUpstream::new(&settings.upstream_base_url)),
        )
    }

    pub fn with_upstream(address: &str, upstream: Arc<dyn Upstream>) -> Arc<Self> {
        Arc::new(Self {
            address: address.to_owned(),
            upstream,
            server_handle: Mutex::new(None),
        })
    }

    /// Binds the configured address. The returned server has to be awaited (or spawned) to serve requests.
    pub fn start(self: &Arc<Self>) -> Result<(Server, Vec<SocketAddr>)> {
        let upstream = Data::from(self.upstream.clone());

        let http_server = HttpServer::new(move || {
            App::new()
                .app_data(upstream.clone())
                .configure(endpoints::configure)
        })
        .bind(&self.address)
        .with_context(|| format!("Unable to bind proxy server to {}", self.address))?
        .shutdown_timeout(1)
        .workers(1);

        let addresses = http_server.addrs();
        let server = http_server.run();
        *self.server_handle.lock() = Some(server.handle());

        print_info(format!(
            "Proxy server has been started on http://{}",
            self.address
        ));

        Ok((server, addresses))
    }

    /// Graceful stop, does nothing if the server isn't running
    pub async fn stop(&self) {
        let server_handle = self.server_handle.lock().take();

        match server_handle {
            Some(server_handle) => {
                server_handle.stop(true).await;
                log::info!("Proxy server stopped");
            }
            None => log::warn!("Proxy server isn't running"),
        }
    }
}
