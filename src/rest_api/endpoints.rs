use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

use super::error::ProxyError;
use super::upstream::Upstream;

pub const HEALTH_MESSAGE: &str = "Proxy is working";

#[derive(Deserialize)]
pub struct ProxyQuery {
    endpoint: Option<String>,
}

/// Registers the pass-through route and the health check
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(shared::PROXY_ROUTE).route(web::get().to(proxy)))
        .service(health);
}

#[get("/health")]
pub(super) async fn health() -> impl Responder {
    HttpResponse::Ok().body(HEALTH_MESSAGE)
}

pub(super) async fn proxy(
    query: web::Query<ProxyQuery>,
    upstream: web::Data<dyn Upstream>,
) -> Result<HttpResponse, ProxyError> {
    let endpoint = query
        .endpoint
        .as_deref()
        .filter(|endpoint| !endpoint.is_empty())
        .ok_or(ProxyError::MissingEndpoint)?;

    let outcome = upstream.get(endpoint).await.map_err(|error| {
        log::error!("Proxy error for {}: {:?}", endpoint, error);
        ProxyError::Upstream
    })?;

    if !outcome.status.is_success() {
        log::error!(
            "Proxy error: upstream responded with status {} for {}",
            outcome.status,
            endpoint
        );
        return Err(ProxyError::Upstream);
    }

    let data: serde_json::Value = serde_json::from_str(&outcome.content).map_err(|error| {
        log::error!("Proxy error: unable to parse response for {}: {}", endpoint, error);
        ProxyError::Upstream
    })?;

    log::trace!("Proxied {}", endpoint);

    Ok(HttpResponse::Ok().json(data))
}
