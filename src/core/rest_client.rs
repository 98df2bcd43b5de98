use anyhow::{Context, Result};
use hyper::client::HttpConnector;
use hyper::{Body, Client, Error, Request, Response, StatusCode, Uri};
use hyper_tls::HttpsConnector;

pub type HttpParams = Vec<(String, String)>;

const KEEP_ALIVE: &str = "keep-alive";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequestOutcome {
    pub status: StatusCode,
    pub content: String,
}

impl RestRequestOutcome {
    pub fn new(status: StatusCode, content: impl Into<String>) -> Self {
        Self {
            status,
            content: content.into(),
        }
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl RestClient {
    pub fn new() -> Self {
        Self {
            client: create_client(),
        }
    }

    /// GET expecting a JSON body
    pub async fn get(&self, url: Uri) -> Result<RestRequestOutcome> {
        log::trace!("GET {}", url);

        let req = Request::get(url)
            .header(hyper::header::CONNECTION, KEEP_ALIVE)
            .header(hyper::header::ACCEPT, APPLICATION_JSON)
            .body(Body::empty())
            .context("Error during creation of http GET request")?;

        let response = self.client.request(req).await;

        handle_response(response, "GET").await
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn create_client() -> Client<HttpsConnector<HttpConnector>> {
    let https = HttpsConnector::new();
    Client::builder().build::<_, Body>(https)
}

// Inner Hyper types. Needed just for unified response handling in handle_response()
type ResponseType = std::result::Result<Response<Body>, Error>;
async fn handle_response(response: ResponseType, rest_action: &str) -> Result<RestRequestOutcome> {
    let response = response.with_context(|| format!("Unable to send {} request", rest_action))?;

    Ok(RestRequestOutcome {
        status: response.status(),
        content: std::str::from_utf8(hyper::body::to_bytes(response.into_body()).await?.as_ref())
            .context("Unable to parse content string")?
            .to_owned(),
    })
}

pub fn build_uri(host: &str, path: &str, http_params: &HttpParams) -> Result<Uri> {
    let mut url = String::with_capacity(1024);
    url.push_str(host);
    url.push_str(path);

    if !http_params.is_empty() {
        url.push('?');
        url.push_str(&to_http_string(http_params));
    }

    url.try_into().context("Unable create url")
}

pub fn to_http_string(parameters: &HttpParams) -> String {
    let mut http_string = String::new();
    for (key, value) in parameters {
        if !http_string.is_empty() {
            http_string.push('&');
        }
        http_string.push_str(key);
        http_string.push('=');
        http_string.push_str(value);
    }

    http_string
}
