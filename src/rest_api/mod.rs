pub mod endpoints;
pub mod error;
pub mod proxy_server;
pub mod upstream;
