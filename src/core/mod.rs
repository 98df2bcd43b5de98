pub mod assets;
pub mod config;
pub mod logger;
pub mod rest_client;
pub mod services;
pub mod settings;
pub mod swap;
