pub mod usd_converter;
