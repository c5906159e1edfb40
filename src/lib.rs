pub mod dashboard;
pub mod errors;
pub mod logging;
pub mod proxy;
pub mod proxy_config;
