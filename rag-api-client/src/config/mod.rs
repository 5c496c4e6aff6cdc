pub mod api_config;
pub mod default_config;
