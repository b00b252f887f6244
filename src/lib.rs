pub mod asset;
pub mod config;
pub mod github;
pub mod http;
pub mod i18n;
pub mod locale;
pub mod platform;
pub mod query;
pub mod release;
pub mod server;
pub mod service;
pub mod view;
