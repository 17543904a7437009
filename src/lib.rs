pub mod app_state;
pub mod auth;
pub mod config;
pub mod digest;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod links;
pub mod pages;
pub mod report;
pub mod reports;
pub mod routes;
pub mod telemetry;
