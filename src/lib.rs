// Library for tests to access modules

pub mod config;
pub mod error;
pub mod health_cache;
pub mod models;
pub mod rates;
pub mod routes;
pub mod service;
pub mod smart_repo;
pub mod sources;
pub mod store;
pub mod volume_repo;
pub mod worker;
