pub mod config;
pub mod docs;
pub mod error;
pub mod response;

pub mod handlers;
pub mod inference;
pub mod models;
pub mod routes;
pub mod storage;
pub mod upload;
