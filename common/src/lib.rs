pub mod config;
pub mod context;
pub mod entities;
pub mod error;
pub mod notify;
pub mod repository;
