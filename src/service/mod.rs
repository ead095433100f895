pub mod accounts;
pub mod cache;
pub mod config;
pub mod security;
pub mod validation;
