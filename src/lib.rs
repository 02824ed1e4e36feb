pub mod app;
pub mod classify;
pub mod columns;
pub mod config;
pub mod domain;
pub mod error;
pub mod gdc;
pub mod manifest;
pub mod matrix;
pub mod output;
