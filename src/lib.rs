//! Core library exports for the prices service.
//!
//! With the `data` feature the crate exposes the domain types, Diesel models
//! and schema. The default `server` feature adds the archive codec, record
//! parser, repositories, services and Actix-web routes used by the binary.

pub mod db;
pub mod domain;
pub mod models;
pub mod schema;

#[cfg(feature = "server")]
pub mod archive;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
