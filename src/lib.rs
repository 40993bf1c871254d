//! Fertilog: a fertility health tracker backend.
//!
//! Lab reports are uploaded as documents, biomarkers extracted through
//! an external service, scored against WHO reference tiers, adjusted by
//! lifestyle context, and persisted locally in SQLite. The HTTP API in
//! [`api`] exposes uploads, daily lifestyle logs, a dashboard, AI
//! recommendations, exports and a weekly summary email.

pub mod api;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod scoring;
pub mod services;
pub mod summary;
