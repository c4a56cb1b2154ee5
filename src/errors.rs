//! Unified application error type.
//! All modules (gateway, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage. Gateway failures have their own
//! type because the engine converts them into status transitions instead of
//! propagating them.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("remote database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("malformed remote payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote task failed: {0}")]
    Task(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Remote store
    // ---------------------------
    #[error("Remote store error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Invalid responsible: {0}")]
    InvalidResponsible(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
