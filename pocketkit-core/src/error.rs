use std::{io, path::PathBuf};

use thiserror::Error;

/// Problems with what the user typed. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("'{input}' is not a valid number")]
    NotANumber { input: String },

    #[error("{value} {unit} is out of range. Please enter a value between {min} and {max} {unit}.")]
    OutOfRange {
        value: f64,
        unit: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Height must be greater than zero (got {0} m)")]
    NonPositiveHeight(f64),

    #[error("Weight must be a finite number (got {0} kg)")]
    NonFiniteWeight(f64),

    #[error("Unknown {kind} unit '{input}'. Supported units: {supported}.")]
    UnknownUnit {
        kind: &'static str,
        input: String,
        supported: &'static str,
    },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Password length {length} is out of range. Choose a length between {min} and {max}.")]
    LengthOutOfRange { length: usize, min: usize, max: usize },

    #[error("Please select at least one character type")]
    NoClassSelected,

    #[error("No characters available after applying security rules and exclusions")]
    EmptyCharset,

    #[error("Need at least 2 records for '{user}' to analyse a trend (found {found})")]
    NotEnoughRecords { user: String, found: usize },
}

/// Failures reading or writing a record file. In-memory state is kept when a write fails.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
