//! Core library for the `pocketkit` CLI.
//!
//! This crate defines:
//! - The BMI engine (unit normalization, formula, classification)
//! - The password engine (charset filtering, generation, strength scoring)
//! - Record models and their JSON-file stores
//! - Configuration handling
//!
//! It is used by `pocketkit-cli`, but can also be reused by other binaries or services.

pub mod bmi;
pub mod config;
pub mod error;
pub mod model;
pub mod password;
pub mod store;

pub use bmi::{BmiAssessment, BmiCategory, Height, HeightUnit, Weight, WeightUnit};
pub use config::Config;
pub use error::{Error, InputError, StoreError};
pub use model::{BmiRecord, SavedPasswordEntry};
pub use password::{CharClass, Generated, PasswordPolicy, Strength, StrengthLabel};
pub use store::{BmiHistory, PasswordVault};
