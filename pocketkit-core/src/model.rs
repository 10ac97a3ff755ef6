use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    bmi::{BmiAssessment, BmiCategory, Height, HeightUnit, Weight, WeightUnit},
    error::InputError,
    password::{StrengthLabel, score_strength},
};

/// Wall-clock format used in the record files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> NaiveDateTime {
    // Sub-second precision is not stored, so drop it up front.
    let local = Local::now().naive_local();
    local.with_nanosecond(0).unwrap_or(local)
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(D::Error::custom)
    }
}

/// One saved BMI measurement.
///
/// `weight_kg`/`height_m` are canonical; the `original_*` fields keep what the
/// user typed. Files written before the original units were tracked lack them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiRecord {
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(alias = "weight")]
    pub weight_kg: f64,
    #[serde(alias = "height")]
    pub height_m: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_weight_unit: Option<WeightUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_height_unit: Option<HeightUnit>,
}

impl BmiRecord {
    pub fn new(
        assessment: &BmiAssessment,
        weight: &Weight,
        height: &Height,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp,
            weight_kg: assessment.weight_kg,
            height_m: assessment.height_m,
            bmi: assessment.bmi,
            category: assessment.category,
            original_weight: Some(weight.value()),
            original_weight_unit: Some(weight.unit()),
            original_height: Some(height.value()),
            original_height_unit: Some(height.unit()),
        }
    }

    /// Weight as entered, or kg for legacy records.
    pub fn display_weight(&self) -> (f64, WeightUnit) {
        match (self.original_weight, self.original_weight_unit) {
            (Some(value), Some(unit)) => (value, unit),
            _ => (self.weight_kg, WeightUnit::Kg),
        }
    }

    /// Height as entered, or m for legacy records.
    pub fn display_height(&self) -> (f64, HeightUnit) {
        match (self.original_height, self.original_height_unit) {
            (Some(value), Some(unit)) => (value, unit),
            _ => (self.height_m, HeightUnit::M),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPasswordEntry {
    pub website: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    pub length: usize,
    pub strength: StrengthLabel,
}

impl SavedPasswordEntry {
    /// Validate the user-supplied fields and derive length and strength from the password.
    pub fn new(
        website: &str,
        username: &str,
        password: &str,
        notes: &str,
        created_at: NaiveDateTime,
    ) -> Result<Self, InputError> {
        if password.is_empty() {
            return Err(InputError::EmptyField("password"));
        }

        let website = website.trim();
        if website.is_empty() {
            return Err(InputError::EmptyField("website"));
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(InputError::EmptyField("username"));
        }

        Ok(Self {
            website: website.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            notes: notes.trim().to_string(),
            created_at,
            length: password.chars().count(),
            strength: score_strength(password).label,
        })
    }
}
