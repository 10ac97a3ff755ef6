//! BMI engine: unit normalization, the BMI formula and WHO classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InputError;

pub mod units;

pub use units::{Height, HeightUnit, Measurement, Unit, Weight, WeightUnit};

pub fn normalize_height(value: f64, unit: HeightUnit) -> f64 {
    unit.to_si(value)
}

pub fn normalize_weight(value: f64, unit: WeightUnit) -> f64 {
    unit.to_si(value)
}

/// `weight_kg / height_m²`. Height must be a positive, finite number of metres
/// and weight a finite number of kilograms.
pub fn compute_bmi(weight_kg: f64, height_m: f64) -> Result<f64, InputError> {
    if !weight_kg.is_finite() {
        return Err(InputError::NonFiniteWeight(weight_kg));
    }
    if !height_m.is_finite() || height_m <= 0.0 {
        return Err(InputError::NonPositiveHeight(height_m));
    }

    Ok(weight_kg / (height_m * height_m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight", alias = "Normal")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const fn all() -> &'static [BmiCategory] {
        &[
            BmiCategory::Underweight,
            BmiCategory::NormalWeight,
            BmiCategory::Overweight,
            BmiCategory::Obese,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "BMI < 18.5",
            BmiCategory::NormalWeight => "18.5 ≤ BMI < 25",
            BmiCategory::Overweight => "25 ≤ BMI < 30",
            BmiCategory::Obese => "BMI ≥ 30",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Consider consulting a healthcare provider for nutritional advice."
            }
            BmiCategory::NormalWeight => "Great! Maintain your healthy lifestyle.",
            BmiCategory::Overweight => {
                "Consider incorporating more physical activity and balanced diet."
            }
            BmiCategory::Obese => "Please consult a healthcare provider for guidance.",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds are inclusive: 18.5, 25 and 30 land in the upper category.
pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Result of running the engine over one pair of measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiAssessment {
    pub weight_kg: f64,
    pub height_m: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

pub fn assess(weight: &Weight, height: &Height) -> Result<BmiAssessment, InputError> {
    let weight_kg = weight.to_si();
    let height_m = height.to_si();
    let bmi = compute_bmi(weight_kg, height_m)?;
    let category = classify(bmi);

    tracing::debug!(weight_kg, height_m, bmi, %category, "computed BMI");

    Ok(BmiAssessment {
        weight_kg,
        height_m,
        bmi,
        category,
    })
}
