use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::error::InputError;

pub const KG_PER_LB: f64 = 0.453592;
pub const M_PER_FT: f64 = 0.3048;
pub const CM_PER_M: f64 = 100.0;

/// A unit that a raw measurement can be entered in.
pub trait Unit: Copy + fmt::Display {
    /// "weight" or "height", used in error messages.
    const KIND: &'static str;

    /// Inclusive plausible range for a value in this unit.
    fn range(self) -> (f64, f64);

    /// Convert a value in this unit to kg or m.
    fn to_si(self, value: f64) -> f64;

    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lb,
}

impl WeightUnit {
    pub const fn all() -> &'static [WeightUnit] {
        &[WeightUnit::Kg, WeightUnit::Lb]
    }
}

impl Unit for WeightUnit {
    const KIND: &'static str = "weight";

    fn range(self) -> (f64, f64) {
        match self {
            WeightUnit::Kg => (1.0, 300.0),
            WeightUnit::Lb => (2.2, 660.0),
        }
    }

    fn to_si(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lb => value * KG_PER_LB,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    M,
    Cm,
    Ft,
}

impl HeightUnit {
    pub const fn all() -> &'static [HeightUnit] {
        &[HeightUnit::M, HeightUnit::Cm, HeightUnit::Ft]
    }
}

impl Unit for HeightUnit {
    const KIND: &'static str = "height";

    fn range(self) -> (f64, f64) {
        match self {
            HeightUnit::M => (0.5, 2.5),
            HeightUnit::Cm => (50.0, 300.0),
            HeightUnit::Ft => (1.0, 8.0),
        }
    }

    fn to_si(self, value: f64) -> f64 {
        match self {
            HeightUnit::M => value,
            HeightUnit::Cm => value / CM_PER_M,
            HeightUnit::Ft => value * M_PER_FT,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            HeightUnit::M => "m",
            HeightUnit::Cm => "cm",
            HeightUnit::Ft => "ft",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WeightUnit {
    type Error = InputError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Lb),
            _ => Err(InputError::UnknownUnit {
                kind: Self::KIND,
                input: value.to_string(),
                supported: "kg, lb",
            }),
        }
    }
}

impl TryFrom<&str> for HeightUnit {
    type Error = InputError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(HeightUnit::M),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Ok(HeightUnit::Cm)
            }
            "ft" | "foot" | "feet" => Ok(HeightUnit::Ft),
            _ => Err(InputError::UnknownUnit {
                kind: Self::KIND,
                input: value.to_string(),
                supported: "m, cm, ft",
            }),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl FromStr for HeightUnit {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A validated (value, unit) pair as the user entered it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement<U> {
    value: f64,
    unit: U,
}

pub type Weight = Measurement<WeightUnit>;
pub type Height = Measurement<HeightUnit>;

impl<U: Unit> Measurement<U> {
    /// Accept `value` only if it is finite and inside the unit's range.
    pub fn new(value: f64, unit: U) -> Result<Self, InputError> {
        let (min, max) = unit.range();
        if !value.is_finite() || value < min || value > max {
            return Err(InputError::OutOfRange {
                value,
                unit: unit.as_str(),
                min,
                max,
            });
        }

        Ok(Self { value, unit })
    }

    /// Parse raw user text, e.g. `" 72.5 "`.
    pub fn parse(input: &str, unit: U) -> Result<Self, InputError> {
        let trimmed = input.trim();
        let value: f64 = trimmed.parse().map_err(|_| InputError::NotANumber {
            input: trimmed.to_string(),
        })?;

        if !value.is_finite() {
            return Err(InputError::NotANumber {
                input: trimmed.to_string(),
            });
        }

        Self::new(value, unit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> U {
        self.unit
    }

    pub fn to_si(&self) -> f64 {
        self.unit.to_si(self.value)
    }
}

impl<U: Unit> fmt::Display for Measurement<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}
