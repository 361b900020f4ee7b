//! Patient entity model
//!
//! A [`PatientRecord`] is what the store persists: the six measured or
//! declared fields, without the id (which is the store key) and without any
//! derived value. BMI and verdict are computed on read through
//! [`PatientView`], so they always follow the current height and weight.

use crate::domain::errors::{FieldError, RegistryError, ValidationErrors};
use crate::domain::ids::PatientId;
use crate::domain::Result;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exclusive upper bound for `age`
pub const MAX_AGE: i64 = 120;

/// Declared gender of a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err("Input should be 'male', 'female' or 'other'".to_string()),
        }
    }
}

/// Health classification of a BMI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    /// Classifies a BMI value
    ///
    /// Bands are closed below and open above: `<18.5`, `[18.5, 25)`,
    /// `[25, 30)`, `>=30`. The first matching band wins.
    ///
    /// ```
    /// use patient_registry::domain::patient::Verdict;
    ///
    /// assert_eq!(Verdict::from_bmi(18.49), Verdict::Underweight);
    /// assert_eq!(Verdict::from_bmi(18.5), Verdict::Normal);
    /// assert_eq!(Verdict::from_bmi(30.0), Verdict::Obese);
    /// ```
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 25.0 {
            Verdict::Normal
        } else if bmi < 30.0 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes `weight / height²` rounded to two decimals
///
/// Rounding is half away from zero on the scaled value
/// (`(x * 100).round() / 100`).
///
/// ```
/// use patient_registry::domain::patient::compute_bmi;
///
/// assert_eq!(compute_bmi(1.6, 60.0), 23.44);
/// assert_eq!(compute_bmi(1.6, 80.0), 31.25);
/// ```
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    let raw = weight / (height * height);
    (raw * 100.0).round() / 100.0
}

/// Persisted patient record (everything except the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in meters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
}

impl PatientRecord {
    /// Body mass index derived from the current height and weight
    pub fn bmi(&self) -> f64 {
        compute_bmi(self.height, self.weight)
    }

    /// Verdict derived from [`PatientRecord::bmi`]
    pub fn verdict(&self) -> Verdict {
        Verdict::from_bmi(self.bmi())
    }

    /// Checks every field constraint, collecting all violations
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_age(i64::from(self.age), &mut errors);
        check_positive("height", self.height, &mut errors);
        check_positive("weight", self.weight, &mut errors);
        check_bmi(self.height, self.weight, &mut errors);
        errors
    }

    /// Builds the read-side view with derived fields
    pub fn view(&self) -> PatientView {
        PatientView::from(self)
    }
}

/// A record together with its derived fields, as returned by the API
///
/// Only ever constructed from a [`PatientRecord`]; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientView {
    #[serde(flatten)]
    pub record: PatientRecord,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl From<&PatientRecord> for PatientView {
    fn from(record: &PatientRecord) -> Self {
        let bmi = record.bmi();
        Self {
            record: record.clone(),
            bmi,
            verdict: Verdict::from_bmi(bmi),
        }
    }
}

/// Create payload: a full patient including its id
///
/// Age is deserialized wide (`i64`, integral floats accepted) and gender as
/// plain text, so out-of-range values reach [`NewPatient::validate`] and are
/// reported per field instead of failing the whole body as a type error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub age: i64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
}

impl NewPatient {
    /// Checks every field constraint, collecting all violations
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Err(message) = PatientId::new(self.id.as_str()) {
            errors.push(FieldError::new("id", "string_too_short", message));
        }
        check_age(self.age, &mut errors);
        check_gender(&self.gender, &mut errors);
        check_positive("height", self.height, &mut errors);
        check_positive("weight", self.weight, &mut errors);
        check_bmi(self.height, self.weight, &mut errors);
        errors
    }

    /// Validates the payload and splits it into store key and record
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` listing every violated field.
    pub fn into_parts(self) -> Result<(PatientId, PatientRecord)> {
        self.validate().into_result(())?;

        let id = PatientId::new(self.id).map_err(|e| {
            RegistryError::Validation(FieldError::new("id", "string_too_short", e).into())
        })?;
        let gender = parse_gender(&self.gender)?;
        // Range checked above: 0 < age < MAX_AGE
        let age = u32::try_from(self.age).unwrap_or_default();
        let record = PatientRecord {
            name: self.name,
            city: self.city,
            age,
            gender,
            height: self.height,
            weight: self.weight,
        };
        Ok((id, record))
    }
}

/// Parses a gender that passed [`check_gender`]
pub(crate) fn parse_gender(value: &str) -> Result<Gender> {
    value.parse().map_err(|message: String| {
        RegistryError::Validation(FieldError::new("gender", "enum", message).into())
    })
}

pub(crate) fn check_gender(value: &str, errors: &mut ValidationErrors) {
    if let Err(message) = value.parse::<Gender>() {
        errors.push(FieldError::new("gender", "enum", message));
    }
}

/// Flags valid measurements whose BMI is not representable, e.g. a height
/// so small that its square underflows to zero
pub(crate) fn check_bmi(height: f64, weight: f64, errors: &mut ValidationErrors) {
    let measured = |v: f64| v.is_finite() && v > 0.0;
    if measured(height) && measured(weight) && !compute_bmi(height, weight).is_finite() {
        errors.push(FieldError::new(
            "height",
            "bmi_not_finite",
            "Height and weight do not give a finite BMI",
        ));
    }
}

/// Deserializes an integer, also accepting a number with a zero fractional
/// part such as `30.0`
pub(crate) fn deserialize_whole_number<'de, D>(
    deserializer: D,
) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(WholeNumberVisitor)
}

struct WholeNumberVisitor;

impl<'de> Visitor<'de> for WholeNumberVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a valid integer")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<i64, E> {
        i64::try_from(value).map_err(|_| E::custom("Input should be a valid integer"))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<i64, E> {
        // 2^63 as f64 is exactly representable; anything below it fits
        let in_range = value.abs() < 9_223_372_036_854_775_808.0;
        if value.is_finite() && value.fract() == 0.0 && in_range {
            Ok(value as i64)
        } else {
            Err(E::custom(
                "Input should be a valid integer, got a number with a fractional part",
            ))
        }
    }
}

pub(crate) fn check_age(age: i64, errors: &mut ValidationErrors) {
    if age <= 0 {
        errors.push(FieldError::new(
            "age",
            "greater_than",
            "Input should be greater than 0",
        ));
    } else if age >= MAX_AGE {
        errors.push(FieldError::new(
            "age",
            "less_than",
            format!("Input should be less than {MAX_AGE}"),
        ));
    }
}

pub(crate) fn check_positive(field: &str, value: f64, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.push(FieldError::new(
            field,
            "finite_number",
            "Input should be a finite number",
        ));
    } else if value <= 0.0 {
        errors.push(FieldError::new(
            field,
            "greater_than",
            "Input should be greater than 0",
        ));
    }
}
