//! Sparse patient updates
//!
//! An [`UpdatePatient`] carries any subset of the patient fields. Presence is
//! tracked explicitly with [`Patch`], so a field the caller never sent can
//! not be confused with one it sent as an empty or zero value.

use crate::domain::errors::ValidationErrors;
use crate::domain::patient::{
    check_age, check_gender, check_positive, deserialize_whole_number, parse_gender,
    PatientRecord,
};
use crate::domain::Result;
use serde::{Deserialize, Deserializer};

/// A single field of a sparse patch
///
/// Missing keys deserialize as [`Patch::Absent`] (via `#[serde(default)]` on
/// the containing field); any present value, including `null`, is handed to
/// `T`'s own deserializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Patch<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Patch::Present(_))
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Present(value) => Patch::Present(value),
        }
    }

    /// Returns the patched value, or `current` when absent
    pub fn unwrap_or(self, current: T) -> T {
        match self {
            Patch::Absent => current,
            Patch::Present(value) => value,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Absent, Patch::Present)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Present)
    }
}

/// Partial update payload for `PUT /edit/{id}`
///
/// Unknown keys are ignored. No field is nullable, so an explicit `null`
/// fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdatePatient {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub city: Patch<String>,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Patch<i64>,
    /// Checked against the closed gender set by [`UpdatePatient::validate`]
    #[serde(default)]
    pub gender: Patch<String>,
    #[serde(default)]
    pub height: Patch<f64>,
    #[serde(default)]
    pub weight: Patch<f64>,
}

impl UpdatePatient {
    /// True when the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        !(self.name.is_present()
            || self.city.is_present()
            || self.age.is_present()
            || self.gender.is_present()
            || self.height.is_present()
            || self.weight.is_present())
    }

    /// Names of the fields present in the patch, in declaration order
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_present()),
            ("city", self.city.is_present()),
            ("age", self.age.is_present()),
            ("gender", self.gender.is_present()),
            ("height", self.height.is_present()),
            ("weight", self.weight.is_present()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    /// Checks the constraints of every present field
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Patch::Present(age) = self.age {
            check_age(age, &mut errors);
        }
        if let Patch::Present(gender) = &self.gender {
            check_gender(gender, &mut errors);
        }
        if let Patch::Present(height) = self.height {
            check_positive("height", height, &mut errors);
        }
        if let Patch::Present(weight) = self.weight {
            check_positive("weight", weight, &mut errors);
        }
        errors
    }

    /// Merges the patch onto `existing`, producing a new record
    ///
    /// Present fields overwrite, absent fields are carried over. The input
    /// record is left untouched; derived values follow from the merged
    /// height and weight whenever the result is viewed.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if any present field violates its
    /// constraint, or if the merged height and weight give no finite BMI.
    ///
    /// # Examples
    ///
    /// ```
    /// use patient_registry::domain::patient::{Gender, PatientRecord, Verdict};
    /// use patient_registry::domain::update::{Patch, UpdatePatient};
    ///
    /// let existing = PatientRecord {
    ///     name: "Alice".to_string(),
    ///     city: "NY".to_string(),
    ///     age: 30,
    ///     gender: Gender::Female,
    ///     height: 1.6,
    ///     weight: 60.0,
    /// };
    /// let patch = UpdatePatient {
    ///     weight: Patch::Present(80.0),
    ///     ..UpdatePatient::default()
    /// };
    ///
    /// let merged = patch.apply(&existing).unwrap();
    /// assert_eq!(merged.weight, 80.0);
    /// assert_eq!(merged.height, 1.6);
    /// assert_eq!(merged.bmi(), 31.25);
    /// assert_eq!(merged.verdict(), Verdict::Obese);
    /// ```
    pub fn apply(&self, existing: &PatientRecord) -> Result<PatientRecord> {
        self.validate().into_result(())?;

        // Range checked above: 0 < age < MAX_AGE
        let age = match self.age {
            Patch::Absent => existing.age,
            Patch::Present(age) => u32::try_from(age).unwrap_or(existing.age),
        };

        let gender = match &self.gender {
            Patch::Absent => existing.gender,
            Patch::Present(gender) => parse_gender(gender)?,
        };

        let merged = PatientRecord {
            name: self.name.as_ref().unwrap_or(&existing.name).clone(),
            city: self.city.as_ref().unwrap_or(&existing.city).clone(),
            age,
            gender,
            height: self.height.unwrap_or(existing.height),
            weight: self.weight.unwrap_or(existing.weight),
        };
        let errors = merged.validate();
        errors.into_result(merged)
    }
}

fn deserialize_age<'de, D>(deserializer: D) -> std::result::Result<Patch<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_whole_number(deserializer).map(Patch::Present)
}
