//! Sort parameters and ordering of patient views

use crate::domain::{PatientView, RegistryError};
use std::fmt;
use std::str::FromStr;

/// Numeric field a listing can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }

    /// Sort key of a view; a value without a usable number sorts as 0
    fn key(&self, view: &PatientView) -> f64 {
        let value = match self {
            SortField::Height => view.record.height,
            SortField::Weight => view.record.weight,
            SortField::Bmi => view.bmi,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<String> = SortField::ALL
                    .iter()
                    .map(|field| format!("'{}'", field.as_str()))
                    .collect();
                RegistryError::InvalidArgument(format!(
                    "Invalid field select from [{}]",
                    names.join(", ")
                ))
            })
    }
}

/// Direction of a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(RegistryError::InvalidArgument(
                "Invalid order select between asc and desc".to_string(),
            )),
        }
    }
}

/// Sorts views in place by `field`
///
/// The sort is stable in both directions: entries with equal keys keep
/// their incoming (store) order whether ascending or descending.
pub fn sort_views(views: &mut [PatientView], field: SortField, order: SortOrder) {
    views.sort_by(|a, b| {
        let ordering = field.key(a).total_cmp(&field.key(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
