//! Draft of a prediction request as the user types it.
//!
//! Fields stay strings until submission, when [`FormState::to_request`]
//! coerces and validates them in one step.

use common::HouseFeatures;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::FormError;

/// Addressable form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Area,
    Bedrooms,
    Bathrooms,
    Floors,
    YearBuilt,
    Location,
    LocationScore,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Area,
        FormField::Bedrooms,
        FormField::Bathrooms,
        FormField::Floors,
        FormField::YearBuilt,
        FormField::Location,
        FormField::LocationScore,
    ];

    /// Name used for the matching HTML input.
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Area => "area",
            FormField::Bedrooms => "bedrooms",
            FormField::Bathrooms => "bathrooms",
            FormField::Floors => "floors",
            FormField::YearBuilt => "year_built",
            FormField::Location => "location",
            FormField::LocationScore => "location_score",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub floors: String,
    pub year_built: String,
    pub location: String,
    pub location_score: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            area: String::new(),
            bedrooms: String::new(),
            bathrooms: String::new(),
            floors: "1".to_string(),
            year_built: String::new(),
            location: String::new(),
            location_score: String::new(),
        }
    }
}

impl FormState {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Area => &self.area,
            FormField::Bedrooms => &self.bedrooms,
            FormField::Bathrooms => &self.bathrooms,
            FormField::Floors => &self.floors,
            FormField::YearBuilt => &self.year_built,
            FormField::Location => &self.location,
            FormField::LocationScore => &self.location_score,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Area => self.area = value,
            FormField::Bedrooms => self.bedrooms = value,
            FormField::Bathrooms => self.bathrooms = value,
            FormField::Floors => self.floors = value,
            FormField::YearBuilt => self.year_built = value,
            FormField::Location => self.location = value,
            FormField::LocationScore => self.location_score = value,
        }
    }

    /// Returns a copy with one field replaced.
    pub fn with(&self, field: FormField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.set(field, value);
        next
    }

    /// Coerces the draft into a request and validates it.
    ///
    /// Area must be a positive number; bedrooms and bathrooms positive
    /// integers. Floors falls back to 1 when it does not parse. Blank or
    /// unparsable optional fields become `None`.
    pub fn to_request(&self) -> Result<HouseFeatures, FormError> {
        let request = HouseFeatures {
            area: required_float("area", &self.area)?,
            bedrooms: required_count("bedrooms", &self.bedrooms)?,
            bathrooms: required_count("bathrooms", &self.bathrooms)?,
            floors: parse_integer(&self.floors)
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(1),
            year_built: parse_integer(&self.year_built).and_then(|v| i32::try_from(v).ok()),
            location_score: parse_float(&self.location_score),
            location: Some(self.location.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        };
        request.validate()?;
        Ok(request)
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integers also accept a decimal literal, truncated toward zero.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_float(raw).map(|v| v.trunc() as i64))
}

fn required_float(field: &'static str, raw: &str) -> Result<f64, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::Missing { field });
    }
    parse_float(raw).ok_or_else(|| FormError::NotANumber {
        field,
        value: raw.trim().to_string(),
    })
}

fn required_count(field: &'static str, raw: &str) -> Result<u32, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::Missing { field });
    }
    let value = parse_integer(raw).ok_or_else(|| FormError::NotANumber {
        field,
        value: raw.trim().to_string(),
    })?;
    // Negative counts are caught by validation as 0.
    Ok(u32::try_from(value).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormState {
        FormState::default()
            .with(FormField::Area, "150.5")
            .with(FormField::Bedrooms, "3")
            .with(FormField::Bathrooms, "2")
    }

    #[test]
    fn test_minimal_form() {
        let request = filled().to_request().unwrap();
        assert_eq!(request.area, 150.5);
        assert_eq!(request.bedrooms, 3);
        assert_eq!(request.bathrooms, 2);
        assert_eq!(request.floors, 1);
        assert_eq!(request.year_built, None);
        assert_eq!(request.location_score, None);
        assert_eq!(request.location, None);
    }

    #[test]
    fn test_optional_fields() {
        let form = filled()
            .with(FormField::Floors, "3")
            .with(FormField::YearBuilt, " 2010 ")
            .with(FormField::LocationScore, "7.5")
            .with(FormField::Location, "District 1, Ho Chi Minh City");
        let request = form.to_request().unwrap();
        assert_eq!(request.floors, 3);
        assert_eq!(request.year_built, Some(2010));
        assert_eq!(request.location_score, Some(7.5));
        assert_eq!(request.location.as_deref(), Some("District 1, Ho Chi Minh City"));
    }

    #[test]
    fn test_floors_defaults_to_one() {
        for raw in ["", "abc", "0", "-2"] {
            let request = filled().with(FormField::Floors, raw).to_request().unwrap();
            assert_eq!(request.floors, 1, "floors input {:?}", raw);
        }
    }

    #[test]
    fn test_integer_fields_truncate_decimals() {
        let request = filled().with(FormField::Bedrooms, "3.7").to_request().unwrap();
        assert_eq!(request.bedrooms, 3);
    }

    #[test]
    fn test_unparsable_optionals_become_none() {
        let request = filled()
            .with(FormField::YearBuilt, "soon")
            .with(FormField::LocationScore, "n/a")
            .with(FormField::Location, "   ")
            .to_request()
            .unwrap();
        assert_eq!(request.year_built, None);
        assert_eq!(request.location_score, None);
        assert_eq!(request.location, None);
    }

    #[test]
    fn test_required_fields() {
        let err = FormState::default().to_request().unwrap_err();
        assert_eq!(err, FormError::Missing { field: "area" });

        let err = filled().with(FormField::Bathrooms, "two").to_request().unwrap_err();
        assert!(matches!(err, FormError::NotANumber { field: "bathrooms", .. }));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        assert!(matches!(
            filled().with(FormField::Area, "0").to_request(),
            Err(FormError::Invalid(_))
        ));
        assert!(matches!(
            filled().with(FormField::Bedrooms, "-1").to_request(),
            Err(FormError::Invalid(_))
        ));
        assert!(matches!(
            filled().with(FormField::LocationScore, "11").to_request(),
            Err(FormError::Invalid(_))
        ));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(FormField::from_name(field.name()), Some(field));
        }
        assert_eq!(FormField::from_name("price"), None);
    }
}
