use chrono::NaiveDate;
use food_store::{DATE_FORMAT, NewFoodListing};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("`{field}` must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("`date` must look like YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),

    #[error("{0}")]
    Rejected(#[from] ValidationErrors),
}

/// Raw `/save-food` body. Fields stay strings until parsed so bad input gets a precise error.
#[derive(Debug, Deserialize)]
pub struct SaveFoodForm {
    pub category: String,
    pub date: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Validate)]
struct FoodSubmission {
    #[validate(length(min = 1, max = 50))]
    category: String,
    date: NaiveDate,
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: f64,
    #[validate(length(max = 200))]
    description: String,
}

impl SaveFoodForm {
    pub fn into_listing(self) -> Result<NewFoodListing, FormError> {
        let submission = FoodSubmission {
            category: self.category.trim().to_owned(),
            date: parse_date(&self.date)?,
            latitude: parse_coordinate("latitude", &self.latitude)?,
            longitude: parse_coordinate("longitude", &self.longitude)?,
            description: self.description,
        };
        submission.validate()?;

        Ok(NewFoodListing::new(
            submission.category,
            submission.date,
            submission.latitude,
            submission.longitude,
            submission.description,
        ))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| FormError::InvalidDate(raw.to_owned()))
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
}
