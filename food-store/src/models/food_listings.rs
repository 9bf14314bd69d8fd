use chrono::NaiveDate;
use derive_more::{Display, From};
use serde::{Serialize, Serializer};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use sqlx::types::chrono::{DateTime, Utc};

/// Format every listing date is exchanged in, on the page and in form submissions.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct ListingId(i32);

/// A single donation or pickup pinned on the map.
///
/// Serializes to the shape the map widget reads: coordinates, the `YYYY-MM-DD` date, category
/// and description. The id and the bookkeeping timestamp stay server side.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct FoodListing {
    #[serde(skip)]
    pub id: ListingId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFoodListing {
    pub category: String,
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

impl NewFoodListing {
    pub fn new(
        category: impl Into<String>,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            date,
            latitude,
            longitude,
            description: description.into(),
        }
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

impl FoodListing {
    #[cfg(any(test, feature = "testkit"))]
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Whether this listing carries exactly the submitted fields.
    #[cfg(any(test, feature = "testkit"))]
    pub fn matches(&self, listing: &NewFoodListing) -> bool {
        self.category == listing.category
            && self.date == listing.date
            && self.latitude == listing.latitude
            && self.longitude == listing.longitude
            && self.description == listing.description
    }

    pub async fn get_all(executor: &mut PgConnection) -> sqlx::Result<Vec<FoodListing>> {
        let listings = sqlx::query_as::<_, FoodListing>(
            r#"
            SELECT
                id,
                latitude,
                longitude,
                date,
                category,
                description,
                updated_at
            FROM
                foods;
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(listings)
    }

    pub async fn create(
        executor: &mut PgConnection,
        listing: &NewFoodListing,
    ) -> sqlx::Result<ListingId> {
        let id = sqlx::query_scalar::<_, ListingId>(
            r#"
            INSERT INTO foods (category, date, latitude, longitude, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id;
            "#,
        )
        .bind(&listing.category)
        .bind(listing.date)
        .bind(listing.latitude)
        .bind(listing.longitude)
        .bind(&listing.description)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn delete_all(executor: &mut PgConnection) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM foods;").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
