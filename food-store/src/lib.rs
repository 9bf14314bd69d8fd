pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use config::{ConfigError, ConfigSource, DbConfig, Env};
pub use error::StoreError;
pub use models::food_listings::{DATE_FORMAT, FoodListing, ListingId, NewFoodListing};
#[cfg(any(test, feature = "testkit"))]
pub use store::MemoryFoodStore;
pub use store::{BoxFuture, FoodStore, PgFoodStore};
