use std::pin::Pin;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DbConfig;
use crate::error::StoreError;
use crate::models::food_listings::{FoodListing, ListingId, NewFoodListing};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// All SQL access to the listings table goes through this trait.
///
/// Each call holds a connection only for its own duration. Failures are logged where they happen
/// and handed back to the caller, which decides what the user sees.
pub trait FoodStore: Send + Sync {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<FoodListing>, StoreError>>;

    fn add(&self, listing: NewFoodListing) -> BoxFuture<'_, Result<ListingId, StoreError>>;

    /// Removes every listing, returning how many were deleted.
    fn clear_all(&self) -> BoxFuture<'_, Result<u64, StoreError>>;
}

#[derive(Debug, Clone)]
pub struct PgFoodStore {
    pool: PgPool,
}

impl PgFoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;

        tracing::info!(
            "connected to {} at {}:{} with {} max connections",
            config.name,
            config.host,
            config.port,
            config.max_connections
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[tracing::instrument(skip_all, err)]
    async fn fetch_listings(&self) -> Result<Vec<FoodListing>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let listings = FoodListing::get_all(conn.as_mut()).await?;
        tracing::debug!("fetched {} listings", listings.len());
        Ok(listings)
    }

    #[tracing::instrument(skip_all, fields(category = %listing.category), err)]
    async fn insert_listing(&self, listing: NewFoodListing) -> Result<ListingId, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id = FoodListing::create(&mut tx, &listing).await?;
        tx.commit().await?;
        tracing::info!(%id, "listing saved");
        Ok(id)
    }

    #[tracing::instrument(skip_all, err)]
    async fn delete_listings(&self) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = FoodListing::delete_all(&mut tx).await?;
        tx.commit().await?;
        tracing::info!(deleted, "listings cleared");
        Ok(deleted)
    }
}

impl FoodStore for PgFoodStore {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<FoodListing>, StoreError>> {
        Box::pin(self.fetch_listings())
    }

    fn add(&self, listing: NewFoodListing) -> BoxFuture<'_, Result<ListingId, StoreError>> {
        Box::pin(self.insert_listing(listing))
    }

    fn clear_all(&self) -> BoxFuture<'_, Result<u64, StoreError>> {
        Box::pin(self.delete_listings())
    }
}

#[cfg(any(test, feature = "testkit"))]
pub use memory::MemoryFoodStore;

#[cfg(any(test, feature = "testkit"))]
mod memory {
    use std::sync::Mutex;

    use sqlx::types::chrono::Utc;

    use super::{BoxFuture, FoodStore};
    use crate::error::StoreError;
    use crate::models::food_listings::{FoodListing, ListingId, NewFoodListing};

    /// In-process stand-in for the Postgres store, used to drive the web layer in tests.
    #[derive(Debug, Default)]
    pub struct MemoryFoodStore {
        state: Mutex<MemoryState>,
    }

    #[derive(Debug, Default)]
    struct MemoryState {
        next_id: i32,
        listings: Vec<FoodListing>,
    }

    impl MemoryFoodStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_listings(listings: impl IntoIterator<Item = NewFoodListing>) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.lock().unwrap();
                for listing in listings {
                    state.insert(listing);
                }
            }
            store
        }

        pub fn snapshot(&self) -> Vec<FoodListing> {
            self.state.lock().unwrap().listings.clone()
        }
    }

    impl MemoryState {
        fn insert(&mut self, listing: NewFoodListing) -> ListingId {
            self.next_id += 1;
            let id = ListingId::from(self.next_id);
            self.listings.push(FoodListing {
                id,
                latitude: listing.latitude,
                longitude: listing.longitude,
                date: listing.date,
                category: listing.category,
                description: listing.description,
                updated_at: Utc::now(),
            });
            id
        }
    }

    impl FoodStore for MemoryFoodStore {
        fn list_all(&self) -> BoxFuture<'_, Result<Vec<FoodListing>, StoreError>> {
            Box::pin(async move { Ok(self.snapshot()) })
        }

        fn add(&self, listing: NewFoodListing) -> BoxFuture<'_, Result<ListingId, StoreError>> {
            Box::pin(async move { Ok(self.state.lock().unwrap().insert(listing)) })
        }

        fn clear_all(&self) -> BoxFuture<'_, Result<u64, StoreError>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                let deleted = state.listings.len() as u64;
                state.listings.clear();
                Ok(deleted)
            })
        }
    }
}
