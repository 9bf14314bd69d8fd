use food_store::{FoodListing, NewFoodListing};

use crate::AppState;

#[derive(Debug, Default)]
pub struct MapListings {
    pub listings: Vec<FoodListing>,
    pub available: bool,
}

/// Loads every listing for the map. A failed read still yields a page, just without pins.
#[tracing::instrument(skip_all)]
pub async fn map_listings(state: &AppState) -> MapListings {
    match state.store.list_all().await {
        Ok(listings) => MapListings {
            listings,
            available: true,
        },
        Err(err) => {
            tracing::warn!("rendering map without listings: {err}");
            MapListings::default()
        }
    }
}

/// Saves a submitted listing. The caller redirects either way, so a failure is only logged.
#[tracing::instrument(skip_all)]
pub async fn save_listing(state: &AppState, listing: NewFoodListing) {
    match state.store.add(listing).await {
        Ok(id) => tracing::info!("saved listing {id}"),
        Err(err) => tracing::warn!("dropping submitted listing: {err}"),
    }
}
