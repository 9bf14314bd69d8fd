use std::sync::Arc;

use derive_more::{Display, Error, From};
use food_store::FoodListing;
use tera::{Context, Tera};

const HOME_TEMPLATE: &str = "home.html";
const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

#[derive(Debug, Display, From, Error)]
pub enum PageError {
    #[from]
    Template(tera::Error),
    #[from]
    Serialize(serde_json::Error),
}

/// Renders the map page. Templates are compiled once at startup and shared between requests.
#[derive(Clone)]
pub struct PageRenderer {
    tera: Arc<Tera>,
    maps_script_src: String,
}

impl PageRenderer {
    pub fn new(maps_api_key: &str) -> Result<Self, PageError> {
        let mut tera = Tera::default();
        tera.add_raw_template(HOME_TEMPLATE, include_str!("../../templates/home.html"))?;

        Ok(Self {
            tera: Arc::new(tera),
            maps_script_src: format!(
                "{MAPS_SCRIPT_URL}?key={}&callback=initMap",
                urlencoding::encode(maps_api_key)
            ),
        })
    }

    pub fn home(&self, listings: &[FoodListing], available: bool) -> Result<String, PageError> {
        let mut context = Context::new();
        context.insert("foods", &listings_json(listings)?);
        context.insert("maps_script_src", &self.maps_script_src);
        context.insert("listings_unavailable", &!available);

        Ok(self.tera.render(HOME_TEMPLATE, &context)?)
    }
}

/// JSON for the inline `<script>` block. `</` is escaped so listing text cannot close the tag.
fn listings_json(listings: &[FoodListing]) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(listings)?.replace("</", "<\\/"))
}
