use food_store::{ConfigError, ConfigSource, Env};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub maps_api_key: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&Env)
    }

    pub fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        Ok(Self {
            port: source.parse_or("PORT", 5000)?,
            maps_api_key: source.required("GOOGLE_MAPS_API_KEY")?,
        })
    }
}
