#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("Stored session is corrupt: {0}")]
    SessionParse(#[from] serde_json::Error),

    #[error("Catalog search failed: {0}")]
    CatalogSearch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
