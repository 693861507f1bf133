use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoneGameError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Could not parse the config file")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Could not serialize the key-value store")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Storage is unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Bone '{bone}' has a malformed region: {reason}")]
    MalformedRegion { bone: String, reason: String },
    #[error("No bone named '{0}' in the catalog")]
    UnknownBone(String),
}

pub type BoneGameResult<T> = Result<T, BoneGameError>;
