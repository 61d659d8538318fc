use thiserror::Error;

pub type Result<T> = std::result::Result<T, TopoError>;

#[derive(Debug, Error)]
pub enum TopoError {
    #[error("invalid config value for '{field}': {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("canvas error: {0}")]
    Canvas(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TopoError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        TopoError::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
