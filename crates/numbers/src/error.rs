use thiserror::Error;

pub type Result<T> = std::result::Result<T, NumbersError>;

#[derive(Error, Debug)]
pub enum NumbersError {
    #[error("Invalid build options: {0}")]
    InvalidOptions(String),

    #[error("Invalid options file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Cancelled during {phase}")]
    Cancelled { phase: String },
}
