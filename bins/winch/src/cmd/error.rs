#[derive(Debug, thiserror::Error)]
pub enum WinchError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Mapping(#[from] mappings::Error),
}
