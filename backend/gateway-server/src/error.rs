#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid host for socket: {0}")]
    AddressError(#[from] std::net::AddrParseError),
    #[error("Failed to initialize the logging subsystem: {0}")]
    LoggerError(#[from] tracing_subscriber::util::TryInitError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
