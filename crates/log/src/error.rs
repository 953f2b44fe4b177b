/// Errors raised while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The filter directive could not be parsed.
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The directive as given.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}
