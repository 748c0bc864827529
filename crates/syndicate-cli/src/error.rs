//! Error types for the terminal front-end.

/// A command line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// The first word is not a known command.
    #[error("Unknown command `{0}`. Type `help` for the list.")]
    UnknownCommand(String),

    /// A command was given too few arguments.
    #[error("Usage: {usage}")]
    Usage {
        /// The expected form of the command.
        usage: &'static str,
    },

    /// A flag on the process command line is missing its value.
    #[error("missing value for {flag}")]
    MissingFlagValue {
        /// The flag, e.g. `--config`.
        flag: &'static str,
    },
}
