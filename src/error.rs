use std::path::PathBuf;

/// Failure taxonomy for a single console invocation.
///
/// Variants split into two rendering families: resolution and validation
/// failures print as `[-]` one-line diagnostics, handler-domain failures
/// print as `[!] <Kind> Error: <message>` lines. `services::report` owns
/// the exact formatting; the `Display` impls here carry only the message
/// part so both families stay byte-stable.
#[derive(thiserror::Error, Debug)]
pub enum ConsoleError {
    #[error("Unknown Command: {0}")]
    UnknownCommand(String),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("no such setting: {0}")]
    UnknownSetting(String),
    #[error("{name}: {reason}")]
    InvalidValue { name: String, reason: String },
    #[error("No such file or directory: « {} »", .0.display())]
    FileNotFound(PathBuf),
    #[error("{0}")]
    Interrupted(String),
    #[error("{0}")]
    Runtime(String),
}

impl ConsoleError {
    /// Resolution/validation errors short-circuit in the dispatcher and
    /// render as `[-]`; everything else reaches a handler and is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ConsoleError::UnknownCommand(_) | ConsoleError::InvalidArguments(_)
        )
    }

    /// The `<Kind>` token of a `[!] <Kind> Error:` line.
    pub fn kind_label(&self) -> &'static str {
        match self {
            ConsoleError::UnknownCommand(_) => "Unknown Command",
            ConsoleError::InvalidArguments(_) => "Invalid Arguments",
            ConsoleError::UnknownSetting(_) => "Unknown Setting",
            ConsoleError::InvalidValue { .. } => "Invalid Value",
            ConsoleError::FileNotFound(_) => "File Not Found",
            ConsoleError::Interrupted(_) => "Interrupted",
            ConsoleError::Runtime(_) => "Runtime",
        }
    }
}
