#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{path}' has no member '{segment}'")]
    PathNotFound { path: String, segment: String },

    #[error("Nil reference at '{path}'")]
    NilDereference { path: String },

    #[error("Value at '{path}' cannot be explored")]
    NotExplorable { path: String },

    #[error("Invalid action '{0}'")]
    InvalidAction(String),

    #[error("Malformed instruction: {0}")]
    MalformedCommand(String),

    #[error("Unknown root object '{0}'")]
    UnknownRoot(String),

    #[error("Root object '{0}' is already registered.")]
    DuplicateRoot(String),

    #[error("Root object label must not be empty")]
    EmptyRootLabel,

    #[error("Path '{path}' is deeper than the limit of {limit}")]
    PathTooDeep { path: String, limit: usize },

    #[error("Couldn't encode the snapshot: {0}")]
    Encoding(String),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}

impl Error {
    /// True for errors that reject an instruction as a whole.
    ///
    /// Everything else is raised while resolving single values and is
    /// reported per selection or per cell instead.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::InvalidAction(_) | Error::MalformedCommand(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedCommand(e.to_string())
    }
}
