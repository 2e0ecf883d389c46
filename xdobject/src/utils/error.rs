use thiserror::Error;

#[derive(Debug, Error)]
pub enum XdError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {message}")]
    ConfigParse { file: String, message: String },

    #[error("An unknown error occurred: {0}")]
    Unknown(String),

    #[error("{kind}.decorate must be implemented by the hook of '{decorator}'")]
    NotImplemented {
        kind: &'static str,
        decorator: String,
    },

    #[error("Cannot register advisor '{advisor}' outside of a class statement")]
    NoClassScope { advisor: String },

    #[error("Cannot register advisor '{advisor}': class statement '{class}' is already sealed")]
    SealedScope { class: String, advisor: String },

    #[error("'{function}' was called without a receiver as first positional argument")]
    MissingReceiver { function: String },

    #[error("Missing positional argument #{index} in call to '{function}'")]
    MissingArgument { index: usize, function: String },

    #[error("Object of kind '{kind}' is not callable")]
    NotCallable { kind: &'static str },

    #[error("Expected a value of kind '{expected}', found '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{owner}' has no attribute '{name}'")]
    AttributeError { owner: String, name: String },

    #[error("Cannot initialize a '{found}' instance with the constructor of '{class}'")]
    NotAnInstance { class: String, found: String },

    #[error("Counter '{name}' overflowed")]
    CounterOverflow { name: String },

    #[error("Class '{class}' takes no constructor arguments ({count} given)")]
    UnexpectedArguments { class: String, count: usize },

    #[error("Cannot create a consistent method resolution order for class '{class}'")]
    InconsistentMro { class: String },

    #[error("Class '{class}' was dropped while one of its hooks was still in use")]
    ClassDropped { class: String },

    /// Failure reported by user code (hooks, function bodies).
    #[error("{0}")]
    Raised(String),
}

impl XdError {
    /// Shorthand for user code signalling a failure.
    pub fn raised(message: impl Into<String>) -> Self {
        XdError::Raised(message.into())
    }
}

pub type XdResult<T> = Result<T, XdError>;
