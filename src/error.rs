use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    /// A component was requested by a name nobody registered.
    UnknownComponent { kind: &'static str, name: String },
    /// A configuration value is invalid for semantic reasons.
    InvalidConfig(String),
    /// The first layer of a network was given no input shape to start from.
    MissingInputShape { layer: usize },
    /// A tensor does not have the shape a layer, loss or dataset expects.
    ShapeMismatch {
        what: &'static str,
        got: Vec<usize>,
        expected: Vec<usize>,
    },
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    /// `forward` or `backward` was called on a network that is not initialized.
    NotInitialized,
    /// `backward` was called on a layer with no pending `forward`.
    MissingForward { layer: &'static str },
    /// A random distribution could not be built from its parameters.
    Distribution(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl MlErr {
    /// Shorthand for a `ShapeMismatch` between two shapes.
    pub(crate) fn shape(what: &'static str, got: &[usize], expected: &[usize]) -> Self {
        Self::ShapeMismatch {
            what,
            got: got.to_vec(),
            expected: expected.to_vec(),
        }
    }

    /// Whether this error comes from an unknown name or an invalid value in a configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MlErr::UnknownComponent { .. } | MlErr::InvalidConfig(_) | MlErr::MissingInputShape { .. }
        )
    }

    /// Whether this error is a misuse of the layer protocol rather than a data problem.
    pub fn is_precondition(&self) -> bool {
        matches!(self, MlErr::NotInitialized | MlErr::MissingForward { .. })
    }
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::UnknownComponent { kind, name } => {
                write!(f, "configuration error: unknown {kind} `{name}`")
            }
            MlErr::InvalidConfig(msg) => write!(f, "configuration error: {msg}"),
            MlErr::MissingInputShape { layer } => write!(
                f,
                "configuration error: layer {layer} has no predecessor and no input shape"
            ),
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got:?}, expected {expected:?}"),
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::NotInitialized => {
                write!(f, "precondition violated: the network is not initialized")
            }
            MlErr::MissingForward { layer } => write!(
                f,
                "precondition violated: backward on {layer} layer without a matching forward"
            ),
            MlErr::Distribution(msg) => write!(f, "invalid distribution: {msg}"),
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rand_distr::NormalError> for MlErr {
    fn from(value: rand_distr::NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<rand_distr::uniform::Error> for MlErr {
    fn from(value: rand_distr::uniform::Error) -> Self {
        Self::Distribution(value.to_string())
    }
}
