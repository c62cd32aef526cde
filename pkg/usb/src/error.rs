#[derive(Debug, Fail)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A named constant was defined twice in the same table.
    DuplicateConstant,

    /// A serialized record is longer than the field that has to describe its
    /// length (one byte for most descriptors, two for configurations).
    LengthOverflow,

    /// The configuration asks for more bus power than this device class may
    /// draw.
    InvalidPowerBudget,

    /// A version component can't be represented as two BCD digits.
    InvalidVersion,

    /// String indices are a single byte in every descriptor that refers to
    /// them.
    TooManyStrings,

    MissingConfiguration,
}
