//! Error type shared by the whole algebra

use thiserror::Error;

/// Errors surfaced by rational arithmetic, the dimension and unit algebra,
/// and converter evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Two units (or dimensions) cannot be converted into one another
    #[error("cannot convert {from} to {to}: incompatible dimensions")]
    Incommensurable { from: String, to: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("division by zero")]
    DivisionByZero,

    /// A continued-fraction convergent left the 64-bit range
    #[error("overflow converting {value} to a fraction: {numerator}/{denominator}")]
    ConversionOverflow {
        value: f64,
        numerator: i64,
        denominator: i64,
    },

    /// The continued-fraction expansion did not converge in time
    #[error("unable to convert {value} to a fraction after {iterations} iterations")]
    ConversionFailed { value: f64, iterations: u32 },

    #[error("power and root are only defined for linear converters")]
    NonLinearConverter,

    /// A decimal evaluation left the range of `Decimal`
    #[error("decimal overflow while evaluating a converter")]
    DecimalOverflow,

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, UnitError>;

impl UnitError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        UnitError::InvalidArgument(msg.into())
    }
}
