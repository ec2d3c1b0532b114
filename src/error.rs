use {
    crate::field::{Field, FiscalRegion},
    thiserror::Error,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A setter received a value outside the field's rule.
    #[error("{field}_wrong_format")]
    Format { field: Field },

    /// A tag other than the one required at this position.
    #[error("next field should be '{expected}' but is '{found}'")]
    Sequence {
        expected: &'static str,
        found:    String,
    },

    /// The string ended before a mandatory field.
    #[error("QR code string stops before mandatory field '{expected}'")]
    Truncated { expected: &'static str },

    /// A VAT base without its total, or a total without its base.
    #[error("next field should be '{expected}' but is '{found}'")]
    RegionPair {
        expected: &'static str,
        found:    String,
    },

    #[error("no tax field set in {region} fiscal zone")]
    EmptyRegion { region: FiscalRegion },

    #[error("last field should be 'R' or 'S' but '{found}' follows")]
    TrailingData { found: String },

    #[error("split field value error in '{token}'")]
    Split { token: String },

    #[error("empty QR code string")]
    Empty,
}

impl Error {
    pub(crate) const fn format(field: Field) -> Self {
        Self::Format { field }
    }
}
