//! Conversion between [`Record`] and the QR code string.
mod walk;

pub use self::walk::PAYMENT_DOC_TYPES;
use {
    crate::{
        error::{Error, Result},
        record::Record,
    },
    tracing::{debug, warn},
};

pub trait Codec<T> {
    fn encode(&self, value: &T) -> String;

    fn decode(&self, data: &str) -> Result<T>;
}

/// How to handle irregular but interpretable input when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leniency {
    /// Accept silently.
    Allow,

    /// Accept, but log a warning.
    Warn,

    /// Be strict and return an error.
    Strict,
}

/// Parser configuration for the QR code string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrCodec {
    /// Empty `Q:` value on payment documents (`RG`, `RC`), which carry no
    /// signature. The hash is stored as an empty string.
    pub empty_payment_hash: Leniency,

    /// Region marker whose value is not the region code, e.g. `I1:ES`.
    /// Setting the regional amounts stamps the canonical code anyway.
    pub region_marker: Leniency,
}

/// Default behaviour is to warn.
impl Default for QrCodec {
    fn default() -> Self {
        Self {
            empty_payment_hash: Leniency::Warn,
            region_marker:      Leniency::Warn,
        }
    }
}

impl QrCodec {
    pub fn strict() -> Self {
        Self {
            empty_payment_hash: Leniency::Strict,
            region_marker:      Leniency::Strict,
        }
    }

    /// Re-check of a record's own output. Its values already went through a
    /// setter or the parser, so tolerated input is not reported again.
    pub(crate) const fn validator() -> Self {
        Self {
            empty_payment_hash: Leniency::Allow,
            region_marker:      Leniency::Allow,
        }
    }

    /// Parse `code` into an existing record.
    ///
    /// On error the record keeps every field set before the failing token.
    pub fn decode_into(&self, code: &str, record: &mut Record) -> Result<()> {
        walk::walk(self, code, record).inspect_err(|err| debug!(%err, "QR code string rejected"))
    }

    /// Validate `code` without producing a record.
    pub fn check(&self, code: &str) -> Result<()> {
        self.decode_into(code, &mut Record::new())
    }
}

impl Codec<Record> for QrCodec {
    fn encode(&self, value: &Record) -> String {
        value.to_string()
    }

    fn decode(&self, data: &str) -> Result<Record> {
        let mut record = Record::new();
        self.decode_into(data, &mut record)?;
        Ok(record)
    }
}

fn lenient(leniency: Leniency, error: Error) -> Result<()> {
    match leniency {
        Leniency::Strict => Err(error),
        Leniency::Warn => {
            warn!(%error, "tolerated irregular QR code field");
            Ok(())
        }
        Leniency::Allow => Ok(()),
    }
}
