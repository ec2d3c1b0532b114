//! Portuguese tax authority (AT) fiscal document QR code payload.
//!
//! The payload is a single line of `TAG:VALUE` fields joined by `*`, in a fixed
//! order, e.g. `A:123456789*B:999999990*C:PT*...*R:9999`. A [`Record`] holds
//! the fields in their wire form; it is filled through validating setters or
//! parsed from a string, and serialized back with [`Record::to_qr_string`].
//!
//! ```
//! use at_qrcode::Record;
//!
//! let mut record = Record::new();
//! record
//!     .set_issuer_tin("500000000")?
//!     .set_buyer_tin("123456789")?
//!     .set_country_code("PT")?
//!     .set_doc_type("GT")?
//!     .set_doc_status("N")?
//!     .set_doc_date("20190720")?
//!     .set_doc_no("GT G234CB/50987")?
//!     .set_atcud("GTVX4Y8B-50987")?
//!     .set_doc_without_vat()
//!     .set_tax_payable(0.0)?
//!     .set_gross_total(0.0)?
//!     .set_hash("5uIg")?
//!     .set_certificate_no(9999)?;
//! let code = record.to_qr_string(true)?;
//! assert_eq!(Record::parse(&code)?, record);
//! # Ok::<(), at_qrcode::Error>(())
//! ```

pub mod codec;
mod error;
pub mod field;
pub mod image;
mod record;

pub use self::{
    codec::{Codec, Leniency, QrCodec, PAYMENT_DOC_TYPES},
    error::{Error, Result},
    field::{tokens, Field, FiscalRegion, VatKind},
    image::{EcLevel, ImageConfig, QrRenderer},
    record::{Record, NO_VAT},
};

#[cfg(feature = "png")]
pub use self::image::PngRenderer;
