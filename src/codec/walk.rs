//! Positional parser for the QR code string.
//!
//! The format is a fixed sequence of steps. Most steps are a single field,
//! either mandatory or optional, and one step covers the fiscal region blocks
//! which have their own pairing rules. The driver evaluates [`STEPS`] in order
//! and fails if any token is left afterwards.
use {
    super::{lenient, QrCodec},
    crate::{
        error::{Error, Result},
        field::{Field, FiscalRegion, VatKind, DELIMITER, FIELD_SEP},
        record::{Record, NO_VAT},
    },
    tracing::debug,
};

/// Document types of payment receipts, which are not signed.
pub const PAYMENT_DOC_TYPES: [&str; 2] = ["RG", "RC"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Mandatory(Field),
    Optional(Field),
    Regions,
}

const STEPS: [Step; 17] = [
    Step::Mandatory(Field::IssuerTin),
    Step::Mandatory(Field::BuyerTin),
    Step::Mandatory(Field::BuyerCountry),
    Step::Mandatory(Field::DocType),
    Step::Mandatory(Field::DocStatus),
    Step::Mandatory(Field::DocDate),
    Step::Mandatory(Field::DocNo),
    Step::Mandatory(Field::Atcud),
    Step::Regions,
    Step::Optional(Field::TotalNonVat),
    Step::Optional(Field::TotalStampTax),
    Step::Mandatory(Field::TaxPayable),
    Step::Mandatory(Field::GrossTotal),
    Step::Optional(Field::WithholdingTaxAmount),
    Step::Mandatory(Field::Hash),
    Step::Mandatory(Field::Certificate),
    Step::Optional(Field::OtherInfo),
];

/// Base field of each tier and the total that must follow it.
const TIERS: [(VatKind, Option<VatKind>); 4] = [
    (VatKind::ExemptedBase, None),
    (VatKind::ReducedBase, Some(VatKind::ReducedTotal)),
    (VatKind::IntermediateBase, Some(VatKind::IntermediateTotal)),
    (VatKind::NormalBase, Some(VatKind::NormalTotal)),
];

pub(super) fn walk(codec: &QrCodec, code: &str, record: &mut Record) -> Result<()> {
    if code.is_empty() {
        return Err(Error::Empty);
    }
    Walker {
        codec,
        tokens: code.split(DELIMITER).collect(),
        pos: 0,
        record,
    }
    .run()
}

struct Walker<'a, 'r> {
    codec:  &'r QrCodec,
    tokens: Vec<&'a str>,
    pos:    usize,
    record: &'r mut Record,
}

impl<'a> Walker<'a, '_> {
    fn run(mut self) -> Result<()> {
        for step in STEPS {
            match step {
                Step::Mandatory(field) => {
                    let value = self.expect(field)?;
                    self.store(field, value)?;
                }
                Step::Optional(field) => {
                    if let Some(value) = self.accept(field)? {
                        self.store(field, value)?;
                    }
                }
                Step::Regions => self.regions()?,
            }
        }
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some(token) => Err(Error::TrailingData {
                found: (*token).to_owned(),
            }),
        }
    }

    /// Split the next token into tag and value without consuming it.
    fn peek(&self) -> Result<Option<(&'a str, &'a str)>> {
        let Some(&token) = self.tokens.get(self.pos) else {
            return Ok(None);
        };
        let split_error = || Error::Split {
            token: token.to_owned(),
        };
        let (tag, value) = token.split_once(FIELD_SEP).ok_or_else(split_error)?;
        // An empty hash is judged once the field is consumed.
        if tag.is_empty() || (value.is_empty() && tag != Field::Hash.tag()) {
            return Err(split_error());
        }
        Ok(Some((tag, value)))
    }

    fn accept(&mut self, field: Field) -> Result<Option<&'a str>> {
        match self.peek()? {
            Some((tag, value)) if tag == field.tag() => {
                debug!(tag, value, "field parsed");
                self.pos += 1;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    fn expect(&mut self, field: Field) -> Result<&'a str> {
        if let Some(value) = self.accept(field)? {
            return Ok(value);
        }
        Err(self.mismatch(field.tag(), false))
    }

    /// Error for a missing field at the current position.
    fn mismatch(&self, expected: &'static str, in_region: bool) -> Error {
        match self.peek() {
            Err(err) => err,
            Ok(None) => Error::Truncated { expected },
            Ok(Some((found, _))) if in_region => Error::RegionPair {
                expected,
                found: found.to_owned(),
            },
            Ok(Some((found, _))) => Error::Sequence {
                expected,
                found: found.to_owned(),
            },
        }
    }

    fn regions(&mut self) -> Result<()> {
        let mut found = false;
        for region in FiscalRegion::ALL {
            let marker = region.marker();
            let Some(value) = self.accept(marker)? else {
                continue;
            };
            found = true;
            if region == FiscalRegion::Pt && value == NO_VAT {
                self.record.set_doc_without_vat();
                continue;
            }
            if value != region.code() {
                lenient(self.codec.region_marker, Error::format(marker))?;
            }
            self.region_block(region)?;
        }
        if found {
            Ok(())
        } else {
            Err(self.mismatch(Field::FiscalRegionPt.tag(), false))
        }
    }

    fn region_block(&mut self, region: FiscalRegion) -> Result<()> {
        let mut found = false;
        for (base, total) in TIERS {
            if let Some(value) = self.accept(region.field(base))? {
                self.store_vat(region, base, value)?;
                if let Some(total) = total {
                    let field = region.field(total);
                    let Some(value) = self.accept(field)? else {
                        return Err(self.mismatch(field.tag(), true));
                    };
                    self.store_vat(region, total, value)?;
                }
                found = true;
            } else if let Some(total) = total {
                // A total is only valid right after its base.
                if let Some((tag, _)) = self.peek()? {
                    if tag == region.field(total).tag() {
                        return Err(self.mismatch(region.field(base).tag(), true));
                    }
                }
            }
        }
        if found {
            Ok(())
        } else {
            Err(Error::EmptyRegion { region })
        }
    }

    fn store_vat(&mut self, region: FiscalRegion, kind: VatKind, value: &str) -> Result<()> {
        let amount = parse_amount(region.field(kind), value)?;
        self.record.set_vat(region, kind, amount)?;
        Ok(())
    }

    fn store(&mut self, field: Field, value: &str) -> Result<()> {
        let record = &mut *self.record;
        match field {
            Field::IssuerTin => record.set_issuer_tin(value),
            Field::BuyerTin => record.set_buyer_tin(value),
            Field::BuyerCountry => record.set_country_code(value),
            Field::DocType => record.set_doc_type(value),
            Field::DocStatus => record.set_doc_status(value),
            Field::DocDate => record.set_doc_date(value),
            Field::DocNo => record.set_doc_no(value),
            Field::Atcud => record.set_atcud(value),
            Field::TotalNonVat => record.set_total_non_vat(parse_amount(field, value)?),
            Field::TotalStampTax => record.set_total_stamp_tax(parse_amount(field, value)?),
            Field::TaxPayable => record.set_tax_payable(parse_amount(field, value)?),
            Field::GrossTotal => record.set_gross_total(parse_amount(field, value)?),
            Field::WithholdingTaxAmount => {
                record.set_withholding_tax_amount(parse_amount(field, value)?)
            }
            Field::Hash if value.is_empty() => {
                let payment = record
                    .doc_type()
                    .is_some_and(|doc_type| PAYMENT_DOC_TYPES.contains(&doc_type));
                let error = Error::Split {
                    token: format!("{}{FIELD_SEP}", field.tag()),
                };
                if !payment {
                    return Err(error);
                }
                lenient(self.codec.empty_payment_hash, error)?;
                record.put(Field::Hash, String::new());
                Ok(record)
            }
            Field::Hash => record.set_hash(value),
            Field::Certificate => {
                let number = value.parse().map_err(|_| Error::format(field))?;
                record.set_certificate_no(number)
            }
            Field::OtherInfo => record.set_other_info(value),
            // Region markers and amounts are handled by the region blocks.
            _ => Err(Error::format(field)),
        }?;
        Ok(())
    }
}

fn parse_amount(field: Field, value: &str) -> Result<f64> {
    value.parse().map_err(|_| Error::format(field))
}
