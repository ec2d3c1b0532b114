//! The in-memory QR code record.
//!
//! Every value is kept in its wire form: amounts are formatted with two
//! decimals when set and integers are stringified, so serialization is a plain
//! walk over the slots in field order.

use {
    crate::{
        codec::{Codec, QrCodec},
        error::{Error, Result},
        field::{Field, FiscalRegion, VatKind, DELIMITER, FIELD_COUNT, FIELD_SEP},
    },
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

/// Literal stored in the PT marker of documents without VAT.
pub const NO_VAT: &str = "0";

/// A sparse set of QR code fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    slots: [Option<String>; FIELD_COUNT],
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to cents, halves away from zero. The scaled value is first cut to
/// 15 significant digits, so `1.005` counts as a half and not as `100.4999..`.
/// Adding zero turns `-0.0` into `0.0`.
fn round_amount(value: f64) -> f64 {
    let cents = value * 100.0;
    let cents: f64 = format!("{cents:.14e}").parse().unwrap_or(cents);
    cents.round() / 100.0 + 0.0
}

fn check(valid: bool, field: Field) -> Result<()> {
    if valid {
        Ok(())
    } else {
        Err(Error::format(field))
    }
}

fn is_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn is_atcud(value: &str) -> bool {
    if value == "0" {
        return true;
    }
    let Some((code, sequence)) = value.split_once('-') else {
        return false;
    };
    value.len() <= 70
        && !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && !sequence.is_empty()
        && is_digits(sequence)
}

macro_rules! vat_accessors {
    ($($setter:ident $getter:ident $region:ident $kind:ident;)+) => {
        $(
            pub fn $setter(&mut self, value: f64) -> Result<&mut Self> {
                self.set_vat(FiscalRegion::$region, VatKind::$kind, value)
            }

            pub fn $getter(&self) -> Option<f64> {
                self.vat(FiscalRegion::$region, VatKind::$kind)
            }
        )+
    };
}

impl Record {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Parse a QR code string into a new record.
    pub fn parse(code: &str) -> Result<Self> {
        QrCodec::default().decode(code)
    }

    /// Serialize to the wire string.
    ///
    /// With `validate` the output is parsed again and any structural or format
    /// error is returned instead of the string.
    pub fn to_qr_string(&self, validate: bool) -> Result<String> {
        let code = self.to_string();
        if validate {
            QrCodec::validator().check(&code)?;
        }
        Ok(code)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.slots[field.index()].as_deref()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.slots[field.index()].is_some()
    }

    /// Present fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::all().filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub(crate) fn put(&mut self, field: Field, value: String) {
        self.slots[field.index()] = Some(value);
    }

    fn set_text(&mut self, field: Field, value: &str, valid: bool) -> Result<&mut Self> {
        check(valid, field)?;
        self.put(field, value.to_owned());
        Ok(self)
    }

    /// Strictly positive fields must stay positive once rounded to cents.
    fn set_amount(&mut self, field: Field, value: f64, allow_zero: bool) -> Result<&mut Self> {
        let amount = round_amount(value);
        let valid = amount.is_finite() && if allow_zero { value >= 0.0 } else { amount > 0.0 };
        check(valid, field)?;
        // Two decimals, `.` separator, no grouping.
        self.put(field, format!("{amount:.2}"));
        Ok(self)
    }

    fn amount(&self, field: Field) -> Option<f64> {
        self.get(field)?.parse().ok()
    }

    /// Field A, the issuer's TIN without country prefix.
    pub fn set_issuer_tin(&mut self, tin: &str) -> Result<&mut Self> {
        let valid = tin.len() == 9 && is_digits(tin);
        self.set_text(Field::IssuerTin, tin, valid)
    }

    pub fn issuer_tin(&self) -> Option<&str> {
        self.get(Field::IssuerTin)
    }

    /// Field B, the buyer's TIN. Consumers without TIN use `999999990`.
    pub fn set_buyer_tin(&mut self, tin: &str) -> Result<&mut Self> {
        let valid = !tin.is_empty() && tin.len() <= 30;
        self.set_text(Field::BuyerTin, tin, valid)
    }

    pub fn buyer_tin(&self) -> Option<&str> {
        self.get(Field::BuyerTin)
    }

    /// Field C, the buyer's country.
    pub fn set_country_code(&mut self, code: &str) -> Result<&mut Self> {
        let valid = !code.is_empty() && code.len() <= 12;
        self.set_text(Field::BuyerCountry, code, valid)
    }

    pub fn country_code(&self) -> Option<&str> {
        self.get(Field::BuyerCountry)
    }

    pub fn set_doc_type(&mut self, doc_type: &str) -> Result<&mut Self> {
        self.set_text(Field::DocType, doc_type, doc_type.len() == 2)
    }

    pub fn doc_type(&self) -> Option<&str> {
        self.get(Field::DocType)
    }

    pub fn set_doc_status(&mut self, status: &str) -> Result<&mut Self> {
        self.set_text(Field::DocStatus, status, status.len() == 1)
    }

    pub fn doc_status(&self) -> Option<&str> {
        self.get(Field::DocStatus)
    }

    /// Field F, formatted `YYYYMMDD`.
    pub fn set_doc_date(&mut self, date: &str) -> Result<&mut Self> {
        let valid = date.len() == 8 && date.starts_with("20") && is_digits(date);
        self.set_text(Field::DocDate, date, valid)
    }

    pub fn doc_date(&self) -> Option<&str> {
        self.get(Field::DocDate)
    }

    pub fn set_doc_no(&mut self, doc_no: &str) -> Result<&mut Self> {
        let valid = !doc_no.is_empty() && doc_no.len() <= 60;
        self.set_text(Field::DocNo, doc_no, valid)
    }

    pub fn doc_no(&self) -> Option<&str> {
        self.get(Field::DocNo)
    }

    /// Field H. `"0"` while the series has no validation code.
    pub fn set_atcud(&mut self, atcud: &str) -> Result<&mut Self> {
        self.set_text(Field::Atcud, atcud, is_atcud(atcud))
    }

    pub fn atcud(&self) -> Option<&str> {
        self.get(Field::Atcud)
    }

    /// Mark the document as carrying no VAT breakdown (`I1:0`).
    pub fn set_doc_without_vat(&mut self) -> &mut Self {
        self.put(Field::FiscalRegionPt, NO_VAT.to_owned());
        self
    }

    /// `None` when no fiscal region marker is set yet.
    pub fn is_doc_without_vat(&self) -> Option<bool> {
        if let Some(pt) = self.get(Field::FiscalRegionPt) {
            return Some(pt == NO_VAT);
        }
        if self.contains(Field::FiscalRegionPtAc) || self.contains(Field::FiscalRegionPtMa) {
            return Some(false);
        }
        None
    }

    /// Value of the region's marker field.
    pub fn fiscal_region(&self, region: FiscalRegion) -> Option<&str> {
        self.get(region.marker())
    }

    /// Set a regional amount and stamp the region marker with its code.
    pub fn set_vat(&mut self, region: FiscalRegion, kind: VatKind, value: f64) -> Result<&mut Self> {
        self.set_amount(region.field(kind), value, false)?;
        self.put(region.marker(), region.code().to_owned());
        Ok(self)
    }

    pub fn vat(&self, region: FiscalRegion, kind: VatKind) -> Option<f64> {
        self.amount(region.field(kind))
    }

    vat_accessors! {
        set_pt_exempted_base_vat pt_exempted_base_vat Pt ExemptedBase;
        set_pt_reduced_base_vat pt_reduced_base_vat Pt ReducedBase;
        set_pt_reduced_total_vat pt_reduced_total_vat Pt ReducedTotal;
        set_pt_intermediate_base_vat pt_intermediate_base_vat Pt IntermediateBase;
        set_pt_intermediate_total_vat pt_intermediate_total_vat Pt IntermediateTotal;
        set_pt_normal_base_vat pt_normal_base_vat Pt NormalBase;
        set_pt_normal_total_vat pt_normal_total_vat Pt NormalTotal;
        set_ptac_exempted_base_vat ptac_exempted_base_vat PtAc ExemptedBase;
        set_ptac_reduced_base_vat ptac_reduced_base_vat PtAc ReducedBase;
        set_ptac_reduced_total_vat ptac_reduced_total_vat PtAc ReducedTotal;
        set_ptac_intermediate_base_vat ptac_intermediate_base_vat PtAc IntermediateBase;
        set_ptac_intermediate_total_vat ptac_intermediate_total_vat PtAc IntermediateTotal;
        set_ptac_normal_base_vat ptac_normal_base_vat PtAc NormalBase;
        set_ptac_normal_total_vat ptac_normal_total_vat PtAc NormalTotal;
        set_ptma_exempted_base_vat ptma_exempted_base_vat PtMa ExemptedBase;
        set_ptma_reduced_base_vat ptma_reduced_base_vat PtMa ReducedBase;
        set_ptma_reduced_total_vat ptma_reduced_total_vat PtMa ReducedTotal;
        set_ptma_intermediate_base_vat ptma_intermediate_base_vat PtMa IntermediateBase;
        set_ptma_intermediate_total_vat ptma_intermediate_total_vat PtMa IntermediateTotal;
        set_ptma_normal_base_vat ptma_normal_base_vat PtMa NormalBase;
        set_ptma_normal_total_vat ptma_normal_total_vat PtMa NormalTotal;
    }

    /// Field L, total not subject to VAT.
    pub fn set_total_non_vat(&mut self, value: f64) -> Result<&mut Self> {
        self.set_amount(Field::TotalNonVat, value, false)
    }

    pub fn total_non_vat(&self) -> Option<f64> {
        self.amount(Field::TotalNonVat)
    }

    pub fn set_total_stamp_tax(&mut self, value: f64) -> Result<&mut Self> {
        self.set_amount(Field::TotalStampTax, value, false)
    }

    pub fn total_stamp_tax(&self) -> Option<f64> {
        self.amount(Field::TotalStampTax)
    }

    pub fn set_tax_payable(&mut self, value: f64) -> Result<&mut Self> {
        self.set_amount(Field::TaxPayable, value, true)
    }

    pub fn tax_payable(&self) -> Option<f64> {
        self.amount(Field::TaxPayable)
    }

    pub fn set_gross_total(&mut self, value: f64) -> Result<&mut Self> {
        self.set_amount(Field::GrossTotal, value, true)
    }

    pub fn gross_total(&self) -> Option<f64> {
        self.amount(Field::GrossTotal)
    }

    pub fn set_withholding_tax_amount(&mut self, value: f64) -> Result<&mut Self> {
        self.set_amount(Field::WithholdingTaxAmount, value, false)
    }

    pub fn withholding_tax_amount(&self) -> Option<f64> {
        self.amount(Field::WithholdingTaxAmount)
    }

    /// Field Q, four characters of the document signature, or `"0"` when the
    /// document is not signed.
    pub fn set_hash(&mut self, hash: &str) -> Result<&mut Self> {
        let valid = hash.len() == 4 || hash == "0";
        self.set_text(Field::Hash, hash, valid)
    }

    pub fn hash(&self) -> Option<&str> {
        self.get(Field::Hash)
    }

    /// Field R, the software certificate number.
    pub fn set_certificate_no(&mut self, number: i64) -> Result<&mut Self> {
        check((1..=9999).contains(&number), Field::Certificate)?;
        self.put(Field::Certificate, number.to_string());
        Ok(self)
    }

    pub fn certificate_no(&self) -> Option<u16> {
        self.get(Field::Certificate)?.parse().ok()
    }

    pub fn set_other_info(&mut self, info: &str) -> Result<&mut Self> {
        let valid = !info.is_empty() && info.len() <= 65 && !info.contains(DELIMITER);
        self.set_text(Field::OtherInfo, info, valid)
    }

    pub fn other_info(&self) -> Option<&str> {
        self.get(Field::OtherInfo)
    }
}

/// Unvalidated wire form, see [`Record::to_qr_string`] for the checked one.
impl Display for Record {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "{DELIMITER}")?;
            }
            write!(f, "{}{FIELD_SEP}{value}", field.tag())?;
        }
        Ok(())
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
