//! Field identifiers and their wire tags.
//!
//! The ordinal of a [`Field`] is its position in the QR code string, so the
//! token table below doubles as the wire ordering.

use {
    num_enum::{IntoPrimitive, TryFromPrimitive},
    std::fmt::{self, Display, Formatter},
};

/// Delimiter between fields.
pub const DELIMITER: char = '*';

/// Separator between a field tag and its value.
pub const FIELD_SEP: char = ':';

/// Number of fields defined by the format.
pub const FIELD_COUNT: usize = 40;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Field {
    IssuerTin = 0,
    BuyerTin,
    BuyerCountry,
    DocType,
    DocStatus,
    DocDate,
    DocNo,
    Atcud,
    FiscalRegionPt,
    PtExemptedBaseVat,
    PtReducedBaseVat,
    PtReducedTotalVat,
    PtIntermediateBaseVat,
    PtIntermediateTotalVat,
    PtNormalBaseVat,
    PtNormalTotalVat,
    FiscalRegionPtAc,
    PtAcExemptedBaseVat,
    PtAcReducedBaseVat,
    PtAcReducedTotalVat,
    PtAcIntermediateBaseVat,
    PtAcIntermediateTotalVat,
    PtAcNormalBaseVat,
    PtAcNormalTotalVat,
    FiscalRegionPtMa,
    PtMaExemptedBaseVat,
    PtMaReducedBaseVat,
    PtMaReducedTotalVat,
    PtMaIntermediateBaseVat,
    PtMaIntermediateTotalVat,
    PtMaNormalBaseVat,
    PtMaNormalTotalVat,
    TotalNonVat,
    TotalStampTax,
    TaxPayable,
    GrossTotal,
    WithholdingTaxAmount,
    Hash,
    Certificate,
    OtherInfo,
}

/// Field to tag mapping, in wire order.
static TOKENS: [(Field, &str); FIELD_COUNT] = [
    (Field::IssuerTin, "A"),
    (Field::BuyerTin, "B"),
    (Field::BuyerCountry, "C"),
    (Field::DocType, "D"),
    (Field::DocStatus, "E"),
    (Field::DocDate, "F"),
    (Field::DocNo, "G"),
    (Field::Atcud, "H"),
    (Field::FiscalRegionPt, "I1"),
    (Field::PtExemptedBaseVat, "I2"),
    (Field::PtReducedBaseVat, "I3"),
    (Field::PtReducedTotalVat, "I4"),
    (Field::PtIntermediateBaseVat, "I5"),
    (Field::PtIntermediateTotalVat, "I6"),
    (Field::PtNormalBaseVat, "I7"),
    (Field::PtNormalTotalVat, "I8"),
    (Field::FiscalRegionPtAc, "J1"),
    (Field::PtAcExemptedBaseVat, "J2"),
    (Field::PtAcReducedBaseVat, "J3"),
    (Field::PtAcReducedTotalVat, "J4"),
    (Field::PtAcIntermediateBaseVat, "J5"),
    (Field::PtAcIntermediateTotalVat, "J6"),
    (Field::PtAcNormalBaseVat, "J7"),
    (Field::PtAcNormalTotalVat, "J8"),
    (Field::FiscalRegionPtMa, "K1"),
    (Field::PtMaExemptedBaseVat, "K2"),
    (Field::PtMaReducedBaseVat, "K3"),
    (Field::PtMaReducedTotalVat, "K4"),
    (Field::PtMaIntermediateBaseVat, "K5"),
    (Field::PtMaIntermediateTotalVat, "K6"),
    (Field::PtMaNormalBaseVat, "K7"),
    (Field::PtMaNormalTotalVat, "K8"),
    (Field::TotalNonVat, "L"),
    (Field::TotalStampTax, "M"),
    (Field::TaxPayable, "N"),
    (Field::GrossTotal, "O"),
    (Field::WithholdingTaxAmount, "P"),
    (Field::Hash, "Q"),
    (Field::Certificate, "R"),
    (Field::OtherInfo, "S"),
];

/// The token table, ordered by field ordinal.
pub fn tokens() -> &'static [(Field, &'static str)] {
    &TOKENS
}

impl Field {
    pub fn index(self) -> usize {
        u8::from(self) as usize
    }

    /// The tag written in front of the value, e.g. `"I1"`.
    pub fn tag(self) -> &'static str {
        TOKENS[self.index()].1
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        TOKENS
            .iter()
            .find_map(|&(field, t)| (t == tag).then_some(field))
    }

    /// Iterate over all fields in wire order.
    pub fn all() -> impl Iterator<Item = Self> {
        TOKENS.iter().map(|&(field, _)| field)
    }

    /// Snake case name, used in error keys and in JSON output.
    pub fn name(self) -> &'static str {
        match self {
            Self::IssuerTin => "issuer_tin",
            Self::BuyerTin => "buyer_tin",
            Self::BuyerCountry => "country_code",
            Self::DocType => "doc_type",
            Self::DocStatus => "doc_status",
            Self::DocDate => "doc_date",
            Self::DocNo => "doc_no",
            Self::Atcud => "atcud",
            Self::FiscalRegionPt => "fiscal_region_pt",
            Self::PtExemptedBaseVat => "pt_exempted_base_vat",
            Self::PtReducedBaseVat => "pt_reduced_base_vat",
            Self::PtReducedTotalVat => "pt_reduced_total_vat",
            Self::PtIntermediateBaseVat => "pt_intermediate_base_vat",
            Self::PtIntermediateTotalVat => "pt_intermediate_total_vat",
            Self::PtNormalBaseVat => "pt_normal_base_vat",
            Self::PtNormalTotalVat => "pt_normal_total_vat",
            Self::FiscalRegionPtAc => "fiscal_region_ptac",
            Self::PtAcExemptedBaseVat => "ptac_exempted_base_vat",
            Self::PtAcReducedBaseVat => "ptac_reduced_base_vat",
            Self::PtAcReducedTotalVat => "ptac_reduced_total_vat",
            Self::PtAcIntermediateBaseVat => "ptac_intermediate_base_vat",
            Self::PtAcIntermediateTotalVat => "ptac_intermediate_total_vat",
            Self::PtAcNormalBaseVat => "ptac_normal_base_vat",
            Self::PtAcNormalTotalVat => "ptac_normal_total_vat",
            Self::FiscalRegionPtMa => "fiscal_region_ptma",
            Self::PtMaExemptedBaseVat => "ptma_exempted_base_vat",
            Self::PtMaReducedBaseVat => "ptma_reduced_base_vat",
            Self::PtMaReducedTotalVat => "ptma_reduced_total_vat",
            Self::PtMaIntermediateBaseVat => "ptma_intermediate_base_vat",
            Self::PtMaIntermediateTotalVat => "ptma_intermediate_total_vat",
            Self::PtMaNormalBaseVat => "ptma_normal_base_vat",
            Self::PtMaNormalTotalVat => "ptma_normal_total_vat",
            Self::TotalNonVat => "total_non_vat",
            Self::TotalStampTax => "stamp_tax",
            Self::TaxPayable => "tax_payable",
            Self::GrossTotal => "gross_total",
            Self::WithholdingTaxAmount => "withholding_tax_amount",
            Self::Hash => "hash",
            Self::Certificate => "certificate",
            Self::OtherInfo => "other_info",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the three VAT jurisdictions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FiscalRegion {
    /// Mainland
    Pt,
    /// Azores
    PtAc,
    /// Madeira
    PtMa,
}

impl FiscalRegion {
    pub const ALL: [Self; 3] = [Self::Pt, Self::PtAc, Self::PtMa];

    /// Literal value stored in the marker field.
    pub fn code(self) -> &'static str {
        match self {
            Self::Pt => "PT",
            Self::PtAc => "PT-AC",
            Self::PtMa => "PT-MA",
        }
    }

    /// The marker field (`I1`, `J1` or `K1`).
    pub fn marker(self) -> Field {
        match self {
            Self::Pt => Field::FiscalRegionPt,
            Self::PtAc => Field::FiscalRegionPtAc,
            Self::PtMa => Field::FiscalRegionPtMa,
        }
    }

    pub fn field(self, kind: VatKind) -> Field {
        REGION_FIELDS[self as usize][kind as usize]
    }
}

impl Display for FiscalRegion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Rate tier of a regional amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VatKind {
    ExemptedBase,
    ReducedBase,
    ReducedTotal,
    IntermediateBase,
    IntermediateTotal,
    NormalBase,
    NormalTotal,
}

impl VatKind {
    pub const ALL: [Self; 7] = [
        Self::ExemptedBase,
        Self::ReducedBase,
        Self::ReducedTotal,
        Self::IntermediateBase,
        Self::IntermediateTotal,
        Self::NormalBase,
        Self::NormalTotal,
    ];
}

static REGION_FIELDS: [[Field; 7]; 3] = [
    [
        Field::PtExemptedBaseVat,
        Field::PtReducedBaseVat,
        Field::PtReducedTotalVat,
        Field::PtIntermediateBaseVat,
        Field::PtIntermediateTotalVat,
        Field::PtNormalBaseVat,
        Field::PtNormalTotalVat,
    ],
    [
        Field::PtAcExemptedBaseVat,
        Field::PtAcReducedBaseVat,
        Field::PtAcReducedTotalVat,
        Field::PtAcIntermediateBaseVat,
        Field::PtAcIntermediateTotalVat,
        Field::PtAcNormalBaseVat,
        Field::PtAcNormalTotalVat,
    ],
    [
        Field::PtMaExemptedBaseVat,
        Field::PtMaReducedBaseVat,
        Field::PtMaReducedTotalVat,
        Field::PtMaIntermediateBaseVat,
        Field::PtMaIntermediateTotalVat,
        Field::PtMaNormalBaseVat,
        Field::PtMaNormalTotalVat,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table_is_ordered() {
        assert_eq!(tokens().len(), FIELD_COUNT);
        for (i, &(field, _)) in tokens().iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(Field::try_from(i as u8).ok(), Some(field));
        }
        assert!(Field::try_from(FIELD_COUNT as u8).is_err());
    }

    #[test]
    fn test_tags() {
        assert_eq!(Field::IssuerTin.tag(), "A");
        assert_eq!(Field::Atcud.tag(), "H");
        assert_eq!(Field::FiscalRegionPt.tag(), "I1");
        assert_eq!(Field::PtAcNormalTotalVat.tag(), "J8");
        assert_eq!(Field::FiscalRegionPtMa.tag(), "K1");
        assert_eq!(Field::OtherInfo.tag(), "S");
        assert_eq!(Field::from_tag("K4"), Some(Field::PtMaReducedTotalVat));
        assert_eq!(Field::from_tag("T"), None);
        assert_eq!(Field::from_tag(""), None);
    }

    #[test]
    fn test_region_fields() {
        for region in FiscalRegion::ALL {
            let marker = region.marker().index();
            for (offset, kind) in VatKind::ALL.into_iter().enumerate() {
                assert_eq!(region.field(kind).index(), marker + 1 + offset);
            }
        }
        assert_eq!(
            FiscalRegion::PtAc.field(VatKind::IntermediateTotal).tag(),
            "J6"
        );
    }
}
