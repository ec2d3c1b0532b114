
use {
    anyhow::Result,
    at_qrcode::{tokens, Codec, Error, Field, FiscalRegion, QrCodec, Record, VatKind},
    fixtures::*,
};

/// Mandatory head and tail of a document, no region set.
fn base_record() -> Result<Record> {
    let mut record = Record::new();
    record
        .set_issuer_tin("123456789")?
        .set_buyer_tin("999999990")?
        .set_country_code("PT")?
        .set_doc_type("FS")?
        .set_doc_status("N")?
        .set_doc_date("20190812")?
        .set_doc_no("FS CDVF/12345")?
        .set_atcud("CDF7T5HD-12345")?
        .set_tax_payable(0.15)?
        .set_gross_total(0.80)?
        .set_hash("YhGV")?
        .set_certificate_no(9999)?;
    Ok(record)
}

#[test]
fn test_build_at_example_2() -> Result<()> {
    let mut record = base_record()?;
    record
        .set_pt_normal_base_vat(0.65)?
        .set_pt_normal_total_vat(0.15)?
        .set_other_info("NU;0.80")?;
    assert_eq!(record.to_qr_string(true)?, AT_EXAMPLE_2);
    assert_eq!(QrCodec::default().encode(&record), AT_EXAMPLE_2);
    Ok(())
}

#[test]
fn test_build_at_example_1() -> Result<()> {
    let mut record = Record::new();
    record
        .set_issuer_tin("123456789")?
        .set_buyer_tin("999999990")?
        .set_country_code("PT")?
        .set_doc_type("FT")?
        .set_doc_status("N")?
        .set_doc_date("20191231")?
        .set_doc_no("FT AB2019/0035")?
        .set_atcud("CSDF7T5H-0035")?;

    let amounts = [
        [12000.0, 15000.0, 900.0, 50000.0, 6500.0, 80000.0, 18400.0],
        [10000.0, 25000.56, 1000.02, 75000.0, 6750.0, 100000.0, 18000.0],
        [5000.0, 12500.0, 625.0, 25000.0, 3000.0, 40000.0, 8800.0],
    ];
    // Set in reverse to show that insertion order does not matter.
    for (region, values) in FiscalRegion::ALL.into_iter().zip(amounts).rev() {
        for (kind, value) in VatKind::ALL.into_iter().zip(values).rev() {
            record.set_vat(region, kind, value)?;
        }
    }

    record
        .set_other_info("TB;PT00000000000000000000000;513500.58")?
        .set_certificate_no(9999)?
        .set_hash("kLp0")?
        .set_withholding_tax_amount(100.0)?
        .set_gross_total(513600.58)?
        .set_tax_payable(64000.02)?
        .set_total_stamp_tax(25.0)?
        .set_total_non_vat(100.0)?;

    assert_eq!(record.to_qr_string(true)?, AT_EXAMPLE_1);
    Ok(())
}

#[test]
fn test_build_without_vat() -> Result<()> {
    let mut record = Record::new();
    record
        .set_issuer_tin("500000000")?
        .set_buyer_tin("123456789")?
        .set_country_code("PT")?
        .set_doc_type("GT")?
        .set_doc_status("N")?
        .set_doc_date("20190720")?
        .set_doc_no("GT G234CB/50987")?
        .set_atcud("GTVX4Y8B-50987")?
        .set_doc_without_vat()
        .set_tax_payable(0.0)?
        .set_gross_total(0.0)?
        .set_hash("5uIg")?
        .set_certificate_no(9999)?;
    assert_eq!(record.is_doc_without_vat(), Some(true));
    assert_eq!(record.to_qr_string(true)?, AT_EXAMPLE_4);
    Ok(())
}

#[test]
fn test_round_trip() -> Result<()> {
    let mut record = base_record()?;
    record
        .set_ptac_exempted_base_vat(3.5)?
        .set_ptma_intermediate_base_vat(10.0)?
        .set_ptma_intermediate_total_vat(1.2)?
        .set_total_stamp_tax(0.1)?;
    let code = record.to_qr_string(true)?;
    assert_eq!(Record::parse(&code)?, record);
    Ok(())
}

#[test]
fn test_validate_reports_missing_region() -> Result<()> {
    let record = base_record()?;
    assert_eq!(
        record.to_qr_string(true),
        Err(Error::Sequence {
            expected: "I1",
            found:    "N".to_owned(),
        })
    );
    // Without validation the string is produced as is.
    assert!(record.to_qr_string(false)?.contains("H:CDF7T5HD-12345*N:0.15"));
    Ok(())
}

#[test]
fn test_validate_reports_unpaired_total() -> Result<()> {
    let mut record = base_record()?;
    record.set_pt_reduced_total_vat(0.06)?;
    assert_eq!(
        record.to_qr_string(true),
        Err(Error::RegionPair {
            expected: "I3",
            found:    "I4".to_owned(),
        })
    );
    Ok(())
}

#[test]
fn test_wire_order_follows_token_table() -> Result<()> {
    let record = Record::parse(AT_EXAMPLE_1)?;
    let tags: Vec<&str> = AT_EXAMPLE_1
        .split('*')
        .map(|token| token.split_once(':').map_or(token, |(tag, _)| tag))
        .collect();
    let expected: Vec<&str> = tokens().iter().map(|&(_, tag)| tag).collect();
    assert_eq!(tags, expected);
    let fields: Vec<Field> = record.iter().map(|(field, _)| field).collect();
    assert_eq!(fields, Field::all().collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_issuer_tin_scenario() -> Result<()> {
    let mut record = Record::new();
    assert_eq!(record.set_issuer_tin("12924729").map(|_| ()), Err(Error::Format {
        field: Field::IssuerTin,
    }));
    record.set_issuer_tin("295158530")?;
    assert_eq!(record.issuer_tin(), Some("295158530"));
    Ok(())
}

#[test]
fn test_certificate_scenario() -> Result<()> {
    let mut record = Record::new();
    assert!(record.set_certificate_no(0).is_err());
    assert!(record.set_certificate_no(10000).is_err());
    record.set_certificate_no(9999)?;
    assert_eq!(record.certificate_no(), Some(9999));
    Ok(())
}
