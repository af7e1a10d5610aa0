//! CSV encoding and decoding for certificate records.
//!
//! The wire shape is the four business fields in fixed order under the
//! header `Name,Email,Certificate Number,Issued Date`. `id` never appears
//! in the CSV representation, so an export/import round trip reassigns ids
//! while preserving the business fields.

use crate::domain::error::RegistryError;
use crate::domain::record::{CertificateDraft, CertificateRecord};

/// Fixed header row, in field order.
pub const HEADER: [&str; 4] = ["Name", "Email", "Certificate Number", "Issued Date"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encodes records into CSV bytes, header first. Quoting and escaping
/// (fields containing the delimiter, quotes, or newlines) follow standard
/// CSV rules via the `csv` writer.
pub fn encode(records: &[CertificateRecord]) -> Result<Vec<u8>, RegistryError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.certificate_number.as_str(),
            &record.issued_date.format(DATE_FORMAT).to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| RegistryError::Csv(csv::Error::from(e.into_error())))
}

/// Decodes data rows along with their 1-based row numbers (header
/// excluded).
///
/// The first input row is always discarded as a header, even when it is
/// actually data. Per-row failures (fewer than 4 fields, malformed quoting)
/// come back as reasons instead of aborting the whole parse; fields beyond
/// the fourth are ignored.
pub fn decode(bytes: &[u8]) -> Vec<(usize, Result<CertificateDraft, String>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .enumerate()
        .map(|(index, outcome)| {
            let decoded = match outcome {
                Ok(record) if record.len() >= 4 => Ok(CertificateDraft {
                    name: record[0].to_string(),
                    email: record[1].to_string(),
                    certificate_number: record[2].to_string(),
                    issued_date: record[3].to_string(),
                }),
                Ok(record) => Err(format!(
                    "expected at least 4 fields, found {}",
                    record.len()
                )),
                Err(err) => Err(format!("malformed CSV row: {err}")),
            };
            (index + 1, decoded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, number: &str) -> CertificateRecord {
        CertificateRecord {
            id: 1,
            name: name.to_string(),
            email: "a@example.com".to_string(),
            certificate_number: number.to_string(),
            issued_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_encode_header_only_when_empty() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Name,Email,Certificate Number,Issued Date\n"
        );
    }

    #[test]
    fn test_encode_quotes_embedded_delimiters() {
        let bytes = encode(&[record("Smith, \"Alice\"", "CERT-001")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Smith, \"\"Alice\"\"\""));
    }

    #[test]
    fn test_decode_skips_first_row_unconditionally() {
        // No header here: the first data row is still discarded.
        let input = b"Bob,bob@example.com,CERT-001,2024-01-01\n\
                      Carol,carol@example.com,CERT-002,2024-02-02\n";
        let rows = decode(input);
        assert_eq!(rows.len(), 1);
        let (row, decoded) = &rows[0];
        assert_eq!(*row, 1);
        assert_eq!(decoded.as_ref().unwrap().certificate_number, "CERT-002");
    }

    #[test]
    fn test_decode_rejects_short_rows() {
        let input = b"Name,Email,Certificate Number,Issued Date\n\
                      only,three,fields\n\
                      Bob,bob@example.com,CERT-001,2024-01-01\n";
        let rows = decode(input);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].1.as_ref().unwrap_err().contains("4 fields"));
        assert!(rows[1].1.is_ok());
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let input = b"Name,Email,Certificate Number,Issued Date,Extra\n\
                      Bob,bob@example.com,CERT-001,2024-01-01,ignored\n";
        let rows = decode(input);
        let draft = rows[0].1.as_ref().unwrap();
        assert_eq!(draft.issued_date, "2024-01-01");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let original = vec![
            record("Alice Smith", "CERT-001"),
            record("Line\nBreak", "CERT-002"),
        ];
        let bytes = encode(&original).unwrap();
        let rows = decode(&bytes);
        assert_eq!(rows.len(), 2);
        for ((_, decoded), rec) in rows.iter().zip(&original) {
            let draft = decoded.as_ref().unwrap();
            assert_eq!(draft.name, rec.name);
            assert_eq!(draft.email, rec.email);
            assert_eq!(draft.certificate_number, rec.certificate_number);
            assert_eq!(draft.issued_date, "2024-01-15");
        }
    }
}
