use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::types::{AppError, PaperId, PaperRecord, Result};

const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

/// PDF content carried inside JSON as standard base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedPdf(String);

impl EncodedPdf {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Wrap an already encoded payload. Data URL prefixes are stripped.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        match encoded.strip_prefix(PDF_DATA_URL_PREFIX) {
            Some(rest) => Self(rest.to_string()),
            None => Self(encoded),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inline reference suitable for an `<object>`/`<iframe>` source.
    pub fn data_url(&self) -> String {
        format!("{}{}", PDF_DATA_URL_PREFIX, self.0)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.0.trim())
            .map_err(|e| AppError::Decode(format!("invalid PDF payload: {}", e)))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub course_code: String,
    pub year: i32,
    pub title: String,
    pub pdf: EncodedPdf,
    pub paper_id: PaperId,
}

impl Paper {
    pub fn from_record(course_code: impl Into<String>, year: i32, record: PaperRecord) -> Self {
        Self {
            course_code: course_code.into(),
            year,
            title: record.title,
            pdf: EncodedPdf::from_base64(record.pdf),
            paper_id: record.paper_id,
        }
    }

    pub fn pdf_data_url(&self) -> String {
        self.pdf.data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_data_url() {
        let pdf = EncodedPdf::from_bytes(b"%PDF-1.4");
        assert_eq!(pdf.as_str(), "JVBERi0xLjQ=");
        assert_eq!(pdf.data_url(), "data:application/pdf;base64,JVBERi0xLjQ=");
        assert_eq!(pdf.decode().unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_prefixed_payload_is_normalised() {
        let pdf = EncodedPdf::from_base64("data:application/pdf;base64,JVBERi0xLjQ=");
        assert_eq!(pdf.as_str(), "JVBERi0xLjQ=");
    }

    #[test]
    fn test_garbage_payload_fails_to_decode() {
        let pdf = EncodedPdf::from_base64("not base64!!");
        assert!(matches!(pdf.decode(), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_paper_from_record() {
        let paper = Paper::from_record(
            "CS101",
            2019,
            PaperRecord {
                title: "Final".into(),
                pdf: "JVBERi0xLjQ=".into(),
                paper_id: 12,
            },
        );
        assert_eq!(paper.course_code, "CS101");
        assert_eq!(paper.paper_id, 12);
        assert!(paper.pdf_data_url().ends_with("JVBERi0xLjQ="));
    }
}
