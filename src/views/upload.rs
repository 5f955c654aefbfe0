use crate::api::ApiClient;
use crate::auth::Route;
use crate::model::EncodedPdf;
use crate::types::{AppError, NewPaper, PaperId, QuestionNumber, Result};

/// Years accepted for upload, both bounds exclusive.
pub const YEAR_RANGE: (i32, i32) = (2000, 2020);

pub const UPLOAD_FAILED_MESSAGE: &str = "Something went wrong...";

pub fn validate_year(year: i32) -> Result<i32> {
    let (min, max) = YEAR_RANGE;
    if year > min && year < max {
        Ok(year)
    } else {
        Err(AppError::Validation(format!(
            "Year must be between {} and {}, got {}",
            min + 1,
            max - 1,
            year
        )))
    }
}

/// Split the free-text question field: lowercase, drop all whitespace, split
/// on commas. Empty entries are dropped.
pub fn parse_questions(raw: &str) -> Vec<String> {
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact
        .split(',')
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw upload form as the user filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub course_code: String,
    pub year: Option<i32>,
    pub title: String,
    pub questions: String,
    pub pdf: Option<EncodedPdf>,
}

impl UploadForm {
    pub fn attach_pdf(&mut self, bytes: &[u8]) {
        self.pdf = Some(EncodedPdf::from_bytes(bytes));
    }

    /// Inline preview of the attached file.
    pub fn preview_url(&self) -> Option<String> {
        self.pdf.as_ref().map(EncodedPdf::data_url)
    }

    pub fn validate(&self) -> Result<PaperUpload> {
        let course_code = self.course_code.trim();
        if course_code.is_empty() {
            return Err(AppError::Validation("Course code is required".to_string()));
        }
        let year = self
            .year
            .ok_or_else(|| AppError::Validation("Year is required".to_string()))
            .and_then(validate_year)?;
        let pdf = match &self.pdf {
            Some(pdf) if !pdf.is_empty() => pdf.clone(),
            _ => return Err(AppError::Validation("Select a PDF to upload".to_string())),
        };

        Ok(PaperUpload {
            paper: NewPaper {
                course: course_code.to_string(),
                year,
                title: self.title.trim().to_string(),
                pdf: pdf.into_inner(),
            },
            questions: parse_questions(&self.questions),
        })
    }
}

/// A validated upload, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperUpload {
    pub paper: NewPaper,
    pub questions: Vec<String>,
}

impl PaperUpload {
    /// Where to go once the upload has finished.
    pub fn route(&self) -> Route {
        Route::paper(self.paper.course.clone(), self.paper.year)
    }

    /// Create the paper, then attach its questions.
    ///
    /// The second step is not compensated: if it fails the paper stays
    /// created without questions and `PartialUpload` reports its id.
    pub async fn submit(&self, client: &ApiClient) -> Result<PaperId> {
        let created = client.submit_paper(&self.paper).await?;
        tracing::info!(paper_id = created.id, course = %self.paper.course, "Paper created");

        let questions: Vec<QuestionNumber> = self
            .questions
            .iter()
            .map(|number| QuestionNumber {
                number: number.clone(),
            })
            .collect();

        if let Err(e) = client.submit_questions(created.id, &questions).await {
            tracing::error!(paper_id = created.id, "Attaching questions failed: {}", e);
            return Err(AppError::PartialUpload {
                paper_id: created.id,
                reason: e.to_string(),
            });
        }

        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1999, false)]
    #[case(2000, false)]
    #[case(2001, true)]
    #[case(2015, true)]
    #[case(2019, true)]
    #[case(2020, false)]
    fn test_year_bounds_are_exclusive(#[case] year: i32, #[case] ok: bool) {
        assert_eq!(validate_year(year).is_ok(), ok);
    }

    #[test]
    fn test_question_parsing() {
        assert_eq!(parse_questions("1A, 1b ,2,\t3 c"), vec!["1a", "1b", "2", "3c"]);
        assert_eq!(parse_questions("1,,2,"), vec!["1", "2"]);
        assert!(parse_questions("  ").is_empty());
    }

    fn form() -> UploadForm {
        let mut form = UploadForm {
            course_code: " CS101 ".into(),
            year: Some(2015),
            title: "Final exam".into(),
            questions: "1a, 1b".into(),
            pdf: None,
        };
        form.attach_pdf(b"%PDF-1.4");
        form
    }

    #[test]
    fn test_valid_form() {
        let upload = form().validate().unwrap();
        assert_eq!(upload.paper.course, "CS101");
        assert_eq!(upload.paper.pdf, "JVBERi0xLjQ=");
        assert_eq!(upload.questions, vec!["1a", "1b"]);
        assert_eq!(upload.route().path(), "/CS101/2015");
    }

    #[test]
    fn test_invalid_forms() {
        let mut f = form();
        f.year = Some(1999);
        assert!(f.validate().unwrap_err().is_validation());

        let mut f = form();
        f.pdf = None;
        assert!(f.validate().unwrap_err().is_validation());

        let mut f = form();
        f.course_code = "  ".into();
        assert!(f.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_preview_url() {
        assert_eq!(
            form().preview_url().as_deref(),
            Some("data:application/pdf;base64,JVBERi0xLjQ=")
        );
        assert_eq!(UploadForm::default().preview_url(), None);
    }
}
