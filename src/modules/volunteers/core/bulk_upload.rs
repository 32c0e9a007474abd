use crate::shared::core::notice::Notice;
use serde::{Deserialize, Serialize};

/// Column order the bulk upload endpoint expects. Timestamps are ISO-8601 with offset.
pub const CSV_FORMAT_HEADER: &str = "name,email,phone,dept,college_id,reporting_time_iso,shift,start_time_iso,end_time_iso,role,status,notes";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadReport {
    #[serde(default)]
    pub created_volunteers: u32,
    #[serde(default)]
    pub created_assignments: u32,
    #[serde(default)]
    pub updated_assignments: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BulkUploadReport {
    /// Rows that failed do not roll back the ones that succeeded.
    pub fn has_warnings(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One warning banner per rejected row.
    pub fn warnings(&self) -> Vec<Notice> {
        self.errors.iter().map(Notice::warning).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "Created {} volunteers and {} assignments. Updated {} assignments.",
            self.created_volunteers, self.created_assignments, self.updated_assignments
        )
    }
}

#[cfg(test)]
mod bulk_upload_report_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_summarize_a_partially_failed_upload() {
        let report: BulkUploadReport = serde_json::from_str(
            r#"{"created_volunteers":4,"created_assignments":4,"updated_assignments":1,"errors":["row 3: invalid email"]}"#,
        )
        .unwrap();
        assert!(report.has_warnings());
        assert_eq!(
            report.summary(),
            "Created 4 volunteers and 4 assignments. Updated 1 assignments."
        );
        assert_eq!(
            report.warnings(),
            vec![Notice::warning("row 3: invalid email")]
        );
        assert_eq!(report.warnings()[0].to_string(), "[warning] row 3: invalid email");
    }

    #[rstest]
    fn it_should_accept_a_report_without_errors() {
        let report: BulkUploadReport =
            serde_json::from_str(r#"{"created_volunteers":1,"created_assignments":1}"#).unwrap();
        assert!(!report.has_warnings());
        assert!(report.warnings().is_empty());
        assert_eq!(report.updated_assignments, 0);
    }

    #[rstest]
    fn it_should_document_twelve_columns() {
        assert_eq!(CSV_FORMAT_HEADER.split(',').count(), 12);
    }
}
