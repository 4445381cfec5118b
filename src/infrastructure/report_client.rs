// Report requester - Triggers server-side report generation
use crate::domain::error::ViewerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ReportResponse {
    status: String,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Ready {
        file_url: String,
        message: Option<String>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ReportRequester {
    endpoint: String,
    client: reqwest::Client,
}

impl ReportRequester {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// POST with an empty body and decode the status payload.
    pub async fn request(&self) -> Result<ReportOutcome, ViewerError> {
        tracing::info!("Requesting report from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .send()
            .await
            .map_err(|e| ViewerError::Report(e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ViewerError::Report(e.to_string()))?;

        parse_report_response(&body)
    }
}

pub fn parse_report_response(body: &[u8]) -> Result<ReportOutcome, ViewerError> {
    let response: ReportResponse = serde_json::from_slice(body)
        .map_err(|e| ViewerError::Report(format!("unreadable response: {}", e)))?;

    match (response.status.as_str(), response.file_url) {
        ("success", Some(file_url)) => Ok(ReportOutcome::Ready {
            file_url,
            message: response.message,
        }),
        ("success", None) => Err(ViewerError::Report(
            "success response without file_url".to_string(),
        )),
        (status, _) => Ok(ReportOutcome::Failed {
            message: response
                .message
                .unwrap_or_else(|| format!("report generation returned status '{}'", status)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success() {
        let body = br#"{"status": "success", "message": "Report generated successfully.",
                        "file_url": "../data/output/RA_12_Compliance_Report.csv"}"#;
        assert_eq!(
            parse_report_response(body).unwrap(),
            ReportOutcome::Ready {
                file_url: "../data/output/RA_12_Compliance_Report.csv".to_string(),
                message: Some("Report generated successfully.".to_string()),
            }
        );
    }

    #[test]
    fn test_failure_statuses() {
        let body = br#"{"status": "error", "message": "Script execution failed"}"#;
        assert_eq!(
            parse_report_response(body).unwrap(),
            ReportOutcome::Failed {
                message: "Script execution failed".to_string()
            }
        );

        let bare = br#"{"status": "pending"}"#;
        assert!(matches!(
            parse_report_response(bare).unwrap(),
            ReportOutcome::Failed { message } if message.contains("pending")
        ));
    }

    #[test]
    fn test_malformed_responses() {
        assert!(parse_report_response(b"Internal Server Error").is_err());
        assert!(parse_report_response(br#"{"status": "success"}"#).is_err());
    }
}
