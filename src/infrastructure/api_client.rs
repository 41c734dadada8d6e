use std::path::Path;

use reqwest::blocking::multipart;
use tracing::{error, info};

use crate::domain::analysis::{AnalysisResult, ErrorBody};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::Settings;

/// Client for the aggregation service.
///
/// Blocking on purpose: every call runs on a worker thread owned by the
/// desktop shell, never on the UI thread.
pub struct EquipmentApi {
    client: reqwest::blocking::Client,
    settings: Settings,
}

impl EquipmentApi {
    pub fn new(settings: Settings) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.backend_url
    }

    /// Best-effort reachability probe.
    ///
    /// Any HTTP response counts as alive; every failure cause (refused,
    /// timeout, DNS) collapses to `false`. Never errors.
    pub fn check_backend_status(&self) -> bool {
        self.client
            .get(&self.settings.backend_url)
            .timeout(self.settings.probe_timeout())
            .send()
            .is_ok()
    }

    /// Upload one CSV file and return the computed statistics.
    pub fn upload_and_analyze(&self, file_path: &Path) -> Result<AnalysisResult> {
        let bytes = std::fs::read(file_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::FileNotFound(file_path.display().to_string())
            } else {
                AppError::IoError(format!("failed to read {}: {}", file_path.display(), e))
            }
        })?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|e| AppError::Upload(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        info!(file = %file_path.display(), "Uploading CSV to {}", self.settings.analyze_url());

        let response = self
            .client
            .post(self.settings.analyze_url())
            .multipart(form)
            .timeout(self.settings.upload_timeout())
            .send()
            .map_err(|e| {
                error!("Upload request failed: {}", e);
                if e.is_timeout() {
                    AppError::Timeout("request timed out".to_string())
                } else if e.is_connect() {
                    AppError::Unreachable(format!(
                        "make sure the server is running on {}",
                        self.settings.backend_url
                    ))
                } else {
                    AppError::Upload(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<AnalysisResult>()
                .map_err(|e| AppError::Upload(format!("failed to parse response: {}", e)))
        } else {
            let text = response.text().unwrap_or_default();
            Err(AppError::Rejected(rejection_message(status.as_u16(), &text)))
        }
    }
}

/// Extract the server's error message from a non-success body, falling back
/// to the raw body or the status code when the envelope cannot be parsed.
fn rejection_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(envelope) => envelope.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_at(url: &str) -> EquipmentApi {
        let mut settings = Settings::default();
        settings.backend_url = url.to_string();
        EquipmentApi::new(settings)
    }

    #[test]
    fn test_probe_is_false_when_nothing_listens() {
        // Discard port, connection refused immediately.
        let api = api_at("http://127.0.0.1:9");
        assert!(!api.check_backend_status());
    }

    #[test]
    fn test_missing_file_maps_to_file_not_found() {
        let api = api_at("http://127.0.0.1:9");
        let err = api
            .upload_and_analyze(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }

    #[test]
    fn test_rejection_message_prefers_error_envelope() {
        let msg = rejection_message(400, r#"{"error": "Missing columns: flowrate"}"#);
        assert_eq!(msg, "Missing columns: flowrate");
    }

    #[test]
    fn test_rejection_message_falls_back_to_body_then_status() {
        assert_eq!(rejection_message(500, "boom"), "boom");
        assert_eq!(rejection_message(502, "  "), "HTTP 502");
    }
}
