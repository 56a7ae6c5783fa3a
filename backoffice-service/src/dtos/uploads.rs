use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    /// Locator to hand back in later requests (intake images, KYC, RTO).
    pub url: String,
    pub file_name: String,
    pub size_bytes: i64,
}
