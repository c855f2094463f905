//! Minimal HAR 1.2 structures: just enough to replay observed outbound requests.

use serde::Deserialize;

/// Root HAR log (top-level wrapper).
#[derive(Debug, Deserialize)]
pub struct HarLog {
    pub log: HarRoot,
}

#[derive(Debug, Deserialize)]
pub struct HarRoot {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HarEntry {
    #[serde(default, rename = "startedDateTime")]
    pub started_date_time: Option<String>,
    pub request: HarRequest,
}

#[derive(Debug, Deserialize)]
pub struct HarRequest {
    #[serde(default)]
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<HarHeader>,
}

#[derive(Debug, Deserialize)]
pub struct HarHeader {
    pub name: String,
    pub value: String,
}
