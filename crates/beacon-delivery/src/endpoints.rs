//! Ingest endpoint and header assembly.

/// SDK identifier reported in the User-Agent header.
const SDK_NAME: &str = "beacon-rust-sdk";

/// SDK version reported in the User-Agent header.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Batch ingest URL.
pub fn batch_url(domain: &str, api_version: &str) -> String {
    format!("https://{}/api/{}/app/batch/", domain, api_version)
}

/// Monitoring URL.
pub fn monitor_url(domain: &str, api_version: &str) -> String {
    format!("https://{}/api/{}/app/monitor/", domain, api_version)
}

/// Headers sent with ingest POSTs.
pub fn post_headers(api_version: &str) -> Vec<(String, String)> {
    let mut headers = get_headers(api_version);
    headers.insert(
        0,
        ("Content-Type".to_string(), "application/json".to_string()),
    );
    headers
}

/// Headers sent with ingest GETs.
pub fn get_headers(api_version: &str) -> Vec<(String, String)> {
    vec![
        ("Connection".to_string(), "Keep-Alive".to_string()),
        (
            "User-Agent".to_string(),
            format!("{}/{}/{}", SDK_NAME, SDK_VERSION, api_version),
        ),
    ]
}
