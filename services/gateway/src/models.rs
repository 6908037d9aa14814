use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct InitializeForm {
    /// How many records to generate
    pub amount: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerForm {
    /// Number of random stocks to update
    pub number_to_change: usize,
    /// If present, changes are also sent as separate requests to this URL
    pub webhook_url: Option<String>,
    /// How many requests to send at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// How long to wait between batches of requests, in seconds
    #[serde(default)]
    pub sleep: f64,
    /// How many times to duplicate each update request
    #[serde(default)]
    pub duplicate: u32,
}

fn default_concurrency() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverQuery {
    /// Status code to respond with, for exercising failure handling
    #[serde(default = "default_status")]
    pub status_code: u16,
}

fn default_status() -> u16 {
    200
}
