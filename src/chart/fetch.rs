use axum::body::Bytes;
use std::fmt;

/// The base URL of the chart renderer. Charts live at `/{username}`.
pub const CHART_BASE: &str = "https://ghchart.rshah.org";

/// Charts are a few tens of kilobytes; anything much bigger isn't one.
pub const MAX_CHART_BYTES: usize = 1024 * 1024;

/// Every way fetching a chart can fail. They're all reported the same way.
#[derive(Debug)]
pub enum ChartError {
    RequestFailed(reqwest::Error),
    BadStatus(u16),
    TooLarge(usize),
}

impl From<reqwest::Error> for ChartError {
    fn from(e: reqwest::Error) -> Self {
        ChartError::RequestFailed(e)
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            ChartError::RequestFailed(e) => e.to_string(),
            ChartError::BadStatus(s) => format!("chart service responded {}", s),
            ChartError::TooLarge(n) => format!("chart was {} bytes", n),
        };

        write!(f, "Failed to fetch chart: {}", x)
    }
}

#[derive(Clone)]
pub struct ChartClient {
    http: reqwest::Client,
    base: String,
}

impl ChartClient {
    pub fn new(http: reqwest::Client, base: String) -> Self {
        ChartClient { http, base }
    }

    /// Fetch the SVG contribution chart for a user.
    pub async fn fetch_chart(&self, username: &str) -> Result<Bytes, ChartError> {
        let mut res = self
            .http
            .get(format!("{}/{}", self.base, username))
            .send()
            .await?;

        let status = res.status().as_u16();
        if status != 200 {
            return Err(ChartError::BadStatus(status));
        }

        if let Some(n) = res.content_length() {
            if n as usize > MAX_CHART_BYTES {
                return Err(ChartError::TooLarge(n as usize));
            }
        }

        // Content-Length is optional, so the cap is enforced while reading too.
        let mut buf = Vec::new();
        while let Some(chunk) = res.chunk().await? {
            buf.extend_from_slice(&chunk);
            if buf.len() > MAX_CHART_BYTES {
                return Err(ChartError::TooLarge(buf.len()));
            }
        }

        Ok(Bytes::from(buf))
    }
}
