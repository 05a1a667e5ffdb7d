use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use url::Url;

/// Tweet intent endpoint the share flow deep-links into.
pub const TWEET_INTENT_ENDPOINT: &str = "https://twitter.com/intent/tweet";

/// Pre-composed share payload handed to the external share flow.
///
/// Delivering the rendered image into the share target is a platform
/// action outside this crate; the payload only carries the composed
/// text and the page URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    /// `"<quote text> <author text>"`, exactly as displayed.
    pub text: String,
    /// URL of the page hosting the widget.
    pub page_url: String,
}

impl SharePayload {
    /// Compose the share text from the displayed text blocks.
    pub fn new(quote_text: &str, author_text: &str, page_url: impl Into<String>) -> Self {
        Self {
            text: format!("{} {}", quote_text, author_text),
            page_url: page_url.into(),
        }
    }

    /// Tweet intent deep link carrying the text and page URL.
    pub fn intent_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(TWEET_INTENT_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("text", &self.text)
            .append_pair("url", &self.page_url);
        Ok(url)
    }
}

/// File name handed to the caller for the download export.
pub fn download_file_name(unix_millis: u128) -> String {
    format!("daily-quote-{}.png", unix_millis)
}

/// Download file name stamped with the current wall clock.
pub fn download_file_name_now() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    download_file_name(millis)
}
