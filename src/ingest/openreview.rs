//! OpenReview API client
//!
//! Fetches review notes and submission PDFs. Only the public read
//! endpoints are used, so no credentials are needed.

use std::io::Write;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::{Result, RevfeedError};
use crate::ingest::paper::pdf_to_text;
use crate::ingest::review::format_review;

/// Default OpenReview API base URL
pub const DEFAULT_API_URL: &str = "https://api2.openreview.net";

/// Default URL serving submission PDFs
pub const DEFAULT_PDF_URL: &str = "https://openreview.net/pdf";

/// OpenReview API client
#[derive(Debug, Clone)]
pub struct OpenReviewClient {
    client: Client,
    api_url: String,
    pdf_url: String,
}

impl OpenReviewClient {
    pub fn new(api_url: impl Into<String>, pdf_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RevfeedError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            pdf_url: pdf_url.into(),
        })
    }

    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.api_url)
    }

    pub fn pdf_url(&self, paper_id: &str) -> String {
        format!("{}?id={}", self.pdf_url, paper_id)
    }

    async fn get_notes(&self, query: &[(&str, &str)]) -> std::result::Result<Vec<Value>, String> {
        let response = self
            .client
            .get(self.notes_url())
            .query(query)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error {}: {}", status, body));
        }

        let json: Value = response.json().await.map_err(|e| format!("Invalid response: {}", e))?;
        Ok(json
            .get("notes")
            .and_then(|n| n.as_array())
            .cloned()
            .unwrap_or_default())
    }

    /// Fetch a review note and format it for the pipeline.
    pub async fn fetch_review(&self, review_id: &str) -> Result<String> {
        log::info!("Fetching review {}", review_id);

        let notes = self
            .get_notes(&[("id", review_id)])
            .await
            .map_err(|e| RevfeedError::ReviewNotFound(format!("{}: {}", review_id, e)))?;

        let content = notes
            .first()
            .and_then(|note| note.get("content"))
            .and_then(|c| c.as_object())
            .ok_or_else(|| RevfeedError::ReviewNotFound(review_id.to_string()))?;

        Ok(format_review(content))
    }

    /// Find the id of the review a given reviewer left on a paper.
    pub async fn find_review_id(&self, paper_id: &str, reviewer_id: &str) -> Result<String> {
        log::info!("Looking up review by {} on paper {}", reviewer_id, paper_id);

        let notes = self
            .get_notes(&[("id", paper_id), ("details", "replies")])
            .await
            .map_err(|e| RevfeedError::PaperNotFound(format!("{}: {}", paper_id, e)))?;

        let note = notes
            .first()
            .ok_or_else(|| RevfeedError::PaperNotFound(paper_id.to_string()))?;

        review_id_from_replies(note, reviewer_id).ok_or_else(|| {
            RevfeedError::ReviewNotFound(format!("no review by {} on paper {}", reviewer_id, paper_id))
        })
    }

    /// Download a submission PDF and extract its text.
    ///
    /// The PDF is written to a temporary file that is removed on return.
    pub async fn fetch_paper(&self, paper_id: &str) -> Result<String> {
        let url = self.pdf_url(paper_id);
        log::info!("Downloading paper {} from {}", paper_id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RevfeedError::PaperNotFound(format!("{}: {}", paper_id, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevfeedError::PaperNotFound(format!("{}: download returned {}", paper_id, status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RevfeedError::PaperNotFound(format!("{}: {}", paper_id, e)))?;

        let mut file = tempfile::Builder::new().prefix("revfeed-").suffix(".pdf").tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        pdf_to_text(file.path()).await
    }

    /// Fetch a review and the paper it belongs to, as `(paper, review)`.
    pub async fn fetch_paper_and_review(&self, paper_id: &str, review_id: &str) -> Result<(String, String)> {
        let review = self.fetch_review(review_id).await?;
        let paper = self.fetch_paper(paper_id).await?;
        Ok((paper, review))
    }
}

/// Pick the reply whose first signature ends in `_<reviewer_id>`.
///
/// Reviewer signatures look like `ICLR.cc/2025/Conference/Submission1/Reviewer_AbCd`.
pub fn review_id_from_replies(note: &Value, reviewer_id: &str) -> Option<String> {
    note.get("details")?
        .get("replies")?
        .as_array()?
        .iter()
        .find(|reply| {
            reply
                .get("signatures")
                .and_then(|s| s.get(0))
                .and_then(|s| s.as_str())
                .and_then(|s| s.rsplit('_').next())
                .is_some_and(|suffix| suffix == reviewer_id)
        })
        .and_then(|reply| reply.get("id"))
        .and_then(|id| id.as_str())
        .map(String::from)
}
