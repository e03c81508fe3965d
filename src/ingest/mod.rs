//! Ingestion: turning papers and reviews into the plain text the pipeline consumes.
//!
//! - `paper`: local text or PDF files
//! - `review`: OpenReview note content or plain-text reviews
//! - `openreview`: fetching both from the OpenReview API

mod openreview;
mod paper;
mod review;

pub use openreview::{DEFAULT_API_URL, DEFAULT_PDF_URL, OpenReviewClient, review_id_from_replies};
pub use paper::{load_paper, pdf_to_text};
pub use review::{REVIEW_SECTIONS, format_review, load_review, section_header};
