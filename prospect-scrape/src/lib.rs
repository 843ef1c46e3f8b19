//! Web-content extraction pipeline.
//!
//! Turns one raw spreadsheet cell into one result cell: validate and
//! normalize the URL, fetch the homepage, discover an "About Us" page,
//! fall back to the homepage when none exists, and flatten the winning
//! page's paragraphs into plain text.
//!
//! - URL validation/normalization (`urls`)
//! - Page fetching and the document model (`page`)
//! - About-link discovery (`about`)
//! - Paragraph text extraction (`extract`)
//! - The per-URL orchestrator (`pipeline`)
//!
//! The orchestrator is a total function: every collaborator failure is
//! folded into a [`pipeline::ProcessingResult`], so a batch driver can walk
//! thousands of rows without one bad URL aborting the run.

pub mod about;
pub mod extract;
pub mod page;
pub mod pipeline;
pub mod urls;
