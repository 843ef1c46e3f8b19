//! Cold-outreach drafting.
//!
//! The email template is fixed; only the bracketed fields are personalized
//! from the contact's name and the scraped "About Us" content. Rate-limited
//! calls are retried with a linearly growing delay, and a final failure is
//! rendered as an `Error: ...` cell rather than aborting the batch.

use crate::traits::{LlmClient, LlmError};
use std::time::Duration;
use tokio::time::sleep;

pub const OUTREACH_SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes website \
content of non profit organisations and generates cold outreach emails.";

const OUTREACH_TEMPLATE: &str = r#"
Cold Email Template Instructions

Objective: Generate initial cold emails for outreach, following the specific template provided below. Only modify the sections within brackets for personalization; all other content should remain fixed.

Email Template:

[Name of the Person] - really liked your organisation's mission towards the community."

[PERSONALISATION]

Your story needs to reach more people because of the impact it has.

Assuming you could potentially tell your story to a greater audience.
Would you be interested to know how?

Thanks,
The Prospect Team

Instructions:

1. Personalization Fields:
- Replace [Name of the Person] with the contact name given in the prompt.
- Replace [PERSONALISATION] with a short, specific comment about a particular insight or segment of the about us content.
- While personalizing: write the personalization at a 3rd grade reading level. The sentence should not be too long and complex. Use shorter sentences and simpler words.

2. Fixed Content:
- Do not change any other text in the template. All non-bracketed content should remain exactly as written, preserving the wording, tone, and format.

3. Tone and Language:
- Keep the tone friendly and professional.
- Ensure the language is simple, conversational, and concise to stay within a ~150-word limit.
"#;

const MAX_ATTEMPTS: usize = 3;
const BASE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Generation knobs for drafting; the defaults match the original outreach
/// flow.
#[derive(Debug, Clone, Copy)]
pub struct OutreachOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OutreachOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Combine the fixed template with the contact's name and scraped content.
pub fn build_outreach_prompt(contact_name: &str, about_content: &str) -> String {
    format!(
        "{}\n\nContact name: {}\n\nContent to personalize from:\n{}",
        OUTREACH_TEMPLATE.trim(),
        contact_name.trim(),
        about_content.trim()
    )
}

/// Draft one outreach email. Retries rate-limited calls up to three
/// attempts, sleeping `1s * attempt` between them. Any other failure (or
/// exhausting the budget) yields an `Error: ...` string so the caller can
/// record it in the row and move on.
pub async fn draft_outreach(
    client: &dyn LlmClient,
    contact_name: &str,
    about_content: &str,
) -> String {
    draft_outreach_with(client, contact_name, about_content, OutreachOptions::default()).await
}

/// [`draft_outreach`] with explicit generation knobs.
pub async fn draft_outreach_with(
    client: &dyn LlmClient,
    contact_name: &str,
    about_content: &str,
    opts: OutreachOptions,
) -> String {
    let prompt = build_outreach_prompt(contact_name, about_content);
    let mut attempt = 0usize;
    loop {
        attempt += 1;
        match client
            .generate(
                &prompt,
                Some(OUTREACH_SYSTEM_PROMPT),
                Some(opts.max_tokens),
                Some(opts.temperature),
            )
            .await
        {
            Ok(resp) => return resp.text.trim().to_string(),
            Err(LlmError::RateLimit) if attempt < MAX_ATTEMPTS => {
                let delay = BASE_RETRY_DELAY * attempt as u32;
                tracing::warn!(
                    attempt,
                    delay_secs = delay.as_secs(),
                    "rate limit reached; retrying"
                );
                sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(error = %e, attempt, "failed to draft outreach");
                return format!("Error: {e}");
            }
        }
    }
}
