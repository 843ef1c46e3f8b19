use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use prospect_common::observability::{init_logging, LogConfig, LogFormat};
use prospect_common::ProspectError;
use prospect_config::{LlmSpec, ProspectConfig, ProspectConfigLoader};
use prospect_llm::openai::OpenAiClient;
use prospect_llm::outreach::{draft_outreach_with, OutreachOptions};
use prospect_llm::traits::LlmClient;
use prospect_scrape::page::HttpPageSource;
use prospect_scrape::pipeline::Pipeline;
use prospect_sheets::{CsvRowStore, RowResult, RowStore};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "prospect",
    about = "Scrape lead websites for About Us content and draft outreach emails"
)]
struct Args {
    /// Path to the configuration file.
    #[arg(long, default_value = "prospect.yaml", env = "PROSPECT_CONFIG")]
    config: PathBuf,

    /// Process at most this many rows.
    #[arg(long)]
    limit: Option<usize>,

    /// Scrape only; never call the LLM.
    #[arg(long)]
    skip_llm: bool,

    /// Emit JSON logs.
    #[arg(long)]
    log_json: bool,

    /// Log at debug level when RUST_LOG is unset.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Config first (env wins), logging second so the chosen format applies.
    let cfg = ProspectConfigLoader::new()
        .with_file(&args.config)
        .load()
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    init_logging(LogConfig {
        emit_stderr: true,
        format: if args.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        default_filter: if args.verbose { "debug" } else { "info" },
        ..LogConfig::default()
    })?;

    run(cfg, args).await?;
    Ok(())
}

async fn run(cfg: ProspectConfig, args: Args) -> prospect_common::Result<()> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, config = %args.config.display(), "starting batch run");

    let store = CsvRowStore::new(&cfg.sheet.input_path, &cfg.sheet.output_path)
        .with_columns(&cfg.sheet.website_column, &cfg.sheet.name_column);

    let source = HttpPageSource::new()
        .map_err(|e| ProspectError::Config(format!("HTTP client init failed: {e}")))?
        .with_timeout(Duration::from_secs(cfg.scrape.timeout_secs))
        .with_retries(cfg.scrape.retries);
    let pipeline = Pipeline::new(Arc::new(source));

    let llm = build_llm(cfg.llm.as_ref(), args.skip_llm)?;

    let mut rows = store
        .load_rows()
        .await
        .map_err(|e| ProspectError::Sheet(e.to_string()))?;
    if rows.is_empty() {
        tracing::warn!("no rows found in the sheet");
        return Ok(());
    }
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let mut results = Vec::with_capacity(rows.len());
    let mut without_content = 0usize;
    for row in rows {
        let outcome = pipeline.process_url(&row.website).await;

        // Draft an email only when scraping produced content, the row names
        // a contact, and an LLM is configured.
        let outreach = match (&llm, outcome.content(), row.contact_name.as_deref()) {
            (Some((client, opts)), Some(content), Some(name)) => {
                Some(draft_outreach_with(client.as_ref(), name, content, *opts).await)
            }
            _ => None,
        };

        let cell = outcome.cell_text();
        if outcome.content().is_none() {
            without_content += 1;
            tracing::warn!(
                row = row.index,
                website = %row.website,
                result = %cell,
                "row did not yield content"
            );
        }
        results.push(RowResult {
            row,
            cell,
            outreach,
        });
    }

    store
        .write_results(&results)
        .await
        .map_err(|e| ProspectError::Sheet(e.to_string()))?;
    tracing::info!(
        %run_id,
        rows = results.len(),
        without_content,
        output = %cfg.sheet.output_path,
        "batch run complete"
    );
    Ok(())
}

fn build_llm(
    spec: Option<&LlmSpec>,
    skip: bool,
) -> prospect_common::Result<Option<(Arc<dyn LlmClient>, OutreachOptions)>> {
    if skip {
        return Ok(None);
    }
    match spec {
        None => Ok(None),
        Some(LlmSpec::Openai {
            model,
            auth_token,
            temperature,
            max_tokens,
            endpoint,
        }) => {
            let client: Arc<dyn LlmClient> = Arc::new(
                OpenAiClient::with_endpoint(endpoint, auth_token.clone(), model.clone())
                    .map_err(|e| ProspectError::Llm(format!("client init failed: {e}")))?,
            );
            let defaults = OutreachOptions::default();
            let opts = OutreachOptions {
                max_tokens: max_tokens.unwrap_or(defaults.max_tokens),
                temperature: temperature.unwrap_or(defaults.temperature),
            };
            Ok(Some((client, opts)))
        }
    }
}
