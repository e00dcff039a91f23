use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockscope_core::domain::persona::InvestorPersona;
use stockscope_core::gate::directory::StaticTickerDirectory;
use stockscope_core::gate::{AddOutcome, SessionState};
use stockscope_core::ingest::provider::HttpMarketDataClient;
use stockscope_core::report::{HttpGatewayClient, ReportPipeline};
use stockscope_core::time::calendar::parse_date_arg;

#[derive(Debug, Parser)]
#[command(name = "stockscope_client")]
struct Args {
    /// Ticker to add manually (repeatable). Validated and looked up before selection.
    #[arg(long = "ticker")]
    tickers: Vec<String>,

    /// Popular ticker to pick from the built-in list (repeatable).
    #[arg(long = "pick")]
    picks: Vec<String>,

    /// Range start (YYYY-MM-DD). Defaults to three days ago.
    #[arg(long)]
    from: Option<String>,

    /// Range end (YYYY-MM-DD). Defaults to now.
    #[arg(long)]
    to: Option<String>,

    /// beginner, active-trader or value-investor.
    #[arg(long, default_value = "beginner", value_parser = parse_persona)]
    persona: InvestorPersona,

    /// Simulated latency for manual ticker lookups, in milliseconds.
    #[arg(long, default_value_t = 0)]
    lookup_latency_ms: u64,

    /// Validate the selection without fetching data or calling the gateway.
    #[arg(long)]
    dry_run: bool,
}

fn parse_persona(s: &str) -> Result<InvestorPersona, String> {
    InvestorPersona::from_tag(s).ok_or_else(|| {
        format!("unknown persona {s:?}; expected beginner, active-trader or value-investor")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stockscope_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let now = chrono::Utc::now();
    let today = now.date_naive();
    let mut session = SessionState::new(now);
    session.set_persona(args.persona);

    if !args.picks.is_empty() {
        session.select_available(args.picks.as_slice());
    }

    let directory =
        StaticTickerDirectory::new().with_latency(Duration::from_millis(args.lookup_latency_ms));
    for raw in &args.tickers {
        match session.add_stock(&directory, raw).await {
            AddOutcome::Added(stock) => {
                tracing::info!(symbol = %stock.symbol, name = %stock.name, "added stock")
            }
            AddOutcome::Ignored(reason) => {
                tracing::warn!(input = %raw, ?reason, "ticker not added")
            }
        }
    }

    if let Some(from) = args.from.as_deref() {
        let date = parse_date_arg(from)?;
        if !session.select_from(date, today) {
            tracing::warn!(%date, "from date is outside the selectable window; keeping default");
        }
    }
    if let Some(to) = args.to.as_deref() {
        let date = parse_date_arg(to)?;
        if !session.select_to(date, today) {
            tracing::warn!(%date, "to date is outside the selectable window; keeping default");
        }
    }

    let range = session.date_range();
    tracing::info!(
        stocks = session.selected_stocks().len(),
        span_days = range.span_days(),
        persona = %session.persona(),
        "session ready"
    );

    if !session.can_generate() {
        tracing::warn!(blockers = ?session.blockers(), "report generation is disabled");
        return Ok(());
    }

    if args.dry_run {
        tracing::info!(dry_run = true, "selection is valid; skipping report generation");
        return Ok(());
    }

    let pipeline = ReportPipeline::new(
        Arc::new(HttpMarketDataClient::from_settings(&settings)?),
        Arc::new(HttpGatewayClient::from_settings(&settings)?),
    );

    let Some(request) = session.begin_submission() else {
        return Ok(());
    };
    let result = pipeline.run(&request).await;
    session.finish_submission();

    match result {
        Ok(analysis) => {
            tracing::info!(
                tickers = request.tickers.len(),
                chart_points = analysis.price_chart.len(),
                "report generated"
            );
            println!("{}", analysis.report);
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "report generation failed");
        }
    }

    Ok(())
}

fn init_sentry(settings: &stockscope_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
