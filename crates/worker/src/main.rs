use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wattcast_core::charts::ChartWriter;
use wattcast_core::domain::estimate::estimate;
use wattcast_core::domain::report::UsageReport;
use wattcast_core::predict::LinearPriceModel;

#[derive(Debug, Parser)]
#[command(name = "wattcast_worker")]
struct Args {
    /// Timestamp to estimate for (YYYY-MM-DDTHH:MM:SS). Defaults to the local time now.
    #[arg(long)]
    at: Option<String>,

    /// Seed for reproducible random fields. Falls back to RNG_SEED, then entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the report charts. Defaults to STATIC_DIR.
    #[arg(long)]
    output_dir: Option<std::path::PathBuf>,

    /// Do everything except writing the chart files.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = wattcast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let out = run(&args, &settings).map_err(|err| {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = ?err, "worker run failed");
        err
    })?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run(
    args: &Args,
    settings: &wattcast_core::config::Settings,
) -> anyhow::Result<serde_json::Value> {
    let now = chrono::Local::now().naive_local();
    let at = wattcast_core::time::local::resolve_timestamp(args.at.as_deref(), now)?;

    let predictor = LinearPriceModel::load(&settings.model_path)?;
    let mut rng = wattcast_core::rng::seeded_rng(args.seed.or(settings.rng_seed));

    let estimate = estimate(at, &predictor, &mut rng)?;
    let report = UsageReport::generate(&mut rng);

    if args.dry_run {
        tracing::info!(
            %at,
            dry_run = true,
            current_price = estimate.current_price,
            weekly_cost = report.weekly_cost,
            "worker run (dry-run); charts not written"
        );
    } else {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| settings.static_dir.clone());
        let paths = ChartWriter::new(dir).render(&report.samples)?;
        tracing::info!(
            %at,
            current_price = estimate.current_price,
            weekly_cost = report.weekly_cost,
            daily = %paths.daily.display(),
            weekly = %paths.weekly.display(),
            monthly = %paths.monthly.display(),
            "wrote report charts"
        );
    }

    Ok(serde_json::json!({
        "estimate": estimate,
        "report": report,
    }))
}

fn init_sentry(settings: &wattcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
