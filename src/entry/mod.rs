use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{info, warn};

use shelfcheck::args::SmokeArgs;
use shelfcheck::driver::{SmokePlan, run_smoke};
use shelfcheck::error::{AppError, AppResult, ValidationError};
use shelfcheck::http::ShelfClient;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    apply_config(&mut args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<(SmokeArgs, ArgMatches)> {
    let matches = SmokeArgs::command().get_matches();
    let args = SmokeArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn apply_config(args: &mut SmokeArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = shelfcheck::config::load_config(args.config.as_deref())? {
        shelfcheck::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

async fn run_async(args: SmokeArgs) -> AppResult<()> {
    let plan = SmokePlan::from_args(&args);
    let client = ShelfClient::from_args(&args)?;
    info!(
        "Running {} pass(es) against {} with {} book(s) per shelf",
        plan.passes,
        client.base_url(),
        plan.books_per_shelf
    );

    let report = run_smoke(&client, &plan, &mut std::io::stdout()).await?;

    if report.is_clean() {
        return Ok(());
    }
    if plan.verify {
        return Err(AppError::validation(ValidationError::ChecksFailed {
            failures: report.failures.len(),
        }));
    }
    warn!(
        "{} check(s) failed; rerun with --verify to fail the process",
        report.failures.len()
    );
    Ok(())
}
