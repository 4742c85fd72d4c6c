use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, SmokeArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line win; config values fill in everything
/// else, including flags that only have a clap default or env value.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut SmokeArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "passes")
        && let Some(passes) = config.passes
    {
        args.passes = ensure_positive_usize(passes, "passes")?;
    }

    if !is_cli(matches, "books")
        && let Some(books) = config.books
    {
        args.books = ensure_positive_usize(books, "books")?;
    }

    if !is_cli(matches, "shelves")
        && let Some(shelves) = config.shelves.as_ref()
    {
        let mut parsed = Vec::with_capacity(shelves.len());
        for shelf in shelves {
            let trimmed = shelf.trim();
            if trimmed.is_empty() {
                return Err(AppError::validation(ValidationError::EmptyShelfId));
            }
            parsed.push(trimmed.to_owned());
        }
        args.shelves = parsed;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration("timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout.to_duration("connect_timeout")?;
    }

    if !is_cli(matches, "verify")
        && let Some(verify) = config.verify
    {
        args.verify = verify;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
