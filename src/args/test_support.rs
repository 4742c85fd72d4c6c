use clap::Parser;

use crate::error::{AppError, AppResult};

use super::SmokeArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<SmokeArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    SmokeArgs::try_parse_from(args).map_err(AppError::from)
}
