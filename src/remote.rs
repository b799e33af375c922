//! Blocking download of remote Parquet payloads

use crate::config::ConverterOptions;
use crate::error::{ConvertError, Result};
use crate::source::SourceFile;
use reqwest::blocking::Client;
use tracing::debug;

fn fetch_error(e: reqwest::Error) -> ConvertError {
    ConvertError::RemoteFetch(e.to_string())
}

/// GET `url` and wrap the body as a fetched [`SourceFile`].
///
/// Network failures and non-2xx statuses are [`ConvertError::RemoteFetch`].
/// There is no retry.
pub fn fetch_parquet(url: &str, options: &ConverterOptions) -> Result<SourceFile> {
    let mut builder = Client::builder().user_agent(options.user_agent_value());
    if let Some(timeout) = options.fetch_timeout_value() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(fetch_error)?;

    debug!("Fetching {}", url);
    let response = client
        .get(url)
        .send()
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?;

    let body = response.bytes().map_err(fetch_error)?;
    debug!("Fetched {} bytes from {}", body.len(), url);

    Ok(SourceFile::fetched(body.to_vec()))
}
