//! Destination URL validation and normalization.

use url::Url;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs are allowed")]
    UnsupportedScheme,

    #[error("URL must have a host")]
    MissingHost,
}

/// Normalizes an absolute http(s) URL.
///
/// Scheme and host are lowercased by the parser; the default port is dropped.
/// Path, query and fragment are kept so that client-side routes survive the
/// redirect.
///
/// # Errors
///
/// - [`UrlError::InvalidFormat`] for unparsable or relative input
/// - [`UrlError::UnsupportedScheme`] for anything other than http/https
/// - [`UrlError::MissingHost`] if the parsed URL has no host
pub fn normalize_url(input: &str) -> Result<String, UrlError> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    // `Url` already elides 80/443 for http/https.
    Ok(url.to_string())
}
