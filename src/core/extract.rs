use crate::utils::error::{FinderError, Result};

/// Returns the text between the first `//` and the next `/` (or the end of
/// the string). No further validation happens: ports, credentials and
/// `www.` prefixes are kept verbatim.
pub fn extract_domain(url: &str) -> Result<String> {
    let marker = url.find("//").ok_or_else(|| FinderError::InvalidUrl {
        url: url.to_string(),
    })?;

    let rest = &url[marker + 2..];
    let host = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };

    if host.is_empty() {
        return Err(FinderError::InvalidUrl {
            url: url.to_string(),
        });
    }

    Ok(host.to_string())
}
