use std::borrow::Cow;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// A `%` not followed by two hex digits, or escapes that are not UTF-8.
    #[error("URI malformed")]
    MalformedEncoding,
}

/// Extract the suggested filename from a `Content-Disposition` header value.
///
/// An RFC 5987 `filename*=` token wins over a plain `filename=` one. The value
/// is percent-decoded strictly. Returns `Ok(None)` when no usable name is
/// present.
pub fn extract_filename(header: Option<&str>) -> Result<Option<String>, FilenameError> {
    let Some(header) = header else {
        return Ok(None);
    };
    let Some(raw) = extended_filename(header).or_else(|| plain_filename(header)) else {
        return Ok(None);
    };

    let decoded = percent_decode(&raw)?;
    debug!(header, filename = %decoded, "Parsed Content-Disposition");

    let decoded = decoded.trim();
    if decoded.is_empty() {
        Ok(None)
    } else {
        Ok(Some(decoded.to_string()))
    }
}

fn percent_decode(raw: &str) -> Result<String, FilenameError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).ok_or(FilenameError::MalformedEncoding)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(FilenameError::MalformedEncoding);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|_| FilenameError::MalformedEncoding)
}

fn extended_filename(header: &str) -> Option<String> {
    // filename*=<charset>'<language>'<value>
    let re = Regex::new(r#"(?i)filename\*\s*=\s*"?[^']*'[^']*'([^;"\s]+)"?"#).ok()?;
    let caps = re.captures(header)?;
    Some(caps[1].to_string())
}

fn plain_filename(header: &str) -> Option<String> {
    let re = Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#).ok()?;
    let caps = re.captures(header)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
