//! Cleaning of links found in bibliographic metadata.
//!
//! Both entry points are infallible: every internal failure is logged at `debug` and the best
//! string produced so far is returned instead.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::doi::Doi;

/// Characters that may not appear literally in a URI. Non-ASCII is always escaped.
const URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

static SEARCH_REDIRECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(?:www\.)?google\.[.a-z]+?/url").unwrap());

static ALLOWED_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:https?|ftp)://.+").unwrap());

static HTTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());

static DOI_SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^doi:/*").unwrap());

static URI_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// Internal failures of the individual cleaning steps.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("malformed percent escape at byte {offset}")]
    MalformedEscape { offset: usize },
    #[error("percent-decoded bytes are not UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("not a valid URI: {0}")]
    InvalidUri(#[from] url::ParseError),
}

/// Unwrap a search-engine result link to the address it redirects to.
///
/// Copying a link from a results page yields something like
/// `https://www.google.com/url?sa=t&url=http%3A%2F%2Fexample.com%2Fpaper.pdf&...`; this returns
/// `http://example.com/paper.pdf`. Anything that is not such a link, or whose `url` parameter
/// is missing, undecodable or not an `http`/`https`/`ftp` address, is returned unchanged.
pub fn clean_search_redirect(url: &str) -> String {
    if !SEARCH_REDIRECT_RE.is_match(url) {
        return url.to_string();
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(%url, %err, "search redirect is not a valid URL");
            return url.to_string();
        }
    };
    let Some(query) = parsed.query() else {
        return url.to_string();
    };

    for pair in query.split('&') {
        let Some(value) = pair.strip_prefix("url=") else {
            continue;
        };
        match form_decode(value) {
            Ok(target) if ALLOWED_URL_RE.is_match(&target) => return target,
            Ok(target) => debug!(%target, "redirect target has an unsupported scheme"),
            Err(err) => {
                debug!(%url, %err, "failed to decode redirect target");
                return url.to_string();
            }
        }
    }
    url.to_string()
}

/// Make a link safe to store and hand to an external opener.
///
/// Trims it, strips a `\url{...}` wrapper, turns `doi:` links and bare DOIs into resolver
/// addresses, then percent-decodes and re-escapes it as an ASCII-only URI. A literal `+` is
/// kept as `+` rather than being decoded to a space.
pub fn sanitize(link: &str) -> String {
    let mut link = link.trim().to_string();

    if let Some(inner) = link
        .strip_prefix("\\url{")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        link = inner.to_string();
    }

    if DOI_SCHEME_RE.is_match(&link) {
        let bare = DOI_SCHEME_RE.replace(&link, "").into_owned();
        match resolve_doi(&bare) {
            Some(resolved) => link = resolved,
            None => debug!(%link, "doi: link does not hold a valid DOI"),
        }
    } else if !HTTP_RE.is_match(&link)
        && let Some(resolved) = resolve_doi(&link)
    {
        link = resolved;
    }

    let link = link.replace('+', "%2B");

    let link = match form_decode(&link) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!(%link, %err, "leaving link percent-encoded");
            link
        }
    };

    match to_ascii_uri(&link) {
        Ok(uri) => uri,
        Err(err) => {
            debug!(%link, %err, "cannot render link as a URI");
            link
        }
    }
}

fn resolve_doi(candidate: &str) -> Option<String> {
    let doi = Doi::parse(candidate)?;
    match doi.to_ascii_url() {
        Ok(url) => Some(url),
        Err(err) => {
            debug!(%doi, %err, "cannot build resolver URL");
            None
        }
    }
}

/// Decode `application/x-www-form-urlencoded` text: `+` is a space, `%XX` a byte.
///
/// Unlike [`percent_decode_str`] on its own, a `%` not followed by two hex digits is an error.
fn form_decode(s: &str) -> Result<String, LinkError> {
    let bytes = s.as_bytes();
    let mut from = 0;
    while let Some(pos) = bytes[from..].iter().position(|&b| b == b'%') {
        let offset = from + pos;
        bytes
            .get(offset + 1..offset + 3)
            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .ok_or(LinkError::MalformedEscape { offset })?;
        from = offset + 3;
    }

    let spaced = s.replace('+', " ");
    let decoded = percent_decode_str(&spaced).decode_utf8()?;
    Ok(Cow::into_owned(decoded))
}

/// Escape everything that is not a legal URI character, then check that anything carrying a
/// scheme still parses as an absolute URL. Scheme-less strings are accepted as relative.
fn to_ascii_uri(link: &str) -> Result<String, LinkError> {
    let encoded = utf8_percent_encode(link, URI_ENCODE_SET).to_string();
    if URI_SCHEME_RE.is_match(&encoded) {
        Url::parse(&encoded)?;
    }
    Ok(encoded)
}
