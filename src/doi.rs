use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use url::Url;

const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A Digital Object Identifier, split into its registrant prefix and item suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Doi<'a> {
    prefix: &'a str,
    suffix: &'a str,
}

impl<'a> Doi<'a> {
    /// Parse a string that is, as a whole, a DOI.
    ///
    /// Accepts bare DOIs, `doi:`/`urn:doi:` prefixed ones and `doi.org` resolver URLs. Query
    /// strings, fragments and trailing prose punctuation are ignored.
    pub fn parse(identifier: &'a str) -> Option<Self> {
        let mut identifier = identifier.trim();

        if let Some(idx) = identifier.find(['?', '#']) {
            identifier = &identifier[..idx];
        }

        identifier = identifier.trim_end_matches(|c: char| {
            matches!(c, '.' | ',' | ';' | ':' | ')' | ']' | '}' | '\"' | '\'')
        });

        static DOI_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?:(?i:urn:)?(?i:doi):\s*)?(?:https?://(?:dx\.)?doi\.org/)?(10\.\d{4,}(?:\.\d+)*)/([^\s\p{C}]+)$",
            )
            .unwrap()
        });

        let caps = DOI_RE.captures(identifier)?;

        Some(Doi {
            prefix: caps.get(1)?.as_str(),
            suffix: caps.get(2)?.as_str(),
        })
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn suffix(&self) -> &'a str {
        self.suffix
    }

    /// The `https://doi.org/` resolver address for this DOI.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        let enc_suffix = utf8_percent_encode(self.suffix, PATH_SEGMENT_ENCODE_SET).to_string();
        Url::parse(format!("https://doi.org/{}/{}", self.prefix, enc_suffix).as_str())
    }

    /// [`Doi::to_url`], serialized. The result is pure ASCII.
    pub fn to_ascii_url(&self) -> Result<String, url::ParseError> {
        self.to_url().map(String::from)
    }
}

impl fmt::Display for Doi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.suffix)
    }
}
