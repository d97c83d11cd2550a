//! The forgiving front of the crate.
//!
//! The strict grammar misreads the address shapes this module exists
//! for: `example.com:443/about` parses as scheme `example.com` with an
//! opaque remainder, `:443` is a missing-scheme error, and `[fd::1]:53`
//! never becomes a host because there is no `//` authority marker.
//!
//! Rather than a second grammar, [`parse`] nudges such inputs into a
//! parseable shape first and repairs the result afterwards. Inputs that
//! the strict parser would reject outright (a leading `:` or `[`) get a
//! sentinel scheme injected up front; after the strict parse, a missing
//! host is recovered from whichever component the remainder landed in,
//! and the sentinel is stripped back out.

use std::borrow::Cow;

use crate::url::URL;
use crate::Result;

/// The sentinel scheme injected in front of ambiguous input.
///
/// It goes away if the input uses it as its scheme or host prefix, which
/// is why [`Parser::with_sentinel`] exists: pick another token if your
/// input corpus could plausibly contain this one.
pub const DEFAULT_SENTINEL: &str = "magicemphasisleader";

/// Parses a lax URL-like string using [`DEFAULT_SENTINEL`].
///
/// ```
/// let u = laxurl::parse("example.com:443/about").unwrap();
/// assert_eq!(u.scheme(), "");
/// assert_eq!(u.host(), "example.com:443");
/// assert_eq!(u.path(), "/about");
/// ```
///
/// Errors are whatever the strict parser reports for the adjusted
/// input; this layer adds no failure modes of its own.
pub fn parse(rawurl: &str) -> Result<URL> {
    Parser::default().parse(rawurl)
}

/// Copies `base` and overwrites each component with the corresponding
/// component of `patch` whenever the patch's value is non-empty.
///
/// Components overlay independently; overwriting the host does not
/// touch the path. Neither input is mutated.
pub fn merge(base: &URL, patch: &URL) -> URL {
    let mut result = base.clone();
    if !patch.scheme.is_empty() {
        result.scheme = patch.scheme.clone();
    }
    if !patch.host.is_empty() {
        result.host = patch.host.clone();
    }
    if !patch.path.is_empty() {
        result.path = patch.path.clone();
    }
    if !patch.raw_query.is_empty() {
        result.raw_query = patch.raw_query.clone();
    }
    if !patch.fragment.is_empty() {
        result.fragment = patch.fragment.clone();
    }
    result
}

/// A lax parser with a configurable sentinel token.
#[derive(Debug, Clone)]
pub struct Parser {
    sentinel: String,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::with_sentinel(DEFAULT_SENTINEL)
    }
}

impl Parser {
    pub fn with_sentinel(sentinel: impl Into<String>) -> Parser {
        Parser {
            sentinel: sentinel.into(),
        }
    }

    pub fn parse(&self, rawurl: &str) -> Result<URL> {
        let adjusted = self.preprocess(rawurl);
        let url = URL::parse(&adjusted)?;
        Ok(self.postprocess(url))
    }

    // Rewrites the two shapes the strict grammar cannot take as-is.
    // Never fails; anything else passes through for the strict parser
    // to accept or reject on its own terms.
    fn preprocess<'a>(&self, rawurl: &'a str) -> Cow<'a, str> {
        if rawurl.starts_with(':') {
            // Bare port. The sentinel becomes the scheme and the rest
            // lands in the opaque component, recovered below.
            return Cow::Owned(format!("{}{}", self.sentinel, rawurl));
        }

        if rawurl.starts_with('[') {
            if let Some(close) = rawurl.find(']') {
                // A leading bracketed IPv6 literal with no scheme, as
                // long as no slash cuts in before the closing bracket:
                //   close | slash | inject
                //       2 |  none | yes
                //       2 |     3 | yes
                //       2 |     1 | no
                let inject = match rawurl.find('/') {
                    None => true,
                    Some(slash) => slash > close,
                };
                if inject {
                    return Cow::Owned(format!("{}://{}", self.sentinel, rawurl));
                }
            }
        }

        Cow::Borrowed(rawurl)
    }

    // Recovers a missing host from wherever the strict parser put the
    // unrecognized remainder, then strips the sentinel back out.
    fn postprocess(&self, mut url: URL) -> URL {
        if url.host.is_empty() {
            if !url.opaque.is_empty() {
                // scheme:remainder form. The part before the first slash
                // is really "host" written as "scheme:port-or-host".
                let opaque = std::mem::take(&mut url.opaque);
                let mut parts = opaque.splitn(2, '/');
                let head = parts.next().unwrap_or("");
                url.host = format!("{}:{}", url.scheme, head);
                url.scheme = String::new();
                if let Some(rest) = parts.next() {
                    url.path = format!("/{}", rest);
                }
            } else {
                // No opaque component either; the first path segment is
                // the host.
                let path = std::mem::take(&mut url.path);
                let mut parts = path.splitn(2, '/');
                url.host = parts.next().unwrap_or("").to_string();
                url.path = match parts.next() {
                    Some(rest) => format!("/{}", rest),
                    None => String::new(),
                };
            }
        }

        if url.scheme == self.sentinel {
            url.scheme = String::new();
        }
        if url.host.starts_with(self.sentinel.as_str()) {
            url.host.drain(..self.sentinel.len());
        }

        url
    }
}
