//! Forgiving parsing for URL-like address strings.
//!
//! [`parse`] accepts the loose address shapes people write in config files
//! and CLI flags and that a strict URL grammar rejects or misreads:
//!
//! ```text
//! input                 | scheme | host            | path
//! ----------------------------------------------------------
//! net://example/simple  | net    | example         | /simple
//! example.com:443/about |        | example.com:443 | /about
//! :443                  |        | :443            |
//! example.com           |        | example.com     |
//! [fd::1]:53            |        | [fd::1]:53      |
//! ```
//!
//! The strict parser is available as [`url::URL::parse`] for comparison.

pub mod errors;
pub mod lax;
pub mod url;

use std::borrow::Cow;

use errors::Error;

pub use lax::{merge, parse, Parser, DEFAULT_SENTINEL};
pub use url::URL;

pub type Result<T> = std::result::Result<T, Error>;

static UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

#[derive(PartialEq, Clone, Copy, Debug)]
enum Encoding {
    Path,
    PathSegment,
    Host,
    Zone,
    UserPassword,
    QueryComponent,
    Fragment,
}

/// Undoes `%AB` escapes and turns `+` into space, for query components.
pub fn query_unescape(s: &str) -> Result<Cow<'_, str>> {
    unescape(s, Encoding::QueryComponent)
}

/// Undoes `%AB` escapes; `+` is left alone, for path segments.
pub fn path_unescape(s: &str) -> Result<Cow<'_, str>> {
    unescape(s, Encoding::PathSegment)
}

/// Escapes `s` so it can be placed inside a query component.
pub fn query_escape(s: &str) -> Cow<'_, str> {
    escape(s, Encoding::QueryComponent)
}

/// Escapes `s` so it can be placed inside a path segment.
pub fn path_escape(s: &str) -> Cow<'_, str> {
    escape(s, Encoding::PathSegment)
}

fn ishex(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

fn unhex(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

// RFC 3986 §2; which reserved characters stay verbatim depends on where
// in the URL the byte sits.
fn should_escape(c: u8, mode: Encoding) -> bool {
    if c.is_ascii_alphanumeric() {
        return false;
    }

    if matches!(mode, Encoding::Host | Encoding::Zone) {
        // §3.2.2 allows sub-delims in the host. We additionally keep
        // [ ] : for IP literals and ports, and < > " as found in the wild.
        if matches!(
            c,
            b'!' | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'['
                | b']'
                | b'<'
                | b'>'
                | b'"'
        ) {
            return false;
        }
    }

    match c {
        // §2.3 unreserved characters
        b'-' | b'_' | b'.' | b'~' => false,

        // §2.2 reserved characters; a few are allowed unescaped
        // depending on the component.
        b'$' | b'&' | b'+' | b',' | b'/' | b':' | b';' | b'=' | b'?' | b'@' => match mode {
            // §3.3: the grammar allows : @ & = + $ in a path. Since the
            // path is only handled as a whole here, / ; , pass too,
            // leaving only ? to escape.
            Encoding::Path => c == b'?',

            // §3.3: / ; , separate individual segments and must be escaped.
            Encoding::PathSegment => matches!(c, b'/' | b';' | b',' | b'?'),

            // §3.2.1: @ / ? never appear in userinfo, and : separates
            // the username from the password.
            Encoding::UserPassword => matches!(c, b'@' | b'/' | b'?' | b':'),

            // §3.4 reserves everything.
            Encoding::QueryComponent => true,

            // §4.1: the grammar allows everything.
            Encoding::Fragment => false,

            _ => true,
        },

        _ => !(mode == Encoding::Fragment && matches!(c, b'!' | b'(' | b')' | b'*')),
    }
}

fn unescape(s: &str, mode: Encoding) -> Result<Cow<'_, str>> {
    let bytes = s.as_bytes();
    let mut escapes = 0;
    let mut has_plus = false;

    // Validate first so the rewrite below cannot fail.
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                escapes += 1;
                if i + 2 >= bytes.len() || !ishex(bytes[i + 1]) || !ishex(bytes[i + 2]) {
                    let end = bytes.len().min(i + 3);
                    return Err(Error::InvalidEscape(lossy(&bytes[i..end])));
                }
                if mode == Encoding::Host && unhex(bytes[i + 1]) < 8 && &bytes[i..i + 3] != b"%25"
                {
                    // Escaped ASCII bytes are not meaningful in a host,
                    // except %25 for a zone separator.
                    return Err(Error::InvalidEscape(lossy(&bytes[i..i + 3])));
                }
                if mode == Encoding::Zone {
                    // RFC 6874: only %25 and escaped spaces (Windows zone
                    // ids) plus whatever a host would accept.
                    let v = unhex(bytes[i + 1]) << 4 | unhex(bytes[i + 2]);
                    if &bytes[i..i + 3] != b"%25" && v != b' ' && should_escape(v, Encoding::Host)
                    {
                        return Err(Error::InvalidEscape(lossy(&bytes[i..i + 3])));
                    }
                }
                i += 3;
            }
            b'+' => {
                has_plus = mode == Encoding::QueryComponent;
                i += 1;
            }
            c => {
                if (mode == Encoding::Host || mode == Encoding::Zone)
                    && c < 0x80
                    && should_escape(c, mode)
                {
                    return Err(Error::InvalidHost(lossy(&bytes[i..i + 1])));
                }
                i += 1;
            }
        }
    }

    if escapes == 0 && !has_plus {
        return Ok(Cow::Borrowed(s));
    }

    let mut t = Vec::with_capacity(bytes.len() - 2 * escapes);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                t.push(unhex(bytes[i + 1]) << 4 | unhex(bytes[i + 2]));
                i += 3;
            }
            b'+' => {
                t.push(if mode == Encoding::QueryComponent {
                    b' '
                } else {
                    b'+'
                });
                i += 1;
            }
            c => {
                t.push(c);
                i += 1;
            }
        }
    }
    Ok(Cow::Owned(lossy(&t)))
}

fn escape(s: &str, mode: Encoding) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let (mut spaces, mut hex) = (0, 0);
    for &c in bytes {
        if should_escape(c, mode) {
            if c == b' ' && mode == Encoding::QueryComponent {
                spaces += 1;
            } else {
                hex += 1;
            }
        }
    }

    if spaces == 0 && hex == 0 {
        return Cow::Borrowed(s);
    }
    if hex == 0 {
        return Cow::Owned(s.replace(' ', "+"));
    }

    let mut t = String::with_capacity(s.len() + 2 * hex);
    for &c in bytes {
        if c == b' ' && mode == Encoding::QueryComponent {
            t.push('+');
        } else if should_escape(c, mode) {
            t.push('%');
            t.push(UPPER_HEX[(c >> 4) as usize] as char);
            t.push(UPPER_HEX[(c & 0xf) as usize] as char);
        } else {
            t.push(c as char);
        }
    }
    Cow::Owned(t)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
