//! Request cookies and outgoing response headers.
//!
//! The template functions never touch an HTTP response directly. They append
//! header lines to a [`ResponseHeaders`] list which the host drains into its
//! own response once rendering is done, with [`ResponseHeaders::apply_to`]
//! for `http::HeaderMap` based servers.

use chrono::{DateTime, Utc};
use http::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use std::fmt;

use crate::constants::{LINK_HEADER, SET_COOKIE_HEADER};

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent with same-site requests only
    Strict,
    /// Sent with same-site requests and top-level navigations
    Lax,
    /// Always sent (requires `Secure`)
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("Strict"),
            Self::Lax => f.write_str("Lax"),
            Self::None => f.write_str("None"),
        }
    }
}

/// A cookie to set on the response.
///
/// `Display` renders the `Set-Cookie` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Expiry date, `None` for a session cookie
    pub expires: Option<DateTime<Utc>>,
    /// `Path` attribute
    pub path: Option<String>,
    /// `Domain` attribute
    pub domain: Option<String>,
    /// `Secure` attribute
    pub secure: bool,
    /// `HttpOnly` attribute
    pub http_only: bool,
    /// `SameSite` attribute
    pub same_site: Option<SameSite>,
}

impl SetCookie {
    /// A session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Set the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the `Domain` attribute.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the expiry date.
    #[must_use]
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set the `Secure` attribute.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` attribute.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the `SameSite` attribute.
    #[must_use]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = &self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        Ok(())
    }
}

/// One outgoing header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Header name, as written
    pub name: String,
    /// Header value
    pub value: String,
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Append-only list of outgoing header lines.
///
/// Adding a line never replaces an earlier line with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    lines: Vec<HeaderLine>,
}

impl ResponseHeaders {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header line.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.lines.push(HeaderLine {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Append a `Set-Cookie` line.
    pub fn set_cookie(&mut self, cookie: &SetCookie) {
        self.append(SET_COOKIE_HEADER, cookie.to_string());
    }

    /// All lines, in emission order.
    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    /// Values of every line named `name` (case-insensitive).
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.lines
            .iter()
            .filter(move |line| line.name.eq_ignore_ascii_case(name))
            .map(|line| line.value.as_str())
    }

    /// Values of the `Link` lines.
    pub fn links(&self) -> impl Iterator<Item = &str> + '_ {
        self.get_all(LINK_HEADER)
    }

    /// Values of the `Set-Cookie` lines.
    pub fn cookies(&self) -> impl Iterator<Item = &str> + '_ {
        self.get_all(SET_COOKIE_HEADER)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line was emitted.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Move the lines of `other` at the end of this list.
    pub fn extend(&mut self, other: ResponseHeaders) {
        self.lines.extend(other.lines);
    }

    /// Append every line to `headers`, keeping existing values.
    ///
    /// Nothing is appended if any line is not a valid header.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<(), http::Error> {
        let converted = self
            .lines
            .iter()
            .map(|line| -> Result<(HeaderName, HeaderValue), http::Error> {
                let name = HeaderName::from_bytes(line.name.as_bytes())?;
                let value = HeaderValue::from_str(&line.value)?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (name, value) in converted {
            headers.append(name, value);
        }
        Ok(())
    }
}

/// Cookies sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    pairs: Vec<(String, String)>,
}

impl RequestCookies {
    /// Parse one `Cookie` header value (`a=1; b=2`).
    ///
    /// Malformed pairs (no `=`) are skipped.
    pub fn parse(header: &str) -> Self {
        let mut cookies = Self::default();
        cookies.add_header(header);
        cookies
    }

    /// Collect every `Cookie` header of a request.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = Self::default();
        for value in headers.get_all(COOKIE) {
            match value.to_str() {
                Ok(header) => cookies.add_header(header),
                Err(_) => tracing::debug!("Ignoring non-ASCII Cookie header"),
            }
        }
        cookies
    }

    fn add_header(&mut self, header: &str) {
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.pairs.push((name.to_string(), value.trim().trim_matches('"').to_string()));
        }
    }

    /// Value of the first cookie named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// All `(name, value)` pairs, in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no cookie was sent.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
