//! Shareable links and navigation history.
//!
//! The last successful search is mirrored into the `dish` query parameter of
//! the page URL so that a link such as
//! `https://ocra.app/?dish=Spaghetti%20Carbonara` reopens the same search.
//! Values are written with `encodeURIComponent`-style percent encoding and
//! read back with form-urlencoded decoding, so both `%20` and `+` decode to a
//! space.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::{Url, form_urlencoded};

use crate::error::AppError;

/// Query parameter holding the shared dish name.
pub const DISH_PARAM: &str = "dish";

/// Characters left as-is by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Percent-decodes a query component. Invalid UTF-8 is replaced lossily.
pub fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Parses a page URL.
pub fn parse_url(raw: &str) -> Result<Url, AppError> {
    Url::parse(raw).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Returns the decoded `dish` parameter, if present.
pub fn dish_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == DISH_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Returns a copy of `url` with the `dish` parameter set to `dish`.
///
/// Other parameters are kept as written, in their original order.
pub fn with_dish_param(url: &Url, dish: &str) -> Url {
    let dish_segment = format!("{}={}", DISH_PARAM, encode_component(dish));
    let mut segments = other_segments(url);
    segments.push(&dish_segment);
    with_segments(url, &segments)
}

/// Returns a copy of `url` without the `dish` parameter.
///
/// A URL that has no `dish` parameter is returned unchanged.
pub fn without_dish_param(url: &Url) -> Url {
    if dish_param(url).is_none() {
        return url.clone();
    }
    with_segments(url, &other_segments(url))
}

/// Raw `key=value` segments of the query whose key is not `dish`.
fn other_segments(url: &Url) -> Vec<&str> {
    url.query()
        .map(|query| {
            query
                .split('&')
                .filter(|segment| !segment.is_empty() && !is_dish_segment(segment))
                .collect()
        })
        .unwrap_or_default()
}

fn is_dish_segment(segment: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes()).any(|(key, _)| key == DISH_PARAM)
}

fn with_segments(url: &Url, segments: &[&str]) -> Url {
    let mut next = url.clone();
    if segments.is_empty() {
        next.set_query(None);
    } else {
        next.set_query(Some(&segments.join("&")));
    }
    next
}

/// Linear browsing history with a cursor, like a browser tab.
///
/// Pushing while the cursor is not at the end drops the forward entries.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: Vec<Url>,
    cursor: usize,
}

impl NavigationHistory {
    /// Starts a history whose only entry is `start`.
    pub fn new(start: Url) -> Self {
        Self {
            entries: vec![start],
            cursor: 0,
        }
    }

    /// Returns the URL at the cursor.
    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    /// Pushes a new entry and moves the cursor onto it.
    pub fn push(&mut self, url: Url) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor = self.entries.len() - 1;
    }

    /// Pushes `url` only if it differs from the current entry.
    ///
    /// Returns true if an entry was added.
    pub fn push_if_changed(&mut self, url: Url) -> bool {
        if *self.current() == url {
            false
        } else {
            self.push(url);
            true
        }
    }

    /// Moves one entry back. Returns the new current URL, or `None` at the
    /// start of history.
    pub fn back(&mut self) -> Option<&Url> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Moves one entry forward. Returns the new current URL, or `None` at the
    /// end of history.
    pub fn forward(&mut self) -> Option<&Url> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
