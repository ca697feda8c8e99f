//! Page-range text extraction.
//!
//! Walks an inclusive 1-indexed page range, joins each page's text
//! fragments with single spaces, and reports fractional progress after
//! every page. Extraction is sequential, so latency scales linearly with
//! page count; a [`CancelToken`] checked between page iterations is the
//! only interruption point.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pdf::PdfSource;
use crate::status::StatusSink;

/// An inclusive, 1-indexed span of document pages.
///
/// The invariant `1 <= start <= end` is restored on construction by
/// pulling the violating bound to match the other, mirroring how the two
/// range inputs self-correct against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Build a range, self-correcting `start > end` and zero bounds.
    pub fn new(start: u32, end: u32) -> Self {
        let start = start.max(1);
        let end = end.max(1);
        if start > end {
            // Pull start back to end, as when the start input overshoots.
            Self { start: end, end }
        } else {
            Self { start, end }
        }
    }

    /// The full range of a document with `total_pages` pages.
    pub fn full(total_pages: u32) -> Self {
        Self::new(1, total_pages.max(1))
    }

    /// Parse `"N"` or `"A-B"` into a range.
    pub fn parse(s: &str) -> Result<Self> {
        let parse_bound = |b: &str| {
            b.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidPageRange(s.to_string()))
        };

        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (parse_bound(a)?, parse_bound(b)?),
            None => {
                let page = parse_bound(s)?;
                (page, page)
            }
        };
        if start == 0 || end == 0 {
            return Err(Error::InvalidPageRange(s.to_string()));
        }
        Ok(Self::new(start, end))
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages covered; at least 1 by the range invariant, so
    /// there is no `is_empty` counterpart.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Clamp both bounds into `[1, total_pages]`, re-correcting order.
    pub fn clamped_to(&self, total_pages: u32) -> Self {
        let total = total_pages.max(1);
        Self::new(self.start.min(total), self.end.min(total))
    }

    /// Iterate the covered pages in ascending order.
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Shared flag for cancelling an in-flight extraction.
///
/// Clones observe the same flag; cancellation is checked between page
/// iterations, never mid-page.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Extract the text of `range` from `source` into one string.
///
/// Fragments within a page are joined with a single space and every page
/// contributes a single trailing space. After each page, progress is
/// reported as `(page - start + 1) / (end - start + 1) * 100`.
///
/// Fails with [`Error::NoText`] when the combined text is empty or
/// whitespace-only; the partial accumulator is discarded on every failure
/// path, so callers never observe partial results.
pub fn extract_range(
    source: &dyn PdfSource,
    range: PageRange,
    sink: &dyn StatusSink,
    cancel: &CancelToken,
) -> Result<String> {
    if range.end() > source.page_count() {
        return Err(Error::PageOutOfRange(range.end(), source.page_count()));
    }

    let mut text = String::new();
    let total = range.len() as f32;

    for page in range.pages() {
        if cancel.is_cancelled() {
            log::debug!("extraction cancelled before page {}", page);
            return Err(Error::Cancelled);
        }

        let fragments = source.page_fragments(page)?;
        text.push_str(&fragments.join(" "));
        text.push(' ');

        let done = (page - range.start() + 1) as f32;
        let percent = done / total * 100.0;
        sink.progress(percent, &format!("Extracting text from page {}...", page));
    }

    if text.trim().is_empty() {
        return Err(Error::NoText);
    }

    Ok(text)
}
