//! Run state definitions for the listing walk
//!
//! A run starts at page 1 and moves forward one page at a time until one of the
//! stop conditions in [`StopReason`] is reached.

use std::fmt;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The listing page held no post summaries
    Exhausted { page: u32 },

    /// The listing page could not be fetched
    ListingFetchFailed { page: u32 },

    /// The configured page limit was walked in full
    PageLimitReached { max_pages: u32 },
}

impl StopReason {
    /// Returns true if the run ended because the listing had no more posts
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Returns true if the run was cut short by a listing fetch failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ListingFetchFailed { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { page } => write!(f, "no more posts at page {}", page),
            Self::ListingFetchFailed { page } => {
                write!(f, "listing fetch failed at page {}", page)
            }
            Self::PageLimitReached { max_pages } => {
                write!(f, "page limit of {} reached", max_pages)
            }
        }
    }
}

/// Current state of the driver loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Walking; `page` is the next listing page to request
    Running { page: u32 },

    /// Terminal
    Stopped(StopReason),
}

impl RunState {
    /// The state every run starts in
    pub fn initial() -> Self {
        Self::Running { page: 1 }
    }

    /// Computes the state following a walked page
    ///
    /// `stop` is `None` when the page walker asked to continue.
    pub fn advance(self, stop: Option<StopReason>, max_pages: u32) -> Self {
        match (self, stop) {
            (Self::Running { page }, None) => {
                let next = page.saturating_add(1);
                if next > max_pages {
                    Self::Stopped(StopReason::PageLimitReached { max_pages })
                } else {
                    Self::Running { page: next }
                }
            }
            (Self::Running { .. }, Some(reason)) => Self::Stopped(reason),
            (stopped, _) => stopped,
        }
    }
}
