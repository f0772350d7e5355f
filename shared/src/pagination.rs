//! Page bookkeeping for the infinite-scroll plant grid.
//!
//! Only one page request is outstanding at a time. `page` is the highest page
//! requested so far and never decreases; `loaded_pages` is the highest page
//! whose records have been applied.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Fetch(PageRequest),
    BelowThreshold,
    InFlight { page: u32 },
    NotStarted,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records should replace the list (first page).
    Replace,
    /// Records should be appended.
    Append,
    /// Response for a page that is not in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    page_size: u32,
    loaded_pages: u32,
    in_flight: Option<u32>,
    exhausted: bool,
}

impl Pager {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            loaded_pages: 0,
            in_flight: None,
            exhausted: false,
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub const fn loaded_pages(&self) -> u32 {
        self.loaded_pages
    }

    #[must_use]
    pub const fn in_flight(&self) -> Option<u32> {
        self.in_flight
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// A page beyond the first is being fetched.
    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.in_flight.is_some_and(|p| p > 1)
    }

    /// The last requested page failed and has not been retried yet.
    #[must_use]
    pub const fn has_failed_page(&self) -> bool {
        self.in_flight.is_none() && self.page > self.loaded_pages
    }

    const fn request(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            limit: self.page_size,
        }
    }

    pub fn begin_initial(&mut self) -> PageRequest {
        *self = Self::new(self.page_size);
        self.in_flight = Some(1);
        self.request(1)
    }

    /// Decides what an end-of-list signal should do. Distances below one
    /// (and NaN) mean the list is not near its end yet.
    pub fn load_more(&mut self, distance_from_end: f64) -> LoadMore {
        if distance_from_end.is_nan() || distance_from_end < 1.0 {
            return LoadMore::BelowThreshold;
        }
        if let Some(page) = self.in_flight {
            return LoadMore::InFlight { page };
        }
        if self.loaded_pages == 0 {
            return LoadMore::NotStarted;
        }
        if self.exhausted {
            return LoadMore::Exhausted;
        }

        if !self.has_failed_page() {
            self.page += 1;
        }
        self.in_flight = Some(self.page);
        LoadMore::Fetch(self.request(self.page))
    }

    /// Re-issues the page that failed, if any.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if !self.has_failed_page() {
            return None;
        }
        self.in_flight = Some(self.page);
        Some(self.request(self.page))
    }

    pub fn complete(&mut self, page: u32, received: usize) -> PageOutcome {
        if self.in_flight != Some(page) {
            return PageOutcome::Stale;
        }
        self.in_flight = None;
        self.loaded_pages = page;
        self.exhausted = received < self.page_size as usize;

        if page == 1 {
            PageOutcome::Replace
        } else {
            PageOutcome::Append
        }
    }

    /// Marks the in-flight page as failed. Returns false for stale pages.
    pub fn fail(&mut self, page: u32) -> bool {
        if self.in_flight != Some(page) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn loaded_pager() -> Pager {
        let mut pager = Pager::new(8);
        pager.begin_initial();
        assert_eq!(pager.complete(1, 8), PageOutcome::Replace);
        pager
    }

    #[test]
    fn test_new_pager_starts_at_page_one() {
        let pager = Pager::new(8);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.loaded_pages(), 0);
        assert!(pager.in_flight().is_none());
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(Pager::new(0).page_size(), 1);
    }

    #[test]
    fn test_initial_request() {
        let mut pager = Pager::new(8);
        assert_eq!(pager.begin_initial(), PageRequest { page: 1, limit: 8 });
        assert_eq!(pager.in_flight(), Some(1));
        assert!(!pager.is_loading_more());
    }

    #[test]
    fn test_below_threshold_is_noop() {
        let mut pager = loaded_pager();
        assert_eq!(pager.load_more(0.0), LoadMore::BelowThreshold);
        assert_eq!(pager.load_more(0.99), LoadMore::BelowThreshold);
        assert_eq!(pager.load_more(f64::NAN), LoadMore::BelowThreshold);
        assert_eq!(pager.page(), 1);
        assert!(pager.in_flight().is_none());
    }

    #[test]
    fn test_load_more_increments_by_one() {
        let mut pager = loaded_pager();
        assert_eq!(pager.load_more(1.0), LoadMore::Fetch(PageRequest { page: 2, limit: 8 }));
        assert_eq!(pager.page(), 2);
        assert!(pager.is_loading_more());
    }

    #[test]
    fn test_in_flight_guard() {
        let mut pager = loaded_pager();
        assert_matches!(pager.load_more(5.0), LoadMore::Fetch(_));
        assert_eq!(pager.load_more(5.0), LoadMore::InFlight { page: 2 });
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_load_more_before_first_page() {
        let mut pager = Pager::new(8);
        assert_eq!(pager.load_more(3.0), LoadMore::NotStarted);
        pager.begin_initial();
        assert_eq!(pager.load_more(3.0), LoadMore::InFlight { page: 1 });
    }

    #[test]
    fn test_short_page_exhausts() {
        let mut pager = loaded_pager();
        pager.load_more(1.0);
        assert_eq!(pager.complete(2, 3), PageOutcome::Append);
        assert!(pager.is_exhausted());
        assert_eq!(pager.load_more(1.0), LoadMore::Exhausted);
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_failed_page_is_retried_without_skipping() {
        let mut pager = loaded_pager();
        pager.load_more(1.0);
        assert!(pager.fail(2));
        assert!(pager.has_failed_page());
        assert_eq!(pager.load_more(1.0), LoadMore::Fetch(PageRequest { page: 2, limit: 8 }));
        assert_eq!(pager.page(), 2);
    }

    #[test]
    fn test_retry() {
        let mut pager = loaded_pager();
        assert!(pager.retry().is_none());
        pager.load_more(1.0);
        pager.fail(2);
        assert_eq!(pager.retry(), Some(PageRequest { page: 2, limit: 8 }));
        assert_eq!(pager.in_flight(), Some(2));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut pager = loaded_pager();
        assert_eq!(pager.complete(3, 8), PageOutcome::Stale);
        assert!(!pager.fail(3));
        assert_eq!(pager.loaded_pages(), 1);
    }

    #[test]
    fn test_begin_initial_resets() {
        let mut pager = loaded_pager();
        pager.load_more(1.0);
        pager.complete(2, 1);
        pager.begin_initial();
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.loaded_pages(), 0);
        assert!(!pager.is_exhausted());
    }
}
