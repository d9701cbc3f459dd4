//! Per-screen listing state: active filters coupled to a paginator.
//!
//! Any filter change moves the paginator back to page 1 before the next view
//! is computed, so a page number from a larger result set is never applied to
//! a smaller one.

use serde::Serialize;
use std::num::NonZeroUsize;

use crate::derivation::{
    filter_by_class, filter_jobs, group_counts, or_empty, ActiveFilter, Classified, GroupCounts,
};
use crate::dto::job_dto::JobCriteria;
use crate::models::{Job, JobState};
use crate::pagination::{Page, Paginator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView<T, C: Ord> {
    pub page: Page<T>,
    /// Per-class counts over the whole fetched collection.
    pub counts: GroupCounts<C>,
}

#[derive(Debug, Clone)]
pub struct Listing<T: Classified> {
    filter: ActiveFilter<T::Class>,
    paginator: Paginator,
}

impl<T: Classified + Clone> Listing<T> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            filter: ActiveFilter::All,
            paginator: Paginator::new(page_size),
        }
    }

    pub fn filter(&self) -> ActiveFilter<T::Class> {
        self.filter
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    /// Returns whether the filter changed (and the page was reset).
    pub fn set_filter(&mut self, filter: ActiveFilter<T::Class>) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        self.paginator.reset();
        true
    }

    pub fn set_page(&mut self, page: usize, items: Option<&[T]>) -> usize {
        let len = filter_by_class(or_empty(items), self.filter).len();
        self.paginator.set_page(page, len)
    }

    pub fn reset_page(&mut self) {
        self.paginator.reset();
    }

    pub fn view(&self, items: Option<&[T]>) -> ListingView<T, T::Class> {
        let filtered = filter_by_class(or_empty(items), self.filter);
        ListingView {
            page: self.paginator.page(&filtered),
            counts: group_counts(items),
        }
    }
}

/// Job list screen: search criteria, open/closed selector and page.
#[derive(Debug, Clone)]
pub struct JobListing {
    criteria: JobCriteria,
    listing: Listing<Job>,
}

impl JobListing {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            criteria: JobCriteria::default(),
            listing: Listing::new(page_size),
        }
    }

    pub fn criteria(&self) -> &JobCriteria {
        &self.criteria
    }

    pub fn current_page(&self) -> usize {
        self.listing.current_page()
    }

    /// Returns whether the criteria changed (and the page was reset).
    pub fn set_criteria(&mut self, criteria: JobCriteria) -> bool {
        if self.criteria == criteria {
            return false;
        }
        self.criteria = criteria;
        self.listing.reset_page();
        true
    }

    pub fn clear_criteria(&mut self) -> bool {
        self.set_criteria(JobCriteria::default())
    }

    pub fn set_state_filter(&mut self, filter: ActiveFilter<JobState>) -> bool {
        self.listing.set_filter(filter)
    }

    pub fn set_page(&mut self, page: usize, jobs: Option<&[Job]>) -> usize {
        let matching = filter_jobs(or_empty(jobs), &self.criteria);
        self.listing.set_page(page, Some(&matching))
    }

    pub fn view(&self, jobs: Option<&[Job]>) -> ListingView<Job, JobState> {
        let matching = filter_jobs(or_empty(jobs), &self.criteria);
        ListingView {
            counts: group_counts(jobs),
            ..self.listing.view(Some(&matching))
        }
    }
}
