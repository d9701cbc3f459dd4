//! Pure derived views over fetched collections: grouped counts and filters.
//!
//! Nothing here performs I/O or mutates its input. An absent collection is
//! treated as empty.

pub mod counts;
pub mod filter;

use std::fmt::Debug;
use std::hash::Hash;

use crate::models::{Application, ApplicationStatus, Job, JobState};

pub use counts::{group_counts, GroupCounts};
pub use filter::{filter_by_class, filter_jobs, matches_criteria, ActiveFilter};

/// Elements that fall into one of a closed set of classes.
pub trait Classified {
    type Class: Copy + Ord + Hash + Debug + 'static;

    /// Every class, in display order.
    const CLASSES: &'static [Self::Class];

    /// `None` when the element's field is unset.
    fn class(&self) -> Option<Self::Class>;
}

impl Classified for Application {
    type Class = ApplicationStatus;
    const CLASSES: &'static [ApplicationStatus] = &ApplicationStatus::ALL;

    fn class(&self) -> Option<ApplicationStatus> {
        Some(self.status)
    }
}

impl Classified for Job {
    type Class = JobState;
    const CLASSES: &'static [JobState] = &JobState::ALL;

    fn class(&self) -> Option<JobState> {
        Some(self.state())
    }
}

pub fn or_empty<T>(items: Option<&[T]>) -> &[T] {
    items.unwrap_or(&[])
}
