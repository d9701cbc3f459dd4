use std::borrow::Cow;
use std::str::FromStr;

use crate::derivation::Classified;
use crate::dto::job_dto::JobCriteria;
use crate::error::Error;
use crate::models::Job;

/// Class selector of a list screen. `All` is the identity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter<C> {
    #[default]
    All,
    Only(C),
}

impl<C: PartialEq> ActiveFilter<C> {
    pub fn admits(&self, class: Option<&C>) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Only(wanted) => class == Some(wanted),
        }
    }
}

impl<C> FromStr for ActiveFilter<C>
where
    C: FromStr<Err = Error>,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(ActiveFilter::All);
        }
        s.parse().map(ActiveFilter::Only)
    }
}

/// Elements whose class matches `filter`.
///
/// `All` hands back the input slice itself, so repeated calls with unchanged
/// input return the same borrow.
pub fn filter_by_class<T>(items: &[T], filter: ActiveFilter<T::Class>) -> Cow<'_, [T]>
where
    T: Classified + Clone,
{
    match filter {
        ActiveFilter::All => Cow::Borrowed(items),
        ActiveFilter::Only(_) => Cow::Owned(
            items
                .iter()
                .filter(|item| filter.admits(item.class().as_ref()))
                .cloned()
                .collect(),
        ),
    }
}

pub fn matches_criteria(job: &Job, criteria: &JobCriteria) -> bool {
    if let Some(location) = criteria.location() {
        if job.location.as_deref() != Some(location) {
            return false;
        }
    }
    if let Some(company_id) = criteria.company_id() {
        if job.company_id != Some(company_id) {
            return false;
        }
    }
    if let Some(query) = criteria.search_query() {
        let query = query.to_lowercase();
        if !job.title.to_lowercase().contains(&query) {
            return false;
        }
    }
    true
}

/// Jobs matching every non-blank criterion. Unconstrained criteria borrow the input.
pub fn filter_jobs<'a>(jobs: &'a [Job], criteria: &JobCriteria) -> Cow<'a, [Job]> {
    if criteria.is_unconstrained() {
        return Cow::Borrowed(jobs);
    }
    Cow::Owned(
        jobs.iter()
            .filter(|job| matches_criteria(job, criteria))
            .cloned()
            .collect(),
    )
}
