//! Observable review state for UI layers.
//!
//! # Design
//! `ReviewsState` wraps the use cases and publishes a `ReviewsSnapshot`
//! through a `tokio::sync::watch` channel after every change. Each action
//! runs at most once at a time: a call that arrives while the same action is
//! in flight returns immediately instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::types::{AddReview, Review};
use crate::use_case::{Outcome, ReviewUses};

/// Everything a view needs to render the review list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewsSnapshot {
    /// Newest first.
    pub reviews: Vec<Review>,
    pub total_count: f64,
    pub loading: bool,
    pub adding: bool,
    pub error: Option<String>,
}

pub struct ReviewsState {
    uses: ReviewUses,
    snapshot: watch::Sender<ReviewsSnapshot>,
    loading: AtomicBool,
    adding: AtomicBool,
}

impl ReviewsState {
    pub fn new(uses: ReviewUses) -> Self {
        let (snapshot, _) = watch::channel(ReviewsSnapshot::default());
        Self {
            uses,
            snapshot,
            loading: AtomicBool::new(false),
            adding: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReviewsSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> ReviewsSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Reload the list. On failure the list is emptied and `error` set.
    pub async fn fetch_reviews(&self) {
        let Some(_in_flight) =
            InFlight::acquire(&self.loading, &self.snapshot, |s, on| s.loading = on)
        else {
            debug!("fetch already in flight");
            return;
        };
        match self.uses.list_reviews().await {
            Outcome::Success(list) => self.snapshot.send_modify(|s| {
                s.reviews = list.reviews;
                s.total_count = list.total_count;
            }),
            Outcome::Failure { errors } => self.snapshot.send_modify(|s| {
                s.error = Some(errors.join("; "));
                s.reviews.clear();
                s.total_count = 0.0;
            }),
        }
    }

    /// Submit a review and put it at the head of the list. On failure the
    /// list is left untouched and `error` set.
    pub async fn add_review(&self, input: AddReview) {
        let Some(_in_flight) =
            InFlight::acquire(&self.adding, &self.snapshot, |s, on| s.adding = on)
        else {
            debug!("add already in flight");
            return;
        };
        match self.uses.add_review(input).await {
            Outcome::Success(review) => self.snapshot.send_modify(|s| {
                s.reviews.insert(0, review);
                s.total_count = (s.total_count + 1.0).max(s.reviews.len() as f64);
            }),
            Outcome::Failure { errors } => self.snapshot.send_modify(|s| {
                s.error = Some(errors.join("; "));
            }),
        }
    }
}

/// Holds one action's busy flag; clears it on drop, including when the
/// action's future is dropped before completing.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    snapshot: &'a watch::Sender<ReviewsSnapshot>,
    mark: fn(&mut ReviewsSnapshot, bool),
}

impl<'a> InFlight<'a> {
    fn acquire(
        flag: &'a AtomicBool,
        snapshot: &'a watch::Sender<ReviewsSnapshot>,
        mark: fn(&mut ReviewsSnapshot, bool),
    ) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        snapshot.send_modify(|s| {
            mark(s, true);
            s.error = None;
        });
        Some(Self { flag, snapshot, mark })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.snapshot.send_modify(|s| (self.mark)(s, false));
        self.flag.store(false, Ordering::Release);
    }
}
