//! Demo reviews for the fake backend.

use chrono::{TimeZone, Utc};

use crate::types::Review;

/// Five sample reviews, newest first.
pub fn seed_reviews() -> Vec<Review> {
    [
        (
            "r_1",
            5.0,
            "Excellent Product!",
            "Really loved this, highly recommend. The quality exceeded my expectations.",
            (15, 10, 30),
        ),
        (
            "r_2",
            4.0,
            "Pretty good",
            "Works as expected with only minor issues. Would buy again.",
            (14, 15, 20),
        ),
        (
            "r_3",
            3.0,
            "It's okay",
            "Average product. Does the job but nothing special.",
            (13, 9, 15),
        ),
        (
            "r_4",
            5.0,
            "Amazing!",
            "Best purchase I've made this year. Highly recommended to everyone!",
            (12, 14, 45),
        ),
        (
            "r_5",
            2.0,
            "Not great",
            "Disappointed with the quality. Expected better for the price.",
            (11, 11, 0),
        ),
    ]
    .into_iter()
    .filter_map(|(id, rating, title, comment, (day, hour, min))| {
        let created_at = Utc.with_ymd_and_hms(2025, 10, day, hour, min, 0).single()?;
        Some(Review {
            id: id.to_string(),
            rating,
            title: title.to_string(),
            comment: comment.to_string(),
            created_at,
        })
    })
    .collect()
}
