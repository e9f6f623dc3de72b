use serde::{Deserialize, Serialize};

use crate::entities::wire;
use crate::error::{invalid_input_error, Error};
use crate::listing::Searchable;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(deserialize_with = "wire::integer")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::optional_integer")]
    pub user_id: Option<i64>,
    #[serde(deserialize_with = "wire::integer")]
    pub rating: i64,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub comments: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub rating: i64,
    pub comments: String,
}

impl FeedbackForm {
    pub fn validate(&self) -> Result<(), Error> {
        if !(1..=5).contains(&self.rating) {
            return Err(invalid_input_error().with_message("rating must be between 1 and 5"));
        }
        if self.comments.trim().is_empty() {
            return Err(invalid_input_error().with_message("comments are required"));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedbackSummary {
    pub total: usize,
    /// Mean rating rounded to one decimal, zero when there are no reviews.
    pub average: f64,
    /// Review count per star, index 0 holding one-star reviews.
    pub counts: [usize; 5],
}

impl FeedbackSummary {
    pub fn from_feedbacks(feedbacks: &[Feedback]) -> Self {
        let mut counts = [0; 5];
        let mut sum = 0;

        for feedback in feedbacks {
            sum += feedback.rating;
            if let Some(slot) = usize::try_from(feedback.rating - 1)
                .ok()
                .and_then(|i| counts.get_mut(i))
            {
                *slot += 1;
            }
        }

        let total = feedbacks.len();
        let average = match total {
            0 => 0.0,
            n => (sum as f64 / n as f64 * 10.0).round() / 10.0,
        };

        Self {
            total,
            average,
            counts,
        }
    }
}

impl Searchable for Feedback {
    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("rating", self.rating.to_string()),
            ("comments", self.comments.clone()),
            (
                "user_id",
                self.user_id.map(|id| id.to_string()).unwrap_or_default(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(id: i64, rating: i64) -> Feedback {
        Feedback {
            id,
            user_id: None,
            rating,
            comments: "ok".into(),
        }
    }

    #[test]
    fn summary_counts_and_average() {
        let summary =
            FeedbackSummary::from_feedbacks(&[feedback(1, 5), feedback(2, 4), feedback(3, 4)]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.average, 4.3);
        assert_eq!(summary.counts, [0, 0, 0, 2, 1]);
    }

    #[test]
    fn empty_summary() {
        let summary = FeedbackSummary::from_feedbacks(&[]);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.counts, [0; 5]);
    }

    #[test]
    fn form_validation() {
        let mut form = FeedbackForm {
            user_id: Some(1),
            rating: 0,
            comments: "great walk".into(),
        };
        assert!(form.validate().is_err());

        form.rating = 5;
        assert!(form.validate().is_ok());

        form.comments = "  ".into();
        assert!(form.validate().is_err());
    }
}
