use std::collections::HashMap;

use jiff::{civil::Date, tz::TimeZone};

use crate::{
    error::{AppError, AppResult},
    models::{TopMovie, TopQuery},
    store::MovieStore,
};

const DATE_REQUIRED: &str = "This field is required.";
const DATE_FORMAT: &str = "Date has wrong format. Use YYYY-MM-DD.";

/// Ranks every stored movie by the number of comments it received between
/// `date_from` and `date_to`, both inclusive, in UTC.
pub async fn top_movies(store: &MovieStore, query: TopQuery) -> AppResult<Vec<TopMovie>> {
    let from = parse_date("date_from", query.date_from)?;
    let to = parse_date("date_to", query.date_to)?;
    if from > to {
        return Err(AppError::validation("date_to", "date_to must not precede date_from."));
    }

    let from_sec = from.to_zoned(TimeZone::UTC)?.timestamp().as_second();
    let until_sec = to.tomorrow()?.to_zoned(TimeZone::UTC)?.timestamp().as_second();

    let movie_ids = store.movie_ids().await?;
    let counts = store.comment_counts(from_sec, until_sec).await?;
    Ok(rank(&movie_ids, &counts))
}

fn parse_date(field: &'static str, raw: Option<String>) -> AppResult<Date> {
    let raw = raw.filter(|s| !s.trim().is_empty());
    let Some(raw) = raw else {
        return Err(AppError::validation(field, DATE_REQUIRED));
    };
    raw.trim().parse().map_err(|_| AppError::validation(field, DATE_FORMAT))
}

/// Dense ranking by comment count, highest first. Ties share a rank and are
/// ordered by movie id. Counts for ids not in `movie_ids` are ignored.
pub fn rank(movie_ids: &[i32], counts: &[(i32, i64)]) -> Vec<TopMovie> {
    let mut totals: HashMap<i32, u64> = movie_ids.iter().map(|&id| (id, 0)).collect();
    for &(id, count) in counts {
        if let Some(total) = totals.get_mut(&id) {
            *total = u64::try_from(count).unwrap_or(0);
        }
    }

    let mut sorted: Vec<(i32, u64)> = totals.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut out = Vec::with_capacity(sorted.len());
    let mut rank = 0;
    let mut previous = None;
    for (movie_id, total_comments) in sorted {
        if previous != Some(total_comments) {
            rank += 1;
            previous = Some(total_comments);
        }
        out.push(TopMovie { movie_id, total_comments, rank });
    }
    out
}
