use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{CreateMovieRequest, MovieDetail},
    omdb::OmdbClient,
    store::{MovieStore, StoredMovie},
};

pub const INVALID_REQUEST: &str = "Invalid request data.";
pub const INVALID_TITLE: &str = "Invalid title.";
pub const ONLY_MOVIES: &str = "Only movies available.";

/// Returns the stored movie for the requested title, fetching it from OMDb and
/// storing it together with its ratings on first request.
///
/// Only `title` is consulted. When a movie with that exact title is already
/// stored it is returned as is, without contacting OMDb, and whatever else the
/// caller submitted is ignored.
///
/// Requests for the same title are serialized by the store's title lock, so a
/// second request waits for the first and then takes the stored branch.
///
/// The movie row and its rating rows are written one after another without a
/// transaction, so a failure part way leaves the movie with fewer ratings.
pub async fn create_or_get(
    store: &MovieStore,
    omdb: &OmdbClient,
    req: CreateMovieRequest,
) -> AppResult<MovieDetail> {
    let title = match req.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(AppError::validation("title", INVALID_REQUEST)),
    };

    let _title_guard = store.lock_title(&title).await;

    if let Some(existing) = store.find_by_title(&title).await? {
        debug!(title = %title, movie_id = existing.id, "movie already stored");
        return store.with_ratings(existing).await;
    }

    let Some(record) = omdb.fetch(&title).await? else {
        warn!(title = %title, "omdb does not know this title");
        return Err(AppError::validation("title", INVALID_TITLE));
    };

    if record.kind != "movie" {
        warn!(title = %title, kind = %record.kind, "omdb record is not a movie");
        return Err(AppError::validation("title", ONLY_MOVIES));
    }

    let (new_movie, ratings) = record.into_parts();

    let movie = match store.get_or_create_movie(new_movie).await? {
        StoredMovie::Conflicted(winner) => winner,
        stored => {
            let movie = stored.model().clone();
            if matches!(stored, StoredMovie::Created(_)) {
                info!(
                    title = %movie.title,
                    movie_id = movie.id,
                    ratings = ratings.len(),
                    "stored new movie"
                );
            }
            for rating in ratings {
                store.add_rating(movie.id, rating).await?;
            }
            movie
        },
    };

    store.with_ratings(movie).await
}
