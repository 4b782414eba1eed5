use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, sea_query::Expr,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::{
    entities::{comment, movie, rating},
    error::AppResult,
    models::{MovieDetail, NewMovie, NewRating},
};

const TITLE_LOCK_STRIPES: usize = 64;

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
    title_locks: Arc<Vec<Mutex<()>>>,
}

/// Outcome of [`MovieStore::get_or_create_movie`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredMovie {
    Created(movie::Model),
    /// A row with the identical field set already existed.
    Matched(movie::Model),
    /// The insert lost a race on the unique title; this is the winner's row.
    Conflicted(movie::Model),
}

impl StoredMovie {
    pub fn model(&self) -> &movie::Model {
        match self {
            StoredMovie::Created(m) | StoredMovie::Matched(m) | StoredMovie::Conflicted(m) => m,
        }
    }
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let title_locks = (0..TITLE_LOCK_STRIPES).map(|_| Mutex::new(())).collect();
        Self { db, title_locks: Arc::new(title_locks) }
    }

    /// Serializes lookup-then-create for one title within this process.
    /// Titles are striped over a fixed set of locks, so unrelated titles may
    /// occasionally wait on each other.
    pub async fn lock_title(&self, title: &str) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        title.hash(&mut hasher);
        let stripe = (hasher.finish() % self.title_locks.len() as u64) as usize;
        self.title_locks[stripe].lock().await
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        let movie = movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await?;
        Ok(movie)
    }

    pub async fn find_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get_or_create_movie(&self, new: NewMovie) -> AppResult<StoredMovie> {
        if let Some(existing) =
            movie::Entity::find().filter(exact_match(&new)).one(&self.db).await?
        {
            return Ok(StoredMovie::Matched(existing));
        }

        let title = new.title.clone();
        match active_movie(new).insert(&self.db).await {
            Ok(created) => Ok(StoredMovie::Created(created)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                warn!(title = %title, "movie inserted concurrently, using existing row");
                let winner = self.find_by_title(&title).await?.ok_or_else(|| {
                    anyhow::anyhow!("movie {title:?} conflicted on insert but is not stored")
                })?;
                Ok(StoredMovie::Conflicted(winner))
            },
            Err(err) => Err(err.into()),
        }
    }

    pub async fn add_rating(&self, movie_id: i32, new: NewRating) -> AppResult<rating::Model> {
        let model = rating::ActiveModel {
            id: NotSet,
            source: Set(new.source),
            value: Set(new.value),
            movie_id: Set(movie_id),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn with_ratings(&self, movie: movie::Model) -> AppResult<MovieDetail> {
        let ratings = movie
            .find_related(rating::Entity)
            .order_by_asc(rating::Column::Id)
            .all(&self.db)
            .await?;
        Ok(MovieDetail { movie, ratings })
    }

    pub async fn movie_detail(&self, id: i32) -> AppResult<Option<MovieDetail>> {
        match self.find_movie(id).await? {
            Some(movie) => Ok(Some(self.with_ratings(movie).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_movies(&self) -> AppResult<Vec<MovieDetail>> {
        let rows = movie::Entity::find()
            .order_by_asc(movie::Column::Id)
            .find_with_related(rating::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(movie, ratings)| MovieDetail { movie, ratings }).collect())
    }

    pub async fn movie_ids(&self) -> AppResult<Vec<i32>> {
        let ids = movie::Entity::find()
            .select_only()
            .column(movie::Column::Id)
            .order_by_asc(movie::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    pub async fn add_comment(&self, movie_id: i32, body: &str) -> AppResult<comment::Model> {
        self.add_comment_at(movie_id, body, jiff::Timestamp::now().as_second()).await
    }

    pub async fn add_comment_at(
        &self,
        movie_id: i32,
        body: &str,
        created_at: i64,
    ) -> AppResult<comment::Model> {
        let model = comment::ActiveModel {
            id: NotSet,
            movie_id: Set(movie_id),
            body: Set(body.to_string()),
            created_at: Set(created_at),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn list_comments(&self, movie_id: Option<i32>) -> AppResult<Vec<comment::Model>> {
        let mut query = comment::Entity::find().order_by_asc(comment::Column::Id);
        if let Some(movie_id) = movie_id {
            query = query.filter(comment::Column::MovieId.eq(movie_id));
        }
        Ok(query.all(&self.db).await?)
    }

    /// Comment count per movie for comments created in `[from, until)` (Unix
    /// seconds). Movies without comments in the window are absent.
    pub async fn comment_counts(&self, from: i64, until: i64) -> AppResult<Vec<(i32, i64)>> {
        let counts = comment::Entity::find()
            .select_only()
            .column(comment::Column::MovieId)
            .column_as(Expr::col(comment::Column::Id).count(), "total_comments")
            .filter(comment::Column::CreatedAt.gte(from))
            .filter(comment::Column::CreatedAt.lt(until))
            .group_by(comment::Column::MovieId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await?;
        Ok(counts)
    }
}

fn active_movie(new: NewMovie) -> movie::ActiveModel {
    movie::ActiveModel {
        id: NotSet,
        title: Set(new.title),
        year: Set(new.year),
        rated: Set(new.rated),
        released: Set(new.released),
        runtime: Set(new.runtime),
        genre: Set(new.genre),
        director: Set(new.director),
        writer: Set(new.writer),
        actors: Set(new.actors),
        plot: Set(new.plot),
        language: Set(new.language),
        country: Set(new.country),
        awards: Set(new.awards),
        poster: Set(new.poster),
        metascore: Set(new.metascore),
        imdb_rating: Set(new.imdb_rating),
        imdb_votes: Set(new.imdb_votes),
        imdb_id: Set(new.imdb_id),
        kind: Set(new.kind),
        dvd: Set(new.dvd),
        box_office: Set(new.box_office),
        production: Set(new.production),
        website: Set(new.website),
    }
}

fn exact_match(new: &NewMovie) -> Condition {
    Condition::all()
        .add(movie::Column::Title.eq(new.title.as_str()))
        .add(movie::Column::Year.eq(new.year.as_str()))
        .add(movie::Column::Rated.eq(new.rated.as_str()))
        .add(movie::Column::Released.eq(new.released.as_str()))
        .add(movie::Column::Runtime.eq(new.runtime.as_str()))
        .add(movie::Column::Genre.eq(new.genre.as_str()))
        .add(movie::Column::Director.eq(new.director.as_str()))
        .add(movie::Column::Writer.eq(new.writer.as_str()))
        .add(movie::Column::Actors.eq(new.actors.as_str()))
        .add(movie::Column::Plot.eq(new.plot.as_str()))
        .add(movie::Column::Language.eq(new.language.as_str()))
        .add(movie::Column::Country.eq(new.country.as_str()))
        .add(movie::Column::Awards.eq(new.awards.as_str()))
        .add(movie::Column::Poster.eq(new.poster.as_str()))
        .add(movie::Column::Metascore.eq(new.metascore.as_str()))
        .add(movie::Column::ImdbRating.eq(new.imdb_rating.as_str()))
        .add(movie::Column::ImdbVotes.eq(new.imdb_votes.as_str()))
        .add(movie::Column::ImdbId.eq(new.imdb_id.as_str()))
        .add(movie::Column::Kind.eq(new.kind.as_str()))
        .add(movie::Column::Dvd.eq(new.dvd.as_str()))
        .add(movie::Column::BoxOffice.eq(new.box_office.as_str()))
        .add(movie::Column::Production.eq(new.production.as_str()))
        .add(movie::Column::Website.eq(new.website.as_str()))
}
