use serde::{Deserialize, Serialize};

use crate::entities::{comment, movie, rating};

/// A title lookup as returned by OMDb. Only the listed keys are read; anything
/// else in the payload is dropped during deserialization.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OmdbMovie {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "DVD")]
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
    pub ratings: Vec<OmdbRating>,
    pub response: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    pub source: String,
    pub value: String,
}

impl OmdbMovie {
    pub fn is_found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// Drops the response marker and splits the record into the movie row and
    /// its ratings.
    pub fn into_parts(self) -> (NewMovie, Vec<NewRating>) {
        let ratings = self
            .ratings
            .into_iter()
            .map(|r| NewRating { source: r.source, value: r.value })
            .collect();

        let movie = NewMovie {
            title: self.title,
            year: self.year,
            rated: self.rated,
            released: self.released,
            runtime: self.runtime,
            genre: self.genre,
            director: self.director,
            writer: self.writer,
            actors: self.actors,
            plot: self.plot,
            language: self.language,
            country: self.country,
            awards: self.awards,
            poster: self.poster,
            metascore: self.metascore,
            imdb_rating: self.imdb_rating,
            imdb_votes: self.imdb_votes,
            imdb_id: self.imdb_id,
            kind: self.kind,
            dvd: self.dvd,
            box_office: self.box_office,
            production: self.production,
            website: self.website,
        };

        (movie, ratings)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster: String,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub imdb_id: String,
    pub kind: String,
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRating {
    pub source: String,
    pub value: String,
}

/// Body of `POST /movies`. Only `title` is consulted; other keys are accepted
/// and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub ratings: Vec<rating::Model>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TopMovie {
    pub movie_id: i32,
    pub total_comments: u64,
    pub rank: u64,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub movie: i32,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentsQuery {
    pub movie_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub movie: i32,
    pub body: String,
    pub created_at: String,
}

impl TryFrom<comment::Model> for CommentView {
    type Error = jiff::Error;

    fn try_from(c: comment::Model) -> Result<Self, Self::Error> {
        let created_at = jiff::Timestamp::from_second(c.created_at)?.to_string();
        Ok(Self { id: c.id, movie: c.movie_id, body: c.body, created_at })
    }
}
