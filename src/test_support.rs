use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

use crate::{db, omdb::OmdbClient, store::MovieStore};

pub const TEST_API_KEY: &str = "test-key";

/// Local stand-in for OMDb. Serves the canned payloads keyed by `t` and counts
/// every request it receives.
pub struct FakeOmdb {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct FakeState {
    movies: Arc<HashMap<String, Value>>,
    hits: Arc<AtomicUsize>,
    delay: Duration,
}

impl FakeOmdb {
    pub async fn spawn(movies: Vec<(&str, Value)>) -> Self {
        Self::spawn_with_delay(movies, Duration::ZERO).await
    }

    /// Like [`FakeOmdb::spawn`], but every answer is held back by `delay`.
    pub async fn spawn_with_delay(movies: Vec<(&str, Value)>, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = FakeState {
            movies: Arc::new(movies.into_iter().map(|(t, v)| (t.to_string(), v)).collect()),
            hits: hits.clone(),
            delay,
        };

        let app = Router::new().route("/", get(lookup)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn client(&self) -> OmdbClient {
        OmdbClient::new(reqwest::Client::new(), TEST_API_KEY.to_string(), self.url())
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn lookup(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    if params.get("apikey").map(String::as_str) != Some(TEST_API_KEY) {
        let body = json!({ "Response": "False", "Error": "Invalid API key!" });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let title = params.get("t").cloned().unwrap_or_default();
    match state.movies.get(&title) {
        Some(payload) => Json(payload.clone()).into_response(),
        None => Json(json!({ "Response": "False", "Error": "Movie not found!" })).into_response(),
    }
}

pub fn movie_payload(title: &str, kind: &str) -> Value {
    json!({
        "Title": title,
        "Year": "2010",
        "Rated": "PG-13",
        "Released": "16 Jul 2010",
        "Runtime": "148 min",
        "Genre": "Action, Adventure, Sci-Fi",
        "Director": "Christopher Nolan",
        "Writer": "Christopher Nolan",
        "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
        "Plot": "A thief who steals corporate secrets through dream-sharing technology.",
        "Language": "English, Japanese, French",
        "Country": "United States, United Kingdom",
        "Awards": "Won 4 Oscars. 159 wins & 220 nominations total",
        "Poster": "https://m.media-amazon.com/images/M/poster.jpg",
        "Ratings": [
            { "Source": "Internet Movie Database", "Value": "8.5/10" }
        ],
        "Metascore": "74",
        "imdbRating": "8.5",
        "imdbVotes": "2,400,000",
        "imdbID": "tt1375666",
        "Type": kind,
        "DVD": "07 Dec 2010",
        "BoxOffice": "$292,587,330",
        "Production": "N/A",
        "Website": "N/A",
        "Response": "True"
    })
}

pub async fn test_store() -> MovieStore {
    MovieStore::new(db::connect_and_migrate("sqlite::memory:").await.unwrap())
}
