use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::debug;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CommentView, CommentsQuery, CreateCommentRequest, CreateMovieRequest, MovieDetail,
        TopMovie, TopQuery,
    },
    movies, ranking,
};

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateMovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MovieDetail>)> {
    let Json(req) = body.map_err(|rejection| {
        debug!(error = %rejection, "unreadable movie request");
        AppError::validation("title", movies::INVALID_REQUEST)
    })?;
    let detail = movies::create_or_get(&state.store, &state.omdb, req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<MovieDetail>>> {
    Ok(Json(state.store.list_movies().await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieDetail>> {
    let detail = state.store.movie_detail(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(detail))
}

pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentView>)> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(AppError::validation("body", "This field may not be blank."));
    }
    if state.store.find_movie(req.movie).await?.is_none() {
        return Err(AppError::validation(
            "movie",
            format!("Invalid pk \"{}\" - object does not exist.", req.movie),
        ));
    }

    let comment = state.store.add_comment(req.movie, body).await?;
    Ok((StatusCode::CREATED, Json(CommentView::try_from(comment)?)))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CommentsQuery>,
) -> AppResult<Json<Vec<CommentView>>> {
    let comments = state.store.list_comments(q.movie_id).await?;
    let views = comments.into_iter().map(CommentView::try_from).collect::<Result<_, _>>()?;
    Ok(Json(views))
}

pub async fn top(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TopQuery>,
) -> AppResult<Json<Vec<TopMovie>>> {
    Ok(Json(ranking::top_movies(&state.store, q).await?))
}
