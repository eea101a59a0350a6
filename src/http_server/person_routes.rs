//! Person HTTP Routes
//!
//! - `POST /pessoas` registers a person (write-through to the cache)
//! - `GET /pessoas` lists a page of matches
//! - `GET /pessoas/:id` fetches one person, cache first
//! - `GET /contagem-pessoas` returns the total as plain text

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::{list_people, ApiError, ApiResult, AppContext, CreatedResponse, ListParams, PeoplePage};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::person::NewPersonRequest;

/// Create person routes
pub fn person_routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/pessoas", get(list_people_handler).post(create_person_handler))
        .route("/pessoas/:id", get(get_person_handler))
        .route("/contagem-pessoas", get(count_people_handler))
        .with_state(ctx)
}

async fn create_person_handler(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> ApiResult<Response> {
    let request: NewPersonRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let mut person = request.into_person(Uuid::new_v4())?;

    let deadline = ctx.deadline();
    person.seq_id = deadline.run("storage", ctx.store().create(&person)).await?;
    deadline.run("cache", ctx.cache().put(&person)).await?;

    let uuid = person.uuid.to_string();
    log_event_with_fields(Event::PersonCreated, &[("uuid", uuid.as_str())]);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, person.location())],
        Json(CreatedResponse { uuid: person.uuid }),
    )
        .into_response())
}

async fn list_people_handler(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PeoplePage>> {
    let page = list_people(&ctx, ctx.deadline(), &params).await?;
    Ok(Json(page))
}

async fn get_person_handler(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    // Not a uuid, so no such person
    let uid = Uuid::parse_str(&id).map_err(|_| ApiError::NotFound)?;
    let deadline = ctx.deadline();

    if let Some(body) = deadline.run("cache", ctx.cache().get(&uid)).await? {
        return Ok(json_body(body));
    }

    log_event_with_fields(Event::CacheMiss, &[("uuid", id.as_str())]);
    let person = deadline.run("storage", ctx.store().get_by_uid(&uid)).await?;

    match deadline.run("cache", ctx.cache().put(&person)).await {
        Ok(body) => Ok(json_body(body)),
        Err(err) => {
            Logger::warn(
                Event::CacheRepopulateFailed.as_str(),
                &[("error", err.to_string().as_str()), ("uuid", id.as_str())],
            );
            Ok(Json(person).into_response())
        }
    }
}

async fn count_people_handler(State(ctx): State<AppContext>) -> ApiResult<String> {
    let count = ctx.deadline().run("storage", ctx.store().count()).await?;
    Ok(count.to_string())
}

/// Serve an already-serialised JSON document.
fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
