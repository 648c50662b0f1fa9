use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    CreateMealRequest, CreatedMealResponse, MealResponse, MealsResponse, UpdateMealRequest,
};
use super::repo_types::{MealChanges, NewMeal};
use super::services::{summarize, MealSummary};
use crate::{
    error::AppError,
    session::{session_cookie, MaybeSession, Session, SessionId},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/summary", get(get_summary))
        .route("/meals/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<MealsResponse>, AppError> {
    let meals = state.meals.list(session).await?;
    Ok(Json(MealsResponse { meals }))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, AppError> {
    match state.meals.find(session, id).await? {
        Some(meal) => Ok(Json(MealResponse { meal })),
        None => {
            warn!(%session, %id, "meal not found");
            Err(AppError::NotFound)
        }
    }
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<MealSummary>, AppError> {
    let meals = state.meals.list(session).await?;
    Ok(Json(summarize(&meals)))
}

/// POST /meals; issues a session cookie when the client has none yet.
#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    MaybeSession(existing): MaybeSession,
    WithRejection(Json(body), _): WithRejection<Json<CreateMealRequest>, AppError>,
) -> Result<(StatusCode, CookieJar, HeaderMap, Json<CreatedMealResponse>), AppError> {
    let new_meal = NewMeal::try_from(body)?;

    let mut jar = CookieJar::new();
    let session = match existing {
        Some(session) => session,
        None => {
            let session = SessionId::generate();
            jar = jar.add(session_cookie(&state.config.session, session)?);
            info!(%session, "session issued");
            session
        }
    };

    let meal = state.meals.insert(session, new_meal).await?;
    info!(%session, meal_id = %meal.id, "meal created");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&format!("/meals/{}", meal.id)).map_err(anyhow::Error::from)?,
    );
    Ok((
        StatusCode::CREATED,
        jar,
        headers,
        Json(CreatedMealResponse { id: meal.id }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<Uuid>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateMealRequest>, AppError>,
) -> Result<Json<MealResponse>, AppError> {
    let changes = MealChanges::try_from(body)?;
    match state.meals.update(session, id, changes).await? {
        Some(meal) => {
            info!(%session, %id, "meal updated");
            Ok(Json(MealResponse { meal }))
        }
        None => {
            warn!(%session, %id, "update of unknown meal");
            Err(AppError::NotFound)
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.meals.delete(session, id).await?;
    info!(%session, %id, removed, "meal delete");
    Ok(StatusCode::NO_CONTENT)
}
