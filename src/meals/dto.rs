use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;
use crate::meals::repo_types::{Meal, MealChanges, NewMeal};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub diet: bool,
}

impl TryFrom<CreateMealRequest> for NewMeal {
    type Error = AppError;

    fn try_from(r: CreateMealRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: validate_name(r.name)?,
            description: r.description,
            date_time: r.date_time,
            diet: r.diet,
        })
    }
}

/// Keys left out of the body stay as stored; `false` and `""` are real values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub diet: Option<bool>,
}

impl TryFrom<UpdateMealRequest> for MealChanges {
    type Error = AppError;

    fn try_from(r: UpdateMealRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: r.name.map(validate_name).transpose()?,
            description: r.description,
            date_time: r.date_time,
            diet: r.diet,
        })
    }
}

fn validate_name(name: String) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    Ok(name)
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealsResponse {
    pub meals: Vec<Meal>,
}
