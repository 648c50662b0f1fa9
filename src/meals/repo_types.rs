use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::session::SessionId;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub session_id: SessionId,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub diet: bool,
}

/// Fields supplied when a meal is created.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub date_time: OffsetDateTime,
    pub diet: bool,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date_time: Option<OffsetDateTime>,
    pub diet: Option<bool>,
}

impl MealChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.date_time.is_none()
            && self.diet.is_none()
    }

    pub fn apply(self, meal: &mut Meal) {
        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(description) = self.description {
            meal.description = description;
        }
        if let Some(date_time) = self.date_time {
            meal.date_time = date_time;
        }
        if let Some(diet) = self.diet {
            meal.diet = diet;
        }
    }
}
