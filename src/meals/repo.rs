use anyhow::Context;
use axum::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Meal, MealChanges, NewMeal};
use crate::session::SessionId;

/// Session-scoped access to meal records.
///
/// Every call is filtered by the owning session: a meal stored under another
/// session behaves exactly like a missing one.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// All meals of the session, oldest `date_time` first.
    async fn list(&self, session: SessionId) -> anyhow::Result<Vec<Meal>>;
    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn insert(&self, session: SessionId, meal: NewMeal) -> anyhow::Result<Meal>;
    /// Returns `None` when the session has no meal with this id.
    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>>;
    /// Returns whether a meal was removed.
    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) {
        match sqlx::migrate!("./migrations").run(&self.db).await {
            Ok(()) => info!("migrations applied"),
            Err(e) => warn!(error = %e, "migration failed; continuing"),
        }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn list(&self, session: SessionId) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, session_id, name, description, date_time, diet
              FROM meals
             WHERE session_id = $1
             ORDER BY date_time ASC
            "#,
        )
        .bind(session)
        .fetch_all(&self.db)
        .await
        .context("list meals by session")?;
        Ok(rows)
    }

    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, session_id, name, description, date_time, diet
              FROM meals
             WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(id)
        .bind(session)
        .fetch_optional(&self.db)
        .await
        .context("find meal")?;
        Ok(row)
    }

    async fn insert(&self, session: SessionId, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, session_id, name, description, date_time, diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, session_id, name, description, date_time, diet
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session)
        .bind(meal.name)
        .bind(meal.description)
        .bind(meal.date_time)
        .bind(meal.diet)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        if changes.is_empty() {
            return self.find(session, id).await;
        }
        // NULL binds keep the current column value.
        let row = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET name        = COALESCE($3, name),
                   description = COALESCE($4, description),
                   date_time   = COALESCE($5, date_time),
                   diet        = COALESCE($6, diet)
             WHERE id = $1 AND session_id = $2
            RETURNING id, session_id, name, description, date_time, diet
            "#,
        )
        .bind(id)
        .bind(session)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.date_time)
        .bind(changes.diet)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(row)
    }

    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND session_id = $2"#)
            .bind(id)
            .bind(session)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }
}

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemoryMealStore {
    meals: RwLock<Vec<Meal>>,
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn list(&self, session: SessionId) -> anyhow::Result<Vec<Meal>> {
        let mut out: Vec<Meal> = self
            .meals
            .read()
            .await
            .iter()
            .filter(|m| m.session_id == session)
            .cloned()
            .collect();
        out.sort_by_key(|m| m.date_time);
        Ok(out)
    }

    async fn find(&self, session: SessionId, id: Uuid) -> anyhow::Result<Option<Meal>> {
        Ok(self
            .meals
            .read()
            .await
            .iter()
            .find(|m| m.id == id && m.session_id == session)
            .cloned())
    }

    async fn insert(&self, session: SessionId, meal: NewMeal) -> anyhow::Result<Meal> {
        let meal = Meal {
            id: Uuid::new_v4(),
            session_id: session,
            name: meal.name,
            description: meal.description,
            date_time: meal.date_time,
            diet: meal.diet,
        };
        self.meals.write().await.push(meal.clone());
        Ok(meal)
    }

    async fn update(
        &self,
        session: SessionId,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.write().await;
        let Some(meal) = meals
            .iter_mut()
            .find(|m| m.id == id && m.session_id == session)
        else {
            return Ok(None);
        };
        changes.apply(meal);
        Ok(Some(meal.clone()))
    }

    async fn delete(&self, session: SessionId, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.session_id == session));
        Ok(meals.len() < before)
    }
}
