use crate::config::{AppConfig, SessionConfig};
use crate::meals::{MealStore, MemoryMealStore, PgMealStore};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub meals: Arc<dyn MealStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let meals = match &config.database_url {
            Some(url) => {
                let store = PgMealStore::connect(url, config.max_connections).await?;
                store.migrate().await;
                info!("using postgres meal store");
                Arc::new(store) as Arc<dyn MealStore>
            }
            None => {
                warn!("DATABASE_URL not set; meals are kept in memory and lost on restart");
                Arc::new(MemoryMealStore::default()) as Arc<dyn MealStore>
            }
        };

        Ok(Self::from_parts(config, meals))
    }

    pub fn from_parts(config: Arc<AppConfig>, meals: Arc<dyn MealStore>) -> Self {
        Self { config, meals }
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            max_connections: 1,
            session: SessionConfig::default(),
        });
        Self::from_parts(config, Arc::new(MemoryMealStore::default()))
    }
}
