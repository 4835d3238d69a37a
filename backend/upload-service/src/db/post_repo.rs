/// Post repository - database operations for text and image rows
use async_trait::async_trait;
use db_pool::acquire_with_metrics;
use sqlx::MySqlPool;

use super::PostRepository;
use crate::error::Result;
use crate::models::ImageRecord;

#[derive(Clone)]
pub struct MySqlPostRepository {
    pool: MySqlPool,
    service_name: String,
}

impl MySqlPostRepository {
    pub fn new(pool: MySqlPool, service_name: impl Into<String>) -> Self {
        Self {
            pool,
            service_name: service_name.into(),
        }
    }
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn insert_text(&self, content: &str) -> Result<u64> {
        let mut conn = acquire_with_metrics(&self.pool, &self.service_name).await?;

        let result = sqlx::query("INSERT INTO text (content) VALUES (?)")
            .bind(content)
            .execute(&mut *conn)
            .await?;

        Ok(result.last_insert_id())
    }

    async fn insert_image(&self, image: &ImageRecord) -> Result<()> {
        let mut conn = acquire_with_metrics(&self.pool, &self.service_name).await?;

        sqlx::query("INSERT INTO image (post_id, file_name, url) VALUES (?, ?, ?)")
            .bind(image.post_id)
            .bind(&image.file_name)
            .bind(&image.url)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
