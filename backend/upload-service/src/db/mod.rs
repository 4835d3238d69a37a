/// Database access layer
///
/// - `PostRepository`: the two inserts made per upload
/// - `post_repo`: MySQL implementation over the shared pool
/// - `MIGRATOR`: schema for the `text` and `image` tables
use async_trait::async_trait;
use sqlx::migrate::Migrator;

use crate::error::Result;
use crate::models::ImageRecord;

pub mod post_repo;

pub use post_repo::MySqlPostRepository;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a TextRecord and return its generated id
    async fn insert_text(&self, content: &str) -> Result<u64>;

    /// Insert an ImageRecord pointing at an existing TextRecord
    async fn insert_image(&self, image: &ImageRecord) -> Result<()>;

    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> Result<()>;
}
