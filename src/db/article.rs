use super::{DBClient, timed};
use crate::models::{Article, Category};
use chrono::Utc;

const ARTICLE_COLUMNS: &str = "id, title, content, category, published_at";

/// Article database operations trait
pub trait ArticleExt {
    /// Articles in one category, newest first.
    async fn list_articles(&self, category: Category) -> Result<Vec<Article>, sqlx::Error>;

    /// Every article across categories, newest first (admin home).
    async fn list_all_articles(&self) -> Result<Vec<Article>, sqlx::Error>;

    async fn get_article(&self, article_id: i64) -> Result<Option<Article>, sqlx::Error>;

    async fn create_article(
        &self,
        title: &str,
        content: &str,
        category: Category,
    ) -> Result<Article, sqlx::Error>;

    /// Returns the number of rows removed; zero means no such article.
    async fn delete_article(&self, article_id: i64) -> Result<u64, sqlx::Error>;
}

impl ArticleExt for DBClient {
    async fn list_articles(&self, category: Category) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            WHERE category = ?
            ORDER BY published_at DESC, id DESC
            "#
        );

        let articles = timed(
            sqlx::query_as::<_, Article>(&query)
                .bind(category)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(articles)
    }

    async fn list_all_articles(&self) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {ARTICLE_COLUMNS} FROM articles
            ORDER BY published_at DESC, id DESC
            "#
        );

        let articles = timed(sqlx::query_as::<_, Article>(&query).fetch_all(&self.pool)).await?;

        Ok(articles)
    }

    async fn get_article(&self, article_id: i64) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?");

        let article = timed(
            sqlx::query_as::<_, Article>(&query)
                .bind(article_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(article)
    }

    async fn create_article(
        &self,
        title: &str,
        content: &str,
        category: Category,
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO articles (title, content, category, published_at)
            VALUES (?, ?, ?, ?)
            RETURNING {ARTICLE_COLUMNS}
            "#
        );

        let article = timed(
            sqlx::query_as::<_, Article>(&query)
                .bind(title)
                .bind(content)
                .bind(category)
                .bind(Utc::now())
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(article)
    }

    async fn delete_article(&self, article_id: i64) -> Result<u64, sqlx::Error> {
        let result = timed(
            sqlx::query("DELETE FROM articles WHERE id = ?")
                .bind(article_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }
}
