/// SQL query functions for the site store
///
/// Runtime-checked sqlx queries; rows go through `SiteRow` on the way in and out.

use crate::core::SiteVisit;
use crate::db::models::*;
use crate::db::Database;
use crate::error::{Result, SiteError};
use sqlx::{Executor, Sqlite};
use tracing::debug;

const UPSERT_SITE: &str = r#"
    INSERT INTO sites (id, url, domain, title, visit_count, last_visit, favicon, pinned, blocked, history)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        url = excluded.url,
        domain = excluded.domain,
        title = excluded.title,
        visit_count = excluded.visit_count,
        last_visit = excluded.last_visit,
        favicon = excluded.favicon,
        pinned = excluded.pinned,
        blocked = excluded.blocked,
        history = excluded.history
"#;

impl Database {
    /// Insert a site or overwrite the stored copy with the same id
    pub async fn upsert_site(&self, site: &SiteVisit) -> Result<()> {
        write_site(self.pool(), &SiteRow::try_from(site)?).await
    }

    /// Get a site by id
    pub async fn get_site(&self, id: &str) -> Result<Option<SiteVisit>> {
        let row = sqlx::query_as::<_, SiteRow>("SELECT * FROM sites WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.map(SiteRow::into_site).transpose()
    }

    /// Get a site by its normalized URL
    pub async fn find_site_by_url(&self, url: &str) -> Result<Option<SiteVisit>> {
        let row = sqlx::query_as::<_, SiteRow>("SELECT * FROM sites WHERE url = ?")
            .bind(url)
            .fetch_optional(self.pool())
            .await?;

        row.map(SiteRow::into_site).transpose()
    }

    /// Read, change and write back the site stored under `url` atomically
    ///
    /// `apply` gets the stored site (or `None`) and returns the site to
    /// store. The write lock is taken before the read, so concurrent
    /// writers queue up instead of overwriting each other.
    pub async fn update_site_by_url<F>(&self, url: &str, apply: F) -> Result<SiteVisit>
    where
        F: FnOnce(Option<SiteVisit>) -> Result<SiteVisit>,
    {
        let mut conn = self.pool().acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result: Result<SiteVisit> = async {
            let row = sqlx::query_as::<_, SiteRow>("SELECT * FROM sites WHERE url = ?")
                .bind(url)
                .fetch_optional(&mut *conn)
                .await?;
            let site = apply(row.map(SiteRow::into_site).transpose()?)?;
            write_site(&mut *conn, &SiteRow::try_from(&site)?).await?;
            Ok(site)
        }
        .await;

        match result {
            Ok(site) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(site)
            }
            Err(e) => {
                if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    debug!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    /// Load every tracked site, blocked ones included
    ///
    /// Ordered by id so rankings of equal scores are reproducible.
    pub async fn all_sites(&self) -> Result<Vec<SiteVisit>> {
        let rows = sqlx::query_as::<_, SiteRow>("SELECT * FROM sites ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(SiteRow::into_site).collect()
    }

    /// Set the pinned flag
    ///
    /// # Returns
    /// * `Err(SiteError::SiteNotFound)` - If no site has this id
    pub async fn set_pinned(&self, id: &str, pinned: bool) -> Result<()> {
        let result = sqlx::query("UPDATE sites SET pinned = ? WHERE id = ?")
            .bind(pinned)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(SiteError::SiteNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Set the blocked flag (soft delete)
    pub async fn set_blocked(&self, id: &str, blocked: bool) -> Result<()> {
        let result = sqlx::query("UPDATE sites SET blocked = ? WHERE id = ?")
            .bind(blocked)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(SiteError::SiteNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Permanently remove a site
    ///
    /// Returns false if nothing was deleted.
    pub async fn delete_site(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store imported sites in one transaction
    ///
    /// An imported site replaces any stored site with the same id or URL.
    pub async fn import_sites(&self, sites: &[SiteVisit]) -> Result<usize> {
        let mut tx = self.pool().begin().await?;

        for site in sites {
            let row = SiteRow::try_from(site)?;

            sqlx::query("DELETE FROM sites WHERE url = ? AND id != ?")
                .bind(&row.url)
                .bind(&row.id)
                .execute(&mut *tx)
                .await?;

            write_site(&mut *tx, &row).await?;
        }

        tx.commit().await?;
        debug!("Imported {} sites into store", sites.len());

        Ok(sites.len())
    }

    /// Get a preference value
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let pref = sqlx::query_as::<_, Preference>("SELECT * FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(pref.map(|p| p.value))
    }

    /// Set a preference value
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

async fn write_site<'e, E>(executor: E, row: &SiteRow) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(UPSERT_SITE)
        .bind(&row.id)
        .bind(&row.url)
        .bind(&row.domain)
        .bind(&row.title)
        .bind(row.visit_count)
        .bind(&row.last_visit)
        .bind(&row.favicon)
        .bind(row.pinned)
        .bind(row.blocked)
        .bind(&row.history)
        .execute(executor)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn site(id: &str, url: &str) -> SiteVisit {
        SiteVisit::first_visit(
            id.to_string(),
            url.to_string(),
            url.trim_start_matches("https://").to_string(),
            id.to_uppercase(),
            Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::in_memory().await.unwrap();
        let mut s = site("a", "https://a.com");
        db.upsert_site(&s).await.unwrap();

        s.record_visit(Utc.with_ymd_and_hms(2025, 5, 2, 9, 30, 0).unwrap());
        db.upsert_site(&s).await.unwrap();

        let stored = db.get_site("a").await.unwrap().unwrap();
        assert_eq!(stored, s);
        assert_eq!(stored.visit_count, 2);

        let by_url = db.find_site_by_url("https://a.com").await.unwrap();
        assert_eq!(by_url.map(|s| s.id), Some("a".to_string()));
        assert!(db.get_site("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flags() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_site(&site("a", "https://a.com")).await.unwrap();

        db.set_pinned("a", true).await.unwrap();
        db.set_blocked("a", true).await.unwrap();
        let stored = db.get_site("a").await.unwrap().unwrap();
        assert!(stored.pinned);
        assert!(stored.blocked);

        assert!(matches!(
            db.set_pinned("nope", true).await,
            Err(SiteError::SiteNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_site_by_url() {
        let db = Database::in_memory().await.unwrap();

        let created = db
            .update_site_by_url("https://a.com", |existing| {
                assert!(existing.is_none());
                Ok(site("a", "https://a.com"))
            })
            .await
            .unwrap();
        assert_eq!(created.visit_count, 1);

        let bumped = db
            .update_site_by_url("https://a.com", |existing| {
                let mut s = existing.unwrap();
                s.record_visit(Utc.with_ymd_and_hms(2025, 5, 3, 9, 30, 0).unwrap());
                Ok(s)
            })
            .await
            .unwrap();
        assert_eq!(bumped.visit_count, 2);
        assert_eq!(db.get_site("a").await.unwrap(), Some(bumped));
    }

    #[tokio::test]
    async fn test_update_site_by_url_rolls_back() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_site(&site("a", "https://a.com")).await.unwrap();

        let result = db
            .update_site_by_url("https://a.com", |_| Err(SiteError::InvalidUrl("x".to_string())))
            .await;
        assert!(matches!(result, Err(SiteError::InvalidUrl(_))));

        // The connection is usable again and nothing changed
        let stored = db.get_site("a").await.unwrap().unwrap();
        assert_eq!(stored.visit_count, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_site(&site("a", "https://a.com")).await.unwrap();

        assert!(db.delete_site("a").await.unwrap());
        assert!(!db.delete_site("a").await.unwrap());
        assert!(db.all_sites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_replaces_same_url() {
        let db = Database::in_memory().await.unwrap();
        db.upsert_site(&site("old", "https://a.com")).await.unwrap();
        db.upsert_site(&site("keep", "https://b.com")).await.unwrap();

        let count = db
            .import_sites(&[site("new", "https://a.com"), site("c", "https://c.com")])
            .await
            .unwrap();
        assert_eq!(count, 2);

        let ids: Vec<String> = db.all_sites().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["c", "keep", "new"]);
    }

    #[tokio::test]
    async fn test_preferences() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.get_preference(PREF_PRESET).await.unwrap().is_none());

        db.set_preference(PREF_PRESET, "recency").await.unwrap();
        db.set_preference(PREF_PRESET, "frequency").await.unwrap();
        assert_eq!(
            db.get_preference(PREF_PRESET).await.unwrap().as_deref(),
            Some("frequency")
        );
    }
}
