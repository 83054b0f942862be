use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::info;

use super::aliases::canonical_crop;
use super::{CatalogueStore, Crop, PlantingPeriod, Result, Soil, SoilAdvice, seed};

/// SQLite-backed catalogue.
#[derive(Debug, Clone)]
pub struct SqliteCatalogue {
    pool: SqlitePool,
}

impl SqliteCatalogue {
    /// Open (or create) the database at `url`, run migrations and seed it.
    ///
    /// `sqlite::memory:` keeps a single pooled connection alive so the
    /// database lives as long as the catalogue.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let catalogue = Self { pool };
        catalogue.seed().await?;
        Ok(catalogue)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert the reference data if the catalogue has no crops yet.
    ///
    /// Returns whether anything was inserted.
    pub async fn seed(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;

        for (name, kind, cycle_days, description) in seed::CROPS {
            sqlx::query(
                "INSERT OR IGNORE INTO crops (name, kind, cycle_days, description) VALUES (?, ?, ?, ?)",
            )
            .bind(*name)
            .bind(*kind)
            .bind(*cycle_days)
            .bind(*description)
            .execute(&mut *tx)
            .await?;
        }

        for (crop, region, start, end, advice) in seed::PERIODS {
            sqlx::query(
                r#"
                INSERT INTO planting_periods (crop_id, region, start_month, end_month, advice)
                SELECT id, ?, ?, ?, ? FROM crops WHERE name = ?
                "#,
            )
            .bind(*region)
            .bind(*start)
            .bind(*end)
            .bind(*advice)
            .bind(*crop)
            .execute(&mut *tx)
            .await?;
        }

        for (name, description) in seed::SOILS {
            sqlx::query("INSERT OR IGNORE INTO soils (name, description) VALUES (?, ?)")
                .bind(*name)
                .bind(*description)
                .execute(&mut *tx)
                .await?;
        }

        for (crop, soil) in seed::CROP_SOILS {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO crop_soils (crop_id, soil_id)
                SELECT c.id, s.id FROM crops c, soils s
                WHERE c.name = ? AND s.name = ?
                "#,
            )
            .bind(*crop)
            .bind(*soil)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            name: "catalogue.seeded",
            crops = seed::CROPS.len(),
            soils = seed::SOILS.len(),
            "Catalogue seeded"
        );
        Ok(true)
    }

    async fn soils(&self) -> Result<Vec<Soil>> {
        let rows = sqlx::query("SELECT id, name, description FROM soils ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let mut soils = Vec::with_capacity(rows.len());
        for row in rows {
            soils.push(Soil {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                description: row.try_get("description")?,
            });
        }
        Ok(soils)
    }
}

#[async_trait]
impl CatalogueStore for SqliteCatalogue {
    async fn crops(&self) -> Result<Vec<Crop>> {
        let rows =
            sqlx::query("SELECT id, name, kind, cycle_days, description FROM crops ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let mut crops = Vec::with_capacity(rows.len());
        for row in rows {
            crops.push(Crop {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                kind: row.try_get("kind")?,
                cycle_days: row.try_get("cycle_days")?,
                description: row.try_get("description")?,
            });
        }
        Ok(crops)
    }

    async fn find_crop_in_text(&self, text: &str) -> Result<Option<String>> {
        let lower = text.to_lowercase();
        let crops = self.crops().await?;

        if let Some(crop) = crops
            .iter()
            .find(|c| lower.contains(&c.name.to_lowercase()))
        {
            return Ok(Some(crop.name.clone()));
        }

        let found = canonical_crop(&lower).and_then(|alias| {
            crops
                .into_iter()
                .find(|c| c.name.to_lowercase() == alias)
                .map(|c| c.name)
        });
        Ok(found)
    }

    async fn planting_periods(&self, crop: &str) -> Result<Vec<PlantingPeriod>> {
        let rows = sqlx::query(
            r#"
            SELECT p.region, p.start_month, p.end_month, p.advice, c.cycle_days
            FROM planting_periods p
            JOIN crops c ON c.id = p.crop_id
            WHERE c.name = ?
            ORDER BY p.region
            "#,
        )
        .bind(crop)
        .fetch_all(&self.pool)
        .await?;

        let mut periods = Vec::with_capacity(rows.len());
        for row in rows {
            periods.push(PlantingPeriod {
                region: row.try_get("region")?,
                start_month: row.try_get("start_month")?,
                end_month: row.try_get("end_month")?,
                advice: row.try_get("advice")?,
                cycle_days: row.try_get("cycle_days")?,
            });
        }
        Ok(periods)
    }

    async fn soil_recommendation(&self, text: &str) -> Result<Option<SoilAdvice>> {
        let lower = text.to_lowercase();
        let Some(soil) = self
            .soils()
            .await?
            .into_iter()
            .find(|s| lower.contains(&s.name))
        else {
            return Ok(None);
        };

        let crops: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT c.name
            FROM crops c
            JOIN crop_soils cs ON cs.crop_id = c.id
            WHERE cs.soil_id = ?
            ORDER BY c.name
            "#,
        )
        .bind(soil.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SoilAdvice { soil, crops }))
    }
}
