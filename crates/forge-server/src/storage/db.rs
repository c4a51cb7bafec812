//! SQLite record store (embedded, no external dependencies)

use super::schema;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forge_core::aggregate;
use forge_core::ports::{InventoryStore, ProfileStore, RecordStore};
use forge_core::{
    compare_pledge_dates, model_key, FleetAggregate, ForgeError, InventoryRecord, Peripherals,
    ProfileRecord, Result, ShipOwner, SystemSpecs, UserId,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const SHIP_COLUMNS: &str = "user_id, position, ship_code, name, manufacturer_code, \
    manufacturer_name, ship_name, lti, warbond, entity_type, pledge_id, pledge_name, \
    pledge_date, pledge_cost";

/// How long a writer waits for another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub async fn new(database_path: &str, max_connections: u32) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ForgeError::Persistence(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                ForgeError::Persistence(format!(
                    "Failed to connect to SQLite database at {}: {}",
                    database_path, e
                ))
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, one connection so every query sees the same data
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(db_err)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, ensuring schema...");
        if let Err(e) = schema::ensure_schema(&pool).await {
            pool.close().await;
            return Err(ForgeError::Persistence(format!(
                "Failed to create database schema: {}",
                e
            )));
        }
        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

fn db_err(e: sqlx::Error) -> ForgeError {
    ForgeError::Persistence(e.to_string())
}

#[async_trait]
impl ProfileStore for Database {
    async fn upsert_profile(
        &self,
        user_id: UserId,
        specs: &SystemSpecs,
        peripherals: Option<&Peripherals>,
    ) -> Result<()> {
        // Peripherals: NULL keeps the stored value, blank clears it
        sqlx::query(
            r#"
            INSERT INTO system_info (
                user_id, os, cpu, gpu, memory, storage,
                keyboard, mouse, other_controllers, audio_config, updated_at
            )
            VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                CASE WHEN trim(?7) = '' THEN NULL ELSE ?7 END,
                CASE WHEN trim(?8) = '' THEN NULL ELSE ?8 END,
                CASE WHEN trim(?9) = '' THEN NULL ELSE ?9 END,
                CASE WHEN trim(?10) = '' THEN NULL ELSE ?10 END,
                ?11
            )
            ON CONFLICT(user_id) DO UPDATE SET
                os = excluded.os,
                cpu = excluded.cpu,
                gpu = excluded.gpu,
                memory = excluded.memory,
                storage = excluded.storage,
                keyboard = CASE WHEN ?7 IS NULL THEN system_info.keyboard ELSE excluded.keyboard END,
                mouse = CASE WHEN ?8 IS NULL THEN system_info.mouse ELSE excluded.mouse END,
                other_controllers = CASE WHEN ?9 IS NULL
                    THEN system_info.other_controllers ELSE excluded.other_controllers END,
                audio_config = CASE WHEN ?10 IS NULL
                    THEN system_info.audio_config ELSE excluded.audio_config END,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&specs.os)
        .bind(&specs.cpu)
        .bind(&specs.gpu)
        .bind(&specs.memory)
        .bind(&specs.storage)
        .bind(peripherals.and_then(|p| p.keyboard.as_deref()))
        .bind(peripherals.and_then(|p| p.mouse.as_deref()))
        .bind(peripherals.and_then(|p| p.other_controllers.as_deref()))
        .bind(peripherals.and_then(|p| p.audio_config.as_deref()))
        .bind(Utc::now())
        .execute(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update_peripherals(&self, user_id: UserId, peripherals: &Peripherals) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE system_info SET
                keyboard = CASE WHEN ?2 IS NULL THEN keyboard
                    WHEN trim(?2) = '' THEN NULL ELSE ?2 END,
                mouse = CASE WHEN ?3 IS NULL THEN mouse
                    WHEN trim(?3) = '' THEN NULL ELSE ?3 END,
                other_controllers = CASE WHEN ?4 IS NULL THEN other_controllers
                    WHEN trim(?4) = '' THEN NULL ELSE ?4 END,
                audio_config = CASE WHEN ?5 IS NULL THEN audio_config
                    WHEN trim(?5) = '' THEN NULL ELSE ?5 END,
                updated_at = ?6
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .bind(peripherals.keyboard.as_deref())
        .bind(peripherals.mouse.as_deref())
        .bind(peripherals.other_controllers.as_deref())
        .bind(peripherals.audio_config.as_deref())
        .bind(Utc::now())
        .execute(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<ProfileRecord>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT user_id, os, cpu, gpu, memory, storage,
                   keyboard, mouse, other_controllers, audio_config, updated_at
            FROM system_info WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|r| r.into()))
    }
}

#[async_trait]
impl InventoryStore for Database {
    async fn replace_inventory(
        &self,
        owner_id: UserId,
        ships: &[InventoryRecord],
    ) -> Result<BTreeSet<String>> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // The write comes first so the lock is taken under the busy timeout;
        // a read snapshot cannot be upgraded once another writer commits
        let previous: Vec<(String, String)> = sqlx::query_as(
            "DELETE FROM hangar_ships WHERE user_id = ?1 RETURNING manufacturer_name, name",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        for (position, ship) in ships.iter().enumerate() {
            let blank = ship.blank_fields();
            if !blank.is_empty() {
                return Err(ForgeError::Persistence(format!(
                    "ship #{} has blank {}",
                    position + 1,
                    blank.join(", ")
                )));
            }

            sqlx::query(&format!(
                "INSERT INTO hangar_ships ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                SHIP_COLUMNS
            ))
            .bind(owner_id)
            .bind(position as i64)
            .bind(&ship.ship_code)
            .bind(&ship.name)
            .bind(&ship.manufacturer_code)
            .bind(&ship.manufacturer_name)
            .bind(&ship.ship_name)
            .bind(ship.lti)
            .bind(ship.warbond)
            .bind(&ship.entity_type)
            .bind(&ship.pledge_id)
            .bind(&ship.pledge_name)
            .bind(&ship.pledge_date)
            .bind(&ship.pledge_cost)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(previous
            .into_iter()
            .map(|(manufacturer, name)| model_key(&manufacturer, &name))
            .collect())
    }

    async fn get_inventory(&self, owner_id: UserId) -> Result<Vec<InventoryRecord>> {
        let rows: Vec<ShipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hangar_ships WHERE user_id = ?1 \
             ORDER BY manufacturer_name, name, position",
            SHIP_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn aggregate_fleet(&self) -> Result<FleetAggregate> {
        let rows: Vec<ShipRow> =
            sqlx::query_as(&format!("SELECT {} FROM hangar_ships", SHIP_COLUMNS))
                .fetch_all(&*self.pool)
                .await
                .map_err(db_err)?;

        let ships: Vec<InventoryRecord> = rows.into_iter().map(|r| r.into()).collect();
        Ok(aggregate::summarize(&ships))
    }

    async fn list_distinct_models(&self) -> Result<BTreeSet<String>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT DISTINCT manufacturer_name, name FROM hangar_ships")
                .fetch_all(&*self.pool)
                .await
                .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(manufacturer, name)| model_key(&manufacturer, &name))
            .collect())
    }

    async fn find_owners(&self, model_key: &str) -> Result<Vec<ShipOwner>> {
        let mut rows: Vec<ShipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM hangar_ships WHERE manufacturer_name || ' ' || name = ?1",
            SHIP_COLUMNS
        ))
        .bind(model_key)
        .fetch_all(&*self.pool)
        .await
        .map_err(db_err)?;

        rows.sort_by(|a, b| {
            compare_pledge_dates(&a.pledge_date, &b.pledge_date)
                .then_with(|| a.user_id.cmp(&b.user_id))
                .then_with(|| a.position.cmp(&b.position))
        });

        Ok(rows
            .into_iter()
            .map(|r| ShipOwner {
                owner_id: r.user_id,
                ship: r.into(),
            })
            .collect())
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: i64,
    os: String,
    cpu: String,
    gpu: String,
    memory: String,
    storage: String,
    keyboard: Option<String>,
    mouse: Option<String>,
    other_controllers: Option<String>,
    audio_config: Option<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(r: ProfileRow) -> Self {
        ProfileRecord {
            user_id: r.user_id,
            specs: SystemSpecs {
                os: r.os,
                cpu: r.cpu,
                gpu: r.gpu,
                memory: r.memory,
                storage: r.storage,
            },
            keyboard: r.keyboard,
            mouse: r.mouse,
            other_controllers: r.other_controllers,
            audio_config: r.audio_config,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShipRow {
    user_id: i64,
    position: i64,
    ship_code: String,
    name: String,
    manufacturer_code: String,
    manufacturer_name: String,
    ship_name: String,
    lti: bool,
    warbond: bool,
    entity_type: String,
    pledge_id: String,
    pledge_name: String,
    pledge_date: String,
    pledge_cost: String,
}

impl From<ShipRow> for InventoryRecord {
    fn from(r: ShipRow) -> Self {
        InventoryRecord {
            ship_code: r.ship_code,
            name: r.name,
            manufacturer_code: r.manufacturer_code,
            manufacturer_name: r.manufacturer_name,
            ship_name: r.ship_name,
            lti: r.lti,
            warbond: r.warbond,
            entity_type: r.entity_type,
            pledge_id: r.pledge_id,
            pledge_name: r.pledge_name,
            pledge_date: r.pledge_date,
            pledge_cost: r.pledge_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn specs(os: &str) -> SystemSpecs {
        SystemSpecs {
            os: os.to_string(),
            cpu: "Intel i9-13900K".to_string(),
            gpu: "AMD RX 7900 XTX".to_string(),
            memory: "32GB DDR5-6000".to_string(),
            storage: "2TB NVMe SSD".to_string(),
        }
    }

    fn ship(manufacturer: &str, name: &str, pledge_id: &str, pledge_date: &str) -> InventoryRecord {
        InventoryRecord {
            ship_code: format!("{}_{}", manufacturer, name),
            name: name.to_string(),
            manufacturer_code: manufacturer.to_uppercase(),
            manufacturer_name: manufacturer.to_string(),
            ship_name: name.to_string(),
            lti: false,
            warbond: false,
            entity_type: "ship".to_string(),
            pledge_id: pledge_id.to_string(),
            pledge_name: format!("Package {}", pledge_id),
            pledge_date: pledge_date.to_string(),
            pledge_cost: "$45.00 USD".to_string(),
        }
    }

    #[tokio::test]
    async fn test_profile_upsert_and_get() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.get_profile(1).await.unwrap().is_none());

        db.upsert_profile(1, &specs("Windows 11"), None).await.unwrap();
        let first = db.get_profile(1).await.unwrap().unwrap();
        assert_eq!(first.specs, specs("Windows 11"));
        assert!(!first.has_peripherals());

        db.upsert_profile(1, &specs("Arch Linux"), None).await.unwrap();
        let second = db.get_profile(1).await.unwrap().unwrap();
        assert_eq!(second.specs.os, "Arch Linux");
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_peripheral_merge_keeps_and_clears() {
        let db = Database::in_memory().await.unwrap();
        let all = Peripherals {
            keyboard: Some("Keychron Q1".to_string()),
            mouse: Some("Logitech G Pro".to_string()),
            other_controllers: Some("VKB Gladiator".to_string()),
            audio_config: None,
        };
        db.upsert_profile(5, &specs("macOS"), Some(&all)).await.unwrap();

        // Omitted peripherals survive a required-field update
        db.upsert_profile(5, &specs("macOS Sonoma"), None).await.unwrap();
        let kept = db.get_profile(5).await.unwrap().unwrap();
        assert_eq!(kept.keyboard.as_deref(), Some("Keychron Q1"));
        assert_eq!(kept.mouse.as_deref(), Some("Logitech G Pro"));

        // Partial update: set one, clear one, leave the rest
        let partial = Peripherals {
            mouse: Some(String::new()),
            audio_config: Some("Headset".to_string()),
            ..Default::default()
        };
        assert!(db.update_peripherals(5, &partial).await.unwrap());
        let merged = db.get_profile(5).await.unwrap().unwrap();
        assert_eq!(merged.keyboard.as_deref(), Some("Keychron Q1"));
        assert_eq!(merged.mouse, None);
        assert_eq!(merged.other_controllers.as_deref(), Some("VKB Gladiator"));
        assert_eq!(merged.audio_config.as_deref(), Some("Headset"));
    }

    #[tokio::test]
    async fn test_update_peripherals_without_profile() {
        let db = Database::in_memory().await.unwrap();
        let updated = db
            .update_peripherals(77, &Peripherals::default())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_blank_required_field_is_persistence_error() {
        let db = Database::in_memory().await.unwrap();
        let err = assert_err!(db.upsert_profile(3, &specs(""), None).await);
        assert!(err.is_persistence());
    }

    #[tokio::test]
    async fn test_replace_inventory_swaps_snapshot() {
        let db = Database::in_memory().await.unwrap();
        let first = vec![
            ship("RSI", "Aurora MR", "1", "January 01, 2019"),
            ship("Aegis", "Avenger", "2", "January 02, 2019"),
        ];
        let previous = assert_ok!(db.replace_inventory(10, &first).await);
        assert!(previous.is_empty());

        let stored = db.get_inventory(10).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].manufacturer_name, "Aegis");
        assert_eq!(stored[1].manufacturer_name, "RSI");

        let second = vec![ship("Drake", "Cutlass Black", "3", "March 03, 2020")];
        let previous = assert_ok!(db.replace_inventory(10, &second).await);
        assert_eq!(
            previous.into_iter().collect::<Vec<_>>(),
            vec!["Aegis Avenger".to_string(), "RSI Aurora MR".to_string()]
        );
        assert_eq!(db.get_inventory(10).await.unwrap(), second);

        assert_ok!(db.replace_inventory(10, &[]).await);
        assert!(db.get_inventory(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_identical_ships_in_one_pledge_are_kept() {
        let db = Database::in_memory().await.unwrap();
        let twins = vec![
            ship("Aegis", "Avenger", "9", "May 05, 2020"),
            ship("Aegis", "Avenger", "9", "May 05, 2020"),
        ];
        db.replace_inventory(4, &twins).await.unwrap();
        assert_eq!(db.get_inventory(4).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_batch_rolls_back() {
        let db = Database::in_memory().await.unwrap();
        let original = vec![ship("Aegis", "Avenger", "1", "May 05, 2020")];
        db.replace_inventory(8, &original).await.unwrap();

        let mut broken = ship("Drake", "Vulture", "2", "June 06, 2021");
        broken.ship_code = "  ".to_string();
        let batch = vec![ship("RSI", "Zeus", "3", "July 07, 2022"), broken];

        let err = assert_err!(db.replace_inventory(8, &batch).await);
        assert!(err.is_persistence());
        assert_eq!(db.get_inventory(8).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_fleet_scans() {
        let db = Database::in_memory().await.unwrap();

        let mut lti = ship("Aegis", "Avenger", "1", "June 01, 2020");
        lti.lti = true;
        let mut named = ship("Aegis", "Avenger", "2", "June 02, 2020");
        named.ship_name = "Night Owl".to_string();
        db.replace_inventory(1, &[lti, named]).await.unwrap();

        let mut warbond = ship("Aegis", "Avenger", "3", "January 15, 2018");
        warbond.warbond = true;
        db.replace_inventory(2, &[warbond, ship("RSI", "Aurora MR", "4", "soon")])
            .await
            .unwrap();

        let fleet = db.aggregate_fleet().await.unwrap();
        let avenger = &fleet["Aegis Avenger"];
        assert_eq!(avenger.count, 3);
        assert_eq!(avenger.lifetime_insured_count, 1);
        assert_eq!(avenger.warbond_count, 1);
        assert_eq!(avenger.custom_names_display(), "Night Owl");

        let models = db.list_distinct_models().await.unwrap();
        assert_eq!(
            models.into_iter().collect::<Vec<_>>(),
            vec!["Aegis Avenger".to_string(), "RSI Aurora MR".to_string()]
        );

        let owners = db.find_owners("Aegis Avenger").await.unwrap();
        let order: Vec<_> = owners
            .iter()
            .map(|o| (o.owner_id, o.ship.pledge_id.as_str()))
            .collect();
        assert_eq!(order, vec![(2, "3"), (1, "1"), (1, "2")]);

        assert!(db.find_owners("Unknown Ship").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        assert_ok!(db.ping().await);
        db.close().await;
        db.close().await;
        assert_err!(db.ping().await);
    }
}
