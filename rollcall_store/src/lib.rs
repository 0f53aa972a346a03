#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use rollcall_core::{NewStudent, StudentRecord, StudentRepo};
use rollcall_entities::students;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Set,
};
use tracing::info;
use uuid::Uuid;

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("table") && err.to_string().contains("already exists")
}

fn record_from_model(m: students::Model) -> StudentRecord {
    StudentRecord {
        id: m.id,
        name: m.name,
        rollno: m.rollno,
        address: m.address,
    }
}

/// Student persistence backed by sea-orm.
///
/// Records are only ever inserted. Connection pooling is left to the
/// underlying `DatabaseConnection`.
pub struct StudentStore {
    db: DatabaseConnection,
}

impl StudentStore {
    /// Connect to `database_url` and make sure the `students` table exists.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to database for StudentStore");
        let db = Database::connect(database_url).await?;
        Self::from_connection(db).await
    }

    /// Wrap an existing connection, creating the `students` table if needed.
    pub async fn from_connection(db: DatabaseConnection) -> anyhow::Result<Self> {
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);
        let stmt = schema.create_table_from_entity(students::Entity);
        match db
            .execute_unprepared(&backend.build(&stmt).to_string())
            .await
        {
            Ok(_) => info!("Created students table"),
            Err(e) if is_table_already_exists_error(&e) => {
                info!("Table already exists, skipping creation");
            }
            Err(e) => return Err(e.into()),
        }
        info!("StudentStore initialized");
        Ok(Self { db })
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Check that the database is reachable.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}

#[async_trait]
impl StudentRepo for StudentStore {
    async fn create(&self, student: &NewStudent) -> anyhow::Result<StudentRecord> {
        let model = students::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(student.name.clone()),
            rollno: Set(student.rollno),
            address: Set(student.address.clone()),
        };
        let stored = model.insert(&self.db).await?;
        Ok(record_from_model(stored))
    }
}
