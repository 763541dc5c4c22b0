//! Shared fixtures for database-backed tests.
//!
//! Each fixture lives in its own freshly created schema, so tests can run
//! concurrently against one `DATABASE_URL`.

#![allow(dead_code)]

use tokio_postgres::{Client, NoTls};

pub const SCHEMA_SQL: &str = include_str!("../../../../sql/jobly-schema.sql");

const SEED_SQL: &str = "
INSERT INTO companies (handle, name) VALUES ('c1', 'C1'), ('c2', 'C2'), ('c3', 'C3');
INSERT INTO jobs (title, salary, equity, company_handle) VALUES
  ('j1', 1, 0.1, 'c1'),
  ('j1b', 2, 0.2, 'c1'),
  ('j3', 3, NULL, 'c3');
";

pub struct TestDb {
    pub client: Client,
    /// Ids of j1, j1b, j3 in insertion order.
    pub job_ids: Vec<i32>,
    schema: SchemaGuard,
}

/// Drops the test schema when the test ends without reaching
/// [`TestDb::teardown`], e.g. after a failed assertion.
pub struct SchemaGuard {
    database_url: String,
    name: String,
    armed: bool,
}

impl SchemaGuard {
    pub fn new(database_url: &str, name: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            name: name.to_string(),
            armed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SchemaGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let url = self.database_url.clone();
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name);
        // The test's runtime may be unwinding, so clean up on a fresh one.
        let cleanup = std::thread::spawn(move || {
            let Ok(rt) = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            else {
                return;
            };
            rt.block_on(async {
                let Ok((client, connection)) = tokio_postgres::connect(&url, NoTls).await else {
                    return;
                };
                tokio::spawn(connection);
                if let Err(e) = client.batch_execute(&sql).await {
                    eprintln!("failed to drop test schema: {e}");
                }
            });
        });
        let _ = cleanup.join();
    }
}

impl TestDb {
    /// Connect, create an isolated schema, load tables and seed rows.
    ///
    /// Returns `None` when `DATABASE_URL` is not set.
    pub async fn setup() -> Option<Self> {
        let database_url = std::env::var("DATABASE_URL").ok()?;
        let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
            .await
            .expect("Failed to connect to DATABASE_URL with NoTls");
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("tokio-postgres connection error: {e}");
            }
        });

        let name = format!("jobly_test_{}", uuid::Uuid::new_v4().simple());
        client
            .batch_execute(&format!("CREATE SCHEMA {name}; SET search_path TO {name};"))
            .await
            .expect("create test schema");
        let schema = SchemaGuard::new(&database_url, &name);
        client.batch_execute(SCHEMA_SQL).await.expect("create tables");
        client.batch_execute(SEED_SQL).await.expect("seed rows");

        let job_ids = client
            .query("SELECT id FROM jobs ORDER BY id", &[])
            .await
            .expect("load seeded ids")
            .iter()
            .map(|row| row.get::<_, i32>(0))
            .collect();

        Some(Self {
            client,
            job_ids,
            schema,
        })
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub async fn teardown(mut self) {
        self.client
            .batch_execute(&format!("DROP SCHEMA {} CASCADE", self.schema.name()))
            .await
            .expect("drop test schema");
        self.schema.disarm();
    }
}
