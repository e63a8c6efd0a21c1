use lazy_static::lazy_static;
use std::sync::Arc;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        // Start PostgreSQL container
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let test_db = TestDatabase {
            connection_string,
            _container: container
        };

        let schema = include_str!("schema.sql");
        test_db.get_client().await?.batch_execute(schema).await?;

        Ok(test_db)
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("Database connection error: {}", e);
            }
        });

        Ok(client)
    }

    /// Inserts a sparse row directly, relying on the column defaults
    pub async fn insert_raw_member(&self, position: i32, name: &str, rank: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.get_client()
            .await?
            .execute(
                "INSERT INTO members (position, display_name, rank) VALUES ($1, $2, $3)",
                &[&position, &name, &rank]
            )
            .await?;

        Ok(())
    }

    /// A table referencing `members` makes every `TRUNCATE members` fail
    pub async fn block_truncate(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.get_client()
            .await?
            .batch_execute("CREATE TABLE member_notes (display_name TEXT REFERENCES members (display_name))")
            .await?;

        Ok(())
    }

    pub async fn unblock_truncate(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.get_client()
            .await?
            .batch_execute("DROP TABLE member_notes")
            .await?;

        Ok(())
    }

    pub async fn member_count(&self) -> Result<i64, Box<dyn std::error::Error>> {
        let row = self
            .get_client()
            .await?
            .query_one("SELECT COUNT(*) FROM members", &[])
            .await?;

        Ok(row.get(0))
    }
}
