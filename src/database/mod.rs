use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

pub const USERS: &str = "users";
pub const ROLES: &str = "roles";
pub const REFRESH_TOKENS: &str = "refreshtokens";
pub const RESET_TOKENS: &str = "resettokens";
pub const MENTORSHIPS: &str = "mentorships";
pub const CAREER_ADVICE: &str = "careeradvices";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("alumni-mentorship-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the invariants rely on (unique email, one refresh
    /// token per user, one open mentorship per pair) plus lookup indexes.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        self.create_index(USERS, doc! { "email": 1 }, Some(unique()), true).await?;
        self.create_index(USERS, doc! { "userType": 1, "graduationYear": -1 }, None, false)
            .await?;

        self.create_index(REFRESH_TOKENS, doc! { "userId": 1 }, Some(unique()), true)
            .await?;
        self.create_index(REFRESH_TOKENS, doc! { "token": 1 }, None, false).await?;
        self.create_index(RESET_TOKENS, doc! { "token": 1 }, None, false).await?;

        let open_pair = IndexOptions::builder()
            .unique(true)
            .partial_filter_expression(doc! { "open": true })
            .name("open_mentorship_per_pair".to_string())
            .build();
        self.create_index(
            MENTORSHIPS,
            doc! { "studentId": 1, "alumniId": 1 },
            Some(open_pair),
            true,
        )
        .await?;

        self.create_index(CAREER_ADVICE, doc! { "createdAt": -1 }, None, false).await?;
        self.create_index(CAREER_ADVICE, doc! { "tags": 1 }, None, false).await?;

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    /// Builds one index. Failures on `required` indexes abort startup since
    /// the uniqueness guarantees depend on them.
    async fn create_index(
        &self,
        collection: &str,
        keys: Document,
        options: Option<IndexOptions>,
        required: bool,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder().keys(keys.clone()).options(options).build();

        match self.collection::<Document>(collection).create_index(index).await {
            Ok(_) => {
                log::info!("   ✅ Index ready: {}({:?})", collection, keys.keys().collect::<Vec<_>>());
                Ok(())
            }
            Err(e) if required => {
                log::error!("   ❌ Required index on {} failed: {}", collection, e);
                Err(e)
            }
            Err(e) => {
                log::debug!("   ℹ️  Index on {} skipped: {}", collection, e);
                Ok(())
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}

/// True when a write failed on a unique index.
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}
