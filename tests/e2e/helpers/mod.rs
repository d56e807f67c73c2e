use axum::Router;
use once_cell::sync::Lazy;
use powerpulse_backend::{
    controllers::{cron::CronController, tts::TtsController},
    domain::{
        audio::{AudioProcessor, AudioProcessorConfig},
        content::{ContentService, DailyContentService},
        queue::{QueueConfig, QueueService},
        tts::TtsService,
    },
    infrastructure::{
        config::{Config, Environment, LlmProvider, LogFormat, StorageBackend, TtsProvider},
        http::create_router,
        repositories::{PgAudioQueueRepository, PgDailyContentRepository, PgUserRepository},
        storage::LocalAudioStorage,
    },
};
use sqlx::PgPool;
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;

pub mod api_client;
pub mod fake_providers;
pub mod fixtures;

use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use fake_providers::{FakeLlm, FakeTts};
use fixtures::TestFixtures;

pub const CRON_SECRET: &str = "test-cron-secret";
pub const AUDIO_BASE_URL: &str = "http://localhost:8080/audio";

// Docker client for test containers
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

// Shared PostgreSQL container for all tests
static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("🐳 Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub pool: PgPool,
    #[allow(dead_code)]
    pub config: Config,
    pub fixtures: TestFixtures,
    pub tts: Arc<FakeTts>,
    pub audio_dir: TempDir,
    _db: PooledDatabase,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            let audio_dir = tempfile::tempdir().expect("Failed to create audio dir");
            let config = test_config(&pooled_db.database_url, &audio_dir);
            let tts = Arc::new(FakeTts::default());

            let app = create_app(config.clone(), pooled_db.pool.clone(), tts.clone());

            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            Self {
                client: TestClient::new(&base_url),
                pool: pooled_db.pool.clone(),
                config,
                fixtures: TestFixtures::new(pooled_db.pool.clone()),
                tts,
                audio_dir,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Database is returned to the pool by PooledDatabase's Drop
        }
    }
}

fn test_config(database_url: &str, audio_dir: &TempDir) -> Config {
    Config {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        cron_secret: CRON_SECRET.to_string(),
        llm_provider: LlmProvider::OpenAi,
        openai_api_key: None,
        openai_model: "test-model".to_string(),
        anthropic_api_key: None,
        anthropic_model: "test-model".to_string(),
        tts_provider: TtsProvider::Google,
        google_tts_api_key: None,
        aws_region: "us-east-1".to_string(),
        voice_cache_enabled: false,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_public_base_url: None,
        local_storage_dir: audio_dir.path().to_string_lossy().to_string(),
        local_storage_base_url: AUDIO_BASE_URL.to_string(),
        queue_batch_size: 10,
        queue_concurrency: 3,
        queue_max_retries: 3,
        job_retention_days: 7,
    }
}

/// Same wiring as the binary with fake LLM and TTS providers
fn create_app(config: Config, pool: PgPool, tts: Arc<FakeTts>) -> Router {
    let pool = Arc::new(pool);
    let config = Arc::new(config);

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let content_repo = Arc::new(PgDailyContentRepository::new(pool.clone()));
    let queue_repo = Arc::new(PgAudioQueueRepository::new(pool.clone()));
    let storage = Arc::new(LocalAudioStorage::new(
        config.local_storage_dir.clone(),
        config.local_storage_base_url.clone(),
    ));

    let tts_service = Arc::new(TtsService::new(tts, config.voice_cache_enabled));
    let content_service = Arc::new(ContentService::new(Arc::new(FakeLlm)));
    let queue_service = Arc::new(QueueService::new(
        queue_repo,
        content_repo.clone(),
        tts_service.clone(),
        AudioProcessor::new(AudioProcessorConfig::default()),
        storage,
        QueueConfig {
            batch_size: config.queue_batch_size,
            concurrency: config.queue_concurrency,
            max_retries: config.queue_max_retries,
            ..QueueConfig::default()
        },
    ));
    let daily_content_service = Arc::new(DailyContentService::new(
        user_repo,
        content_repo,
        content_service,
        queue_service.clone(),
        config.queue_concurrency,
    ));

    let cron_controller = Arc::new(CronController::new(
        queue_service,
        daily_content_service,
        config.job_retention_days,
    ));
    let tts_controller = Arc::new(TtsController::new(tts_service));

    create_router(pool, config, cron_controller, tts_controller)
}
