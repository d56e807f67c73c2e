use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use powerpulse_backend::controllers::{cron::CronController, tts::TtsController};
use powerpulse_backend::domain::audio::{AudioProcessor, AudioProcessorConfig};
use powerpulse_backend::domain::content::{ContentService, DailyContentService};
use powerpulse_backend::domain::queue::{QueueConfig, QueueService};
use powerpulse_backend::domain::tts::TtsService;
use powerpulse_backend::infrastructure::config::{
    Config, LlmProvider, LogFormat, StorageBackend, TtsProvider,
};
use powerpulse_backend::infrastructure::db::{check_connection, create_pool};
use powerpulse_backend::infrastructure::http::start_http_server;
use powerpulse_backend::infrastructure::repositories::{
    AnthropicLlmRepository, GoogleTtsRepository, LlmRepository, OpenAiLlmRepository,
    PgAudioQueueRepository, PgDailyContentRepository, PgUserRepository, PollyTtsRepository,
    TtsRepository,
};
use powerpulse_backend::infrastructure::storage::{AudioStorage, LocalAudioStorage, S3AudioStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting PowerPulse Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    // AWS is only needed for Polly or S3
    let aws_config = if config.tts_provider == TtsProvider::Polly
        || config.storage_backend == StorageBackend::S3
    {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");
        Some(aws_config)
    } else {
        None
    };

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Providers
    tracing::info!(
        llm = ?config.llm_provider,
        tts = ?config.tts_provider,
        storage = ?config.storage_backend,
        "Instantiating providers..."
    );

    let llm_repo: Arc<dyn LlmRepository> = match config.llm_provider {
        LlmProvider::OpenAi => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("OPENAI_API_KEY is required when LLM_PROVIDER=openai")
            })?;
            let client = async_openai::Client::with_config(
                async_openai::config::OpenAIConfig::new().with_api_key(api_key),
            );
            Arc::new(OpenAiLlmRepository::new(
                Arc::new(client),
                config.openai_model.clone(),
            ))
        }
        LlmProvider::Anthropic => {
            let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("ANTHROPIC_API_KEY is required when LLM_PROVIDER=anthropic")
            })?;
            Arc::new(AnthropicLlmRepository::new(
                api_key,
                config.anthropic_model.clone(),
            )?)
        }
    };

    let tts_repo: Arc<dyn TtsRepository> = match (&config.tts_provider, &aws_config) {
        (TtsProvider::Polly, Some(aws_config)) => Arc::new(PollyTtsRepository::new(Arc::new(
            aws_sdk_polly::Client::new(aws_config),
        ))),
        _ => {
            let api_key = config.google_tts_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("GOOGLE_TTS_API_KEY is required when TTS_PROVIDER=google")
            })?;
            Arc::new(GoogleTtsRepository::new(api_key)?)
        }
    };

    let storage: Arc<dyn AudioStorage> = match (&config.storage_backend, &aws_config) {
        (StorageBackend::S3, Some(aws_config)) => {
            let bucket = config.s3_bucket.clone().ok_or_else(|| {
                anyhow::anyhow!("S3_BUCKET is required when STORAGE_BACKEND=s3")
            })?;
            Arc::new(S3AudioStorage::new(
                Arc::new(aws_sdk_s3::Client::new(aws_config)),
                bucket,
                config.s3_public_base_url.clone(),
            ))
        }
        _ => Arc::new(LocalAudioStorage::new(
            config.local_storage_dir.clone(),
            config.local_storage_base_url.clone(),
        )),
    };

    // 2. Repositories (inject db pool)
    tracing::info!("Instantiating repositories...");
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let content_repo = Arc::new(PgDailyContentRepository::new(pool.clone()));
    let queue_repo = Arc::new(PgAudioQueueRepository::new(pool.clone()));

    // 3. Services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(tts_repo, config.voice_cache_enabled));
    let content_service = Arc::new(ContentService::new(llm_repo));
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

    // 4. Controllers
    tracing::info!("Instantiating controllers...");
    let cron_controller = Arc::new(CronController::new(
        queue_service,
        daily_content_service,
        config.job_retention_days,
    ));
    let tts_controller = Arc::new(TtsController::new(tts_service));

    start_http_server(pool, config, cron_controller, tts_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "powerpulse_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
