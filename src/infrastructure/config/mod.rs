use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Cron trigger
    pub cron_secret: String,
    // LLM
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    // TTS
    pub tts_provider: TtsProvider,
    pub google_tts_api_key: Option<String>,
    pub aws_region: String,
    pub voice_cache_enabled: bool,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub local_storage_dir: String,
    /// Public prefix of stored files; the server itself serves them under `/audio`
    pub local_storage_base_url: String,
    // Queue
    pub queue_batch_size: usize,
    pub queue_concurrency: usize,
    pub queue_max_retries: i32,
    pub job_retention_days: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Google,
    Polly,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            cron_secret: env::var("CRON_SECRET")?,
            llm_provider: match env::var("LLM_PROVIDER")
                .unwrap_or_else(|_| "openai".to_string())
                .to_lowercase()
                .as_str()
            {
                "anthropic" => LlmProvider::Anthropic,
                _ => LlmProvider::OpenAi,
            },
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .to_lowercase()
                .as_str()
            {
                "polly" => TtsProvider::Polly,
                _ => TtsProvider::Google,
            },
            google_tts_api_key: env::var("GOOGLE_TTS_API_KEY").ok(),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            voice_cache_enabled: parse_bool(env::var("VOICE_CACHE_ENABLED").ok(), true),
            storage_backend: match env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "local".to_string())
                .to_lowercase()
                .as_str()
            {
                "s3" => StorageBackend::S3,
                _ => StorageBackend::Local,
            },
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
            local_storage_dir: env::var("LOCAL_STORAGE_DIR")
                .unwrap_or_else(|_| "./data/audio".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/audio".to_string()),
            queue_batch_size: env::var("QUEUE_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            queue_concurrency: env::var("QUEUE_CONCURRENCY")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            queue_max_retries: env::var("QUEUE_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            job_retention_days: env::var("JOB_RETENTION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
