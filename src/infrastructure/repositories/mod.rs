pub mod anthropic_llm_repository;
pub mod audio_queue_repository;
pub mod daily_content_repository;
pub mod google_tts_repository;
pub mod llm_repository;
pub mod openai_llm_repository;
pub mod polly_tts_repository;
pub mod tts_repository;
pub mod user_repository;

pub use anthropic_llm_repository::AnthropicLlmRepository;
pub use audio_queue_repository::PgAudioQueueRepository;
pub use daily_content_repository::PgDailyContentRepository;
pub use google_tts_repository::GoogleTtsRepository;
pub use llm_repository::{LlmRepository, LlmRequest};
pub use openai_llm_repository::OpenAiLlmRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use tts_repository::TtsRepository;
pub use user_repository::PgUserRepository;
