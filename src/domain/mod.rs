pub mod audio;
pub mod content;
pub mod queue;
pub mod tts;
pub mod user;
