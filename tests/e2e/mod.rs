// End-to-end tests for the PowerPulse backend
//
// One shared testcontainers PostgreSQL instance serves the whole suite.
// Each test leases its own database cloned from a migrated template, so
// tests run in parallel. LLM and TTS providers are in-process fakes and
// audio is written to a per-test temp directory.

mod helpers;
mod test_cron;
mod test_health;
mod test_tts;
