pub mod archive;
pub mod minimax;

pub use minimax::MiniMaxClient;

use async_trait::async_trait;

/// Errors from one remote synthesis attempt. Every variant is terminal for
/// the attempt; retry policy lives with the caller.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Provider answered with a non-zero base_resp status code
    #[error("provider error {code}: {message}")]
    Provider { code: i32, message: String },

    /// Provider reported the task itself as Failed
    #[error("speech generation failed on the provider side")]
    TaskFailed,

    /// Polling never observed a terminal task status
    #[error("no terminal task status after {attempts} polls")]
    PollTimeout { attempts: u32 },

    /// Downloaded archive held no audio entry
    #[error("downloaded archive contains no audio entry")]
    MissingAudio,

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("archive extraction failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for a remote text-to-speech provider.
///
/// Implementations own the full remote workflow for a single attempt and
/// return the raw audio bytes. They never deduplicate: two calls with
/// identical text run two independent remote workflows — caching is the
/// orchestrator's job.
#[async_trait]
pub trait SynthesisClient: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}
