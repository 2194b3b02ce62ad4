//! Console speech frontends.
//!
//! `ConsoleCapture` reads one line from stdin per `listen` call, standing in
//! for a microphone; `ConsoleSpeech` prints responses, standing in for a TTS
//! engine. Both normalize the same way a recognizer frontend would, so the
//! interpreter loop behaves identically whichever frontend is plugged in.

use async_trait::async_trait;
use tracing::debug;

use sdk::capability::{Result, SpeechCapture, SpeechOutput};
use sdk::errors::AssistantError;

/// Captures utterances typed on stdin.
pub struct ConsoleCapture;

#[async_trait]
impl SpeechCapture for ConsoleCapture {
    async fn listen(&self) -> Result<Option<String>> {
        // stdin reads are blocking; keep them off the runtime threads.
        let line = tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            std::io::stdin().read_line(&mut buf).map(|n| (n, buf))
        })
        .await
        .map_err(|e| AssistantError::Recognition(format!("input task failed: {}", e)))?
        .map_err(AssistantError::Io)?;

        let (bytes_read, raw) = line;
        if bytes_read == 0 {
            // EOF, treated like a session-ending silence.
            debug!("stdin closed");
            return Ok(None);
        }

        let heard = raw.trim().to_lowercase();
        if heard.is_empty() {
            return Ok(None);
        }
        debug!("heard: {}", heard);
        Ok(Some(heard))
    }
}

/// Prints responses with the assistant prefix.
pub struct ConsoleSpeech {
    name: String,
}

impl ConsoleSpeech {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SpeechOutput for ConsoleSpeech {
    fn say(&self, text: &str) {
        println!("{}: {}", self.name, text);
    }
}
