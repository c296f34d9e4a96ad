//! iFlytek streaming dictation over a websocket.

mod frames;
mod signing;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use tripwise_core::voice::wav::{MAX_AUDIO_SECONDS, MAX_PCM_BYTES, extract_pcm, is_wav};
use tripwise_core::voice::{RecognizerStatus, SpeechError, SpeechRecognizer};
use tripwise_shared::config::SpeechConfig;

use frames::{FRAME_INTERVAL, Reply, Transcript, audio_frames, config_frame};
use signing::{http_date, signed_url};

/// Upper bound on a whole recognition session.
const SESSION_TIMEOUT: Duration = Duration::from_secs(60);

/// Aborts the frame sender when the session ends early or times out.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Recognizer backed by the iFlytek dictation API.
#[derive(Debug, Clone)]
pub struct XfyunRecognizer {
    app_id: String,
    api_key: String,
    api_secret: String,
    host: String,
    path: String,
}

impl XfyunRecognizer {
    /// Builds a recognizer when all credentials are present.
    #[must_use]
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        let (app_id, api_key, api_secret) = config.credentials()?;
        Some(Self {
            app_id: app_id.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            host: config.host.clone(),
            path: config.path.clone(),
        })
    }

    async fn run_session(&self, pcm: &[u8], language: &str) -> Result<String, SpeechError> {
        let url = signed_url(
            &self.host,
            &self.path,
            &self.api_key,
            &self.api_secret,
            &http_date(Utc::now()),
        )?;

        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| SpeechError::Connection(e.to_string()))?;
        let (mut sink, mut stream) = socket.split();

        let mut outgoing = vec![config_frame(&self.app_id, language).to_string()];
        outgoing.extend(audio_frames(pcm).iter().map(ToString::to_string));
        let frame_count = outgoing.len();

        let mut sender = AbortOnDrop(tokio::spawn(async move {
            for frame in outgoing {
                sink.send(Message::text(frame)).await?;
                tokio::time::sleep(FRAME_INTERVAL).await;
            }
            Ok::<_, tokio_tungstenite::tungstenite::Error>(sink)
        }));
        debug!(frames = frame_count, "Streaming audio to dictation service");

        let mut transcript = Transcript::default();
        let outcome = loop {
            let Some(message) = stream.next().await else {
                break Ok(());
            };
            let message = match message {
                Ok(message) => message,
                Err(e) => break Err(SpeechError::Connection(e.to_string())),
            };
            match message {
                Message::Text(text) => {
                    let reply: Reply = match serde_json::from_str(text.as_str()) {
                        Ok(reply) => reply,
                        Err(e) => break Err(SpeechError::Protocol(e.to_string())),
                    };
                    match transcript.absorb(reply) {
                        Ok(true) => break Ok(()),
                        Ok(false) => {}
                        Err(e) => break Err(e),
                    }
                }
                Message::Close(_) => break Ok(()),
                _ => {}
            }
        };

        outcome?;
        if let Ok(Ok(mut sink)) = (&mut sender.0).await {
            let _ = sink.close().await;
        }
        Ok(transcript.into_text())
    }
}

#[async_trait]
impl SpeechRecognizer for XfyunRecognizer {
    fn status(&self) -> RecognizerStatus {
        RecognizerStatus {
            available: true,
            provider: "xfyun".to_string(),
            message: "iFlytek dictation is configured".to_string(),
        }
    }

    async fn recognize(&self, audio: &[u8], language: &str) -> Result<String, SpeechError> {
        if is_wav(audio) {
            debug!(bytes = audio.len(), "Stripping WAV header");
        }
        let pcm = extract_pcm(audio);
        if pcm.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        if pcm.len() > MAX_PCM_BYTES {
            return Err(SpeechError::AudioTooLong {
                max_seconds: MAX_AUDIO_SECONDS,
            });
        }

        info!(bytes = pcm.len(), language, "Recognizing speech");
        let text = tokio::time::timeout(SESSION_TIMEOUT, self.run_session(pcm, language))
            .await
            .map_err(|_| SpeechError::Connection("dictation session timed out".to_string()))?
            .inspect_err(|e| warn!(error = %e, "Speech recognition failed"))?;

        info!(chars = text.chars().count(), "Speech recognized");
        Ok(text)
    }
}
