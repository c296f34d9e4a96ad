//! Dictation frames and reply decoding.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};
use tripwise_core::voice::SpeechError;

/// Bytes of 16 kHz 16-bit PCM per frame (40 ms).
pub(crate) const FRAME_BYTES: usize = 1280;

/// Pause between audio frames.
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(40);

const AUDIO_FORMAT: &str = "audio/L16;rate=16000";

/// Opening frame: session parameters, no audio.
pub(crate) fn config_frame(app_id: &str, language: &str) -> Value {
    json!({
        "common": { "app_id": app_id },
        "business": {
            "domain": "iat",
            "language": language,
            "accent": "mandarin",
            "vad_eos": 2000
        },
        "data": {
            "status": 0,
            "format": AUDIO_FORMAT,
            "encoding": "raw",
            "audio": ""
        }
    })
}

/// Audio frames, the last one marked final.
pub(crate) fn audio_frames(pcm: &[u8]) -> Vec<Value> {
    let count = pcm.len().div_ceil(FRAME_BYTES);
    pcm.chunks(FRAME_BYTES)
        .enumerate()
        .map(|(index, chunk)| {
            let status = if index + 1 == count { 2 } else { 1 };
            json!({
                "data": {
                    "status": status,
                    "format": AUDIO_FORMAT,
                    "encoding": "raw",
                    "audio": STANDARD.encode(chunk)
                }
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct Reply {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<ReplyData>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyData {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    result: Option<ReplyResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyResult {
    #[serde(default)]
    ws: Vec<WordSlot>,
}

#[derive(Debug, Default, Deserialize)]
struct WordSlot {
    #[serde(default)]
    cw: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    w: String,
}

/// Accumulates recognized words across replies.
#[derive(Debug, Default)]
pub(crate) struct Transcript {
    text: String,
}

impl Transcript {
    /// Adds one reply; `Ok(true)` once the service marks the result final.
    pub(crate) fn absorb(&mut self, reply: Reply) -> Result<bool, SpeechError> {
        if reply.code != 0 {
            return Err(SpeechError::Service {
                code: reply.code,
                message: reply.message,
            });
        }
        let Some(data) = reply.data else {
            return Ok(false);
        };
        for slot in data.result.into_iter().flat_map(|r| r.ws) {
            for candidate in slot.cw {
                self.text.push_str(&candidate.w);
            }
        }
        Ok(data.status == 2)
    }

    pub(crate) fn into_text(self) -> String {
        self.text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(raw: &str) -> Reply {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_audio_frames_split_and_mark_last() {
        let pcm = vec![0u8; FRAME_BYTES * 2 + 10];
        let frames = audio_frames(&pcm);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0]["data"]["status"], 1);
        assert_eq!(frames[1]["data"]["status"], 1);
        assert_eq!(frames[2]["data"]["status"], 2);

        let last = STANDARD
            .decode(frames[2]["data"]["audio"].as_str().unwrap())
            .unwrap();
        assert_eq!(last.len(), 10);
    }

    #[test]
    fn test_single_frame_is_final() {
        let frames = audio_frames(&[1, 2, 3]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["data"]["status"], 2);
    }

    #[test]
    fn test_config_frame_has_no_audio() {
        let frame = config_frame("app", "en_us");
        assert_eq!(frame["common"]["app_id"], "app");
        assert_eq!(frame["business"]["language"], "en_us");
        assert_eq!(frame["data"]["status"], 0);
        assert_eq!(frame["data"]["audio"], "");
    }

    #[test]
    fn test_transcript_concatenates_until_final() {
        let mut transcript = Transcript::default();

        let done = transcript
            .absorb(reply(
                r#"{"code":0,"data":{"status":1,"result":{"ws":[{"cw":[{"w":"去"}]},{"cw":[{"w":"杭州"}]}]}}}"#,
            ))
            .unwrap();
        assert!(!done);

        let done = transcript
            .absorb(reply(
                r#"{"code":0,"data":{"status":2,"result":{"ws":[{"cw":[{"w":"玩三天"}]}]}}}"#,
            ))
            .unwrap();
        assert!(done);
        assert_eq!(transcript.into_text(), "去杭州玩三天");
    }

    #[test]
    fn test_transcript_reports_service_errors() {
        let mut transcript = Transcript::default();
        let err = transcript
            .absorb(reply(r#"{"code":10165,"message":"invalid handle"}"#))
            .unwrap_err();

        assert!(matches!(err, SpeechError::Service { code: 10165, .. }));
    }
}
