//! WAV container handling.

const HEADER_LEN: usize = 44;

/// 16 kHz, 16-bit, mono.
pub const PCM_BYTES_PER_SECOND: usize = 32_000;

/// Longest clip accepted for one recognition.
pub const MAX_AUDIO_SECONDS: usize = 50;

/// PCM size of [`MAX_AUDIO_SECONDS`].
pub const MAX_PCM_BYTES: usize = PCM_BYTES_PER_SECOND * MAX_AUDIO_SECONDS;

/// Returns the PCM payload of a RIFF/WAVE file.
///
/// Input that is not a WAV file, or has no `data` chunk, is returned as is.
#[must_use]
pub fn extract_pcm(audio: &[u8]) -> &[u8] {
    if audio.len() < HEADER_LEN || &audio[..4] != b"RIFF" || &audio[8..12] != b"WAVE" {
        return audio;
    }

    let Some(pos) = audio[12..].windows(4).position(|w| w == b"data") else {
        tracing::warn!(len = audio.len(), "WAV file has no data chunk");
        return audio;
    };

    // Chunk id (4 bytes) and chunk size (4 bytes) precede the samples.
    let pcm = audio.get(12 + pos + 8..).unwrap_or_default();
    tracing::debug!(wav = audio.len(), pcm = pcm.len(), "Extracted PCM from WAV");
    pcm
}

/// True when the buffer starts with a RIFF header.
#[must_use]
pub fn is_wav(audio: &[u8]) -> bool {
    audio.starts_with(b"RIFF")
}
