use base64::Engine;
use serde::Serialize;

/// Gemini TTS emits 16-bit little-endian mono PCM at this rate.
pub const TTS_PCM16_SAMPLE_RATE: u32 = 24_000;

/// Base64-encoded synthesized speech, exactly as returned by the model,
/// together with the PCM sample rate its mime type declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AudioPayload {
    data: String,
    #[serde(skip)]
    sample_rate: u32,
}

impl AudioPayload {
    /// Accepts `data` only if it is non-empty and decodes as standard base64.
    ///
    /// The sample rate defaults to `TTS_PCM16_SAMPLE_RATE`.
    pub fn from_base64(data: impl Into<String>) -> Option<Self> {
        let data: String = data.into();
        let data = data.trim();
        match base64::engine::general_purpose::STANDARD.decode(data) {
            Ok(bytes) if !bytes.is_empty() => Some(Self {
                data: data.to_string(),
                sample_rate: TTS_PCM16_SAMPLE_RATE,
            }),
            _ => None,
        }
    }

    /// Takes the sample rate from a mime type such as
    /// `audio/L16;codec=pcm;rate=16000`, keeping the current one when the
    /// mime type names none.
    pub fn with_mime_type(mut self, mime_type: Option<&str>) -> Self {
        if let Some(rate) = mime_type.and_then(sample_rate_from_mime) {
            self.sample_rate = rate;
        }
        self
    }

    pub fn as_base64(&self) -> &str {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Raw PCM16 bytes.
    pub fn decode(&self) -> Vec<u8> {
        // Validated on construction.
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .unwrap_or_default()
    }

    /// The payload wrapped as a playable WAV file at its own sample rate.
    pub fn to_wav(&self) -> Vec<u8> {
        pcm16_to_wav(&self.decode(), self.sample_rate)
    }
}

/// Reads `rate=NNNN` from a mime type such as `audio/L16;codec=pcm;rate=24000`.
pub fn sample_rate_from_mime(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse().ok())
        .filter(|rate| *rate > 0)
}

/// Prepends a canonical 44-byte RIFF header to mono 16-bit PCM.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}
