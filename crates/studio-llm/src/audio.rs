//! Wrapping of raw PCM speech output into WAV.

use std::io::Cursor;

use crate::protocol::{ProtocolError, ProtocolResult};

/// Speech models answer at this rate unless the MIME type says otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// True for `audio/L16` / `audio/pcm` payloads that need a container.
pub fn is_raw_pcm(mime_type: &str) -> bool {
    let mime_type = mime_type.to_ascii_lowercase();
    mime_type.starts_with("audio/l16") || mime_type.starts_with("audio/pcm")
}

/// Sample rate from parameters like `audio/L16;codec=pcm;rate=24000`.
pub fn sample_rate_from_mime(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Mono 16-bit little-endian PCM to a WAV file in memory.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> ProtocolResult<Vec<u8>> {
    if pcm.len() % 2 != 0 {
        return Err(ProtocolError::InvalidAudio(format!(
            "PCM payload has odd length {}",
            pcm.len()
        )));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| ProtocolError::InvalidAudio(e.to_string()))?;
        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .map_err(|e| ProtocolError::InvalidAudio(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| ProtocolError::InvalidAudio(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}
