//! Audio playback of synthesized speech

use crate::error::TtsError;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::sync::mpsc;
use std::thread;

/// Decodes and plays an encoded audio clip
#[cfg_attr(test, mockall::automock)]
pub trait AudioOutput: Send + Sync {
    /// Start playing `bytes`. Returns once playback has started; the clip
    /// keeps playing in the background.
    fn play(&self, bytes: Vec<u8>) -> Result<(), TtsError>;
}

/// Plays through the default output device, one fresh stream per clip
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioOutput;

impl AudioOutput for RodioOutput {
    fn play(&self, bytes: Vec<u8>) -> Result<(), TtsError> {
        let source = decode(bytes)?;
        let (started_tx, started_rx) = mpsc::channel();

        // OutputStream is !Send, so it is created and kept on the playback thread
        thread::Builder::new()
            .name("tts-playback".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = started_tx.send(Err(TtsError::Output(e.to_string())));
                        return;
                    }
                };
                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = started_tx.send(Err(TtsError::Output(e.to_string())));
                        return;
                    }
                };
                sink.append(source);
                let _ = started_tx.send(Ok(()));
                sink.sleep_until_end();
                tracing::debug!("Playback finished");
            })
            .map_err(|e| TtsError::Output(e.to_string()))?;

        started_rx
            .recv()
            .map_err(|_| TtsError::Output("playback thread exited".to_string()))?
    }
}

/// Decode an encoded clip (mp3, wav, ogg/vorbis, flac)
pub fn decode(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, TtsError> {
    Decoder::new(Cursor::new(bytes)).map_err(|e| TtsError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::Source;

    /// Minimal 16-bit mono PCM wav
    fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_decode_wav() {
        let decoder = decode(wav_bytes(&[0, 1000, -1000, 0], 16_000)).unwrap();
        assert_eq!(decoder.channels(), 1);
        assert_eq!(decoder.sample_rate(), 16_000);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode(b"definitely not audio".to_vec()).err().unwrap();
        assert!(matches!(err, TtsError::Decode(_)));
    }

    #[test]
    fn test_play_rejects_undecodable_before_opening_device() {
        let err = RodioOutput.play(vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, TtsError::Decode(_)));
    }
}
