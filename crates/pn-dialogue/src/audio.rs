//! Audio normalization.
//!
//! The dialogue service wants mono 16 kHz PCM WAV. Recordings arrive in
//! whatever container the capture device produced, so they are piped through
//! an external transcoder first.

use std::future::Future;
use std::process::Stdio;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{DialogueError, DialogueResult};

/// Sample rate the dialogue service expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A WAV file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavAudio {
    bytes: Vec<u8>,
}

impl WavAudio {
    /// Wrap WAV bytes after checking the RIFF/WAVE header.
    pub fn from_bytes(bytes: Vec<u8>) -> DialogueResult<Self> {
        if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(DialogueError::InvalidAudio(
                "missing RIFF/WAVE header".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Raw file bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty (never true for a validated file).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Channel count from the `fmt ` chunk, when it sits at the canonical offset.
    pub fn channels(&self) -> Option<u16> {
        self.fmt_chunk()
            .map(|fmt| u16::from_le_bytes([fmt[2], fmt[3]]))
    }

    /// Sample rate from the `fmt ` chunk, when it sits at the canonical offset.
    pub fn sample_rate(&self) -> Option<u32> {
        self.fmt_chunk()
            .map(|fmt| u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]))
    }

    /// Encode for the chat API.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    fn fmt_chunk(&self) -> Option<&[u8]> {
        if self.bytes.len() < 28 || &self.bytes[12..16] != b"fmt " {
            return None;
        }
        Some(&self.bytes[20..28])
    }
}

/// Converts a captured recording into mono 16 kHz WAV.
pub trait Transcoder: Send + Sync {
    /// Convert `raw` audio in any container the transcoder understands.
    fn transcode(&self, raw: &[u8]) -> impl Future<Output = DialogueResult<WavAudio>> + Send;
}

/// Transcoder that shells out to `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegTranscoder {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments that read any input on stdin and write 16-bit mono 16 kHz WAV to stdout.
    pub fn args() -> [&'static str; 12] {
        [
            "-i",
            "pipe:0",
            "-f",
            "wav",
            "-acodec",
            "pcm_s16le",
            "-ar",
            "16000",
            "-ac",
            "1",
            "-loglevel",
            "error",
        ]
    }
}

impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, raw: &[u8]) -> DialogueResult<WavAudio> {
        let mut child = Command::new(&self.program)
            .args(Self::args())
            .arg("pipe:1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DialogueError::Transcode(format!("failed to start {}: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| DialogueError::Transcode("transcoder stdin unavailable".to_string()))?;
        let input = raw.to_vec();
        // feed stdin concurrently so a full stdout pipe cannot deadlock us
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| DialogueError::Transcode(e.to_string()))?;
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "transcoder closed stdin early"),
            Err(e) => return Err(DialogueError::Transcode(e.to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "transcoder failed");
            return Err(DialogueError::Transcode(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        debug!(input_bytes = raw.len(), output_bytes = output.stdout.len(), "transcoded audio");
        WavAudio::from_bytes(output.stdout)
    }
}

/// Transcoder for input that is already WAV.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranscoder;

impl Transcoder for PassthroughTranscoder {
    async fn transcode(&self, raw: &[u8]) -> DialogueResult<WavAudio> {
        let wav = WavAudio::from_bytes(raw.to_vec())?;
        if wav.sample_rate() != Some(TARGET_SAMPLE_RATE) || wav.channels() != Some(1) {
            warn!(
                sample_rate = ?wav.sample_rate(),
                channels = ?wav.channels(),
                "passing through WAV that is not mono 16 kHz"
            );
        }
        Ok(wav)
    }
}

/// A canonical 44-byte header followed by `samples` of 16-bit silence.
pub fn silent_wav(sample_rate: u32, channels: u16, samples: u32) -> Vec<u8> {
    let block_align = channels * 2;
    let data_len = samples * u32::from(block_align);
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}
