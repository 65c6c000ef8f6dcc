//! Offline rendering to a 16-bit PCM WAV file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::args::Voice;
use crate::player::{Player, BLOCK};

/// Render `seconds` of the voice to `path`, duplicating the mono signal to `channels`.
/// Returns the number of frames written.
pub fn render_to_wav(path: &Path, voice: &Voice, sample_rate: u32, channels: u16, seconds: f32) -> Result<usize> {
    let spec = hound::WavSpec {
        channels: channels.max(1),
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut player = Player::new(sample_rate as f32, voice)?;
    let total = (seconds.max(0.0) * sample_rate as f32) as usize;
    let mut block = [0.0_f32; BLOCK];
    let mut written = 0;

    while written < total {
        let n = BLOCK.min(total - written);
        player.fill(&mut block[..n]);
        for &s in &block[..n] {
            let v = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            for _ in 0..spec.channels {
                writer.write_sample(v)?;
            }
        }
        written += n;
    }

    writer.finalize().with_context(|| format!("finalizing {}", path.display()))?;
    log::info!("rendered {written} frames ({seconds:.2}s @ {sample_rate} Hz) to {}", path.display());
    Ok(written)
}
