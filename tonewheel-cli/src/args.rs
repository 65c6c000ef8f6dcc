//! Command-line arguments (`--key=value`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Voice registration requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub note: u8,
    pub fine: u8,
    /// Drawbar positions 0..=8, panel order.
    pub drawbars: [u16; 6],
    /// Key click amount 0..=1.
    pub click: f32,
    /// Percussion amount -1..=1; negative picks the lower harmonic.
    pub perc: f32,
    pub retrigger_ms: Option<u32>,
    pub gain: f32,
    pub seed: Option<u32>,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            note: 48,
            fine: 0,
            drawbars: [8, 8, 8, 0, 0, 0],
            click: 0.7,
            perc: 1.0,
            retrigger_ms: Some(1000),
            gain: 0.5,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub list_devices: bool,
    pub device_name: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub duration_sec: Option<f32>,
    pub render: Option<PathBuf>,
    pub voice: Voice,
}

fn parse_drawbars(s: &str) -> Result<[u16; 6]> {
    let mut out = [0_u16; 6];
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != out.len() {
        bail!("expected 6 comma-separated drawbar values, got {}", parts.len());
    }
    for (slot, part) in out.iter_mut().zip(parts) {
        let v: u16 = part.parse().with_context(|| format!("bad drawbar value {part:?}"))?;
        if v > 8 {
            bail!("drawbar value {v} out of range 0..=8");
        }
        *slot = v;
    }
    Ok(out)
}

fn parse_in_range(name: &str, s: &str, lo: f32, hi: f32) -> Result<f32> {
    let v: f32 = s.parse().with_context(|| format!("bad --{name} value {s:?}"))?;
    if !(lo..=hi).contains(&v) {
        bail!("--{name}={v} out of range {lo}..={hi}");
    }
    Ok(v)
}

pub fn parse_args<I, S>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut a = Args::default();
    for arg in args {
        let s = arg.as_ref();
        if s == "--list-devices" { a.list_devices = true; continue; }
        if s == "--no-retrigger" { a.voice.retrigger_ms = None; continue; }
        if let Some(rest) = s.strip_prefix("--device=")      { a.device_name = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--sample-rate=") { a.sample_rate = Some(rest.parse().context("bad --sample-rate")?); continue; }
        if let Some(rest) = s.strip_prefix("--channels=")    { a.channels    = Some(rest.parse().context("bad --channels")?);    continue; }
        if let Some(rest) = s.strip_prefix("--duration=")    { a.duration_sec = Some(parse_in_range("duration", rest, 0.0, 3600.0)?); continue; }
        if let Some(rest) = s.strip_prefix("--render=")      { a.render      = Some(PathBuf::from(rest)); continue; }
        if let Some(rest) = s.strip_prefix("--note=") {
            let n: u8 = rest.parse().context("bad --note")?;
            if n > 151 { bail!("--note={n} out of range 0..=151"); }
            a.voice.note = n;
            continue;
        }
        if let Some(rest) = s.strip_prefix("--fine=")      { a.voice.fine = rest.parse().context("bad --fine (0..=255)")?; continue; }
        if let Some(rest) = s.strip_prefix("--drawbars=")  { a.voice.drawbars = parse_drawbars(rest)?; continue; }
        if let Some(rest) = s.strip_prefix("--click=")     { a.voice.click = parse_in_range("click", rest, 0.0, 1.0)?; continue; }
        if let Some(rest) = s.strip_prefix("--perc=")      { a.voice.perc = parse_in_range("perc", rest, -1.0, 1.0)?; continue; }
        if let Some(rest) = s.strip_prefix("--retrigger=") { a.voice.retrigger_ms = Some(rest.parse().context("bad --retrigger")?); continue; }
        if let Some(rest) = s.strip_prefix("--gain=")      { a.voice.gain = parse_in_range("gain", rest, 0.0, 1.0)?; continue; }
        if let Some(rest) = s.strip_prefix("--seed=")      { a.voice.seed = Some(rest.parse().context("bad --seed")?); continue; }
        log::warn!("unknown arg: {s}");
    }
    Ok(a)
}
