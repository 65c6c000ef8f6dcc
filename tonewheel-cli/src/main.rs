//! Tonewheel CLI: real-time player and offline renderer for the organ oscillator.

mod args;
mod player;
mod render;

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::args::{parse_args, Args};
use crate::player::{Player, BLOCK};

const DEFAULT_RENDER_SECONDS: f32 = 4.0;
const DEFAULT_RENDER_RATE: u32 = 48_000;

fn list_output_devices() -> Result<()> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(args: &Args) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = &args.device_name {
        for d in host.output_devices()? {
            if d.name()? == *name { return Ok(d); }
        }
        bail!("requested device not found: {name}");
    }
    host.default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))
}

fn choose_config(
    device: &cpal::Device,
    req_sr: Option<u32>,
    req_ch: Option<u16>,
) -> Result<cpal::SupportedStreamConfig> {
    // If nothing requested, default is already concrete.
    if req_sr.is_none() && req_ch.is_none() {
        return Ok(device.default_output_config()?);
    }

    let mut best: Option<(u64, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let ch     = range.channels();
        let sr_min = range.min_sample_rate().0;
        let sr_max = range.max_sample_rate().0;

        let ch_pen = match req_ch { Some(c) => u64::from(ch.abs_diff(c)), None => 0 };
        let sr_pen = match req_sr {
            Some(sr) => if (sr_min..=sr_max).contains(&sr) { 0 } else { u64::from(sr_min.abs_diff(sr).min(sr_max.abs_diff(sr))) },
            None => 0,
        };

        let score = sr_pen.saturating_mul(1000) + ch_pen;
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, range));
        }
    }

    let (_, range) = best.ok_or_else(|| anyhow!("no supported output configs"))?;

    let pick_sr = match req_sr {
        Some(sr) => cpal::SampleRate(sr.clamp(range.min_sample_rate().0, range.max_sample_rate().0)),
        None => range.max_sample_rate(),
    };

    Ok(range.with_sample_rate(pick_sr))
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut player: Player,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let channels = usize::from(cfg.channels).max(1);

    // ~1 second meter at the stream rate
    let meter_interval = (cfg.sample_rate.0).max(1) as usize;
    let mut meter_count: usize = 0;
    let mut meter_peak: f32 = 0.0;
    let mut mono = [0.0_f32; BLOCK];

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            for block in output.chunks_mut(channels * BLOCK) {
                let frames = block.len() / channels;
                player.fill(&mut mono[..frames]);

                for (frame, &s) in block.chunks_mut(channels).zip(mono.iter()) {
                    let v: T = T::from_sample(s);
                    for ch in frame.iter_mut() { *ch = v; }

                    meter_peak = meter_peak.max(s.abs());
                    meter_count += 1;
                    if meter_count >= meter_interval {
                        eprintln!("[meter] peak ~ {meter_peak:.3}");
                        meter_peak = 0.0;
                        meter_count = 0;
                    }
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn play(args: &Args) -> Result<()> {
    let device  = pick_device(args)?;
    let sup_cfg = choose_config(&device, args.sample_rate, args.channels)?;
    let sample_format = sup_cfg.sample_format();
    let mut cfg = sup_cfg.config();

    if let Some(sr) = args.sample_rate { cfg.sample_rate = cpal::SampleRate(sr); }
    if let Some(ch) = args.channels    { cfg.channels    = ch; }

    let player = Player::new(cfg.sample_rate.0 as f32, &args.voice)?;

    println!("Using device: {}", device.name()?);
    println!("Stream config: {cfg:?} (sample_format: {sample_format:?})");
    println!(
        "Note: {} (+{}/255) | Drawbars: {:?} | Click: {:.2} | Perc: {:+.2} | Gain: {:.2}",
        args.voice.note, args.voice.fine, args.voice.drawbars, args.voice.click, args.voice.perc, args.voice.gain,
    );
    if let Some(d) = args.duration_sec { println!("Auto-stop after {d} seconds"); }
    println!("Press Ctrl+C to stop…\n");

    let err_fn = |e: cpal::StreamError| log::error!("stream error: {e}");

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, player, err_fn)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, player, err_fn)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, player, err_fn)?,
        other => bail!("unsupported device sample format: {other:?}"),
    };

    stream.play().context("starting output stream")?;

    if let Some(d) = args.duration_sec {
        std::thread::sleep(Duration::from_secs_f32(d));
        return Ok(());
    }

    loop { std::thread::sleep(Duration::from_millis(500)); }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args(std::env::args().skip(1))?;

    if args.list_devices {
        return list_output_devices();
    }

    if let Some(path) = &args.render {
        let sr = args.sample_rate.unwrap_or(DEFAULT_RENDER_RATE);
        let ch = args.channels.unwrap_or(1);
        let secs = args.duration_sec.unwrap_or(DEFAULT_RENDER_SECONDS);
        let frames = render::render_to_wav(path, &args.voice, sr, ch, secs)?;
        println!("Wrote {frames} frames to {}", path.display());
        return Ok(());
    }

    println!("tonewheel-cli: real-time organ oscillator\n");
    play(&args)
}
