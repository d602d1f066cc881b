use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use thrustcore::protocol::{format_frame, DEFAULT_DEVICE, DEFAULT_SENSOR, DEFAULT_UNIT};

/// Configuration for synthesizing a receiver SD-card log of a burn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub seed: u64,
    pub boot_ms: u64,
    pub interval_ms: u64,
    /// Peak load-cell reading in newtons; negative for a compression cell.
    pub peak_thrust: f64,
    pub noise: f64,
    /// Probability that a frame is merged with the next one on the wire.
    pub concat_rate: f64,
    /// Probability that a frame is cut short.
    pub truncate_rate: f64,
    /// Probability that a frame arrives intact but fails its checksum.
    pub checksum_error_rate: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 500,
            seed: 0,
            boot_ms: 3890,
            interval_ms: 100,
            peak_thrust: -120.0,
            noise: 0.4,
            concat_rate: 0.03,
            truncate_rate: 0.02,
            checksum_error_rate: 0.02,
        }
    }
}

/// Burn envelope: ramp up over the first fifth, hold, tail off over the last
/// fifth.
fn envelope(index: usize, samples: usize) -> f64 {
    let t = index as f64 / samples.max(1) as f64;
    if t < 0.2 {
        (t / 0.2 * PI / 2.0).sin()
    } else if t > 0.8 {
        ((1.0 - t) / 0.2).max(0.0)
    } else {
        1.0
    }
}

pub fn build_log(config: &GeneratorConfig) -> String {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = String::new();
    out.push_str("=== UART Log Started ===\n");
    out.push_str(&format!("Boot time: {}\n", config.boot_ms));
    out.push_str("Format: timestamp,validity,message\n");
    out.push_str("========================\n");

    let frame_at = |index: usize, rng: &mut StdRng| {
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        let value = config.peak_thrust * envelope(index, config.samples) + jitter;
        format_frame(
            DEFAULT_DEVICE,
            index as u64,
            DEFAULT_SENSOR,
            value,
            DEFAULT_UNIT,
            index as u64 * config.interval_ms,
        )
    };

    let mut index = 0;
    while index < config.samples {
        let local_ts = config.boot_ms + index as u64 * config.interval_ms + rng.gen_range(0..3);
        let frame = frame_at(index, &mut rng);
        let roll: f64 = rng.gen();

        let line = if roll < config.concat_rate && index + 1 < config.samples {
            index += 1;
            let next = frame_at(index, &mut rng);
            format!("{local_ts},INVALID,{frame}{next}")
        } else if roll < config.concat_rate + config.truncate_rate {
            let cut = rng.gen_range(1..frame.len());
            format!("{local_ts},INVALID,{}", &frame[..cut])
        } else if roll < config.concat_rate + config.truncate_rate + config.checksum_error_rate {
            format!("{local_ts},INVALID,{}", corrupt_checksum(&frame))
        } else {
            format!("{local_ts},VALID,{frame}")
        };

        out.push_str(&line);
        out.push('\n');
        index += 1;
    }
    out
}

fn corrupt_checksum(frame: &str) -> String {
    match frame.rsplit_once('*') {
        Some((body, sum)) => {
            let flipped = u8::from_str_radix(sum, 16).map(|v| v ^ 0x5A).unwrap_or(0);
            format!("{body}*{flipped:02X}")
        }
        None => frame.to_string(),
    }
}

pub fn write_log<P: AsRef<Path>>(path: P, config: &GeneratorConfig) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let log = build_log(config);
    fs::write(path, &log).with_context(|| format!("writing generated log {}", path.display()))?;
    Ok(log.lines().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thrustcore::decode_with_report;

    #[test]
    fn clean_generator_output_is_all_strict() {
        let config = GeneratorConfig {
            samples: 64,
            concat_rate: 0.0,
            truncate_rate: 0.0,
            checksum_error_rate: 0.0,
            ..Default::default()
        };
        let (records, report) = decode_with_report(&build_log(&config));
        assert_eq!(records.len(), 64);
        assert_eq!(report.strict_records, 64);
        assert_eq!(report.skipped_lines, 4);
        assert!(records.iter().all(|r| r.valid));
        assert_eq!(records[0].time_sec, Some(0.0));
    }

    #[test]
    fn concatenated_frames_are_recovered() {
        let config = GeneratorConfig {
            samples: 40,
            concat_rate: 1.0,
            truncate_rate: 0.0,
            checksum_error_rate: 0.0,
            ..Default::default()
        };
        let (records, report) = decode_with_report(&build_log(&config));
        assert_eq!(records.len(), 40);
        assert_eq!(report.recovered_records, 40);
        assert!(records.iter().all(|r| !r.valid && r.value.is_some()));
    }

    #[test]
    fn checksum_errors_stay_well_formed() {
        let config = GeneratorConfig {
            samples: 10,
            concat_rate: 0.0,
            truncate_rate: 0.0,
            checksum_error_rate: 1.0,
            ..Default::default()
        };
        let (records, report) = decode_with_report(&build_log(&config));
        assert_eq!(report.strict_records, 10);
        assert!(records.iter().all(|r| !r.valid && r.value.is_some()));
    }

    #[test]
    fn same_seed_gives_same_log() {
        let config = GeneratorConfig {
            seed: 42,
            ..Default::default()
        };
        assert_eq!(build_log(&config), build_log(&config));
    }

    #[test]
    fn thrust_peaks_near_configured_value() {
        let config = GeneratorConfig {
            samples: 100,
            noise: 0.0,
            concat_rate: 0.0,
            truncate_rate: 0.0,
            checksum_error_rate: 0.0,
            ..Default::default()
        };
        let (records, _) = decode_with_report(&build_log(&config));
        let peak = records
            .iter()
            .filter_map(|r| r.value)
            .fold(0.0_f64, |acc, v| acc.min(v));
        assert_eq!(peak, -120.0);
    }
}
