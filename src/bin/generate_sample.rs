use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;

/// Write a synthetic meter table in the same layout as the UCI electricity
/// export: `;` delimited, `,` decimal, quarter-hour timestamps, `MT_xxx` columns.
#[derive(Parser, Debug)]
#[command(name = "generate-sample")]
#[command(about = "Generate a synthetic electricity meter CSV")]
struct Args {
    #[arg(long, default_value = "static_data/sample_meters.csv")]
    output: PathBuf,

    #[arg(long, default_value_t = 24)]
    meters: usize,

    /// Quarter-hour rows (96 per day)
    #[arg(long, default_value_t = 96 * 28)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Consumption shape shared by a group of meters.
#[derive(Debug, Clone, Copy)]
enum Profile {
    /// Morning and evening peaks.
    Residential,
    /// Flat during business hours, low at night and weekends.
    Commercial,
    /// Near-constant base load.
    Industrial,
    /// Not connected yet: every reading is zero.
    Dormant,
}

impl Profile {
    fn for_meter(i: usize) -> Self {
        match i % 7 {
            0 | 3 | 5 => Profile::Residential,
            1 | 4 => Profile::Commercial,
            2 => Profile::Industrial,
            _ => Profile::Dormant,
        }
    }

    fn load(self, row: usize) -> f64 {
        let hour = (row % 96) as f64 / 4.0;
        let weekday = (row / 96) % 7 < 5;
        match self {
            Profile::Residential => {
                let morning = (-(hour - 7.5).powi(2) / 2.0).exp();
                let evening = (-(hour - 19.0).powi(2) / 4.0).exp();
                0.3 + morning + 1.5 * evening
            }
            Profile::Commercial => {
                let open = if weekday && (8.0..18.0).contains(&hour) { 2.0 } else { 0.4 };
                open + 0.2 * (2.0 * PI * hour / 24.0).sin()
            }
            Profile::Industrial => 5.0 + 0.1 * (2.0 * PI * hour / 24.0).cos(),
            Profile::Dormant => 0.0,
        }
    }
}

/// Deterministic noise stream of one meter (xoshiro256**).
///
/// Each meter gets its own stream derived from `(seed, meter)`, so adding
/// meters or rows never changes the readings already generated for another.
struct MeterRng {
    state: [u64; 4],
}

impl MeterRng {
    fn for_meter(seed: u64, meter: usize) -> Self {
        // splitmix64 over the combined key
        let mut x = seed ^ (meter as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut s = [0u64; 4];
        for slot in &mut s {
            x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = x;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            *slot = z ^ (z >> 31);
        }
        MeterRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// `12.3456` → `"12,3456"`.
fn regional(v: f64) -> String {
    format!("{v:.4}").replace('.', ",")
}

fn main() -> Result<()> {
    let args = Args::parse();
    let profiles: Vec<Profile> = (0..args.meters).map(Profile::for_meter).collect();
    let mut streams: Vec<MeterRng> = (0..args.meters)
        .map(|m| MeterRng::for_meter(args.seed, m))
        .collect();
    let scales: Vec<f64> = streams.iter_mut().map(|r| 10.0 + 90.0 * r.next_f64()).collect();

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut header = vec![String::new()];
    header.extend((1..=args.meters).map(|i| format!("MT_{i:03}")));
    writer.write_record(&header)?;

    let start = NaiveDate::from_ymd_opt(2011, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 15, 0))
        .context("invalid start timestamp")?;

    for row in 0..args.rows {
        let ts = start + Duration::minutes(15 * row as i64);
        let mut record = Vec::with_capacity(args.meters + 1);
        record.push(ts.format("%Y-%m-%d %H:%M:%S").to_string());
        for ((profile, scale), rng) in profiles.iter().zip(&scales).zip(streams.iter_mut()) {
            let value = match profile {
                Profile::Dormant => 0.0,
                p => (p.load(row) * scale + rng.gauss(0.0, 0.05 * scale)).max(0.0),
            };
            record.push(regional(value));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} meters x {} rows to {}",
        args.meters,
        args.rows,
        args.output.display()
    );
    Ok(())
}
