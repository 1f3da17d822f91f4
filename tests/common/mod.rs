// Shared CSV fixtures for the integration tests.
#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

const H1: [f64; 8] = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
const H2: [f64; 8] = [1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0];
const H3: [f64; 8] = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0];
const H4: [f64; 8] = [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0];

/// Four series built from orthogonal zero-mean vectors so that `MT_000`
/// correlates exactly 0.9 / 0.2 / -0.5 with the other three.
pub fn four_meter_columns() -> Vec<Vec<f64>> {
    let mix = |r: f64, other: &[f64; 8]| -> Vec<f64> {
        let rest = (1.0 - r * r).sqrt();
        H1.iter()
            .zip(other)
            .map(|(a, b)| 10.0 + r * a + rest * b)
            .collect()
    };
    vec![
        H1.iter().map(|a| 10.0 + a).collect(),
        mix(0.9, &H2),
        mix(0.2, &H3),
        mix(-0.5, &H4),
    ]
}

/// Render columns in the regional export layout (`;` / `,`).
pub fn regional_csv(names: &[&str], columns: &[Vec<f64>]) -> String {
    let mut out = String::from("\"\"");
    for name in names {
        out.push_str(&format!(";\"{name}\""));
    }
    out.push('\n');
    let rows = columns.first().map_or(0, Vec::len);
    for row in 0..rows {
        out.push_str(&format!("\"2011-01-01 {:02}:{:02}:00\"", row / 4, (row % 4) * 15));
        for col in columns {
            out.push(';');
            out.push_str(&col[row].to_string().replace('.', ","));
        }
        out.push('\n');
    }
    out
}

pub fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

pub fn four_meter_file() -> NamedTempFile {
    write_temp(&regional_csv(
        &["MT_001", "MT_002", "MT_003", "MT_004"],
        &four_meter_columns(),
    ))
}

/// Three meters where `MT_000` never changes, so it correlates with nothing.
pub fn constant_meter_file() -> NamedTempFile {
    write_temp(
        "\"\";\"MT_001\";\"MT_002\";\"MT_003\"\n\
         \"t0\";0;1;2\n\
         \"t1\";0;2;1\n\
         \"t2\";0;3;3\n",
    )
}
