use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Headers as they come out of the engineering spreadsheets: units on a
/// second line. The dashboard collapses them to the default column names.
const HEADERS: &[&str] = &[
    "Country",
    "Project",
    "Vessel",
    "Pipe\nType",
    "Line\nType",
    "Pipe\nOD",
    "Pipe Wall\nThickness",
    "Coating\nThickness",
    "Steel\nDensity",
    "Coating\nDensity",
    "Clad\nThickness",
    "Vessel\nName",
    "Water\nDepth",
    "Estimated Optimal\nJLT Angle",
    "JLT\nAngle",
    "Installation\nDate",
];

/// Pipe OD (mm) and wall thickness (mm) pairs.
const PIPE_SIZES: &[(f64, f64)] = &[
    (168.3, 12.7),
    (219.1, 15.9),
    (273.1, 19.1),
    (323.9, 20.6),
    (406.4, 25.4),
    (457.0, 27.0),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let projects: &[(&str, &str)] = &[
        ("Brazil", "Mero 2"),
        ("Brazil", "Buzios 5"),
        ("Angola", "Agogo"),
        ("Norway", "Johan Castberg"),
        ("Guyana", "Yellowtail"),
        ("Egypt", "Zohr Phase 3"),
    ];
    let vessels: &[(&str, &str)] = &[
        ("S7000", "Saipem 7000"),
        ("AMZ", "Amazon"),
        ("DV", "Deep Blue"),
        ("SEV", "Seven Vega"),
    ];
    let pipe_types = ["Rigid", "Flexible", "Umbilical"];
    let line_types = ["Production", "Water Injection", "Gas Export", "Service"];

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample_pipeline_data.csv"));
    if let Some(dir) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(HEADERS).context("writing header")?;

    let base_date = NaiveDate::from_ymd_opt(2019, 1, 1).context("invalid base date")?;
    let n_lines = 60;

    for i in 0..n_lines {
        let (country, project) = *rng.pick(projects);
        let (vessel, vessel_name) = *rng.pick(vessels);
        let pipe_type = *rng.pick(&pipe_types);
        let line_type = *rng.pick(&line_types);
        let (od, wall) = *rng.pick(PIPE_SIZES);

        let water_depth = rng.uniform(80.0, 2200.0);
        let optimal_angle = 85.0 + rng.uniform(0.0, 10.0) * (water_depth / 2200.0);
        let jlt_angle = optimal_angle + rng.uniform(-1.5, 1.5);
        let installed = base_date + Duration::days((rng.next_u64() % 2000) as i64);

        // Clad and coating values are only known for rigid lines; every
        // seventh line has no installation data yet.
        let rigid = pipe_type == "Rigid";
        let pending = i % 7 == 6;

        let record: Vec<String> = vec![
            country.to_string(),
            project.to_string(),
            vessel.to_string(),
            pipe_type.to_string(),
            line_type.to_string(),
            format!("{od}"),
            format!("{wall}"),
            if rigid { format!("{:.1}", rng.uniform(2.5, 4.0)) } else { String::new() },
            "7850".to_string(),
            if rigid { "940".to_string() } else { String::new() },
            if rigid && od >= 323.9 { "3".to_string() } else { String::new() },
            vessel_name.to_string(),
            format!("{water_depth:.0}"),
            format!("{optimal_angle:.1}"),
            if pending { String::new() } else { format!("{jlt_angle:.1}") },
            if pending { String::new() } else { installed.format("%Y-%m-%d").to_string() },
        ];
        writer
            .write_record(&record)
            .with_context(|| format!("writing line {i}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {n_lines} pipeline lines to {}", output_path.display());
    Ok(())
}
