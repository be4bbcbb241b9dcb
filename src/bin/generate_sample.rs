//! Writes `sample_data.csv`: a small tabular dataset with injected outliers
//! and missing cells, handy for trying out the cleaner.

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let groups = ["Control", "Treatment_A", "Treatment_B"];
    let n_rows = 500;

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record(["measurement_id", "group", "response", "baseline", "reading"])
        .expect("Failed to write header");

    for id in 0..n_rows {
        let group = groups[(rng.next_u64() % groups.len() as u64) as usize];

        // Gaussian core with a few heavy outliers mixed in.
        let mut response = rng.gauss(50.0, 8.0);
        if rng.next_f64() < 0.03 {
            response += if rng.next_f64() < 0.5 { 200.0 } else { -150.0 };
        }

        // Right-skewed: exponentiated noise produces natural high outliers.
        let baseline = 10.0 * rng.gauss(0.0, 0.6).exp();

        // Occasionally missing sensor reading.
        let reading = if rng.next_f64() < 0.05 {
            String::new()
        } else {
            format!("{:.3}", rng.gauss(1.0, 0.2))
        };

        writer
            .write_record([
                id.to_string(),
                group.to_string(),
                format!("{response:.3}"),
                format!("{baseline:.3}"),
                reading,
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {n_rows} rows to {output_path}");
}
