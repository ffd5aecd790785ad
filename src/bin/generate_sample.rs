//! Writes a synthetic CPS extract (`USdatSt.csv` and `USdatSt.parquet`) for
//! trying the dashboard without the real survey file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 7] = ["PESEX", "HEFAMINC", "PRMARSTA", "AGE", "ST", "HRNUMHOU", "PEHRUSL1"];

/// State codes drawn for the sample; 3 and 52 are deliberately unmapped.
const STATE_CODES: [i64; 12] = [6, 12, 36, 48, 17, 42, 39, 13, 37, 26, 3, 52];

#[derive(Debug, Parser)]
#[command(about = "Generate a synthetic CPS extract")]
struct Args {
    /// Number of rows to write
    #[arg(long, default_value_t = 5000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output directory
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Deterministic respondent generator over a splitmix64 stream.
struct Sampler {
    state: u64,
}

impl Sampler {
    fn new(seed: u64) -> Self {
        Sampler { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn between(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.unit() * (hi - lo + 1) as f64) as i64
    }

    fn one_of(&mut self, codes: &[i64]) -> i64 {
        codes[self.between(0, codes.len() as i64 - 1) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Most under-25s have never married.
    fn marital_status(&mut self, age: i64) -> i64 {
        if age < 25 && self.chance(0.8) {
            7
        } else {
            self.one_of(&[-1, 1, 1, 1, 2, 3, 4, 5, 6, 7])
        }
    }

    /// Income bracket, higher during working years.
    fn income(&mut self, age: i64) -> i64 {
        let base = if (30..65).contains(&age) { 8 } else { 4 };
        (base + self.between(-3, 8)).clamp(1, 16)
    }

    fn weekly_hours(&mut self, age: i64) -> i64 {
        if age >= 65 {
            self.between(0, 20)
        } else {
            self.between(20, 60)
        }
    }

    /// One respondent; `None` cells are written as blanks.
    fn respondent(&mut self) -> [Option<i64>; 7] {
        let age = self.between(15, 90);
        let mut row = [
            Some(self.between(1, 2)),
            Some(self.income(age)),
            Some(self.marital_status(age)),
            Some(age),
            Some(self.one_of(&STATE_CODES)),
            Some(self.between(1, 7)),
            Some(self.weekly_hours(age)),
        ];

        // A few unusable rows, as in the real extract.
        if self.chance(0.01) {
            row[1] = Some(-1);
        }
        if self.chance(0.01) {
            let col = self.between(0, row.len() as i64 - 1) as usize;
            row[col] = None;
        }
        row
    }
}

fn write_csv(path: &Path, rows: &[[Option<i64>; 7]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[[Option<i64>; 7]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Int64, true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|col| Arc::new(rows.iter().map(|r| r[col]).collect::<Int64Array>()) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut sampler = Sampler::new(args.seed);
    let rows: Vec<[Option<i64>; 7]> = (0..args.rows).map(|_| sampler.respondent()).collect();

    let csv_path = args.out_dir.join("USdatSt.csv");
    let parquet_path = args.out_dir.join("USdatSt.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} respondents to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
