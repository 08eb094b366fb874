use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use trial_viewer::{SchemaMapping, TRIAL_COUNT};

/// splitmix64, mapped to [0, 1).
fn unit_noise(seed: u64) -> f64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

/// A learning curve: times and errors fall off over the trials.
fn submission(seed: u64, start_secs: f64) -> Vec<(u32, f64)> {
    (0..TRIAL_COUNT)
        .map(|i| {
            let decay = (-(i as f64) / 4.0).exp();
            let time = start_secs * (0.35 + 0.65 * decay) + unit_noise(seed * 100 + i as u64);
            let errors = (4.0 * decay + unit_noise(seed * 1000 + i as u64)).floor();
            (errors as u32, (time * 100.0).round() / 100.0)
        })
        .collect()
}

struct Row {
    date: &'static str,
    time: &'static str,
    uid: &'static str,
    eid: &'static str,
    name: &'static str,
    age: i64,
    gender: &'static str,
    trials: Vec<(u32, f64)>,
}

fn rows() -> Vec<Row> {
    let people = [
        ("007", "E1", "Ada", 34, "F"),
        ("1042", "E1", "Bo", 51, "M"),
        ("1043", "E2", "Cy", 27, "M"),
        ("1044", "E2", "Di", 45, "F"),
    ];
    let mut out = Vec::new();
    for (seed, &(uid, eid, name, age, gender)) in people.iter().enumerate() {
        out.push(Row {
            date: "2024-03-01",
            time: "09:15",
            uid,
            eid,
            name,
            age,
            gender,
            trials: submission(seed as u64, 20.0 + seed as f64 * 3.0),
        });
    }
    // A second, later submission for the first subject.
    out.push(Row {
        date: "2024-03-08",
        time: "10:40",
        uid: "007",
        eid: "E1",
        name: "Ada",
        age: 34,
        gender: "F",
        trials: submission(99, 16.0),
    });
    out
}

fn write_compact_csv(rows: &[Row], path: &str) -> Result<()> {
    let schema = SchemaMapping::compact();
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(schema.display_columns())?;

    for row in rows {
        let mut record = vec![
            row.date.to_string(),
            row.time.to_string(),
            row.uid.to_string(),
            row.eid.to_string(),
        ];
        for (errors, time) in &row.trials {
            record.push(errors.to_string());
            record.push(time.to_string());
        }
        writer.write_record(&record)?;
    }

    // Trial 10 time left blank: shows up as a malformed record.
    let mut broken = vec!["2024-03-09".into(), "08:00".into(), "2001".into(), "E3".into()];
    for (errors, time) in submission(7, 18.0) {
        broken.push(errors.to_string());
        broken.push(time.to_string());
    }
    if let Some(last) = broken.last_mut() {
        last.clear();
    }
    writer.write_record(&broken)?;
    writer.flush()?;
    Ok(())
}

fn write_verbose_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = SchemaMapping::verbose();

    let strings = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![
        Field::new(&schema.submitted_at[0], DataType::Utf8, false),
        Field::new(&schema.subject_id, DataType::Utf8, false),
        Field::new(&schema.examiner_id, DataType::Utf8, false),
        Field::new(&schema.details[0], DataType::Utf8, false),
        Field::new(&schema.details[1], DataType::Int64, false),
        Field::new(&schema.details[2], DataType::Utf8, false),
    ];
    let timestamps: Vec<String> = rows.iter().map(|r| format!("{} {}", r.date, r.time)).collect();
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(timestamps)),
        strings(|r| r.uid),
        strings(|r| r.eid),
        strings(|r| r.name),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        strings(|r| r.gender),
    ];

    for n in 1..=TRIAL_COUNT {
        fields.push(Field::new(schema.trial_time_column(n), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.trials[n - 1].1).collect::<Vec<_>>(),
        )));
        fields.push(Field::new(schema.trial_errors_column(n), DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| i64::from(r.trials[n - 1].0))
                .collect::<Vec<_>>(),
        )));
    }

    let arrow_schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(arrow_schema.clone(), columns)
        .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, arrow_schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let rows = rows();

    write_compact_csv(&rows, "sample_compact.csv")?;
    write_verbose_parquet(&rows, "sample_verbose.parquet")?;

    println!(
        "Wrote {} submissions ({TRIAL_COUNT} trials each) to sample_compact.csv and sample_verbose.parquet",
        rows.len()
    );
    Ok(())
}
