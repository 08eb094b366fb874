//! Loader → engine pipeline tests against on-disk sheet exports.

use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use trial_viewer::data::engine::QueryResult;
use trial_viewer::{query, DatasetSource, FileSource, LoadError, SchemaMapping, TRIAL_COUNT};

const TIMES: [f64; TRIAL_COUNT] = [10.0, 8.0, 7.0, 6.0, 5.5, 5.0, 4.0, 3.5, 3.0, 2.0];
const ERRORS: [i64; TRIAL_COUNT] = [2, 1, 1, 0, 1, 0, 0, 0, 0, 0];

fn compact_csv(dir: &tempfile::TempDir, rows: &[(&str, &str, &str)]) -> PathBuf {
    let schema = SchemaMapping::compact();
    let mut out = schema.display_columns().join(",");
    out.push('\n');
    for (date, uid, eid) in rows {
        let mut cells = vec![date.to_string(), "12:00".into(), uid.to_string(), eid.to_string()];
        for n in 0..TRIAL_COUNT {
            cells.push(ERRORS[n].to_string());
            cells.push(TIMES[n].to_string());
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    let path = dir.path().join("dataCollector.csv");
    std::fs::write(&path, out).unwrap();
    path
}

#[test]
fn csv_export_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = compact_csv(
        &dir,
        &[
            ("2024-01-01", "007", "E1"),
            ("2024-01-02", "7", "E1"),
            ("2024-01-03", "007", "E1"),
        ],
    );
    let source = FileSource::new(path);
    let ds = source.load(&SchemaMapping::compact()).unwrap();

    let found = query(&ds, " 007 ", "E1").into_found().unwrap().unwrap();
    assert_eq!(found.record.row, 2);
    assert_eq!(found.submissions(), 2);
    assert_eq!(found.record.submitted_at, "2024-01-03 12:00");
    assert_eq!(found.summary.time.first_two_mean, 9.0);
    assert_eq!(found.summary.time.last_two_mean, 2.5);
    assert_eq!(found.summary.time.saving, 6.5);
    assert_eq!(found.summary.errors.saving, 1.5);

    let plain = query(&ds, "7", "E1").into_found().unwrap().unwrap();
    assert_eq!(plain.record.row, 1);
    let rows: Vec<usize> = found.history.iter().map(|v| v.row).collect();
    assert_eq!(rows, vec![0, 2]);
    assert_eq!(found.history[0].cells[2], ("uid".to_string(), "007".to_string()));

    assert_eq!(
        query(&ds, "007", "e1"),
        QueryResult::NoMatch {
            subject: "007".into(),
            examiner: "e1".into()
        }
    );
}

#[test]
fn numeric_looking_csv_ids_match_as_typed() {
    let dir = tempfile::tempdir().unwrap();
    let path = compact_csv(
        &dir,
        &[
            ("2024-01-01", "-007", "1.0"),
            ("2024-01-02", "+7", "0.50"),
            ("2024-01-03", "1e3", "E1"),
        ],
    );
    let ds = FileSource::new(path)
        .load(&SchemaMapping::compact())
        .unwrap();

    for (uid, eid, row) in [("-007", "1.0", 0), ("+7", "0.50", 1), ("1e3", "E1", 2)] {
        let found = query(&ds, uid, eid).into_found().unwrap().unwrap();
        assert_eq!(found.record.row, row);
        assert_eq!(found.record.subject, uid);
    }

    for (uid, eid) in [("-7", "1.0"), ("-007", "1"), ("7", "0.50"), ("+7", "0.5"), ("1000", "E1")] {
        assert!(
            matches!(query(&ds, uid, eid), QueryResult::NoMatch { .. }),
            "{uid}/{eid} should not match"
        );
    }
}

#[test]
fn blank_time_cell_surfaces_as_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = compact_csv(&dir, &[("2024-01-01", "S1", "E1")]);
    let text = std::fs::read_to_string(&path).unwrap();
    // Drop the final trial time value.
    let trimmed = text.trim_end().trim_end_matches(|c: char| c != ',').to_string() + "\n";
    std::fs::write(&path, trimmed).unwrap();

    let ds = FileSource::new(path)
        .load(&SchemaMapping::compact())
        .unwrap();
    let err = query(&ds, "S1", "E1").into_found().unwrap_err();
    assert_eq!(err.columns, vec!["d10"]);
}

#[test]
fn verbose_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let schema = SchemaMapping::verbose();

    let mut row = serde_json::Map::new();
    row.insert("Timestamp".into(), "3/1/2024 9:15:00".into());
    row.insert("Subject UID".into(), 1042.into());
    row.insert("Examiner UID".into(), "E7".into());
    row.insert("Subject Name".into(), "Bo".into());
    row.insert("Age".into(), 51.into());
    row.insert("Gender".into(), "M".into());
    for n in 1..=TRIAL_COUNT {
        row.insert(schema.trial_time_column(n), TIMES[n - 1].into());
        row.insert(schema.trial_errors_column(n), ERRORS[n - 1].into());
    }
    let path = dir.path().join("sheet.json");
    std::fs::write(
        &path,
        serde_json::to_string(&vec![serde_json::Value::Object(row)]).unwrap(),
    )
    .unwrap();

    let ds = FileSource::new(path).load(&schema).unwrap();
    let found = query(&ds, "1042", "E7").into_found().unwrap().unwrap();
    assert_eq!(
        found.record.details,
        vec![
            ("Subject Name".to_string(), "Bo".to_string()),
            ("Age".to_string(), "51".to_string()),
            ("Gender".to_string(), "M".to_string()),
        ]
    );
    assert_eq!(found.record.submitted_at, "3/1/2024 9:15:00");
    assert_eq!(found.trials[0].time_secs, 10.0);
    assert_eq!(found.trials[0].errors, 2);

    // The stored number 1042 never equals zero-padded text.
    assert!(matches!(
        query(&ds, "01042", "E7"),
        QueryResult::NoMatch { .. }
    ));
}

#[test]
fn parquet_export() {
    let dir = tempfile::tempdir().unwrap();
    let schema = SchemaMapping::compact();

    let mut fields = vec![
        Field::new("uid", DataType::Utf8, false),
        Field::new("eid", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["S1", "S1"])),
        Arc::new(StringArray::from(vec!["E1", "E1"])),
    ];
    for n in 1..=TRIAL_COUNT {
        fields.push(Field::new(schema.trial_errors_column(n), DataType::Int64, false));
        columns.push(Arc::new(Int64Array::from(vec![9, ERRORS[n - 1]])));
        fields.push(Field::new(schema.trial_time_column(n), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(vec![99.0, TIMES[n - 1]])));
    }
    let arrow_schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(arrow_schema.clone(), columns).unwrap();

    let path = dir.path().join("sheet.parquet");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, arrow_schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = FileSource::new(path).load(&schema).unwrap();
    assert_eq!(ds.len(), 2);
    let found = query(&ds, "S1", "E1").into_found().unwrap().unwrap();
    assert_eq!(found.record.row, 1);
    assert_eq!(found.summary.time.saving, 6.5);
}

#[test]
fn loader_failures_are_not_no_match() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileSource::new(dir.path().join("absent.json"))
        .load(&SchemaMapping::compact())
        .unwrap_err();
    assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("absent.json"));
}
