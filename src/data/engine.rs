use thiserror::Error;

use super::filter::{matching_indices, IdPair};
use super::model::{CellValue, Dataset, Record};
use super::schema::{SchemaMapping, TRIAL_COUNT};
use super::summary::{Summary, Trial};

// ---------------------------------------------------------------------------
// Query outcome
// ---------------------------------------------------------------------------

/// Identifying and descriptive fields of the selected submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    /// Position of the record in the dataset.
    pub row: usize,
    pub subject: String,
    pub examiner: String,
    /// Submission time columns joined with a space, e.g. `"2024-03-01 10:00"`.
    pub submitted_at: String,
    /// `(column, value)` pairs for the schema's detail columns.
    pub details: Vec<(String, String)>,
    /// `(column, value)` pairs for every display column, in display order.
    pub cells: Vec<(String, String)>,
}

/// Why a matched submission could not be summarised.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("record {row} has missing or invalid trial fields: {}", .columns.join(", "))]
pub struct MalformedRecord {
    pub row: usize,
    pub subject: String,
    pub examiner: String,
    /// Offending physical column names.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    pub record: RecordView,
    /// Trials `1..=TRIAL_COUNT` in index order.
    pub trials: Vec<Trial>,
    pub summary: Summary,
    /// Every matching submission in load order; the last one is `record`.
    pub history: Vec<RecordView>,
}

impl Found {
    /// How many submissions matched.
    pub fn submissions(&self) -> usize {
        self.history.len()
    }
}

/// Result of filtering the dataset by subject and examiner.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// One or both identifiers were blank; nothing was filtered.
    MissingInput,
    /// Well-formed query with no matching submission.
    NoMatch { subject: String, examiner: String },
    /// The latest matching submission lacks usable trial fields.
    MalformedRecord(MalformedRecord),
    Found(Found),
}

impl QueryResult {
    pub fn found(&self) -> Option<&Found> {
        match self {
            QueryResult::Found(found) => Some(found),
            _ => None,
        }
    }

    /// `Ok(Some(..))` for a hit, `Ok(None)` for the ordinary empty outcomes,
    /// `Err` for a malformed record.
    pub fn into_found(self) -> Result<Option<Found>, MalformedRecord> {
        match self {
            QueryResult::Found(found) => Ok(Some(found)),
            QueryResult::MalformedRecord(err) => Err(err),
            QueryResult::MissingInput | QueryResult::NoMatch { .. } => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Select the latest submission for `(subject, examiner)` and summarise it.
///
/// "Latest" is the last match in load order; records are not re-sorted by
/// their timestamp columns.
pub fn query(dataset: &Dataset, subject: &str, examiner: &str) -> QueryResult {
    let Some(ids) = IdPair::parse(subject, examiner) else {
        return QueryResult::MissingInput;
    };

    let matches = matching_indices(dataset, &ids);
    let Some(&row) = matches.last() else {
        return QueryResult::NoMatch {
            subject: ids.subject,
            examiner: ids.examiner,
        };
    };

    let record = &dataset.records[row];
    let schema = &dataset.schema;

    let trials = match extract_trials(record, schema) {
        Ok(trials) => trials,
        Err(columns) => {
            return QueryResult::MalformedRecord(MalformedRecord {
                row,
                subject: ids.subject,
                examiner: ids.examiner,
                columns,
            })
        }
    };

    let Some(summary) = Summary::from_trials(&trials) else {
        return QueryResult::MalformedRecord(MalformedRecord {
            row,
            subject: ids.subject,
            examiner: ids.examiner,
            columns: schema.trial_columns(),
        });
    };

    let history = matches
        .iter()
        .map(|&i| record_view(i, &dataset.records[i], schema, &ids))
        .collect();

    QueryResult::Found(Found {
        record: record_view(row, record, schema, &ids),
        trials,
        summary,
        history,
    })
}

/// Read trials `1..=TRIAL_COUNT`, or the list of unusable columns.
fn extract_trials(record: &Record, schema: &SchemaMapping) -> Result<Vec<Trial>, Vec<String>> {
    let mut trials = Vec::with_capacity(TRIAL_COUNT);
    let mut bad = Vec::new();

    for index in 1..=TRIAL_COUNT {
        let time_col = schema.trial_time_column(index);
        let errors_col = schema.trial_errors_column(index);

        let time_secs = record
            .get(&time_col)
            .and_then(CellValue::as_f64)
            .filter(|t| t.is_finite() && *t >= 0.0);
        let errors = record.get(&errors_col).and_then(CellValue::as_count);

        match (time_secs, errors) {
            (Some(time_secs), Some(errors)) => trials.push(Trial {
                index,
                time_secs,
                errors,
            }),
            (time_secs, errors) => {
                if errors.is_none() {
                    bad.push(errors_col);
                }
                if time_secs.is_none() {
                    bad.push(time_col);
                }
            }
        }
    }

    if bad.is_empty() {
        Ok(trials)
    } else {
        Err(bad)
    }
}

fn record_view(row: usize, record: &Record, schema: &SchemaMapping, ids: &IdPair) -> RecordView {
    let submitted_at = schema
        .submitted_at
        .iter()
        .map(|c| record.text(c))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let details = schema
        .details
        .iter()
        .map(|c| (c.clone(), record.text(c)))
        .collect();

    let cells = schema
        .display_columns()
        .into_iter()
        .map(|c| {
            let value = record.text(&c);
            (c, value)
        })
        .collect();

    RecordView {
        row,
        subject: ids.subject.clone(),
        examiner: ids.examiner.clone(),
        submitted_at,
        details,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const TIMES: [f64; TRIAL_COUNT] = [10.0, 8.0, 7.5, 7.0, 6.0, 5.0, 4.0, 3.5, 3.0, 2.0];
    const ERRORS: [i64; TRIAL_COUNT] = [2, 1, 1, 1, 1, 0, 0, 1, 0, 0];

    fn record(uid: &str, eid: &str, date: &str, times: &[f64], errors: &[i64]) -> Record {
        let mut cells = BTreeMap::new();
        cells.insert("uid".to_string(), CellValue::String(uid.into()));
        cells.insert("eid".to_string(), CellValue::String(eid.into()));
        cells.insert("date".to_string(), CellValue::Date(date.into()));
        cells.insert("time".to_string(), CellValue::String("09:30".into()));
        for (i, (t, e)) in times.iter().zip(errors).enumerate() {
            cells.insert(format!("d{}", i + 1), CellValue::Float(*t));
            cells.insert(format!("e{}", i + 1), CellValue::Integer(*e));
        }
        Record::new(cells)
    }

    fn dataset(records: Vec<Record>) -> Dataset {
        let schema = SchemaMapping::compact();
        Dataset::new(records, schema.display_columns(), schema)
    }

    fn sample() -> Dataset {
        dataset(vec![
            record("S1", "E1", "2024-01-01", &[20.0; TRIAL_COUNT], &[5; TRIAL_COUNT]),
            record("S2", "E1", "2024-01-02", &TIMES, &ERRORS),
            record("S1", "E1", "2024-01-03", &TIMES, &ERRORS),
        ])
    }

    #[test]
    fn blank_identifiers_are_missing_input() {
        let ds = sample();
        assert_eq!(query(&ds, "", "E1"), QueryResult::MissingInput);
        assert_eq!(query(&ds, "S1", ""), QueryResult::MissingInput);
        assert_eq!(query(&ds, "  ", " "), QueryResult::MissingInput);

        let empty = dataset(Vec::new());
        assert_eq!(query(&empty, "", "E1"), QueryResult::MissingInput);
    }

    #[test]
    fn unknown_pair_is_no_match() {
        let ds = sample();
        assert_eq!(
            query(&ds, "S2", "E9"),
            QueryResult::NoMatch {
                subject: "S2".into(),
                examiner: "E9".into()
            }
        );
        assert!(matches!(
            query(&dataset(Vec::new()), "S1", "E1"),
            QueryResult::NoMatch { .. }
        ));
    }

    #[test]
    fn single_match_returns_trials_unchanged() {
        let ds = sample();
        let found = query(&ds, "S2", "E1").found().cloned().unwrap();
        assert_eq!(found.record.row, 1);
        assert_eq!(found.submissions(), 1);
        assert_eq!(found.history, vec![found.record.clone()]);
        assert_eq!(found.trials.len(), TRIAL_COUNT);
        for (i, trial) in found.trials.iter().enumerate() {
            assert_eq!(trial.index, i + 1);
            assert_eq!(trial.time_secs, TIMES[i]);
            assert_eq!(i64::from(trial.errors), ERRORS[i]);
        }
    }

    #[test]
    fn latest_submission_in_load_order_wins() {
        let found = query(&sample(), "S1", "E1").into_found().unwrap().unwrap();
        assert_eq!(found.record.row, 2);
        assert_eq!(found.submissions(), 2);
        assert_eq!(found.record.submitted_at, "2024-01-03 09:30");
        assert_eq!(found.summary.time.first_two_mean, 9.0);
        assert_eq!(found.summary.time.last_two_mean, 2.5);
        assert_eq!(found.summary.time.saving, 6.5);
        assert_eq!(found.summary.errors.first_two_mean, 1.5);
        assert_eq!(found.summary.errors.last_two_mean, 0.0);
        assert_eq!(found.summary.errors.saving, 1.5);
    }

    #[test]
    fn load_order_beats_timestamp_order() {
        let ds = dataset(vec![
            record("S1", "E1", "2024-05-01", &TIMES, &ERRORS),
            record("S1", "E1", "2024-01-01", &[1.0; TRIAL_COUNT], &[0; TRIAL_COUNT]),
        ]);
        let found = query(&ds, "S1", "E1").into_found().unwrap().unwrap();
        assert_eq!(found.record.row, 1);
        assert_eq!(found.record.submitted_at, "2024-01-01 09:30");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let ds = sample();
        assert_eq!(query(&ds, " S1 ", "E1"), query(&ds, "S1", "E1"));
        assert_eq!(query(&ds, "S1", "\tE1 "), query(&ds, "S1", "E1"));
    }

    #[test]
    fn zero_padded_id_does_not_match_number() {
        let mut rec = record("x", "E1", "2024-01-01", &TIMES, &ERRORS);
        rec.cells.insert("uid".into(), CellValue::Integer(7));
        let ds = dataset(vec![rec]);

        assert!(matches!(query(&ds, "007", "E1"), QueryResult::NoMatch { .. }));
        assert!(matches!(query(&ds, "7", "E1"), QueryResult::Found(_)));
    }

    #[test]
    fn malformed_trial_fields_are_reported() {
        let mut rec = record("S1", "E1", "2024-01-01", &TIMES, &ERRORS);
        rec.cells.remove("d10");
        rec.cells.insert("e3".into(), CellValue::String("n/a".into()));
        rec.cells.insert("d4".into(), CellValue::Float(-1.0));
        let ds = dataset(vec![rec]);

        match query(&ds, "S1", "E1") {
            QueryResult::MalformedRecord(err) => {
                assert_eq!(err.row, 0);
                assert_eq!(err.columns, vec!["e3", "d4", "d10"]);
                assert!(err.to_string().contains("e3, d4, d10"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn negative_saving_is_a_normal_result() {
        let mut worse = TIMES;
        worse.reverse();
        let ds = dataset(vec![record("S1", "E1", "2024-01-01", &worse, &ERRORS)]);
        let found = query(&ds, "S1", "E1").into_found().unwrap().unwrap();
        assert_eq!(found.summary.time.saving, -6.5);
    }

    #[test]
    fn display_cells_follow_schema_order() {
        let found = query(&sample(), "S2", "E1").into_found().unwrap().unwrap();
        let names: Vec<&str> = found.record.cells.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(&names[..5], &["date", "time", "uid", "eid", "e1"]);
        assert_eq!(found.record.cells[2].1, "S2");
        assert_eq!(found.record.cells[5], ("d1".to_string(), "10".to_string()));
    }

    #[test]
    fn history_lists_every_match_in_load_order() {
        let found = query(&sample(), "S1", "E1").into_found().unwrap().unwrap();
        let rows: Vec<usize> = found.history.iter().map(|v| v.row).collect();
        assert_eq!(rows, vec![0, 2]);

        let first = &found.history[0];
        assert_eq!(first.submitted_at, "2024-01-01 09:30");
        assert_eq!(first.cells[5], ("d1".to_string(), "20".to_string()));
        assert_eq!(first.cells[4], ("e1".to_string(), "5".to_string()));
        assert_eq!(found.history.last(), Some(&found.record));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let ds = sample();
        let before = ds.records.clone();
        let a = query(&ds, "S1", "E1");
        let b = query(&ds, "S1", "E1");
        assert_eq!(a, b);
        assert_eq!(ds.records, before);
    }

    #[test]
    fn concurrent_queries_share_one_dataset() {
        let ds = Arc::new(sample());
        let expected = query(&ds, "S1", "E1");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let ds = Arc::clone(&ds);
                    scope.spawn(move || query(&ds, "S1", "E1"))
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
