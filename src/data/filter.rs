use super::model::Dataset;

// ---------------------------------------------------------------------------
// Identifier filter
// ---------------------------------------------------------------------------

/// The two identifiers a query filters on, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPair {
    pub subject: String,
    pub examiner: String,
}

impl IdPair {
    /// Trim both inputs. Returns `None` if either is blank.
    pub fn parse(subject: &str, examiner: &str) -> Option<Self> {
        let subject = subject.trim();
        let examiner = examiner.trim();
        if subject.is_empty() || examiner.is_empty() {
            return None;
        }
        Some(Self {
            subject: subject.to_string(),
            examiner: examiner.to_string(),
        })
    }
}

/// Return indices of records whose identifier cells match `ids`, in load order.
///
/// Each cell is compared through its trimmed string form. Comparison is
/// case-sensitive and never numeric. A record missing either identifier
/// column does not match.
pub fn matching_indices(dataset: &Dataset, ids: &IdPair) -> Vec<usize> {
    let subject_col = &dataset.schema.subject_id;
    let examiner_col = &dataset.schema.examiner_id;

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            let subject_ok = rec
                .get(subject_col)
                .is_some_and(|v| v.key_text() == ids.subject);
            subject_ok
                && rec
                    .get(examiner_col)
                    .is_some_and(|v| v.key_text() == ids.examiner)
        })
        .map(|(i, _)| i)
        .collect()
}
