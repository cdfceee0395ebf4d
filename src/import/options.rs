use uuid::Uuid;

use crate::database::models::QuestionOption;

/// Split a comma-separated options cell into option records.
///
/// Ids are `opt_<question id>_<index>`, so they are unique across a batch and
/// stable for a given question. Duplicate labels are kept.
pub fn synthesize_options(question_id: &Uuid, raw: &str) -> Vec<QuestionOption> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(idx, label)| QuestionOption {
            id: format!("opt_{}_{}", question_id.simple(), idx),
            label: label.to_string(),
            value: option_value(label),
        })
        .collect()
}

/// Lower-cased label with whitespace runs collapsed to `_`
fn option_value(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
