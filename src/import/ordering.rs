use crate::database::models::NewQuestion;

use super::validator::ValidatedRow;

/// Hands out consecutive display orders after a single max-order snapshot
#[derive(Debug, Clone)]
pub struct OrderAllocator {
    next: i32,
}

impl OrderAllocator {
    /// `current_max` is `None` for a section with no questions
    pub fn after(current_max: Option<i32>) -> Self {
        Self {
            next: current_max.map_or(0, |max| max + 1),
        }
    }

    pub fn next_order(&mut self) -> i32 {
        let order = self.next;
        self.next += 1;
        order
    }

    /// Assign orders to rows in validation order
    pub fn assign(&mut self, section_id: uuid::Uuid, rows: Vec<ValidatedRow>) -> Vec<(usize, NewQuestion)> {
        rows.into_iter()
            .map(|row| {
                let question = NewQuestion {
                    id: row.id,
                    section_id,
                    question_type: row.question_type,
                    label: row.label,
                    placeholder: row.placeholder,
                    required: row.required,
                    options: row.options,
                    order: self.next_order(),
                };
                (row.row_number, question)
            })
            .collect()
    }
}
