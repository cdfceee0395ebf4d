//! Test doubles for the import pipeline

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewQuestion, Question, Section};
use crate::import::store::{ImportTransaction, InsertError, QuestionStore};
use crate::types::QuestionType;

#[derive(Default)]
struct State {
    sections: Vec<Section>,
    questions: Vec<Question>,
    rejected_labels: HashSet<String>,
    storage_failure_labels: HashSet<String>,
    transactions_opened: usize,
    commits: usize,
    rollbacks: usize,
}

/// In-memory `QuestionStore` with scriptable insert failures
#[derive(Clone, Default)]
pub struct MemoryQuestionStore {
    state: Arc<Mutex<State>>,
}

impl MemoryQuestionStore {
    /// A store holding one empty section
    pub fn with_section() -> (Self, Uuid) {
        let store = Self::default();
        let section_id = store.add_section("test-provider");
        (store, section_id)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_section(&self, provider_id: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state().sections.push(Section {
            id,
            insurance_provider_id: provider_id.to_string(),
            title: "Personal details".to_string(),
            description: String::new(),
            order: 0,
            is_active: true,
            created_at: Utc::now(),
        });
        id
    }

    pub fn seed_question(&self, section_id: Uuid, label: &str, order: i32) {
        let question = NewQuestion {
            id: Uuid::new_v4(),
            section_id,
            question_type: QuestionType::Text,
            label: label.to_string(),
            placeholder: String::new(),
            required: true,
            options: None,
            order,
        };
        self.state().questions.push(question.into_question(Utc::now()));
    }

    /// Inserts with this label fail like a constraint violation
    pub fn reject_label(&self, label: &str) {
        self.state().rejected_labels.insert(label.to_string());
    }

    /// Inserts with this label fail like a lost connection
    pub fn fail_storage_on_label(&self, label: &str) {
        self.state().storage_failure_labels.insert(label.to_string());
    }

    pub fn transactions_opened(&self) -> usize {
        self.state().transactions_opened
    }

    pub fn commits(&self) -> usize {
        self.state().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn find_section(&self, section_id: Uuid) -> Result<Option<Section>, DatabaseError> {
        Ok(self.state().sections.iter().find(|s| s.id == section_id).cloned())
    }

    async fn begin_import(&self, section_id: Uuid) -> Result<Box<dyn ImportTransaction>, DatabaseError> {
        self.state().transactions_opened += 1;
        Ok(Box::new(MemoryImportTransaction {
            state: Arc::clone(&self.state),
            section_id,
            pending: Vec::new(),
        }))
    }

    async fn questions_in_section(&self, section_id: Uuid) -> Result<Vec<Question>, DatabaseError> {
        let mut questions: Vec<_> = self
            .state()
            .questions
            .iter()
            .filter(|q| q.section_id == section_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }
}

struct MemoryImportTransaction {
    state: Arc<Mutex<State>>,
    section_id: Uuid,
    pending: Vec<Question>,
}

#[async_trait]
impl ImportTransaction for MemoryImportTransaction {
    async fn max_order(&mut self) -> Result<Option<i32>, DatabaseError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .iter()
            .filter(|q| q.section_id == self.section_id)
            .map(|q| q.order)
            .max())
    }

    async fn insert_question(&mut self, question: &NewQuestion) -> Result<Question, InsertError> {
        {
            let state = self.state.lock().unwrap();
            if state.storage_failure_labels.contains(&question.label) {
                return Err(InsertError::Database(DatabaseError::QueryError("connection reset".to_string())));
            }
            if state.rejected_labels.contains(&question.label) {
                return Err(InsertError::Rejected(format!(
                    "new row for relation \"questions\" violates check constraint ({})",
                    question.label
                )));
            }
        }

        let inserted = question.clone().into_question(Utc::now());
        self.pending.push(inserted.clone());
        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let MemoryImportTransaction { state, pending, .. } = *self;
        let mut state = state.lock().unwrap();
        state.questions.extend(pending);
        state.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}
