/// Shared types used across the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Caller roles carried in the JWT and stored in `user_roles`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Agent => "agent",
            Role::User => "user",
        }
    }
}

/// Question kinds accepted by the form builder and the bulk importer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Mcq,
    Checkbox,
    Dropdown,
    Number,
    Date,
    Email,
    Phone,
    Select,
}

impl QuestionType {
    pub const ALL: [QuestionType; 10] = [
        QuestionType::Text,
        QuestionType::Textarea,
        QuestionType::Mcq,
        QuestionType::Checkbox,
        QuestionType::Dropdown,
        QuestionType::Number,
        QuestionType::Date,
        QuestionType::Email,
        QuestionType::Phone,
        QuestionType::Select,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Mcq => "mcq",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Number => "number",
            QuestionType::Date => "date",
            QuestionType::Email => "email",
            QuestionType::Phone => "phone",
            QuestionType::Select => "select",
        }
    }

    /// Choice-bearing types carry an `options` list
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Mcq | QuestionType::Checkbox | QuestionType::Dropdown | QuestionType::Select
        )
    }

    /// Comma-joined vocabulary, used in validation messages
    pub fn vocabulary() -> String {
        Self::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// Lifecycle of a form response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Draft,
    Submitted,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Draft => "DRAFT",
            ResponseStatus::Submitted => "SUBMITTED",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "agent" => Ok(Role::Agent),
            "user" => Ok(Role::User),
            other => Err(UnknownVariant { kind: "role", value: other.to_string() }),
        }
    }
}

impl FromStr for QuestionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "question type", value: s.to_string() })
    }
}

impl FromStr for ResponseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ResponseStatus::Draft),
            "SUBMITTED" => Ok(ResponseStatus::Submitted),
            other => Err(UnknownVariant { kind: "response status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_parses_every_vocabulary_entry() {
        for kind in QuestionType::ALL {
            assert_eq!(kind.as_str().parse::<QuestionType>(), Ok(kind));
        }
        assert!("radio".parse::<QuestionType>().is_err());
        assert!("Text".parse::<QuestionType>().is_err());
    }

    #[test]
    fn choice_types_are_exactly_four() {
        let choice: Vec<_> = QuestionType::ALL.iter().filter(|t| t.is_choice()).collect();
        assert_eq!(
            choice,
            vec![&QuestionType::Mcq, &QuestionType::Checkbox, &QuestionType::Dropdown, &QuestionType::Select]
        );
    }

    #[test]
    fn vocabulary_lists_types_in_declaration_order() {
        assert_eq!(
            QuestionType::vocabulary(),
            "text, textarea, mcq, checkbox, dropdown, number, date, email, phone, select"
        );
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(Role::Agent).unwrap(), "agent");
        assert_eq!(serde_json::to_value(ResponseStatus::Submitted).unwrap(), "SUBMITTED");
        assert_eq!(serde_json::from_str::<QuestionType>("\"mcq\"").unwrap(), QuestionType::Mcq);
    }
}
