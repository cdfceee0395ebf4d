use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

pub const CSV_TEMPLATE_FILENAME: &str = "questions_template.csv";
pub const EXCEL_TEMPLATE_FILENAME: &str = "questions_template.xlsx";
pub const EXCEL_SHEET_NAME: &str = "Questions Template";

pub const TEMPLATE_HEADERS: [&str; 5] = ["question_text", "question_type", "options", "required", "placeholder"];

struct TemplateRow {
    text: &'static str,
    question_type: &'static str,
    options: &'static str,
    required: bool,
    placeholder: &'static str,
}

const TEMPLATE_ROWS: [TemplateRow; 8] = [
    TemplateRow { text: "What is your full name?", question_type: "text", options: "", required: true, placeholder: "Enter your full name" },
    TemplateRow { text: "What is your age?", question_type: "number", options: "", required: true, placeholder: "Enter your age" },
    TemplateRow { text: "What is your email?", question_type: "email", options: "", required: true, placeholder: "Enter your email address" },
    TemplateRow { text: "Select your gender", question_type: "mcq", options: "Male,Female,Other", required: true, placeholder: "" },
    TemplateRow { text: "Choose your preferred languages", question_type: "checkbox", options: "English,Hindi,Tamil,Telugu,Bengali", required: false, placeholder: "" },
    TemplateRow { text: "Select your state", question_type: "dropdown", options: "Maharashtra,Delhi,Karnataka,Tamil Nadu,Gujarat", required: true, placeholder: "" },
    TemplateRow { text: "Describe your medical history", question_type: "textarea", options: "", required: false, placeholder: "Provide any relevant medical history" },
    TemplateRow { text: "What is your date of birth?", question_type: "date", options: "", required: true, placeholder: "" },
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to write CSV template: {0}")]
    Csv(String),

    #[error("Failed to write Excel template: {0}")]
    Xlsx(#[from] XlsxError),
}

impl From<csv::Error> for TemplateError {
    fn from(err: csv::Error) -> Self {
        TemplateError::Csv(err.to_string())
    }
}

/// Sample upload in delimited form
pub fn csv_template() -> Result<Vec<u8>, TemplateError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADERS)?;

    for row in &TEMPLATE_ROWS {
        let required = if row.required { "true" } else { "false" };
        writer.write_record([row.text, row.question_type, row.options, required, row.placeholder])?;
    }

    writer.into_inner().map_err(|e| TemplateError::Csv(e.to_string()))
}

/// Sample upload as an xlsx workbook with a single sheet
pub fn excel_template() -> Result<Vec<u8>, TemplateError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXCEL_SHEET_NAME)?;

    for (col, header) in TEMPLATE_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (idx, row) in TEMPLATE_ROWS.iter().enumerate() {
        let r = (idx + 1) as u32;
        sheet.write_string(r, 0, row.text)?;
        sheet.write_string(r, 1, row.question_type)?;
        if !row.options.is_empty() {
            sheet.write_string(r, 2, row.options)?;
        }
        sheet.write_boolean(r, 3, row.required)?;
        if !row.placeholder.is_empty() {
            sheet.write_string(r, 4, row.placeholder)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::parse_upload;
    use crate::import::row::CandidateRow;
    use crate::import::validator::validate_rows;
    use crate::types::QuestionType;

    fn validated(bytes: &[u8], filename: &str) -> Vec<crate::import::validator::ValidatedRow> {
        let records = parse_upload(bytes, filename).unwrap();
        let (valid, errors) = validate_rows(records.into_iter().map(CandidateRow::from).collect());
        assert!(errors.is_empty(), "template rows must all validate: {errors:?}");
        valid
    }

    #[test]
    fn csv_template_starts_with_header_line() {
        let bytes = csv_template().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("question_text,question_type,options,required,placeholder\n"));
        assert!(text.contains("\"Male,Female,Other\""));
    }

    #[test]
    fn csv_template_imports_cleanly() {
        let rows = validated(&csv_template().unwrap(), CSV_TEMPLATE_FILENAME);

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[3].question_type, QuestionType::Mcq);
        assert_eq!(rows[3].options.as_ref().map(|o| o.len()), Some(3));
        assert!(!rows[4].required);
        assert_eq!(rows[5].options.as_ref().unwrap()[3].value, "tamil_nadu");
        assert_eq!(rows[0].placeholder, "Enter your full name");
    }

    #[test]
    fn excel_template_imports_cleanly() {
        let rows = validated(&excel_template().unwrap(), EXCEL_TEMPLATE_FILENAME);

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[7].question_type, QuestionType::Date);
        assert!(rows[0].required);
        assert!(!rows[6].required);
        assert_eq!(rows[4].options.as_ref().map(|o| o.len()), Some(5));
    }
}
