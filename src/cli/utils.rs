use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print one indented line per row error in text mode
pub fn output_row_errors(output_format: OutputFormat, errors: &[crate::import::RowError]) {
    if output_format == OutputFormat::Text {
        for err in errors {
            println!("  row {}: {}", err.row, err.error);
        }
    }
}
