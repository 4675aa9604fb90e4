//! Prompt templates for chat-completion suggestion providers.

use crate::error::{ColmapError, Result};

use super::suggestion::SuggestionRequest;

/// System prompt: forces JSON-only replies.
pub fn system_prompt() -> &'static str {
    "You are a medical data normalization API. Output only valid JSON."
}

/// Render the request samples as CSV, one column per requested field.
///
/// Shorter samples are padded with empty cells; absent values are empty.
pub fn samples_csv(request: &SuggestionRequest) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(request.columns())?;

    let height = request.data.values().map(|s| s.len()).max().unwrap_or(0);
    for i in 0..height {
        let record: Vec<&str> = request
            .data
            .values()
            .map(|s| s.values().get(i).and_then(|v| v.as_deref()).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ColmapError::Config(format!("CSV buffer error: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Build the user prompt asking for normalized names of the sampled fields.
pub fn normalization_prompt(request: &SuggestionRequest) -> Result<String> {
    let fields = samples_csv(request)?;

    Ok(format!(
        r#"Return ONLY valid JSON.

## Format
{{
  "original_field_name": {{
    "primary": "normalized_name",
    "alternatives": ["alt_name_1", "alt_name_2"]
  }}
}}

## Rules
- Use snake_case
- Keep medical terminology accurate
- Primary = most common/standard term
- Alternatives = synonyms or related terms, different than Primary

## Fields
{fields}"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Sample;

    fn request() -> SuggestionRequest {
        let mut request = SuggestionRequest::default();
        request.data.insert(
            "Variable / Field Name".to_string(),
            Sample::new(vec![Some("age".to_string()), None, Some("bmi".to_string())]),
        );
        request
            .data
            .insert("other".to_string(), Sample::new(vec![Some("x".to_string())]));
        request
    }

    #[test]
    fn test_samples_csv_pads_columns() {
        let csv = samples_csv(&request()).unwrap();
        assert_eq!(csv, "Variable / Field Name,other\nage,x\n,\nbmi,\n");
    }

    #[test]
    fn test_prompt_contains_fields() {
        let prompt = normalization_prompt(&request()).unwrap();
        assert!(prompt.contains("\"primary\": \"normalized_name\""));
        assert!(prompt.ends_with("bmi,\n"));
    }
}
