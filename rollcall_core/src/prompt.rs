//! Prompt construction for student detail extraction.

/// Keys the model is allowed to emit, in output order.
pub const STUDENT_KEYS: [&str; 3] = ["name", "rollno", "address"];

/// Build the extraction instruction for one transcript.
///
/// The transcript is embedded verbatim between double quotes.
#[must_use]
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        r#"You are an information extraction system.
Extract student details from the text below and return ONLY valid JSON.
No markdown, no code fences, no explanations, no extra text. Only the JSON object.

Rules:
- "rollno" must always be an integer (not a string).
- "name" must always be a string.
- "address" must always be a string.
- Do not include any keys other than {{ "name", "rollno", "address" }}.

Text: "{text}"

Return strictly:
{{ "name": "string", "rollno": 123, "address": "string" }}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_transcript_verbatim() {
        let text = "My name is Ravi, roll 45, I live at MG Road";
        let prompt = build_extraction_prompt(text);
        assert!(prompt.contains(&format!("Text: \"{text}\"")));
    }

    #[test]
    fn prompt_names_every_key() {
        let prompt = build_extraction_prompt("anything");
        for key in STUDENT_KEYS {
            assert!(prompt.contains(&format!("\"{key}\"")), "missing key {key}");
        }
    }

    #[test]
    fn prompt_constrains_output_shape() {
        let prompt = build_extraction_prompt("anything");
        assert!(prompt.contains("must always be an integer"));
        assert!(prompt.contains("Do not include any keys other than"));
        assert!(prompt.contains("No markdown"));
        assert!(prompt.contains("ONLY valid JSON"));
    }
}
