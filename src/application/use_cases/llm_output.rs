// Models wrap JSON answers in prose or code fences often enough that
// every structured consumer goes through this helper first.

pub(crate) fn extract_json_payload(output: &str) -> String {
    strip_code_fence(output.trim())
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_passes_through() {
        assert_eq!(extract_json_payload("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        assert_eq!(
            extract_json_payload("```json\n{\"a\":1}\n```"),
            "{\"a\":1}"
        );
        assert_eq!(extract_json_payload("```\n[1,2]\n```"), "[1,2]");
    }
}
