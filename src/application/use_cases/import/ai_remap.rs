// Optional "smart" remapping pre-pass. Composes in front of the
// heuristic normalizer: rows go in, same-shaped rows come out, and any
// failure keeps the original rows, so the heuristics stay the final
// authority and the pipeline never depends on the model being up.

use crate::application::use_cases::llm_output::extract_json_payload;
use crate::domain::error::{AppError, Result};
use crate::domain::import::{ImportSpec, ParsedRow, RowCell};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use serde_json::Value;
use tracing::warn;

pub(crate) struct AiRemapper<'a> {
    llm: &'a (dyn LLMClient + Send + Sync),
    llm_config: &'a LLMConfig,
    batch_size: usize,
}

impl<'a> AiRemapper<'a> {
    pub(crate) fn new(
        llm: &'a (dyn LLMClient + Send + Sync),
        llm_config: &'a LLMConfig,
        batch_size: usize,
    ) -> Self {
        Self {
            llm,
            llm_config,
            batch_size: batch_size.max(1),
        }
    }

    /// Rows are sent in bounded batches, sequentially, and results are
    /// concatenated in row order. A batch that fails in any way (request,
    /// parse, wrong row count) falls back to its original rows.
    pub(crate) async fn remap(&self, spec: &ImportSpec, rows: &[ParsedRow]) -> Vec<ParsedRow> {
        let mut out = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(self.batch_size) {
            match self.remap_batch(spec, chunk).await {
                Ok(mapped) if mapped.len() == chunk.len() => out.extend(mapped),
                Ok(mapped) => {
                    warn!(
                        expected = chunk.len(),
                        got = mapped.len(),
                        "AI remap returned a mismatched row count; keeping original rows"
                    );
                    out.extend_from_slice(chunk);
                }
                Err(err) => {
                    warn!(error = %err, "AI remap failed; keeping original rows");
                    out.extend_from_slice(chunk);
                }
            }
        }

        out
    }

    async fn remap_batch(&self, spec: &ImportSpec, chunk: &[ParsedRow]) -> Result<Vec<ParsedRow>> {
        let rows_json: Vec<serde_json::Map<String, Value>> =
            chunk.iter().map(row_to_object).collect();
        let payload = serde_json::to_string(&rows_json)
            .map_err(|e| AppError::Internal(format!("Failed to encode rows: {}", e)))?;

        let keys = spec.field_keys().join(", ");
        let system = "You map messy spreadsheet rows onto canonical CRM fields for a \
                      real-estate agency. Answer with JSON only, no prose.";
        let user = format!(
            "Target entity: {entity}.\n\
             Canonical field keys: {keys}.\n\
             Source rows (JSON array of objects):\n{payload}\n\n\
             Return a JSON array with exactly one object per source row, in the same \
             order. Each object uses only the canonical field keys, with string values \
             copied or cleaned from the source row. Omit keys you cannot fill.",
            entity = spec.entity,
            keys = keys,
            payload = payload,
        );

        let response = self.llm.generate(self.llm_config, system, &user).await?;
        let parsed: Vec<serde_json::Map<String, Value>> =
            serde_json::from_str(&extract_json_payload(&response))
                .map_err(|e| AppError::LLMError(format!("Unparseable remap response: {}", e)))?;

        Ok(chunk
            .iter()
            .zip(parsed)
            .map(|(original, mapped)| merge_row(spec, original, &mapped))
            .collect())
    }
}

fn row_to_object(row: &ParsedRow) -> serde_json::Map<String, Value> {
    row.cells
        .iter()
        .map(|c| (c.header.clone(), Value::String(c.value.clone())))
        .collect()
}

/// Canonical cells first (in spec order), original cells after them, so
/// the heuristic normalizer resolves the model's mapping preferentially
/// while the raw columns stay available for fallback scans.
fn merge_row(
    spec: &ImportSpec,
    original: &ParsedRow,
    mapped: &serde_json::Map<String, Value>,
) -> ParsedRow {
    let mut cells: Vec<RowCell> = spec
        .fields
        .iter()
        .map(|field| {
            let value = mapped.get(field.key).map(value_to_string).unwrap_or_default();
            RowCell::new(field.key.to_string(), value)
        })
        .collect();

    cells.extend(original.cells.iter().cloned());

    ParsedRow::new(original.index, cells)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::import_schema::contact_spec;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        responses: Vec<Result<String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.responses[call.min(self.responses.len() - 1)] {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(AppError::LLMError("scripted failure".to_string())),
            }
        }
    }

    fn row(pairs: &[(&str, &str)]) -> ParsedRow {
        ParsedRow::new(
            0,
            pairs
                .iter()
                .map(|(h, v)| RowCell::new(h.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn failure_keeps_original_rows() {
        let client = ScriptedClient {
            responses: vec![Err(AppError::LLMError(String::new()))],
            calls: AtomicUsize::new(0),
        };
        let config = LLMConfig::default();
        let remapper = AiRemapper::new(&client, &config, 20);

        let rows = vec![row(&[("kontakt", "Alice")])];
        let out = remapper.remap(&contact_spec(), &rows).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].cells[0].header, "kontakt");
    }

    #[tokio::test]
    async fn mapped_rows_lead_with_canonical_cells() {
        let client = ScriptedClient {
            responses: vec![Ok("[{\"name\": \"Alice\", \"email\": \"a@x.com\"}]".to_string())],
            calls: AtomicUsize::new(0),
        };
        let config = LLMConfig::default();
        let remapper = AiRemapper::new(&client, &config, 20);

        let rows = vec![row(&[("kontakt", "Alice"), ("mail adresse", "a@x.com")])];
        let out = remapper.remap(&contact_spec(), &rows).await;

        assert_eq!(out[0].cells[0].header, "name");
        assert_eq!(out[0].cells[0].value, "Alice");
        // Original columns survive behind the canonical ones.
        assert!(out[0].cells.iter().any(|c| c.header == "kontakt"));
    }

    #[tokio::test]
    async fn wrong_row_count_falls_back() {
        let client = ScriptedClient {
            responses: vec![Ok("[]".to_string())],
            calls: AtomicUsize::new(0),
        };
        let config = LLMConfig::default();
        let remapper = AiRemapper::new(&client, &config, 20);

        let rows = vec![row(&[("kontakt", "Alice")])];
        let out = remapper.remap(&contact_spec(), &rows).await;

        assert_eq!(out[0].cells[0].header, "kontakt");
    }
}
