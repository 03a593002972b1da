//! Metrics flow - validate the model and ask the token counter for the document's size

use tracing::info;

use crate::core::error::PromptifyError;
use crate::core::model::MetricsReport;
use crate::core::tokenizer::{is_supported_model, TokenCounter, SUPPORTED_MODELS};

/// Build the metrics report for `text` under `model`.
///
/// The model is checked against the allow-list before the counter is touched.
pub fn report<C: TokenCounter + ?Sized>(
    counter: &C,
    model: &str,
    text: &str,
) -> Result<MetricsReport, PromptifyError> {
    if !is_supported_model(model) {
        return Err(PromptifyError::UnsupportedModel {
            model: model.to_string(),
            supported: SUPPORTED_MODELS.iter().map(|m| m.to_string()).collect(),
        });
    }

    let counts = counter.count_tokens(model, text)?;
    info!(
        "{}: {} tokens, {} billable characters",
        model, counts.total_tokens, counts.total_billable_characters
    );

    Ok(MetricsReport::new(model, counts))
}
