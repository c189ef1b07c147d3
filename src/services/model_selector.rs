use std::future::Future;

use crate::{errors::ModelError, models::domain::ModelId};

/// Preferred model first, then the rest of `order` in its relative order.
pub fn models_to_try(preferred: ModelId, order: &[ModelId]) -> Vec<ModelId> {
    let mut sequence = vec![preferred];
    for model in order {
        if !sequence.contains(model) {
            sequence.push(*model);
        }
    }
    sequence
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallbackOutcome<T> {
    pub result: T,
    pub used_model: ModelId,
    pub fallback_used: bool,
}

/// Runs `task` against each model of the try-sequence, one at a time.
///
/// A retryable failure moves on to the next model; any other failure is
/// returned straight away. When every model fails retryably the last error is
/// returned.
pub async fn run_with_fallback<T, F, Fut>(
    preferred: ModelId,
    order: &[ModelId],
    label: &str,
    mut task: F,
) -> Result<FallbackOutcome<T>, ModelError>
where
    F: FnMut(ModelId) -> Fut,
    Fut: Future<Output = Result<T, ModelError>>,
{
    let mut last_error = None;

    for model in models_to_try(preferred, order) {
        log::debug!("{}: attempting model {}", label, model);
        match task(model).await {
            Ok(result) => {
                let fallback_used = model != preferred;
                if fallback_used {
                    log::info!("{}: succeeded with fallback model {} (preferred {})", label, model, preferred);
                }
                return Ok(FallbackOutcome {
                    result,
                    used_model: model,
                    fallback_used,
                });
            }
            Err(err) if err.is_retryable() => {
                log::warn!("{}: model {} unavailable, trying next: {}", label, model, err);
                last_error = Some(err);
            }
            Err(err) => {
                log::error!("{}: model {} failed: {}", label, model, err);
                return Err(err);
            }
        }
    }

    log::error!("{}: every model in the fallback sequence failed", label);
    Err(last_error.unwrap_or_else(|| ModelError::UnknownModel(preferred.to_string())))
}
