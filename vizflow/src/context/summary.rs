//! Bounded textual digest of the context store for prompt inclusion.

use super::{ContextStore, Value, PRIMARY_DATASET};

/// Number of sample rows shown for the primary dataset.
const SAMPLE_ROWS: usize = 5;

/// Maximum rendered length for a non-tabular variable before truncation.
const MAX_RENDER_LEN: usize = 400;

/// Renders a deterministic text summary of the store's current state.
///
/// The primary dataset comes first (shape, column names, head rows as a
/// text table), followed by every other variable in insertion order as
/// `name: type = rendering`. Rendering is total: values that cannot be
/// shown in full fall back to a type tag plus truncated display text.
#[must_use]
pub fn summarize(store: &ContextStore) -> String {
    let mut lines: Vec<String> = Vec::new();

    match store.get(PRIMARY_DATASET) {
        Some(Value::Frame(frame)) => {
            let (rows, cols) = frame.shape();
            lines.push(format!("Shape: ({rows}, {cols})"));
            lines.push(format!("Columns: {}", frame.columns().join(", ")));
            lines.push("Head:".to_string());
            lines.push(frame.head(SAMPLE_ROWS).render_table());
        }
        Some(other) => {
            // The primary name was rebound to something non-tabular.
            lines.push(format!(
                "{PRIMARY_DATASET}: {} = {}",
                other.type_name(),
                truncate(&other.render())
            ));
        }
        None => lines.push("(no dataset loaded)".to_string()),
    }

    let others: Vec<(String, Value)> = store
        .snapshot()
        .into_iter()
        .filter(|(name, _)| name != PRIMARY_DATASET)
        .collect();
    if !others.is_empty() {
        lines.push("Other variables:".to_string());
        for (name, value) in others {
            lines.push(format!(
                "{name}: {} = {}",
                value.type_name(),
                truncate(&value.render())
            ));
        }
    }

    lines.join("\n")
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_RENDER_LEN {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_RENDER_LEN).collect();
    out.push('…');
    out
}
