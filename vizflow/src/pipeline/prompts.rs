//! Per-stage prompt construction.
//!
//! Every prompt is a function of the *current* context summary and, where
//! specified, the immediately preceding stage's accumulated text — stages
//! never see older history.

use std::path::Path;

/// Prompt for the preprocessing stage.
#[must_use]
pub fn preprocess_prompt(summary: &str) -> String {
    format!(
        "We have the following dataset:\n{summary}\n\n\
         Write a transform script to clean 'df' as needed, then call the \
         execute_script tool to run it."
    )
}

/// Prompt for the analysis stage.
#[must_use]
pub fn analyze_prompt(summary: &str) -> String {
    format!(
        "The dataset now looks like this:\n{summary}\n\n\
         Write a transform script that derives statistics and aggregates useful for \
         choosing visualizations. Collect every derived value into a single record \
         variable named 'insights', then call the execute_script tool to run it."
    )
}

/// Prompt for the suggestion stage (text only).
#[must_use]
pub fn suggest_prompt(summary: &str) -> String {
    format!(
        "The dataset now looks like this:\n{summary}\n\n\
         Suggest 2-4 meaningful visualizations (just text, no code)."
    )
}

/// Prompt for the visualization code stage.
#[must_use]
pub fn viz_code_prompt(summary: &str, suggestions: &str, output_dir: &Path) -> String {
    format!(
        "Based on the following dataset summary:\n{summary}\n\n\
         And these suggested charts:\n{suggestions}\n\n\
         Write a transform script that creates the recommended charts from 'df' and \
         saves them as .svg files under {output_dir:?}. That directory may not exist \
         yet — create it with create_dir first. Then call the execute_script tool to \
         run the script.",
        output_dir = output_dir.display().to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prompts_embed_summary() {
        let summary = "Shape: (9, 3)";
        assert!(preprocess_prompt(summary).contains(summary));
        assert!(analyze_prompt(summary).contains(summary));
        assert!(suggest_prompt(summary).contains(summary));
    }

    #[test]
    fn test_analyze_prompt_demands_insights() {
        assert!(analyze_prompt("s").contains("'insights'"));
    }

    #[test]
    fn test_viz_code_prompt_combines_inputs() {
        let prompt = viz_code_prompt("SUMMARY", "SUGGESTIONS", &PathBuf::from("out"));
        assert!(prompt.contains("SUMMARY"));
        assert!(prompt.contains("SUGGESTIONS"));
        assert!(prompt.contains("\"out\""));
        assert!(prompt.contains("create_dir"));
    }
}
