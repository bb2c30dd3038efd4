//! Stage agent role definitions.
//!
//! Each factory returns the [`AgentSpec`] for one pipeline stage. The
//! descriptions teach the model the transform script surface it may send
//! to the `execute_script` tool.

use super::AgentSpec;

const SCRIPT_PRIMER: &str = "\
Scripts are one statement per line. Variables persist between calls; 'df' is the dataset.\n\
Frame methods: df.assign(name = expr), df.filter(pred), df.drop_nulls(), df.drop_nulls(\"col\"), \
df.select(\"a\", \"b\"), df.sort_by(\"col\", true), df.head(n), df.count(), df.mean(\"col\"), \
df.sum(\"col\"), df.min(\"col\"), df.max(\"col\").\n\
Builtins: create_dir(path), bar_chart(df, \"x\", \"y\", path), line_chart(df, \"x\", \"y\", path), \
scatter_plot(df, \"x\", \"y\", path), histogram(df, \"col\", bins, path), len(v), columns(df).\n\
Records: {key: value, ...}; lists: [a, b, c].";

/// The data preprocessing agent: cleans and reshapes the dataset.
#[must_use]
pub fn preprocessor_spec(model: &str) -> AgentSpec {
    AgentSpec::new(
        "PreprocessingAgent",
        "assistant",
        format!(
            "You are the data preprocessing agent. You receive a summary of the dataset \
             (shape, columns, and the first rows) and you produce a transform script to clean \
             it: handle missing values, drop broken rows, derive useful columns. \
             Call the execute_script tool to run your script; if it reports an error, fix the \
             script and call the tool again.\n{SCRIPT_PRIMER}"
        ),
        model,
    )
}

/// The analysis agent: derives statistics to steer visualization choices.
#[must_use]
pub fn analyzer_spec(model: &str) -> AgentSpec {
    AgentSpec::new(
        "AnalyzerAgent",
        "assistant",
        format!(
            "You are the data analysis agent. Given a summary of the dataset, produce a \
             transform script that computes statistics and aggregates useful for deciding \
             what to visualize. Collect every derived value into a single record variable \
             named 'insights'. Call the execute_script tool to run the script.\n{SCRIPT_PRIMER}"
        ),
        model,
    )
}

/// The visualization suggestion agent: text only, no tools.
#[must_use]
pub fn suggestion_spec(model: &str) -> AgentSpec {
    AgentSpec::new(
        "VizSuggestionAgent",
        "assistant",
        "You are the visualization suggestion agent. Given a summary of the dataset and the \
         insights derived from it, propose 2-4 meaningful charts that would reveal something \
         interesting about the data. Respond with textual suggestions only — no code.",
        model,
    )
}

/// The visualization code agent: turns suggestions into chart scripts.
#[must_use]
pub fn viz_coder_spec(model: &str) -> AgentSpec {
    AgentSpec::new(
        "VizCodeAgent",
        "assistant",
        format!(
            "You are the visualization code agent. Given a summary of the dataset, the current \
             variables, and a set of suggested charts, produce a transform script that creates \
             those charts from 'df' and saves them as .svg files in the output directory you \
             are given. Create the output directory first with create_dir. Call the \
             execute_script tool to run the script.\n{SCRIPT_PRIMER}"
        ),
        model,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_name_their_stage() {
        assert_eq!(preprocessor_spec("m").name, "PreprocessingAgent");
        assert_eq!(analyzer_spec("m").name, "AnalyzerAgent");
        assert_eq!(suggestion_spec("m").name, "VizSuggestionAgent");
        assert_eq!(viz_coder_spec("m").name, "VizCodeAgent");
    }

    #[test]
    fn test_analyzer_demands_insights_variable() {
        assert!(analyzer_spec("m").description.contains("'insights'"));
    }

    #[test]
    fn test_suggestion_agent_is_text_only() {
        let spec = suggestion_spec("m");
        assert!(spec.description.contains("no code"));
        assert!(!spec.description.contains("execute_script"));
    }

    #[test]
    fn test_model_passes_through() {
        assert_eq!(viz_coder_spec("gpt-4o").model, "gpt-4o");
    }
}
