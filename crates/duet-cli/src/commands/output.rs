use anyhow::Result;
use colored::Colorize;
use duet_core::ComparisonResult;

/// Renders one comparison as a readable text block.
pub fn render_text(index: usize, result: &ComparisonResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format!("=== Query {} ===", index + 1).bright_magenta().bold()));
    out.push_str(&format!("{}\n\n", result.query));

    out.push_str(&format!("{}\n", "--- Traditional LLM ---".cyan().bold()));
    out.push_str(&format!("{}\n\n", result.traditional_response));

    out.push_str(&format!("{}\n", "--- Parlant agent ---".green().bold()));
    if result.agent_timed_out() {
        out.push_str(&format!("{}\n", result.parlant_response.red()));
    } else {
        out.push_str(&format!("{}\n", result.parlant_response));
    }

    if !result.reasoning.is_empty() {
        out.push_str(&format!("\n{}\n", "--- Agent reasoning ---".yellow().bold()));
        for line in result.reasoning.lines() {
            out.push_str(&format!("  {}\n", line.dimmed()));
        }
    }
    out
}

pub fn render_json(results: &[ComparisonResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}
