//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::{DataSource, RunReport};

/// Format a RunReport for human-readable terminal output.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let inputs = &report.inputs;
    let outputs = &report.outputs;

    output.push_str("ols-bootstrap\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    match &report.meta.data_source {
        DataSource::Simulated { .. } => {
            output.push_str(&format!(
                "  Data: simulated, N = {} (y = {} + {}·x + ε, σx = {}, σε = {})\n",
                inputs.n,
                model_value(inputs.intercept),
                model_value(inputs.slope),
                model_value(inputs.x_sigma),
                model_value(inputs.eps_sigma)
            ));
        }
        DataSource::File { path } => {
            output.push_str(&format!("  Data: {} (N = {})\n", path.display(), inputs.n));
        }
    }

    let seed_note = if inputs.seed_drawn { " (drawn)" } else { "" };
    output.push_str(&format!("  Seed: {}{}\n", inputs.seed, seed_note));

    let mode = if inputs.parallel {
        format!("parallel, {} workers", inputs.workers)
    } else {
        "sequential".to_string()
    };
    output.push_str(&format!("  Bootstrap: B = {} ({})\n", inputs.b, mode));
    output.push('\n');

    output.push_str(&format!(
        "    β̂0 = {:.6}   β̂1 = {:.6}\n",
        outputs.beta_hat[0], outputs.beta_hat[1]
    ));
    output.push_str(&format!(
        "    {} = {}\n",
        "SE(β̂1)".bold(),
        format!("{:.6}", outputs.se_boot_beta1).as_str().green().bold()
    ));
    output.push_str(&format!(
        "    Bootstrap slope mean: {:.6}\n",
        outputs.bootstrap.slope_mean
    ));
    output.push('\n');

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!("Completed in {} ms\n", report.meta.runtime_ms));

    output
}

fn model_value(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}
