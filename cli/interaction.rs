use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use pyreformat_core::{FileJob, FormatOptions, suffixed_output_path};

const PREVIEW_LIMIT: usize = 10;

/// Lines shown before a batch runs: each `input -> output` pair (at most
/// `PREVIEW_LIMIT`) and how the files will be rewritten.
fn describe_jobs(jobs: &[FileJob], options: &FormatOptions) -> Vec<String> {
    let mut lines = vec![format!("Found {} Python files:", jobs.len())];
    for job in jobs.iter().take(PREVIEW_LIMIT) {
        let output = job
            .output
            .clone()
            .unwrap_or_else(|| suffixed_output_path(&job.input, &options.output_suffix));
        lines.push(format!(
            "  {} -> {}",
            job.input.display(),
            output.display()
        ));
    }
    if jobs.len() > PREVIEW_LIMIT {
        lines.push(format!("  ... and {} more.", jobs.len() - PREVIEW_LIMIT));
    }
    lines.push(format!(
        "Style '{}', comments {}, encoding {}.",
        options.style_profile,
        if options.remove_comments {
            "removed"
        } else {
            "kept"
        },
        options.encoding
    ));
    lines
}

pub fn confirm_processing(
    jobs: &[FileJob],
    options: &FormatOptions,
    no_confirm: bool,
) -> Result<bool> {
    for line in describe_jobs(jobs, options) {
        println!("{}", style(line).dim());
    }
    if no_confirm {
        return Ok(true);
    }

    let prompt = format!("Write {} formatted files?", style(jobs.len()).cyan());

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if !confirmed {
        println!("Aborted by user.");
    }

    Ok(confirmed)
}
