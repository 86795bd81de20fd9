use pyreformat_core::{
    BatchReport, CliArgs, Command as CoreCommand, YapfFormatter, check_dependencies, plan_jobs,
    process_files,
};
mod interaction;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use log::LevelFilter;
use std::io;
use std::process::ExitCode;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn init_logger(debug: bool) {
    let mut logger = env_logger::builder();
    logger.format_module_path(false);
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    logger
        .filter_module("pyreformat", level)
        .filter_module("pyreformat_core", level)
        .init();
}

fn print_report(report: &BatchReport) {
    let mut success_count = 0;
    let mut failure_count = 0;
    for result in &report.results {
        match &result.outcome {
            Ok(changed) => {
                success_count += 1;
                println!(
                    "  {} {} -> {}",
                    if *changed {
                        style("reformatted").green()
                    } else {
                        style("unchanged").dim()
                    },
                    style(result.path.display()).dim(),
                    result.output.display()
                );
            }
            Err(err) => {
                eprintln!(
                    "  {} Failed: {} - {}",
                    style("⚠️").yellow(),
                    style(result.path.display()).dim(),
                    style(err).red()
                );
                failure_count += 1;
            }
        }
    }
    println!(
        "Result: {} {} processed successfully ({} changed), {} {} failed.",
        style(success_count).green(),
        if success_count == 1 { "file" } else { "files" },
        style(report.changed_count()).cyan(),
        style(failure_count).red(),
        if failure_count == 1 { "file" } else { "files" }
    );
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();

    if let Some(command_enum_val) = cli.command {
        match command_enum_val {
            CoreCommand::Completion(args) => {
                print_completions_cli(args.shell);
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let main_app_args = cli.main_opts;
    init_logger(main_app_args.debug);

    let Some(formatter) = YapfFormatter::from_command_line(&main_app_args.formatter) else {
        eprintln!("{}", style("The formatter command must not be empty.").red());
        return Ok(ExitCode::FAILURE);
    };

    if main_app_args.check_dependencies {
        match check_dependencies(&formatter) {
            Ok(_) => return Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!("{}", style(format!("Dependency Check Error: {}", e)).red());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let Some(in_path) = main_app_args.in_file.as_deref() else {
        eprintln!("{}", style("No input given (use --in-file).").red());
        return Ok(ExitCode::FAILURE);
    };

    let jobs = match plan_jobs(
        in_path,
        main_app_args.out_file.as_deref(),
        &main_app_args.exclude,
    ) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("{}", style(format!("Error finding files: {:#}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    if jobs.is_empty() {
        println!("No Python files found in {}.", in_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let options = main_app_args.format_options();

    if jobs.len() > 1 {
        match interaction::confirm_processing(&jobs, &options, main_app_args.no_confirm) {
            Ok(true) => {}
            Ok(false) => return Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!(
                    "{}",
                    style(format!("Error during confirmation: {}", e)).red()
                );
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    println!(
        "Processing files (style: {}, remove comments: {})...",
        options.style_profile, options.remove_comments
    );

    let report = process_files(jobs, &options, &formatter);
    println!("\nProcessing complete.");
    print_report(&report);

    if report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
