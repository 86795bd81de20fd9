use crate::formatter::YapfFormatter;
use anyhow::Result;
use std::process::{Command, Stdio};

const INSTALL_HINT: &str = "Install yapf (e.g., 'pip install yapf')";

fn check_tool_command(formatter: &YapfFormatter) -> bool {
    Command::new(formatter.program())
        .args(formatter.leading_args())
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

pub fn check_dependencies(formatter: &YapfFormatter) -> Result<()> {
    println!("Checking dependencies:");
    let command = formatter.command_line();
    if check_tool_command(formatter) {
        println!("  {}: OK", command);
        println!("All checked dependencies seem satisfied.");
        Ok(())
    } else {
        println!("  {}: Not found. {}", command, INSTALL_HINT);
        anyhow::bail!("The formatter '{}' is missing.", command);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn present_tool_passes() {
        // `true --version` exits successfully on every unix.
        assert!(check_dependencies(&YapfFormatter::new("true")).is_ok());
    }

    #[test]
    fn missing_tool_fails() {
        let err = check_dependencies(&YapfFormatter::new("pyreformat-no-such-formatter"))
            .unwrap_err();
        assert!(err.to_string().contains("pyreformat-no-such-formatter"));
    }
}
