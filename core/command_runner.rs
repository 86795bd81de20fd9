use log::debug;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

pub const YAPF: &str = "yapf";

#[derive(Debug)]
pub struct FilterOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl FilterOutput {
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Runs `tool` as a stdin/stdout filter over `input`.
///
/// A non-zero exit is not an error here; the caller decides what the status
/// means. Only spawn and pipe failures are reported as `io::Error`.
pub fn run_filter(tool: &str, args: &[&str], input: &[u8]) -> io::Result<FilterOutput> {
    let mut cmd = Command::new(tool);
    cmd.args(args);

    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!("running {} {}", tool, args.join(" "));
    let mut process = cmd.spawn()?;

    let mut stdin = process
        .stdin
        .take()
        .ok_or_else(|| io::Error::other(format!("failed to open stdin for {}", tool)))?;

    // Feed stdin while `wait_with_output` drains stdout and stderr.
    let input = input.to_vec();
    let write_thread = std::thread::spawn(move || stdin.write_all(&input));

    let output = process.wait_with_output()?;

    match write_thread.join() {
        Ok(Ok(())) => {}
        // The tool may exit before reading all input; its status says why.
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(io::Error::other(format!("stdin writer for {} panicked", tool))),
    }

    Ok(FilterOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
