use std::io::{self, Write};

/// Writes help text exactly as given.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_stdout(text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_stdout(text, true)
}

/// A reader that closes the pipe early (`cardvantage card list | head -1`)
/// is not an error.
fn write_stdout(text: &str, newline: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    let written = stdout
        .write_all(text.as_bytes())
        .and_then(|()| if newline { stdout.write_all(b"\n") } else { Ok(()) })
        .and_then(|()| stdout.flush());
    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
