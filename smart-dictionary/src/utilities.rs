use std::io::{self, Write};

/// Prompts and reads one line; `None` once stdin is closed.
pub fn input(prompt: &str) -> io::Result<Option<String>> {
    let mut line = String::new();
    print!("{prompt}");
    io::stdout().flush()?;
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Splits `define ice cream` into `("define", "ice cream")`.
pub fn split_command(line: &str) -> Option<(String, String)> {
    let mut parts = line.split_ascii_whitespace();
    let command = parts.next()?.to_ascii_lowercase();
    let rest = parts.collect::<Vec<&str>>().join(" ");
    Some((command, rest))
}
