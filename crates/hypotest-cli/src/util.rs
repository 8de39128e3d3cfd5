use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

/// How results are written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Destination of command results: stdout unless a file was requested.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>, PathBuf),
}

impl Output {
    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File(BufWriter::new(file), path.to_owned()))
    }

    fn target(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File(_, path) => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.target()))?;
        self.write_lines([String::new()])
    }

    /// Writes pre-rendered lines of text.
    pub fn write_lines<I>(&mut self, lines: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            writeln!(self, "{line}")
                .with_context(|| format!("Failed to write to {}", self.target()))?;
        }
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.target()))?;
        if let Self::File(_, path) = self {
            eprintln!("Output written to {}", path.display());
        }
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File(writer, _) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File(writer, _) => writer.flush(),
        }
    }
}

/// Pads labels to a common width.
pub fn aligned<'a, I>(rows: I, indent: usize) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let rows = rows.into_iter().collect::<Vec<_>>();
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    rows.into_iter()
        .map(|(label, value)| format!("{:indent$}{label:<width$}  {value}", ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("Text".parse::<Format>().unwrap(), Format::Text);
        assert!("yaml".parse::<Format>().is_err());
    }

    #[test]
    fn test_aligned_pads_labels() {
        let lines = aligned([("Mean", "3.0000"), ("Cramér's V", "0.2500")], 2);
        assert_eq!(lines, vec!["  Mean        3.0000", "  Cramér's V  0.2500"]);
    }
}
