//! Ad-hoc topic values from flags or an interactive prompt

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Parse `TOPIC=VALUE`, splitting on the last `=`
pub fn parse_assignment(s: &str) -> Result<(String, f64)> {
    let (topic, value) = s
        .rsplit_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected TOPIC=VALUE, got: {}", s))?;
    let topic = topic.trim();
    if topic.is_empty() {
        anyhow::bail!("Missing topic name in: {}", s);
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {}", topic, value.trim()))?;
    if !value.is_finite() {
        anyhow::bail!("Value for {} must be finite", topic);
    }
    Ok((topic.to_string(), value))
}

/// Parse a comma-separated list of 1-based topic numbers
///
/// Numbers that don't parse or are out of range are ignored; duplicates are
/// kept once. Returns 0-based indices in the order given.
pub fn parse_selection(line: &str, n_topics: usize) -> Vec<usize> {
    let mut selected = Vec::new();
    for part in line.split(',') {
        let Ok(n) = part.trim().parse::<usize>() else {
            continue;
        };
        if n == 0 || n > n_topics {
            continue;
        }
        if !selected.contains(&(n - 1)) {
            selected.push(n - 1);
        }
    }
    selected
}

/// Ask which topics to fill in, then a value for each
///
/// Blank or unparseable values become 0.0. Unselected topics are left out
/// (and default to 0.0 in the assessment).
pub fn prompt_values<R: BufRead, W: Write>(
    topics: &[String],
    reader: &mut R,
    out: &mut W,
) -> Result<Vec<(String, f64)>> {
    writeln!(out, "Available topics:")?;
    for (i, topic) in topics.iter().enumerate() {
        writeln!(out, "  {:>2}. {}", i + 1, topic)?;
    }
    write!(out, "Select topics (comma-separated numbers): ")?;
    out.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line).context("Failed to read selection")?;

    let mut values = Vec::new();
    for idx in parse_selection(&line, topics.len()) {
        let topic = &topics[idx];
        write!(out, "  {}: ", topic)?;
        out.flush()?;

        line.clear();
        reader
            .read_line(&mut line)
            .with_context(|| format!("Failed to read value for {}", topic))?;
        let value = line
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        values.push((topic.clone(), value));
    }

    Ok(values)
}
