//! Topic listing and yearly trend commands

use std::path::Path;

use anyhow::Result;
use pulse_core::{reshape::reshape, trend::topic_trends, TrendTable};

use super::{load_indicators, truncate};

/// Column width for topic means
const COLUMN_WIDTH: usize = 14;

pub fn cmd_topics(file: &Path) -> Result<()> {
    let import = load_indicators(file)?;
    let table = reshape(&import.records);

    println!("📚 Topics in {} ({})", file.display(), table.registry.len());
    for (i, name) in table.registry.names().iter().enumerate() {
        println!("   {:>2}. {}", i + 1, name);
    }

    Ok(())
}

pub fn cmd_trends(file: &Path, last: usize) -> Result<()> {
    let import = load_indicators(file)?;
    let table = reshape(&import.records);
    let trends = topic_trends(&import.records, &table.registry);

    println!("📈 Mean value per topic per year ({})", file.display());
    if trends.rows.is_empty() {
        println!("   No data.");
        return Ok(());
    }
    print_trend_rows(&trends, last);

    Ok(())
}

/// Print the most recent `last` years, one column per topic
pub fn print_trend_rows(trends: &TrendTable, last: usize) {
    let mut header = format!("   {:<6}", "Year");
    for topic in &trends.topics {
        header.push_str(&format!(" {:>width$}", truncate(topic, COLUMN_WIDTH), width = COLUMN_WIDTH));
    }
    println!("{}", header);

    for row in trends.tail(last) {
        let mut line = format!("   {:<6}", row.time);
        for mean in &row.means {
            let cell = match mean {
                Some(v) => format!("{:.2}", v),
                None => "-".to_string(),
            };
            line.push_str(&format!(" {:>width$}", cell, width = COLUMN_WIDTH));
        }
        println!("{}", line);
    }
}
