//! Column info report: schema, non-null counts and memory footprint.

use polars::prelude::*;
use std::fmt::Write;

/// Build a plain-text schema report for the dataset.
pub fn column_info(df: &DataFrame) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "DataFrame: {} entries, {} columns", df.height(), df.width());

    let columns = df.get_columns();
    let name_width = columns
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0)
        .max("Column".len());
    let count_width = columns
        .iter()
        .map(|c| format!("{} non-null", c.len() - c.null_count()).len())
        .max()
        .unwrap_or(0)
        .max("Non-Null Count".len());

    let _ = writeln!(
        out,
        " #   {:<name_width$}  {:<count_width$}  Dtype",
        "Column", "Non-Null Count"
    );
    let _ = writeln!(
        out,
        "---  {:<name_width$}  {:<count_width$}  -----",
        "------", "--------------"
    );

    // dtype tally in first-appearance order
    let mut dtype_counts: Vec<(String, usize)> = Vec::new();

    for (i, column) in columns.iter().enumerate() {
        let dtype = column.dtype().to_string();
        let non_null = format!("{} non-null", column.len() - column.null_count());
        let _ = writeln!(
            out,
            " {:<3} {:<name_width$}  {:<count_width$}  {}",
            i,
            column.name().as_str(),
            non_null,
            dtype
        );

        match dtype_counts.iter_mut().find(|(d, _)| *d == dtype) {
            Some((_, count)) => *count += 1,
            None => dtype_counts.push((dtype, 1)),
        }
    }

    let dtypes = dtype_counts
        .iter()
        .map(|(d, n)| format!("{d}({n})"))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "dtypes: {dtypes}");
    let _ = write!(out, "memory usage: {}", format_memory(df.estimated_size()));

    out
}

/// Human-readable byte size.
pub fn format_memory(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_column() {
        let df = df! {
            "name" => [Some("ann"), None, Some("cid")],
            "age" => [31i64, 45, 27],
            "score" => [1.5, 2.0, 3.25],
        }
        .unwrap();

        let info = column_info(&df);
        let lines: Vec<&str> = info.lines().collect();

        assert_eq!(lines[0], "DataFrame: 3 entries, 3 columns");
        assert!(lines[1].contains("Non-Null Count"));
        assert!(lines[3].contains("name") && lines[3].contains("2 non-null"));
        assert!(lines[4].contains("age") && lines[4].contains("3 non-null"));
        assert!(lines[5].trim_end().ends_with("f64"));
        assert_eq!(lines[6], "dtypes: str(1), i64(1), f64(1)");
        assert!(lines[7].starts_with("memory usage: "));
    }

    #[test]
    fn dtype_tally_groups_repeats() {
        let df = df! {
            "a" => [1i64],
            "b" => [2i64],
            "c" => ["x"],
        }
        .unwrap();
        assert!(column_info(&df).contains("dtypes: i64(2), str(1)"));
    }

    #[test]
    fn memory_units() {
        assert_eq!(format_memory(512), "512 B");
        assert_eq!(format_memory(2048), "2.0 KB");
        assert_eq!(format_memory(3 * 1024 * 1024), "3.0 MB");
    }
}
