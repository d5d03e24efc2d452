// Pretty error reporting with source highlighting using ariadne

use crate::frontend::reader::ReadError;
use ariadne::{Color, Label, Report, ReportKind, Source};

/// Report a read error with source highlighting
pub fn report_read_error(filename: &str, source: &str, error: &ReadError) {
    for (message, span) in &error.errors {
        Report::build(ReportKind::Error, span.clone())
            .with_code("R001")
            .with_message("Malformed program")
            .with_label(
                Label::new(span.clone())
                    .with_message(message.clone())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint(Source::from(source))
            .expect("Failed to print error report");
    }

    // Print filename for context
    if let Some((_, span)) = error.errors.first() {
        eprintln!("  --> {}:{}", filename, get_line_col(source, span.start));
    }
}

fn get_line_col(source: &str, offset: usize) -> String {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in source.chars().enumerate() {
        if i == offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    format!("{}:{}", line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "ab\ncd";
        assert_eq!(get_line_col(src, 0), "1:1");
        assert_eq!(get_line_col(src, 3), "2:1");
        assert_eq!(get_line_col(src, 4), "2:2");
    }
}
