use crate::Span;

/// Owns one file's source text and renders `Span`s from it into diagnostic
/// excerpts (spec §7 "rendered as `path:line:col: severity: message`, plus
/// a caret/tilde excerpt").
pub struct SourceMap<'a> {
    file_name: &'a str,
    text: &'a str,
}

impl<'a> SourceMap<'a> {
    pub fn new(file_name: &'a str, text: &'a str) -> Self {
        Self { file_name, text }
    }

    /// Renders `message` under a caret/tilde excerpt of `span`'s line:
    ///
    /// ```text
    /// file.pac2 --> line 3:5
    ///      |
    ///  3   | let x = 10;
    ///      |     ^~~ message
    /// ```
    pub fn format_message(&self, message: String, span: Span) -> String {
        let line = self.line_containing(span.start);
        let column = self.column_of(span.start);

        let underline_start = column.saturating_sub(1);
        let underline_len = (span.end - span.start).max(1);
        let mut underline = String::new();
        for (i, byte) in line.as_bytes().iter().enumerate().chain(std::iter::once((line.len(), &b' '))) {
            if i == underline_start {
                underline.push('^');
                underline.extend(std::iter::repeat('~').take(underline_len.saturating_sub(1)));
                underline.push(' ');
                underline.push_str(&message);
                break;
            }
            underline.push(if *byte == b'\t' { '\t' } else { ' ' });
        }

        format!("{} --> line {}:{}\n     |\n{:>4} | {}\n     | {}\n", self.file_name, span.line, column, span.line, line, underline)
    }

    fn line_containing(&self, offset: usize) -> &'a str {
        let start = self.text[..offset].rfind('\n').map_or(0, |pos| pos + 1);
        let end = self.text[offset..].find('\n').map_or(self.text.len(), |pos| offset + pos);
        &self.text[start..end]
    }

    /// 1-based column of `offset` within its line.
    fn column_of(&self, offset: usize) -> usize {
        let line_start = self.text[..offset].rfind('\n').map_or(0, |pos| pos + 1);
        self.text[line_start..offset].chars().count() + 1
    }

    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_excerpt_underlines_the_spans_column_on_its_own_line() {
        let source_map = SourceMap::new("test.pac2", "unit { x: uint32\n  y: uint16; };");
        let rendered = source_map.format_message("bad field".to_string(), Span::new(20, 21, 2));
        assert!(rendered.contains("test.pac2 --> line 2:3"));
        assert!(rendered.contains("^ bad field"));
    }

    #[test]
    fn a_multi_byte_span_underlines_with_matching_width() {
        let source_map = SourceMap::new("test.pac2", "global x: int32;");
        let rendered = source_map.format_message("oops".to_string(), Span::new(7, 16, 1));
        assert!(rendered.contains("^~~~~~~~~ oops"));
    }
}
