use std::fs;
use std::io;
use std::path::Path;

/// Vertex and fragment sources split out of one `.shader` asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Vertex,
    Fragment,
}

impl ShaderSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Splits a combined shader asset on `#shader` marker lines.
    ///
    /// A line containing `#shader` switches the active section: to vertex
    /// if the line also contains `vertex`, to fragment if it contains
    /// `fragment`. Marker lines are consumed; a marker naming no known
    /// stage keeps the previous section. Every other line is appended,
    /// newline-terminated, to the active section's accumulator. Lines
    /// before the first marker are dropped.
    pub fn parse(text: &str) -> Self {
        let mut section = Section::None;
        let mut source = ShaderSource::default();

        for line in text.lines() {
            if line.contains("#shader") {
                if line.contains("vertex") {
                    section = Section::Vertex;
                } else if line.contains("fragment") {
                    section = Section::Fragment;
                }
                continue;
            }

            let accumulator = match section {
                Section::None => continue,
                Section::Vertex => &mut source.vertex,
                Section::Fragment => &mut source.fragment,
            };
            accumulator.push_str(line);
            accumulator.push('\n');
        }

        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_at_markers() {
        let source = ShaderSource::parse("#shader vertex\nA\n#shader fragment\nB\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn test_no_markers_yields_empty_sources() {
        let source = ShaderSource::parse("void main() {}\n");
        assert_eq!(source, ShaderSource::default());
    }

    #[test]
    fn test_lines_before_first_marker_are_dropped() {
        let source = ShaderSource::parse("prologue\n#shader vertex\nA\n");
        assert_eq!(source.vertex, "A\n");
        assert_eq!(source.fragment, "");
    }

    #[test]
    fn test_unknown_stage_marker_keeps_section() {
        let source = ShaderSource::parse("#shader vertex\nA\n#shader geometry\nB\n");
        assert_eq!(source.vertex, "A\nB\n");
        assert_eq!(source.fragment, "");
    }

    #[test]
    fn test_sections_reopen_and_accumulate_in_order() {
        let text = "#shader vertex\nA\n#shader fragment\nB\n#shader vertex\nC\n";
        let source = ShaderSource::parse(text);
        assert_eq!(source.vertex, "A\nC\n");
        assert_eq!(source.fragment, "B\n");
    }

    #[test]
    fn test_marker_matches_anywhere_in_line() {
        let source = ShaderSource::parse("// #shader vertex section\nA\n");
        assert_eq!(source.vertex, "A\n");
    }

    #[test]
    fn test_every_routed_line_is_newline_terminated() {
        let source = ShaderSource::parse("#shader fragment\nlast line without newline");
        assert_eq!(source.fragment, "last line without newline\n");
    }

    #[test]
    fn test_from_file_matches_in_memory_parse() {
        let text = "#shader vertex\nA\n#shader fragment\nB\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let source = ShaderSource::from_file(file.path()).unwrap();
        assert_eq!(source, ShaderSource::parse(text));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ShaderSource::from_file("no/such/asset.shader");
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    }
}
