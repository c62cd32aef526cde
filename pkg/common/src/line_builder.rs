/// Helper for creating multi-line strings.
/// Designed to be used for simple code generation.
///
/// Nested blocks are indented with four spaces, which is what the generated C
/// sources in this workspace use.
pub struct LineBuilder {
    lines: Vec<String>,
}

const INDENT: &str = "    ";

impl LineBuilder {
    pub fn new() -> Self {
        Self { lines: vec![] }
    }

    pub fn add<T: Into<String>>(&mut self, line: T) {
        self.lines.push(line.into());
    }

    pub fn append(&mut self, mut lines: LineBuilder) {
        self.lines.append(&mut lines.lines);
    }

    pub fn indent(&mut self) {
        for s in self.lines.iter_mut() {
            // Blank lines stay blank so the output has no trailing whitespace.
            if !s.is_empty() {
                *s = format!("{}{}", INDENT, s);
            }
        }
    }

    pub fn indented<T, F: FnOnce(&mut LineBuilder) -> T>(&mut self, f: F) -> T {
        let mut inner = LineBuilder::new();
        let ret = f(&mut inner);
        inner.indent();
        self.append(inner);
        ret
    }

    /// Surrounds all current lines with a first and last line.
    pub fn wrap_with<A: Into<String>, B: Into<String>>(&mut self, first: A, last: B) {
        let mut lines = vec![];
        lines.reserve(self.lines.len() + 2);
        lines.push(first.into());
        lines.append(&mut self.lines);
        lines.push(last.into());
        self.lines = lines;
    }

    pub fn empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn nl(&mut self) {
        self.lines.push(String::new());
    }

    pub fn to_string(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
