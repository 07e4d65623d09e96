//! Line-oriented Go output buffer.

/// Accumulates Go statements with gofmt-style tab indentation and tracks open blocks.
#[derive(Debug, Default)]
pub struct GoEmitter {
    code: String,
    indent: usize,
}

impl GoEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.code.push('\t');
        }
        self.code.push_str(line);
        self.code.push('\n');
    }

    pub fn push_blank_line(&mut self) {
        if self.code.ends_with("\n\n") || self.code.is_empty() {
            return;
        }
        if !self.code.ends_with('\n') {
            self.code.push('\n');
        }
        self.code.push('\n');
    }

    /// Writes `<header> {` and indents until the matching [`GoEmitter::close_block`].
    pub fn open_block(&mut self, header: &str) {
        self.push_line(&format!("{} {{", header));
        self.indent += 1;
    }

    pub fn close_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push_line("}");
    }

    pub fn depth(&self) -> usize {
        self.indent
    }

    pub fn finish(self) -> String {
        self.code
    }
}
