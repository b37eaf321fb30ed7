//! Go code emitter - builds Go source text with tab indentation.
//!
//! Nesting is expressed through closures (`block`, `indented`, `if_else`), so every opened brace is
//! closed by the same call that opened it.

const INDENT: &str = "\t";

/// Write one formatted line through a [`GoEmitter`].
macro_rules! goln {
    ($e:expr, $($arg:tt)*) => {
        $e.line(&format!($($arg)*))
    };
}
pub(crate) use goln;

/// A buffer for building Go source code with proper indentation
#[derive(Debug, Default)]
pub struct GoEmitter {
    buffer: String,
    indent_level: usize,
}

impl GoEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation.
    ///
    /// Embedded newlines start new lines at the same indentation; empty lines stay empty.
    pub fn line(&mut self, s: &str) {
        for part in s.split('\n') {
            if !part.is_empty() {
                self.write_indent();
                self.buffer.push_str(part);
            }
            self.buffer.push('\n');
        }
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Run `f` one level deeper without writing braces (switch case bodies).
    pub fn indented<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.indent();
        let out = f(self);
        self.dedent();
        out
    }

    /// Write `header {`, the body, then `}`.
    pub fn block<F, R>(&mut self, header: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.block_closed_by(header, "}", f)
    }

    /// Write `header {`, the body, then a custom closing line such as `}()` or `})`.
    pub fn block_closed_by<F, R>(&mut self, header: &str, closing: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.line(&format!("{header} {{"));
        let out = self.indented(f);
        self.line(closing);
        out
    }

    /// Write a parenthesized declaration group: `import (`, `const (`, `var (`.
    pub fn group<F, R>(&mut self, keyword: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.line(&format!("{keyword} ("));
        let out = self.indented(f);
        self.line(")");
        out
    }

    /// Write `header { ... } else { ... }`.
    pub fn if_else<T, E>(&mut self, header: &str, then: T, otherwise: E)
    where
        T: FnOnce(&mut Self),
        E: FnOnce(&mut Self),
    {
        self.line(&format!("{header} {{"));
        self.indented(then);
        self.line("} else {");
        self.indented(otherwise);
        self.line("}");
    }

    /// Write `header {`, the case labels at the header's own level, then `}`.
    pub fn switch<F, R>(&mut self, header: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.line(&format!("{header} {{"));
        let out = f(self);
        self.line("}");
        out
    }

    /// Write a `switch` case label with an indented body.
    pub fn case<F, R>(&mut self, label: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.line(&format!("case {label}:"));
        self.indented(f)
    }

    /// Write a single-line comment
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("// {text}"));
    }

    /// Write multi-line documentation as `//` comment lines.
    pub fn doc(&mut self, text: &str) {
        for doc_line in text.trim_end().lines() {
            let doc_line = doc_line.trim_end();
            if doc_line.is_empty() {
                self.line("//");
            } else {
                self.line(&format!("// {doc_line}"));
            }
        }
    }
}
