use std::fmt::Display;

/// Escapes the five XML special characters.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Builder for response fragments.
///
/// Field values are interpolated as-is unless `escape_values` is set; callers
/// that need strict well-formedness turn it on through configuration.
#[derive(Debug)]
pub struct Fragment {
    buf: String,
    open: Vec<String>,
    escape_values: bool,
}

impl Fragment {
    pub fn new(root: &str, escape_values: bool) -> Self {
        Self {
            buf: String::new(),
            open: Vec::new(),
            escape_values,
        }
        .open(root)
    }

    pub fn open(mut self, tag: &str) -> Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.open.push(tag.to_string());
        self
    }

    pub fn close(mut self) -> Self {
        if let Some(tag) = self.open.pop() {
            self.push_end(&tag);
        }
        self
    }

    pub fn field(mut self, tag: &str, value: impl Display) -> Self {
        let value = value.to_string();
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        if self.escape_values {
            self.buf.push_str(&escape(&value));
        } else {
            self.buf.push_str(&value);
        }
        self.push_end(tag);
        self
    }

    pub fn optional(self, tag: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.field(tag, value),
            None => self,
        }
    }

    /// Closes every element still open and returns the markup.
    pub fn finish(mut self) -> String {
        while let Some(tag) = self.open.pop() {
            self.push_end(&tag);
        }
        self.buf
    }

    fn push_end(&mut self, tag: &str) {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }
}
