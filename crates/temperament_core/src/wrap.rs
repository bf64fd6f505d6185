//! Greedy word wrap by character count.

/// One wrapped output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// Paragraph separator.
    Blank,
}

impl Line {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Line::Text(s) => Some(s),
            Line::Blank => None,
        }
    }
}

/// Packs the words of one paragraph onto lines of at most `max_width`
/// characters. A word longer than `max_width` gets a line of its own.
pub fn wrap_paragraph(paragraph: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Splits on explicit line breaks, wraps each non-empty paragraph and puts
/// a [`Line::Blank`] between consecutive paragraphs.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<Line> {
    let mut out = Vec::new();
    for paragraph in text
        .lines()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if !out.is_empty() {
            out.push(Line::Blank);
        }
        out.extend(wrap_paragraph(paragraph, max_width).into_iter().map(Line::Text));
    }
    out
}
