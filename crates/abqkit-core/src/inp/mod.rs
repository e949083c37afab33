//! Line classification for Abaqus `.inp` files.
//!
//! This is not a grammar: each line is looked at on its own and sorted into a
//! keyword line (`*Keyword, key=value, ...`), a comment (`** ...`), a blank
//! line, or a data line. Keyword names and parameter keys compare
//! case-insensitively, as Abaqus does.

#[derive(Debug, Clone, PartialEq)]
pub enum InpLine<'a> {
    Keyword(KeywordLine<'a>),
    Comment(&'a str),
    Data(&'a str),
    Blank,
}

impl<'a> InpLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Self::Blank
        } else if let Some(comment) = trimmed.strip_prefix("**") {
            Self::Comment(comment.trim())
        } else if trimmed.starts_with('*') {
            Self::Keyword(KeywordLine::parse(trimmed))
        } else {
            Self::Data(trimmed)
        }
    }

    pub fn keyword(&self) -> Option<&KeywordLine<'a>> {
        match self {
            Self::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordLine<'a> {
    name: String,
    parameters: Vec<(String, &'a str)>,
}

impl<'a> KeywordLine<'a> {
    fn parse(trimmed: &'a str) -> Self {
        let body = trimmed.trim_start_matches('*');
        let mut fields = body.split(',');
        let name = fields
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        let parameters = fields
            .filter(|field| !field.trim().is_empty())
            .map(|field| match field.split_once('=') {
                Some((key, value)) => (key.trim().to_ascii_uppercase(), value.trim()),
                None => (field.trim().to_ascii_uppercase(), ""),
            })
            .collect();

        Self { name, parameters }
    }

    /// Upper-case keyword name with internal whitespace collapsed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn parameter(&self, key: &str) -> Option<&'a str> {
        self.parameters
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
            .map(|(_, value)| *value)
    }
}

/// First comma-separated value of a data line as a number.
pub fn first_data_value(data: &str) -> Option<f64> {
    data.split(',').next()?.trim().parse().ok()
}

/// Whether a raw line is the Abaqus-generated comment marker `** <MARKER>...`.
pub fn is_marker_comment(line: &str, marker: &str) -> bool {
    line.trim_start()
        .to_ascii_uppercase()
        .starts_with(&format!("** {}", marker.to_ascii_uppercase()))
}
