use crate::{errors::Error, relay::record::LogRecord, Result};

/// Default chat layout. No timestamp: chat services stamp messages themselves.
pub const DEFAULT_PATTERN: &str = "{LEVEL}|{target}|{message}";

/// Renders a record into the plain text sent to chat.
pub trait Layout: Send + Sync {
    fn render(&self, record: &LogRecord) -> String;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    LevelUpper,
    LevelLower,
    Target,
    Message,
    Fields,
    Time,
}

/// Template layout with `{token}` placeholders.
///
/// Tokens: `{LEVEL}`, `{level}`, `{target}`, `{message}`, `{fields}`, `{time}`.
/// `{{` and `}}` produce literal braces.
#[derive(Clone, Debug)]
pub struct PatternLayout {
    segments: Vec<Segment>,
}

impl PatternLayout {
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(Error::Config(format!(
                            "unterminated token in layout: {pattern}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(token(&name)?);
                }
                '}' => {
                    return Err(Error::Config(format!(
                        "unmatched '}}' in layout: {pattern}"
                    )));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::LevelUpper,
                Segment::Literal("|".to_string()),
                Segment::Target,
                Segment::Literal("|".to_string()),
                Segment::Message,
            ],
        }
    }
}

fn token(name: &str) -> Result<Segment> {
    Ok(match name {
        "LEVEL" => Segment::LevelUpper,
        "level" => Segment::LevelLower,
        "target" => Segment::Target,
        "message" => Segment::Message,
        "fields" => Segment::Fields,
        "time" => Segment::Time,
        other => {
            return Err(Error::Config(format!("unknown layout token: {{{other}}}")));
        }
    })
}

impl Layout for PatternLayout {
    fn render(&self, record: &LogRecord) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::LevelUpper => out.push_str(record.level.as_str()),
                Segment::LevelLower => out.push_str(&record.level.as_str().to_lowercase()),
                Segment::Target => out.push_str(&record.target),
                Segment::Message => out.push_str(&record.message),
                Segment::Fields => {
                    let joined = record
                        .fields
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    out.push_str(&joined);
                }
                Segment::Time => {
                    out.push_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
                }
            }
        }
        out.truncate(out.trim_end().len());
        out
    }
}
