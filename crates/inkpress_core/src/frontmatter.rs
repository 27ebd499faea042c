//! Front-matter extraction and parsing.
//!
//! # Responsibility
//! - Split a corpus document into its metadata block and markdown body.
//! - Parse both recognized header syntaxes into one `FrontMatter` shape.
//!
//! # Invariants
//! - A document uses exactly one syntax: `---` (YAML) or `+++` (TOML).
//! - Missing or unterminated front-matter is an error, never a default.
//! - Unknown metadata keys are ignored.

use crate::model::post::FrontMatter;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const YAML_DELIMITER: &str = "---";
const TOML_DELIMITER: &str = "+++";

/// Result type for front-matter APIs.
pub type FrontMatterResult<T> = Result<T, FrontMatterError>;

/// Front-matter syntax detected from the opening delimiter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `---` delimited YAML block.
    Yaml,
    /// `+++` delimited TOML block.
    Toml,
}

impl Syntax {
    fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => YAML_DELIMITER,
            Self::Toml => TOML_DELIMITER,
        }
    }
}

/// Errors raised while extracting or parsing a metadata block.
#[derive(Debug)]
pub enum FrontMatterError {
    /// Document does not start with a recognized delimiter line.
    Missing,
    /// Opening delimiter found but no matching close.
    Unterminated { syntax: Syntax },
    /// YAML block failed to deserialize.
    Yaml(serde_yaml::Error),
    /// TOML block failed to deserialize.
    Toml(toml::de::Error),
    /// Required `title` field is absent.
    MissingTitle,
    /// Required `date` field is absent.
    MissingDate,
    /// `date` value is neither `YYYY-MM-DD` nor RFC 3339.
    InvalidDate { raw: String },
}

impl Display for FrontMatterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(
                f,
                "document has no front-matter block; expected `---` or `+++` on the first line"
            ),
            Self::Unterminated { syntax } => write!(
                f,
                "front-matter block opened with `{}` is never closed",
                syntax.delimiter()
            ),
            Self::Yaml(err) => write!(f, "invalid YAML front-matter: {err}"),
            Self::Toml(err) => write!(f, "invalid TOML front-matter: {err}"),
            Self::MissingTitle => write!(f, "front-matter is missing required field `title`"),
            Self::MissingDate => write!(f, "front-matter is missing required field `date`"),
            Self::InvalidDate { raw } => write!(
                f,
                "invalid front-matter date `{raw}`; expected YYYY-MM-DD or RFC 3339"
            ),
        }
    }
}

impl Error for FrontMatterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Yaml(err) => Some(err),
            Self::Toml(err) => Some(err),
            _ => None,
        }
    }
}

/// Extracted but not yet parsed metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'doc> {
    /// Detected header syntax.
    pub syntax: Syntax,
    /// Block text between the delimiter lines.
    pub text: &'doc str,
}

/// Splits a document into its metadata block and body.
///
/// The opening delimiter must be the first line of the document. The body
/// starts immediately after the closing delimiter line.
///
/// # Errors
/// - `Missing` when the first line is not a recognized delimiter.
/// - `Unterminated` when no closing delimiter line exists.
pub fn extract(content: &str) -> FrontMatterResult<(RawBlock<'_>, &str)> {
    let first_line_end = content.find('\n').unwrap_or(content.len());
    let first_line = content[..first_line_end].trim_end_matches('\r');

    let syntax = match first_line {
        YAML_DELIMITER => Syntax::Yaml,
        TOML_DELIMITER => Syntax::Toml,
        _ => return Err(FrontMatterError::Missing),
    };

    let rest = if first_line_end < content.len() {
        &content[first_line_end + 1..]
    } else {
        ""
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == syntax.delimiter() {
            let block = RawBlock {
                syntax,
                text: &rest[..offset],
            };
            let body = &rest[offset + line.len()..];
            return Ok((block, body));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated { syntax })
}

/// Parses a full document into validated metadata and body.
///
/// # Errors
/// - Extraction errors per [`extract`].
/// - Deserialization errors for the detected syntax.
/// - `MissingTitle`/`MissingDate`/`InvalidDate` for required fields.
pub fn parse(content: &str) -> FrontMatterResult<(FrontMatter, String)> {
    let (block, body) = extract(content)?;
    let meta = match block.syntax {
        Syntax::Yaml => parse_yaml_block(block.text)?,
        Syntax::Toml => parse_toml_block(block.text)?,
    };
    Ok((meta, body.to_string()))
}

// Raw shapes keep every field optional so that required-field errors come
// from this module, not from serde's less targeted messages.

#[derive(Debug, Default, Deserialize)]
struct YamlHeader {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    toc: Option<bool>,
    #[serde(default)]
    math: Option<bool>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlHeader {
    #[serde(default)]
    title: Option<String>,
    /// TOML allows both bare datetimes and quoted strings here.
    #[serde(default)]
    date: Option<toml::Value>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    toc: Option<bool>,
    #[serde(default)]
    math: Option<bool>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

fn parse_yaml_block(text: &str) -> FrontMatterResult<FrontMatter> {
    let header: YamlHeader = serde_yaml::from_str(text).map_err(FrontMatterError::Yaml)?;
    assemble(
        header.title,
        header.date,
        header.draft,
        header.toc,
        header.math,
        header.images,
        header.tags,
    )
}

fn parse_toml_block(text: &str) -> FrontMatterResult<FrontMatter> {
    let header: TomlHeader = toml::from_str(text).map_err(FrontMatterError::Toml)?;
    let date = match header.date {
        Some(toml::Value::String(raw)) => Some(raw),
        Some(toml::Value::Datetime(datetime)) => Some(datetime.to_string()),
        Some(other) => {
            return Err(FrontMatterError::InvalidDate {
                raw: other.to_string(),
            })
        }
        None => None,
    };
    assemble(
        header.title,
        date,
        header.draft,
        header.toc,
        header.math,
        header.images,
        header.tags,
    )
}

fn assemble(
    title: Option<String>,
    date: Option<String>,
    draft: Option<bool>,
    toc: Option<bool>,
    math: Option<bool>,
    images: Option<Vec<String>>,
    tags: Option<Vec<String>>,
) -> FrontMatterResult<FrontMatter> {
    let title = title.ok_or(FrontMatterError::MissingTitle)?;
    let raw_date = date.ok_or(FrontMatterError::MissingDate)?;
    let date = parse_date(&raw_date)?;

    Ok(FrontMatter {
        title,
        date,
        draft: draft.unwrap_or(false),
        toc: toc.unwrap_or(false),
        math: math.unwrap_or(false),
        images: images.unwrap_or_default(),
        tags: tags.unwrap_or_default(),
    })
}

/// Parses `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping the date part.
fn parse_date(raw: &str) -> FrontMatterResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    Err(FrontMatterError::InvalidDate {
        raw: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{extract, parse, parse_date, FrontMatterError, Syntax};

    #[test]
    fn extract_detects_yaml_and_returns_body() {
        let doc = "---\ntitle: x\n---\nbody line\n";
        let (block, body) = extract(doc).expect("yaml block should extract");
        assert_eq!(block.syntax, Syntax::Yaml);
        assert_eq!(block.text, "title: x\n");
        assert_eq!(body, "body line\n");
    }

    #[test]
    fn extract_detects_toml_delimiter() {
        let doc = "+++\ntitle = \"x\"\n+++\nbody";
        let (block, body) = extract(doc).expect("toml block should extract");
        assert_eq!(block.syntax, Syntax::Toml);
        assert_eq!(body, "body");
    }

    #[test]
    fn extract_rejects_document_without_header() {
        let err = extract("# just markdown\n").expect_err("must be missing");
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn extract_rejects_unterminated_block() {
        let err = extract("---\ntitle: x\nno close").expect_err("must be unterminated");
        assert!(matches!(
            err,
            FrontMatterError::Unterminated {
                syntax: Syntax::Yaml
            }
        ));
    }

    #[test]
    fn parse_yaml_defaults_optional_fields() {
        let doc = "---\ntitle: Hello\ndate: 2024-06-01\n---\nbody";
        let (meta, body) = parse(doc).expect("should parse");
        assert_eq!(meta.title, "Hello");
        assert!(!meta.draft);
        assert!(!meta.math);
        assert!(meta.images.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn parse_toml_accepts_bare_datetime() {
        let doc = "+++\ntitle = \"Hello\"\ndate = 2024-06-01\ndraft = true\n+++\nbody";
        let (meta, _) = parse(doc).expect("should parse");
        assert_eq!(meta.date.to_string(), "2024-06-01");
        assert!(meta.draft);
    }

    #[test]
    fn parse_toml_accepts_quoted_rfc3339_date() {
        let doc = "+++\ntitle = \"Hello\"\ndate = \"2023-11-05T08:30:00Z\"\n+++\n";
        let (meta, _) = parse(doc).expect("should parse");
        assert_eq!(meta.date.to_string(), "2023-11-05");
    }

    #[test]
    fn parse_rejects_missing_required_fields() {
        let err = parse("---\ndraft: true\n---\n").expect_err("title missing");
        assert!(matches!(err, FrontMatterError::MissingTitle));

        let err = parse("---\ntitle: x\n---\n").expect_err("date missing");
        assert!(matches!(err, FrontMatterError::MissingDate));
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let doc = "---\ntitle: x\ndate: 2024-01-02\nseries: experiments\n---\n";
        assert!(parse(doc).is_ok());
    }

    #[test]
    fn parse_date_handles_both_accepted_forms() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("2024-06-01T10:30:00+02:00").is_ok());
        assert!(parse_date("June 1, 2024").is_err());
    }
}
