//! Requirements file parser
//!
//! Understands the subset of the pip requirements format that can be
//! installed from the manifest alone: named requirements with extras,
//! version specifiers, environment markers and direct URLs, plus global
//! options such as `--index-url` and per-requirement options such as the
//! `--hash` pins `pip-compile --generate-hashes` writes. Includes (`-r`, `-c`) and editable installs
//! (`-e`) point at files that are not staged with the manifest and are
//! rejected.

use std::fmt;

/// Version comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecOp {
    Arbitrary,
    Equal,
    Compatible,
    NotEqual,
    GreaterEqual,
    LessEqual,
    Greater,
    Less,
}

impl SpecOp {
    /// Longest operators first so `===` is not read as `==` + `=`.
    const TABLE: [(&'static str, SpecOp); 8] = [
        ("===", SpecOp::Arbitrary),
        ("==", SpecOp::Equal),
        ("~=", SpecOp::Compatible),
        ("!=", SpecOp::NotEqual),
        (">=", SpecOp::GreaterEqual),
        ("<=", SpecOp::LessEqual),
        (">", SpecOp::Greater),
        ("<", SpecOp::Less),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, op)| op == self)
            .map(|(s, _)| *s)
            .unwrap_or("==")
    }
}

/// One `<op><version>` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub op: SpecOp,
    pub version: String,
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

/// A parsed requirement line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Name as written
    pub name: String,
    pub extras: Vec<String>,
    pub specifiers: Vec<Specifier>,
    pub url: Option<String>,
    pub marker: Option<String>,
    /// Per-requirement options as `--name=value`, in file order
    pub options: Vec<String>,
    /// 1-indexed line the requirement starts on
    pub line: usize,
}

impl Requirement {
    /// PEP 503 normalized name (`Python_Telegram.Bot` → `python-telegram-bot`)
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Pinned to one exact version (or a direct URL)
    pub fn is_pinned(&self) -> bool {
        if self.url.is_some() {
            return true;
        }
        matches!(
            self.specifiers.as_slice(),
            [Specifier { op: SpecOp::Equal | SpecOp::Arbitrary, version }] if !version.contains('*')
        )
    }
}

/// A line of the manifest, after comments and continuations are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    Requirement(Requirement),
    /// Global pip option such as `--index-url https://...`
    Option { line: usize, text: String },
}

/// Parse failure with the 1-indexed line it occurred on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

const REJECTED_OPTIONS: [(&str, &str); 6] = [
    ("-r", "nested requirement files"),
    ("--requirement", "nested requirement files"),
    ("-c", "constraint files"),
    ("--constraint", "constraint files"),
    ("-e", "editable installs"),
    ("--editable", "editable installs"),
];

/// Options pip accepts after a requirement on the same logical line
const REQUIREMENT_OPTIONS: [&str; 3] = ["--hash", "--config-settings", "--global-option"];

/// Parse a whole requirements file.
pub fn parse_manifest(content: &str) -> Result<Vec<ManifestLine>, ParseError> {
    let mut lines = Vec::new();
    let mut seen: Vec<(String, usize)> = Vec::new();

    for (line_no, logical) in logical_lines(content) {
        let text = strip_comment(&logical).trim().to_string();
        if text.is_empty() {
            continue;
        }

        if text.starts_with('-') {
            let flag = text.split([' ', '=']).next().unwrap_or(&text);
            if let Some((_, what)) = REJECTED_OPTIONS.iter().find(|(opt, _)| *opt == flag) {
                return Err(ParseError::new(
                    line_no,
                    format!("{} ({}) are not staged with the manifest", what, flag),
                ));
            }
            lines.push(ManifestLine::Option {
                line: line_no,
                text,
            });
            continue;
        }

        let requirement = parse_requirement(&text, line_no)?;
        let normalized = requirement.normalized_name();
        if let Some((_, first)) = seen.iter().find(|(name, _)| *name == normalized) {
            return Err(ParseError::new(
                line_no,
                format!(
                    "duplicate requirement '{}' (first listed on line {})",
                    requirement.name, first
                ),
            ));
        }
        seen.push((normalized, line_no));
        lines.push(ManifestLine::Requirement(requirement));
    }

    Ok(lines)
}

/// Parse a single requirement specification.
pub fn parse_requirement(text: &str, line: usize) -> Result<Requirement, ParseError> {
    let (text, options) = split_requirement_options(text, line)?;
    let (body, marker) = match text.split_once(';') {
        Some((body, marker)) => {
            let marker = marker.trim();
            if marker.is_empty() {
                return Err(ParseError::new(line, "empty environment marker after ';'"));
            }
            (body.trim(), Some(marker.to_string()))
        }
        None => (text.trim(), None),
    };

    let name_end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if !is_valid_name(name) {
        return Err(ParseError::new(
            line,
            format!("expected a package name, found '{}'", body),
        ));
    }

    let mut rest = body[name_end..].trim_start();
    let mut extras = Vec::new();
    if let Some(after) = rest.strip_prefix('[') {
        let close = after
            .find(']')
            .ok_or_else(|| ParseError::new(line, "unclosed '[' in extras"))?;
        for extra in after[..close].split(',') {
            let extra = extra.trim();
            if !is_valid_name(extra) {
                return Err(ParseError::new(line, format!("invalid extra '{}'", extra)));
            }
            extras.push(extra.to_string());
        }
        rest = after[close + 1..].trim_start();
    }

    if let Some(url) = rest.strip_prefix('@') {
        let url = url.trim();
        if !url.contains("://") {
            return Err(ParseError::new(line, format!("invalid direct reference '{}'", url)));
        }
        return Ok(Requirement {
            name: name.to_string(),
            extras,
            specifiers: Vec::new(),
            url: Some(url.to_string()),
            marker,
            options,
            line,
        });
    }

    let rest = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .unwrap_or(rest)
        .trim();
    let specifiers = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',')
            .map(|clause| parse_specifier(clause.trim(), line))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Requirement {
        name: name.to_string(),
        extras,
        specifiers,
        url: None,
        marker,
        options,
        line,
    })
}

/// Split trailing ` --option[=| ]value` tokens off a requirement
fn split_requirement_options(text: &str, line: usize) -> Result<(&str, Vec<String>), ParseError> {
    let start = text
        .match_indices(char::is_whitespace)
        .map(|(i, _)| i)
        .find(|&i| text[i..].trim_start().starts_with("--"));
    let Some(start) = start else {
        return Ok((text, Vec::new()));
    };

    let mut raw: Vec<(&str, Option<&str>)> = Vec::new();
    for token in text[start..].split_whitespace() {
        if token.starts_with("--") {
            match token.split_once('=') {
                Some((name, value)) => raw.push((name, Some(value))),
                None => raw.push((token, None)),
            }
            continue;
        }
        match raw.last_mut() {
            Some((_, value @ None)) => *value = Some(token),
            _ => {
                return Err(ParseError::new(
                    line,
                    format!("unexpected '{}' after requirement options", token),
                ))
            }
        }
    }

    let mut options = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        if !REQUIREMENT_OPTIONS.contains(&name) {
            return Err(ParseError::new(
                line,
                format!("unsupported requirement option '{}'", name),
            ));
        }
        let value = value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ParseError::new(line, format!("missing value for '{}'", name)))?;
        if name == "--hash" && !is_valid_hash(value) {
            return Err(ParseError::new(line, format!("invalid hash '{}'", value)));
        }
        options.push(format!("{}={}", name, value));
    }
    Ok((&text[..start], options))
}

/// `<algorithm>:<hex digest>`
fn is_valid_hash(value: &str) -> bool {
    match value.split_once(':') {
        Some((algorithm, digest)) => {
            !algorithm.is_empty()
                && algorithm.chars().all(|c| c.is_ascii_alphanumeric())
                && !digest.is_empty()
                && digest.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn parse_specifier(clause: &str, line: usize) -> Result<Specifier, ParseError> {
    let (op, version) = SpecOp::TABLE
        .iter()
        .find_map(|(token, op)| clause.strip_prefix(token).map(|v| (*op, v.trim())))
        .ok_or_else(|| ParseError::new(line, format!("invalid version specifier '{}'", clause)))?;

    let valid = !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '!' | '-' | '_'));
    let wildcard_ok = !version.contains('*')
        || (matches!(op, SpecOp::Equal | SpecOp::NotEqual) && version.ends_with(".*"));
    if !valid || !wildcard_ok {
        return Err(ParseError::new(
            line,
            format!("invalid version '{}' in '{}'", version, clause),
        ));
    }

    Ok(Specifier {
        op,
        version: version.to_string(),
    })
}

/// Join backslash continuations; yields (first line number, text).
///
/// A comment-only line never continues, even when it ends in `\`, and it
/// ends a continuation that reaches it.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let (start, mut text) = pending.take().unwrap_or((line_no, String::new()));
        if strip_comment(raw).trim().is_empty() {
            out.push((start, text));
            continue;
        }
        match raw.strip_suffix('\\') {
            Some(head) => {
                text.push_str(head);
                pending = Some((start, text));
            }
            None => {
                text.push_str(raw);
                out.push((start, text));
            }
        }
    }
    if let Some(last) = pending {
        out.push(last);
    }
    out
}

/// Comments start at `#` when it begins the line or follows whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
        }
        _ => false,
    }
}

pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements(content: &str) -> Vec<Requirement> {
        parse_manifest(content)
            .unwrap()
            .into_iter()
            .filter_map(|l| match l {
                ManifestLine::Requirement(r) => Some(r),
                ManifestLine::Option { .. } => None,
            })
            .collect()
    }

    #[test]
    fn parses_pinned_requirement() {
        let reqs = requirements("requests==2.31.0\n");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].name, "requests");
        assert_eq!(reqs[0].specifiers[0].to_string(), "==2.31.0");
        assert!(reqs[0].is_pinned());
    }

    #[test]
    fn parses_bot_manifest() {
        let reqs = requirements(
            "# bot deps\n\
             python-telegram-bot[job-queue]>=20.0,<21\n\
             aiohttp\n\
             PyMySQL==1.1.0  # mysql driver\n\
             python-binance ; python_version >= \"3.8\"\n\
             pycoingecko===3.1.0\n",
        );
        assert_eq!(reqs.len(), 5);
        assert_eq!(reqs[0].extras, vec!["job-queue".to_string()]);
        assert_eq!(reqs[0].specifiers.len(), 2);
        assert!(!reqs[0].is_pinned());
        assert!(reqs[1].specifiers.is_empty());
        assert_eq!(reqs[2].normalized_name(), "pymysql");
        assert_eq!(reqs[2].line, 4);
        assert_eq!(reqs[3].marker.as_deref(), Some("python_version >= \"3.8\""));
        assert!(reqs[4].is_pinned());
    }

    #[test]
    fn keeps_global_options() {
        let lines = parse_manifest("--index-url https://pypi.example/simple\nrequests\n").unwrap();
        assert!(matches!(&lines[0], ManifestLine::Option { line: 1, text } if text.starts_with("--index-url")));
    }

    #[test]
    fn joins_continuation_lines() {
        let reqs = requirements("requests\\\n==2.31.0\nflask\n");
        assert_eq!(reqs[0].specifiers[0].version, "2.31.0");
        assert_eq!(reqs[1].line, 3);
    }

    #[test]
    fn hash_pinned_requirements_keep_their_hashes() {
        let reqs = requirements(
            "requests==2.31.0 \\\n    --hash=sha256:942c5a758f98d790eaed1a29cb6eefc7ffb0d1cf7af05c3d2791656dbd6ad1e1 \\\n    --hash sha256:58cd2187c01e70e6e26505bca751777aa9f2ee0b7f4300988b709f44e013003f\n\
             urllib3==2.0.7 --config-settings=--build-option=--quiet\n",
        );
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].specifiers[0].version, "2.31.0");
        assert!(reqs[0].is_pinned());
        assert_eq!(
            reqs[0].options,
            vec![
                "--hash=sha256:942c5a758f98d790eaed1a29cb6eefc7ffb0d1cf7af05c3d2791656dbd6ad1e1",
                "--hash=sha256:58cd2187c01e70e6e26505bca751777aa9f2ee0b7f4300988b709f44e013003f",
            ]
        );
        assert_eq!(reqs[1].line, 4);
        assert_eq!(reqs[1].options, vec!["--config-settings=--build-option=--quiet"]);
    }

    #[test]
    fn rejects_bad_requirement_options() {
        let err = parse_manifest("requests==2.31.0 --hash=md5\n").unwrap_err();
        assert!(err.message.contains("invalid hash"), "{}", err.message);

        let err = parse_manifest("requests==2.31.0 --index-url https://x\n").unwrap_err();
        assert!(err.message.contains("unsupported requirement option"), "{}", err.message);

        let err = parse_manifest("requests==2.31.0 --hash\n").unwrap_err();
        assert!(err.message.contains("missing value"), "{}", err.message);
    }

    #[test]
    fn comment_lines_do_not_continue() {
        let reqs = requirements("# old pin \\\nrequests==2.31.0\n");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].name, "requests");
        assert_eq!(reqs[0].line, 2);

        let reqs = requirements("flask \\\n# trailing note\nrequests\n");
        assert_eq!(reqs.len(), 2);
        assert!(reqs[0].specifiers.is_empty());
        assert_eq!(reqs[1].line, 3);
    }

    #[test]
    fn direct_url_counts_as_pinned() {
        let reqs = requirements("bot @ https://example.com/bot-1.0.tar.gz\n");
        assert_eq!(reqs[0].url.as_deref(), Some("https://example.com/bot-1.0.tar.gz"));
        assert!(reqs[0].is_pinned());
    }

    #[test]
    fn rejects_includes_and_editables() {
        for content in ["-r base.txt", "--requirement=base.txt", "-e ./lib", "-c constraints.txt"] {
            let err = parse_manifest(content).unwrap_err();
            assert_eq!(err.line, 1);
            assert!(err.message.contains("not staged"), "{}", err.message);
        }
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_manifest("requests\n==2.0\n").unwrap_err();
        assert_eq!(err.line, 2);

        let err = parse_manifest("requests=2.31.0").unwrap_err();
        assert!(err.message.contains("invalid version specifier"));

        let err = parse_manifest("requests>=2.*").unwrap_err();
        assert!(err.message.contains("invalid version"));
    }

    #[test]
    fn rejects_duplicates_after_normalization() {
        let err = parse_manifest("PyMySQL==1.1.0\npymysql==1.0.0\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("first listed on line 1"));
    }

    #[test]
    fn wildcard_is_not_a_pin() {
        let reqs = requirements("django==4.2.*");
        assert!(!reqs[0].is_pinned());
    }

    #[test]
    fn hash_inside_url_is_not_a_comment() {
        let reqs = requirements("bot @ https://example.com/bot.tar.gz#sha256=abc\n");
        assert_eq!(
            reqs[0].url.as_deref(),
            Some("https://example.com/bot.tar.gz#sha256=abc")
        );
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("Python_Telegram..Bot"), "python-telegram-bot");
    }
}
