//! Model output sanitization
//!
//! Chat models wrap SQL in markdown fences and stray prose whitespace no
//! matter how firmly the prompt says not to. [`sanitize`] deterministically
//! cleans raw completion text into a single executable statement string.
//! It performs no semantic validation: text that was never SQL passes
//! through cleaned and fails later, at execution.

/// Statements admitted for execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementPolicy {
    /// Only statements starting with a read-only keyword
    #[default]
    ReadOnly,
    /// Execute whatever the model produced
    Unrestricted,
}

/// Leading keywords considered read-only
const READ_ONLY_KEYWORDS: &[&str] = &["SELECT", "WITH", "SHOW", "EXPLAIN", "TABLE", "VALUES"];

impl StatementPolicy {
    /// Whether a sanitized statement may be executed under this policy.
    ///
    /// The check looks at the leading keyword only; it does not parse the
    /// statement and does not catch read-only syntax hiding writes
    /// (e.g. `WITH x AS (DELETE ...)`).
    pub fn allows(&self, sql: &str) -> bool {
        match self {
            StatementPolicy::Unrestricted => true,
            StatementPolicy::ReadOnly => {
                let first = sql.split_whitespace().next().unwrap_or("");
                let keyword = first.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());
                READ_ONLY_KEYWORDS
                    .iter()
                    .any(|k| keyword.eq_ignore_ascii_case(k))
            }
        }
    }
}

/// Clean raw model output into an executable statement string.
///
/// 1. Strip every ``` fence marker, with or without an attached language tag.
/// 2. Trim leading/trailing whitespace.
/// 3. Collapse whitespace runs into single spaces.
/// 4. Append `;` unless the text already ends with one.
///
/// Never rejects input. Multi-statement text is not split; only the final
/// character is guaranteed to be `;`.
pub fn sanitize(raw: &str) -> String {
    let mut unfenced = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("```") {
        unfenced.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        // Drop a language tag glued to the fence ("sql", "postgresql", ...)
        let tag_end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        rest = &rest[tag_end..];
    }
    unfenced.push_str(rest);

    let mut cleaned = unfenced.split_whitespace().collect::<Vec<_>>().join(" ");
    if !cleaned.ends_with(';') {
        cleaned.push(';');
    }
    cleaned
}
