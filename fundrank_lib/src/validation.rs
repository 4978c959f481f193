use crate::error::FundRankError;
use crate::model::sheet_name_for;

pub const MAX_CATEGORY_LENGTH: usize = 60;
pub const MAX_KEYWORD_LENGTH: usize = 40;
/// Excel's limit on sheet name length, in characters.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters Excel rejects in sheet names.
pub const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, FundRankError> {
    if input.len() > max_len {
        return Err(FundRankError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(FundRankError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a sheet name against Excel's rules: 1..=31 characters, none of
/// `[]:*?/\`, and no leading or trailing apostrophe.
pub fn validate_sheet_name(input: &str) -> Result<String, FundRankError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(FundRankError::InvalidInput("sheet name is empty".to_string()));
    }
    if name.chars().count() > MAX_SHEET_NAME_CHARS {
        return Err(FundRankError::InvalidInput(format!(
            "sheet name '{}' exceeds {} characters",
            name, MAX_SHEET_NAME_CHARS
        )));
    }
    if let Some(c) = name.chars().find(|c| SHEET_NAME_FORBIDDEN.contains(c)) {
        return Err(FundRankError::InvalidInput(format!(
            "sheet name '{}' contains forbidden character '{}'",
            name, c
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(FundRankError::InvalidInput(format!(
            "sheet name '{}' cannot start or end with an apostrophe",
            name
        )));
    }
    Ok(name.to_string())
}

/// Validate a category substring. The sheet it produces must also be a valid
/// sheet name.
pub fn validate_category(input: &str) -> Result<String, FundRankError> {
    let category = sanitize_text(input, MAX_CATEGORY_LENGTH)?;
    validate_sheet_name(&sheet_name_for(&category))?;
    Ok(category)
}

/// Validate a share-class marker such as `C`.
pub fn validate_share_class(input: &str) -> Result<String, FundRankError> {
    sanitize_text(input, MAX_KEYWORD_LENGTH)
}

/// Validate denylist keywords, dropping blank entries.
pub fn validate_denylist<S: AsRef<str>>(items: &[S]) -> Result<Vec<String>, FundRankError> {
    items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| !item.trim().is_empty())
        .map(|item| sanitize_text(item, MAX_KEYWORD_LENGTH))
        .collect()
}

/// Validate page number (must be >= 1).
pub fn validate_page(page: i64) -> Result<usize, FundRankError> {
    if page < 1 {
        return Err(FundRankError::InvalidInput(
            "page must be >= 1".to_string(),
        ));
    }
    Ok(page as usize)
}

/// Validate page size (must be >= 1).
pub fn validate_limit(limit: i64) -> Result<usize, FundRankError> {
    if limit < 1 {
        return Err(FundRankError::InvalidInput(
            "limit must be >= 1".to_string(),
        ));
    }
    Ok(limit as usize)
}

/// Parse a query-string integer, naming the parameter on failure.
pub fn parse_integer(field: &str, raw: &str) -> Result<i64, FundRankError> {
    raw.trim().parse::<i64>().map_err(|_| {
        FundRankError::InvalidInput(format!("{} must be an integer, got '{}'", field, raw))
    })
}

/// Validate top-N size: must be 1..=1000.
pub fn validate_top_n(n: usize) -> Result<usize, FundRankError> {
    if !(1..=1000).contains(&n) {
        return Err(FundRankError::InvalidInput(format!(
            "top-N must be between 1 and 1000, got {}",
            n
        )));
    }
    Ok(n)
}

/// Validate the hit threshold against the number of evaluated columns.
pub fn validate_hit_threshold(threshold: usize, columns: usize) -> Result<usize, FundRankError> {
    if threshold < 1 || threshold > columns {
        return Err(FundRankError::InvalidInput(format!(
            "hit threshold must be between 1 and {}, got {}",
            columns, threshold
        )));
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Text sanitization --

    #[test]
    fn sanitize_strips_control_chars() {
        assert_eq!(sanitize_text("沪深\u{0007}300\n", 100).unwrap(), "沪深300");
    }

    #[test]
    fn sanitize_rejects_blank() {
        assert!(sanitize_text("  \t ", 100).is_err());
    }

    #[test]
    fn sanitize_rejects_too_long() {
        assert!(sanitize_text(&"a".repeat(101), 100).is_err());
    }

    // -- Sheet names --

    #[test]
    fn sheet_name_valid() {
        assert_eq!(validate_sheet_name(" 沪深300基金 ").unwrap(), "沪深300基金");
    }

    #[test]
    fn sheet_name_counts_chars_not_bytes() {
        let name = "基".repeat(31);
        assert!(validate_sheet_name(&name).is_ok());
        assert!(validate_sheet_name(&"基".repeat(32)).is_err());
    }

    #[test]
    fn sheet_name_forbidden_chars() {
        for c in SHEET_NAME_FORBIDDEN {
            assert!(validate_sheet_name(&format!("a{}b", c)).is_err());
        }
    }

    #[test]
    fn sheet_name_apostrophe_edges() {
        assert!(validate_sheet_name("'abc").is_err());
        assert!(validate_sheet_name("abc'").is_err());
        assert!(validate_sheet_name("a'bc").is_ok());
    }

    #[test]
    fn sheet_name_empty() {
        assert!(validate_sheet_name("").is_err());
    }

    // -- Categories and keywords --

    #[test]
    fn category_valid() {
        assert_eq!(validate_category("中证1000").unwrap(), "中证1000");
    }

    #[test]
    fn category_rejects_forbidden_sheet_char() {
        assert!(validate_category("300/500").is_err());
    }

    #[test]
    fn category_rejects_overlong_sheet_name() {
        // 30 chars plus the two-char suffix is 32.
        assert!(validate_category(&"a".repeat(30)).is_err());
        assert!(validate_category(&"a".repeat(29)).is_ok());
    }

    #[test]
    fn share_class_trimmed() {
        assert_eq!(validate_share_class(" C ").unwrap(), "C");
    }

    #[test]
    fn denylist_drops_blank_entries() {
        let items = ["红利", " ", "", "价值"];
        assert_eq!(validate_denylist(&items).unwrap(), vec!["红利", "价值"]);
    }

    // -- Pagination --

    #[test]
    fn page_valid() {
        assert_eq!(validate_page(1).unwrap(), 1);
        assert_eq!(validate_page(7).unwrap(), 7);
    }

    #[test]
    fn page_zero_or_negative() {
        assert!(validate_page(0).is_err());
        assert!(validate_page(-3).is_err());
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(validate_limit(20).unwrap(), 20);
        assert!(validate_limit(0).is_err());
    }

    #[test]
    fn parse_integer_names_field() {
        assert_eq!(parse_integer("page", " 3 ").unwrap(), 3);
        let err = parse_integer("limit", "abc").unwrap_err().to_string();
        assert!(err.contains("limit"), "{}", err);
    }

    // -- Highlight parameters --

    #[test]
    fn top_n_bounds() {
        assert!(validate_top_n(0).is_err());
        assert_eq!(validate_top_n(10).unwrap(), 10);
    }

    #[test]
    fn hit_threshold_bounded_by_columns() {
        assert_eq!(validate_hit_threshold(4, 5).unwrap(), 4);
        assert!(validate_hit_threshold(6, 5).is_err());
        assert!(validate_hit_threshold(0, 5).is_err());
    }
}
