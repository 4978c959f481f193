//! Fund ranking catalog: the bulk open-end fund listing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Minimum number of comma-separated fields a catalog line must carry.
const MIN_FIELDS: usize = 16;

/// Decoded body of the ranking endpoint.
///
/// The endpoint answers with a JavaScript assignment rather than JSON:
/// `var rankData = {datas:["...","..."],allRecords:123,...};`. Only the
/// `datas` array and the `allRecords` counter are read.
#[derive(Debug)]
pub struct RankPayload {
    pub rows: Vec<RankRow>,
    pub all_records: Option<i64>,
}

impl RankPayload {
    /// Parses the raw response body.
    ///
    /// A missing or malformed `datas` array is an error; a single line that
    /// does not decode is logged and skipped.
    pub fn parse(body: &str) -> Result<Self, Error> {
        let datas = extract_array(body, "datas:")
            .ok_or_else(|| Error::Decode("missing datas array".to_string()))?;
        let lines: Vec<String> = serde_json::from_str(datas)
            .map_err(|e| Error::Decode(format!("datas is not a string array: {}", e)))?;
        let rows = lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| match RankRow::from_line(line) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!("Skipping catalog line {}: {}", idx + 1, e);
                    None
                }
            })
            .collect();
        Ok(Self {
            rows,
            all_records: extract_integer(body, "allRecords:"),
        })
    }
}

/// One fund in the catalog, as published upstream.
///
/// Return columns are percentages over trailing windows; upstream leaves a
/// field empty when the fund is too young for the window, which decodes to `None`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RankRow {
    /// Six-digit fund code exactly as published.
    pub code: String,
    pub name: Option<String>,
    pub nav_date: Option<NaiveDate>,
    pub unit_nav: Option<f64>,
    pub accum_nav: Option<f64>,
    pub daily_growth: Option<f64>,
    pub week: Option<f64>,
    pub month1: Option<f64>,
    pub month3: Option<f64>,
    pub month6: Option<f64>,
    pub year1: Option<f64>,
    pub year2: Option<f64>,
    pub year3: Option<f64>,
    pub ytd: Option<f64>,
    pub since_inception: Option<f64>,
    pub fee: Option<String>,
}

impl RankRow {
    /// Decodes one comma-joined catalog line.
    pub fn from_line(line: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < MIN_FIELDS {
            return Err(Error::Decode(format!(
                "catalog line has {} fields, expected at least {}: {}",
                fields.len(),
                MIN_FIELDS,
                line
            )));
        }
        let code = fields[0].trim();
        if code.is_empty() {
            return Err(Error::Decode(format!("catalog line without fund code: {}", line)));
        }
        Ok(Self {
            code: code.to_string(),
            name: text(fields[1]),
            nav_date: NaiveDate::parse_from_str(fields[3].trim(), "%Y-%m-%d").ok(),
            unit_nav: number(fields[4]),
            accum_nav: number(fields[5]),
            daily_growth: number(fields[6]),
            week: number(fields[7]),
            month1: number(fields[8]),
            month3: number(fields[9]),
            month6: number(fields[10]),
            year1: number(fields[11]),
            year2: number(fields[12]),
            year3: number(fields[13]),
            ytd: number(fields[14]),
            since_inception: number(fields[15]),
            fee: fields.get(20).and_then(|f| text(f)),
        })
    }
}

fn text(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Returns the `[...]` slice that follows `key`, honouring quoted strings.
fn extract_array<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    let after_key = body.find(key)? + key.len();
    let open = after_key + body[after_key..].find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in body[open..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[open..=open + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn extract_integer(body: &str, key: &str) -> Option<i64> {
    let start = body.find(key)? + key.len();
    let digits: String = body[start..]
        .chars()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "000300,沪深300ETF联接C,HS300ETFLJC,2025-09-24,1.2345,1.5000,0.52,1.10,3.20,8.40,15.60,20.10,10.00,5.00,12.30,23.45,2019-01-01,1,,,0.00%,,,,,";

    #[test]
    fn decodes_full_line() {
        let row = RankRow::from_line(LINE).unwrap();
        assert_eq!(row.code, "000300");
        assert_eq!(row.name.as_deref(), Some("沪深300ETF联接C"));
        assert_eq!(row.nav_date, NaiveDate::from_ymd_opt(2025, 9, 24));
        assert_eq!(row.month6, Some(15.60));
        assert_eq!(row.ytd, Some(12.30));
        assert_eq!(row.fee.as_deref(), Some("0.00%"));
    }

    #[test]
    fn empty_fields_are_none() {
        let line = "000001,新基金C,XJJC,2025-09-24,1.0,1.0,,,,,,,,,,,,,,";
        let row = RankRow::from_line(line).unwrap();
        assert_eq!(row.month1, None);
        assert_eq!(row.year3, None);
        assert_eq!(row.fee, None);
    }

    #[test]
    fn short_line_is_rejected() {
        assert!(RankRow::from_line("000001,a,b").is_err());
    }

    #[test]
    fn extracts_array_with_brackets_inside_strings() {
        let body = r#"var x = {datas:["a]b","c"],allRecords:2};"#;
        assert_eq!(extract_array(body, "datas:"), Some(r#"["a]b","c"]"#));
        assert_eq!(extract_integer(body, "allRecords:"), Some(2));
    }

    #[test]
    fn parses_payload() {
        let body = format!("var rankData = {{datas:[\"{}\"],allRecords:1,pageIndex:1}};", LINE);
        let payload = RankPayload::parse(&body).unwrap();
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.all_records, Some(1));
    }

    #[test]
    fn parses_payload_skipping_bad_line() {
        let body = format!(
            "var rankData = {{datas:[\"{}\",\"000009,truncated\",\",无代码C,WDMC,2025-09-24,1,1,,,,,,,,,,\"],allRecords:3}};",
            LINE
        );
        let payload = RankPayload::parse(&body).unwrap();
        assert_eq!(payload.rows.len(), 1);
        assert_eq!(payload.rows[0].code, "000300");
        assert_eq!(payload.all_records, Some(3));
    }

    #[test]
    fn payload_without_datas_is_error() {
        assert!(RankPayload::parse("var rankData = {ErrCode:-999};").is_err());
    }
}
