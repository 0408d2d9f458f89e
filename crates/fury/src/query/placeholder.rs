use crate::error::{OrmError, OrmResult};

/// Rewrite every `?` outside single-quoted literals into `$1`, `$2`, ...
///
/// Fails with `ColumnArgumentMismatch` when the number of placeholders differs
/// from `arg_count`.
pub fn rewrite_placeholders(sql: &str, arg_count: usize) -> OrmResult<String> {
    let mut out = String::with_capacity(sql.len() + arg_count * 2);
    let mut in_literal = false;
    let mut next = 0usize;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                next += 1;
                out.push('$');
                out.push_str(&next.to_string());
            }
            _ => out.push(ch),
        }
    }

    if next != arg_count {
        return Err(OrmError::mismatch(format!(
            "{next} placeholders for {arg_count} arguments in: {sql}"
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_left_to_right() {
        let sql = rewrite_placeholders("a = ? AND b = ? OR c = ?", 3).unwrap();
        assert_eq!(sql, "a = $1 AND b = $2 OR c = $3");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(
            rewrite_placeholders("SELECT 1;", 0).unwrap(),
            "SELECT 1;"
        );
    }

    #[test]
    fn skips_quoted_literals() {
        let sql = rewrite_placeholders("note = 'why?' AND id = ? AND x = 'it''s?'", 1).unwrap();
        assert_eq!(sql, "note = 'why?' AND id = $1 AND x = 'it''s?'");
    }

    #[test]
    fn double_digit_markers() {
        let sql = vec!["?"; 11].join(",");
        let out = rewrite_placeholders(&sql, 11).unwrap();
        assert!(out.ends_with("$10,$11"));
    }

    #[test]
    fn count_mismatch() {
        let err = rewrite_placeholders("a = ? AND b = ?", 1).unwrap_err();
        assert!(matches!(err, OrmError::ColumnArgumentMismatch(_)));
    }
}
