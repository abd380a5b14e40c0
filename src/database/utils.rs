/// Collapses whitespace and numbers `?` placeholders into the `$1, $2, ...`
/// form Postgres expects, so queries can be written in the readable
/// question-mark style.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");

    let mut result = String::with_capacity(cleaned.len());
    let mut param_index = 1;
    for ch in cleaned.chars() {
        if ch == '?' {
            result.push('$');
            result.push_str(&param_index.to_string());
            param_index += 1;
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::sql;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            sql("INSERT INTO t (a, b, c) VALUES (?, ?, ?)"),
            "INSERT INTO t (a, b, c) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            sql("SELECT\n    id\nFROM\n    users\nWHERE\n    email = ?"),
            "SELECT id FROM users WHERE email = $1"
        );
    }
}
