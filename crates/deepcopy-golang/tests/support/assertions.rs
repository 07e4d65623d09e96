use pretty_assertions::assert_eq;

/// Drops indentation and blank lines so expectations only pin down the statements.
pub fn normalize(source: &str) -> String {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assert_go_eq(actual: &str, expected: &str) {
    assert_eq!(normalize(actual), normalize(expected));
}

/// Number of `{` minus number of `}` outside string literals.
pub fn brace_balance(source: &str) -> i64 {
    let mut balance = 0;
    let mut in_string = false;
    let mut escaped = false;
    for c in source.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => balance += 1,
            '}' if !in_string => balance -= 1,
            _ => {}
        }
    }
    balance
}
