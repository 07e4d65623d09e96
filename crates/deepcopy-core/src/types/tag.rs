/// Looks up `key` in a Go struct tag.
///
/// Tags are space separated `key:"value"` pairs where the value is a Go string literal.
/// Parsing stops at the first malformed pair, matching `reflect.StructTag.Lookup`.
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag.as_bytes();
    while !rest.is_empty() {
        let start = rest.iter().position(|b| *b != b' ').unwrap_or(rest.len());
        rest = &rest[start..];
        if rest.is_empty() {
            break;
        }

        let name_len = rest
            .iter()
            .position(|b| *b <= b' ' || *b == b':' || *b == b'"' || *b == 0x7f)
            .unwrap_or(rest.len());
        if name_len == 0
            || name_len + 1 >= rest.len()
            || rest[name_len] != b':'
            || rest[name_len + 1] != b'"'
        {
            break;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        // rest[0] is the opening quote
        let mut end = 1;
        while end < rest.len() && rest[end] != b'"' {
            if rest[end] == b'\\' {
                end += 1;
            }
            end += 1;
        }
        if end >= rest.len() {
            break;
        }
        let quoted = &rest[1..end];
        rest = &rest[end + 1..];

        if name == key.as_bytes() {
            return unquote(quoted);
        }
    }
    None
}

fn unquote(body: &[u8]) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Some(out)
}
