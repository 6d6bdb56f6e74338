/// Collapse redundant whitespace outside quoted strings.
///
/// Outside quotes, tabs are dropped, runs of spaces collapse to one space and
/// runs of newlines collapse to one newline. A trailing space is dropped; a
/// trailing tab is kept. Content between double quotes is copied verbatim,
/// and `\"` inside a string does not close it. The result is a fixed point:
/// normalizing it again changes nothing.
pub fn normalize(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_quotes {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quotes = false;
            }
            continue;
        }

        match ch {
            '\t' if i + 1 < chars.len() => continue,
            ' ' => match next_kept(&chars, i) {
                Some(' ') | None => continue,
                _ => {}
            },
            '\n' if next_kept(&chars, i) == Some('\n') => continue,
            '"' => in_quotes = true,
            _ => {}
        }

        out.push(ch);
    }

    out
}

/// The next character after `i` that survives tab removal. Only the final
/// character of the input survives when it is a tab.
fn next_kept(chars: &[char], i: usize) -> Option<char> {
    let rest = &chars[i + 1..];
    rest.iter()
        .enumerate()
        .find(|&(j, &c)| c != '\t' || j + 1 == rest.len())
        .map(|(_, &c)| c)
}
