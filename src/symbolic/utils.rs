// the collection of utility functions mainly for bracket parsing and proceeding

/// true if every '(' has its ')' and they never close before opening
pub fn brackets_are_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// byte position of the bracket closing the one opened at byte position `start`
pub fn find_pair_to_this_bracket(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s[start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// true if the whole string is one bracketed group: "(x+1)" but not "(x)+(1)"
pub fn is_wrapped_in_brackets(s: &str) -> bool {
    s.starts_with('(') && find_pair_to_this_bracket(s, 0) == Some(s.len() - 1)
}

/// '+'/'-' are binary only when an operand ends right before them;
/// "1e-3" is a number, "2*-x" holds a unary minus.
fn is_binary_sign(input: &str, pos: usize) -> bool {
    let before = input[..pos].trim_end();
    let Some(prev) = before.chars().last() else {
        return false;
    };
    if !(prev.is_alphanumeric() || prev == '_' || prev == '.' || prev == ')') {
        return false;
    }
    // exponent of a float literal: digits [. digits] e|E
    if (prev == 'e' || prev == 'E') && before.len() == input[..pos].len() {
        let mantissa = &before[..before.len() - 1];
        let literal_start = mantissa
            .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let literal = &mantissa[literal_start..];
        let starts_identifier = mantissa[..literal_start]
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if !literal.is_empty()
            && literal.chars().any(|c| c.is_ascii_digit())
            && !starts_identifier
        {
            return false;
        }
    }
    true
}

/// Rightmost binary `+`/`-` at bracket depth 0, so that `a - b - c` splits as `(a - b) - c`.
pub fn find_rightmost_additive_operator(input: &str) -> Option<(usize, char)> {
    let mut depth = 0;
    let mut found = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' | '-' if depth == 0 && is_binary_sign(input, i) => found = Some((i, c)),
            _ => {}
        }
    }
    found
}

/// Rightmost occurrence of one of `operators` outside brackets (left associativity).
pub fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let mut depth = 0;
    let mut found = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && operators.contains(&c) => found = Some((i, c)),
            _ => {}
        }
    }
    found
}

/// Leftmost occurrence of `target` outside brackets (right associativity, used for `^`).
pub fn find_leftmost_char_outside_brackets(input: &str, target: char) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && c == target => return Some(i),
            _ => {}
        }
    }
    None
}
