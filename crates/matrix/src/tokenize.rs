//! Shell-argument style tokenizer for free-form axis value text
//!
//! Splits on whitespace while honoring quoted substrings, so a value
//! containing spaces can be entered as `"integration tests"`. Quote
//! characters are removed from the produced token; a backslash escapes
//! the next character outside quotes and inside double quotes. Single
//! quotes take their content literally.

/// Tokenize free-form value text into axis values.
///
/// `None` and all-whitespace input produce no tokens. An unterminated
/// quote runs to the end of the input rather than failing — configuration
/// forms should never hard-error on half-typed text.
#[must_use]
pub fn tokenize(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let Some(&ch) = chars.get(i) else {
            break;
        };
        if ch.is_whitespace() {
            i += 1;
        } else {
            i = parse_token(&chars, i, &mut tokens);
        }
    }

    tokens
}

/// Parse one token starting at a non-whitespace character
fn parse_token(chars: &[char], mut i: usize, tokens: &mut Vec<String>) -> usize {
    let mut token = String::new();
    while i < chars.len() {
        let Some(&ch) = chars.get(i) else {
            break;
        };
        if ch.is_whitespace() {
            break;
        }
        match ch {
            '"' | '\'' => i = parse_quoted(chars, i, ch, &mut token),
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    token.push(next);
                    i += 2;
                } else {
                    // Trailing backslash with nothing to escape
                    i += 1;
                }
            }
            _ => {
                token.push(ch);
                i += 1;
            }
        }
    }
    tokens.push(token);
    i
}

/// Parse a quoted section into the current token, consuming both quotes
fn parse_quoted(chars: &[char], mut i: usize, quote: char, token: &mut String) -> usize {
    i += 1;
    while i < chars.len() {
        let Some(&ch) = chars.get(i) else {
            break;
        };
        if ch == quote {
            i += 1;
            return i;
        }
        if ch == '\\' && quote == '"' {
            if let Some(&next) = chars.get(i + 1) {
                token.push(next);
                i += 2;
                continue;
            }
        }
        token.push(ch);
        i += 1;
    }
    i
}
