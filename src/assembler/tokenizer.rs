// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Word tokenizer for SAN source.
//!
//! Words are separated by whitespace. `\` comments out the rest of the line;
//! `(` starts a comment that runs to the next `)`, possibly on a later line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub line: u32,
    /// 1-based byte column of the first character.
    pub column: usize,
}

impl Token<'_> {
    pub fn col_end(&self) -> usize {
        self.column + self.text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeError {
    pub line: u32,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TokenizeError {}

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut open_comment: Option<(u32, usize)> = None;

    for (line_ix, line) in source.lines().enumerate() {
        let line_num = line_ix as u32 + 1;
        let mut pos = 0;
        while pos < line.len() {
            if open_comment.is_some() {
                match line[pos..].find(')') {
                    Some(close) => {
                        pos += close + 1;
                        open_comment = None;
                        continue;
                    }
                    None => break,
                }
            }

            let Some(start) = next_non_space(line, pos) else {
                break;
            };
            let end = next_space(line, start).unwrap_or(line.len());
            let word = &line[start..end];
            pos = end;

            match word {
                "\\" => break,
                "(" => open_comment = Some((line_num, start + 1)),
                _ => tokens.push(Token {
                    text: word,
                    line: line_num,
                    column: start + 1,
                }),
            }
        }
    }

    if let Some((line, column)) = open_comment {
        return Err(TokenizeError {
            line,
            column,
            message: "Unterminated ( comment".to_string(),
        });
    }
    Ok(tokens)
}

fn next_non_space(line: &str, from: usize) -> Option<usize> {
    line[from..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(ix, _)| from + ix)
}

fn next_space(line: &str, from: usize) -> Option<usize> {
    line[from..]
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace())
        .map(|(ix, _)| from + ix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(source: &str) -> Vec<&str> {
        tokenize(source)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.text)
            .collect()
    }

    #[test]
    fn splits_on_whitespace_with_positions() {
        let tokens = tokenize("  $42 lda.#\n\tnop").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token {
                    text: "$42",
                    line: 1,
                    column: 3
                },
                Token {
                    text: "lda.#",
                    line: 1,
                    column: 7
                },
                Token {
                    text: "nop",
                    line: 2,
                    column: 2
                },
            ]
        );
        assert_eq!(tokens[1].col_end(), 12);
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(words("nop \\ rest is ignored\ndex"), vec!["nop", "dex"]);
    }

    #[test]
    fn backslash_inside_word_is_not_a_comment() {
        assert_eq!(words("a\\b nop"), vec!["a\\b", "nop"]);
    }

    #[test]
    fn skips_paren_comments_across_lines() {
        assert_eq!(words("nop ( one\ntwo ) dex ( x ) inx"), vec!["nop", "dex", "inx"]);
    }

    #[test]
    fn reports_unterminated_comment() {
        let err = tokenize("nop\n  ( never closed").unwrap_err();
        assert_eq!((err.line, err.column), (2, 3));
        assert_eq!(err.to_string(), "Unterminated ( comment");
    }
}
