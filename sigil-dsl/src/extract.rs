//! Declaration-block extraction from mixed prose/DSL documents
//!
//! Documents interleave prose with parenthesized declaration forms. A line
//! whose trimmed form starts with `(` and mentions a declaration keyword
//! opens a block; the block closes when the running paren depth, computed
//! from per-line `(`/`)` counts, returns to zero or below.

use crate::lexer::DECLARATION_KEYWORDS;

/// A candidate DSL block pulled out of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub text: String,
    /// 1-based line of the block's first line in the source document.
    pub line: usize,
}

/// Extract all declaration blocks from a document.
pub fn extract_blocks(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 0;
    let mut in_block = false;
    let mut depth: i64 = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let stripped = line.trim();

        if stripped.starts_with('(') && mentions_keyword(stripped) {
            // A new opener flushes any unfinished block.
            if !current.is_empty() {
                blocks.push(Block {
                    text: current.join("\n"),
                    line: start_line,
                });
            }
            current = vec![line];
            start_line = line_no;
            in_block = true;
            depth = paren_delta(stripped);
            if depth <= 0 {
                blocks.push(Block {
                    text: current.join("\n"),
                    line: start_line,
                });
                current = Vec::new();
                in_block = false;
                depth = 0;
            }
        } else if in_block {
            current.push(line);
            depth += paren_delta(stripped);

            if depth <= 0 {
                blocks.push(Block {
                    text: current.join("\n"),
                    line: start_line,
                });
                current = Vec::new();
                in_block = false;
                depth = 0;
            }
        }
    }

    if !current.is_empty() {
        blocks.push(Block {
            text: current.join("\n"),
            line: start_line,
        });
    }

    blocks
}

fn mentions_keyword(line: &str) -> bool {
    DECLARATION_KEYWORDS.iter().any(|kw| line.contains(kw))
}

fn paren_delta(line: &str) -> i64 {
    let opens = line.matches('(').count() as i64;
    let closes = line.matches(')').count() as i64;
    opens - closes
}
