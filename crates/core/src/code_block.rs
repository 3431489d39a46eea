//! Code block body normalization.
//!
//! Authored code samples often carry blank padding lines and 4-column
//! indentation copied from editors; both are compacted before highlighting.

/// Tab stops are 4 columns wide, as in CommonMark.
const TAB_WIDTH: usize = 4;

/// Normalizes the body of a fenced or indented code block.
///
/// Leading and trailing blank lines are removed. When the smallest non-zero
/// indentation of the block is exactly one 4-column step (four spaces or a
/// tab), every indentation of `w` columns becomes `w / 4 * 2 + w % 4` spaces.
/// Applying the function to its own output returns it unchanged.
pub fn normalize_code(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();

    let Some(first) = lines.iter().position(|line| !is_blank(line)) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .unwrap_or(first);
    let lines = &lines[first..=last];

    let min_indent = lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| leading_whitespace_info(line).0)
        .filter(|width| *width > 0)
        .min();

    if min_indent != Some(TAB_WIDTH) {
        return lines.join("\n");
    }

    lines
        .iter()
        .map(|line| {
            let (width, bytes) = leading_whitespace_info(line);
            let compacted = width / TAB_WIDTH * 2 + width % TAB_WIDTH;
            format!("{}{}", " ".repeat(compacted), &line[bytes..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Visual columns expand tabs to 4-column boundaries per CommonMark.
fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += TAB_WIDTH - (col % TAB_WIDTH);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}
