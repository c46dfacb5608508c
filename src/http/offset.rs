//! Translation of a cursor position in a wrapped text panel to a body offset

/// Byte offset of the cell at `row`/`column` in a panel that wraps its text
/// every `rendered_width` cells.
///
/// This is a presentation-layer helper: the synthesis code only ever sees
/// the resulting absolute offset, and clamps it against the body itself.
pub fn resolve_offset(rendered_width: usize, row: usize, column: usize) -> usize {
    rendered_width.saturating_mul(row).saturating_add(column)
}

/// Parse a `row,col` cursor argument.
pub fn parse_cursor(value: &str) -> Result<(usize, usize), String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got '{}'", value))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid row '{}': {}", row.trim(), e))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid column '{}': {}", column.trim(), e))?;
    Ok((row, column))
}
