use seedsweeper_core::{Action, Coord, Coord2};

/// Parses `ROW,COL`.
pub(crate) fn parse_coords(input: &str) -> Result<Coord2, String> {
    let (row, col) = input
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL but got `{input}`"))?;
    let parse = |part: &str| -> Result<Coord, String> {
        part.trim()
            .parse()
            .map_err(|err| format!("invalid coordinate `{part}`: {err}"))
    };
    Ok((parse(row)?, parse(col)?))
}

/// Parses one scripted move: `r`, `m`, `c` or `h` followed by `ROW,COL`, or `x` to reset.
pub(crate) fn parse_move(input: &str) -> Result<Action, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("x") {
        return Ok(Action::Reset);
    }

    let mut chars = input.chars();
    let kind = chars
        .next()
        .ok_or_else(|| "empty move".to_owned())?
        .to_ascii_lowercase();
    let coords = parse_coords(chars.as_str())?;

    match kind {
        'r' => Ok(Action::Reveal(coords)),
        'm' => Ok(Action::ToggleMark(coords)),
        'c' => Ok(Action::Chord(coords)),
        'h' => Ok(Action::Highlight(coords)),
        other => Err(format!("unknown move `{other}` in `{input}`")),
    }
}
