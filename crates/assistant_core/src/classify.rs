use shared::domain::{CommandLine, Line, LineKind, MARKER_KEYWORD};

/// Classifies every `\n`-delimited segment of `text`, in order.
///
/// Never fails: empty input yields a single empty plain line, matching
/// `str::split` semantics so that line count always equals segment count.
pub fn classify(text: &str) -> Vec<Line> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| Line {
            index,
            text: raw.to_string(),
            kind: classify_line(raw),
        })
        .collect()
}

pub fn classify_line(line: &str) -> LineKind {
    match parse_command(line) {
        Some(command) => LineKind::Command(command),
        None => LineKind::Plain,
    }
}

pub fn parse_command(line: &str) -> Option<CommandLine> {
    let mut parts = line.split(char::is_whitespace);
    if parts.next()? != MARKER_KEYWORD {
        return None;
    }

    let mut tokens = parts.filter(|token| !token.is_empty()).map(str::to_string);
    let tool_name = tokens.next();
    Some(CommandLine {
        tool_name,
        arguments: tokens.collect(),
    })
}

pub fn commands(lines: &[Line]) -> impl Iterator<Item = &CommandLine> {
    lines.iter().filter_map(Line::command)
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
