use assistant_core::{DisplayNode, DisplayTree};
use shared::domain::{CommandLine, Line, LineKind};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Text(String),
    Command {
        number: usize,
        text: String,
        command: CommandLine,
    },
    Disabled(String),
}

#[derive(Debug, Default)]
pub struct ResponseView {
    entries: Vec<Entry>,
    commands: Vec<CommandLine>,
}

impl ResponseView {
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let mut view = Self::default();
        view.push_lines(lines);
        view
    }

    pub fn from_tree(tree: &DisplayTree) -> Self {
        let mut view = Self::default();
        for node in &tree.nodes {
            match node {
                DisplayNode::Heading { depth, text } => view
                    .entries
                    .push(Entry::Text(format!("{} {text}", "#".repeat(*depth as usize)))),
                DisplayNode::Text(text) => view.entries.push(Entry::Text(text.clone())),
                DisplayNode::Preformatted { lang, text } => view.entries.push(Entry::Text(
                    format!("```{}\n{text}\n```", lang.as_deref().unwrap_or_default()),
                )),
                DisplayNode::Lines(lines) => view.push_lines(lines.clone()),
                DisplayNode::Rule => view.entries.push(Entry::Text("---".into())),
            }
        }
        view
    }

    fn push_lines(&mut self, lines: Vec<Line>) {
        for line in lines {
            let entry = match line.kind {
                LineKind::Command(command) if command.is_executable() => {
                    self.commands.push(command.clone());
                    Entry::Command {
                        number: self.commands.len(),
                        text: line.text,
                        command,
                    }
                }
                LineKind::Command(_) => Entry::Disabled(line.text),
                LineKind::Plain => Entry::Text(line.text),
            };
            self.entries.push(entry);
        }
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Command for a 1-based number as shown on screen.
    pub fn command(&self, number: usize) -> Option<&CommandLine> {
        number.checked_sub(1).and_then(|i| self.commands.get(i))
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Text(text) => text.clone(),
                Entry::Command { number, text, .. } => format!("[{number}] {text}"),
                Entry::Disabled(text) => format!("[-] {text}  (nothing to run)"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    NextQuery,
    Quit,
    Run(usize),
    Invalid(String),
}

pub fn parse_selection(input: &str, command_count: usize) -> Selection {
    let input = input.trim();
    if input.is_empty() {
        return Selection::NextQuery;
    }
    if matches!(input, "q" | "quit" | "exit") {
        return Selection::Quit;
    }
    match input.parse::<usize>() {
        Ok(number) if (1..=command_count).contains(&number) => Selection::Run(number),
        _ => Selection::Invalid(format!(
            "pick a command number between 1 and {command_count}, press Enter for a new query, or q to quit"
        )),
    }
}
