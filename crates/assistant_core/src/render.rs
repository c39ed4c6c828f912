use std::{collections::HashMap, sync::Arc};

use markdown::{mdast, to_mdast, ParseOptions};
use shared::domain::Line;

use crate::classify::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
    ListItem,
    Blockquote,
    Rule,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
    /// Info string of a fenced code block.
    pub lang: Option<String>,
    /// Heading level, 0 for everything else.
    pub depth: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Heading { depth: u8, text: String },
    Text(String),
    Preformatted { lang: Option<String>, text: String },
    /// Classified lines; command lines are meant to be rendered as controls.
    Lines(Vec<Line>),
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTree {
    pub nodes: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                DisplayNode::Lines(lines) => Some(lines),
                _ => None,
            })
            .flatten()
    }
}

pub trait RenderStrategy: Send + Sync {
    fn render(&self, block: &Block) -> DisplayNode;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainStrategy;

impl RenderStrategy for PlainStrategy {
    fn render(&self, block: &Block) -> DisplayNode {
        match block.kind {
            BlockKind::Heading => DisplayNode::Heading {
                depth: block.depth,
                text: block.text.clone(),
            },
            BlockKind::Rule => DisplayNode::Rule,
            BlockKind::Code => DisplayNode::Preformatted {
                lang: block.lang.clone(),
                text: block.text.clone(),
            },
            BlockKind::Paragraph
            | BlockKind::ListItem
            | BlockKind::Blockquote
            | BlockKind::Other => DisplayNode::Text(block.text.clone()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandBlockStrategy;

impl RenderStrategy for CommandBlockStrategy {
    fn render(&self, block: &Block) -> DisplayNode {
        DisplayNode::Lines(classify(&block.text))
    }
}

#[derive(Clone)]
pub struct Renderer {
    fallback: Arc<dyn RenderStrategy>,
    strategies: HashMap<BlockKind, Arc<dyn RenderStrategy>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            fallback: Arc::new(PlainStrategy),
            strategies: HashMap::new(),
        }
    }
}

impl Renderer {
    pub fn with_command_blocks() -> Self {
        Self::default().with_strategy(BlockKind::Code, Arc::new(CommandBlockStrategy))
    }

    pub fn with_strategy(mut self, kind: BlockKind, strategy: Arc<dyn RenderStrategy>) -> Self {
        self.strategies.insert(kind, strategy);
        self
    }

    pub fn render(&self, text: &str) -> DisplayTree {
        let mut tree = DisplayTree::default();
        match to_mdast(text, &ParseOptions::gfm()) {
            Ok(root) => self.render_node(&root, &mut tree.nodes),
            Err(_) => tree.nodes.push(self.dispatch(&Block {
                kind: BlockKind::Paragraph,
                text: text.to_string(),
                lang: None,
                depth: 0,
            })),
        }
        tree
    }

    fn dispatch(&self, block: &Block) -> DisplayNode {
        self.strategies
            .get(&block.kind)
            .unwrap_or(&self.fallback)
            .render(block)
    }

    fn render_node(&self, node: &mdast::Node, out: &mut Vec<DisplayNode>) {
        let block = match node {
            mdast::Node::Root(root) => return self.render_children(&root.children, out),
            mdast::Node::List(list) => return self.render_children(&list.children, out),
            mdast::Node::Blockquote(quote) if has_code(&quote.children) => {
                return self.render_children(&quote.children, out)
            }
            mdast::Node::ListItem(item) if has_code(&item.children) => {
                return self.render_children(&item.children, out)
            }
            mdast::Node::Heading(heading) => Block {
                kind: BlockKind::Heading,
                text: inline_text(&heading.children),
                lang: None,
                depth: heading.depth,
            },
            mdast::Node::Code(code) => Block {
                kind: BlockKind::Code,
                text: code.value.clone(),
                lang: code.lang.clone(),
                depth: 0,
            },
            mdast::Node::Paragraph(paragraph) => {
                leaf(BlockKind::Paragraph, inline_text(&paragraph.children))
            }
            mdast::Node::ListItem(item) => leaf(BlockKind::ListItem, block_text(&item.children)),
            mdast::Node::Blockquote(quote) => {
                leaf(BlockKind::Blockquote, block_text(&quote.children))
            }
            mdast::Node::ThematicBreak(_) => leaf(BlockKind::Rule, String::new()),
            mdast::Node::Html(html) => leaf(BlockKind::Other, html.value.clone()),
            other => leaf(BlockKind::Other, block_text(std::slice::from_ref(other))),
        };
        out.push(self.dispatch(&block));
    }

    fn render_children(&self, children: &[mdast::Node], out: &mut Vec<DisplayNode>) {
        for child in children {
            self.render_node(child, out);
        }
    }
}

fn leaf(kind: BlockKind, text: String) -> Block {
    Block {
        kind,
        text,
        lang: None,
        depth: 0,
    }
}

fn inline_text(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => out.push_str(&code.value),
            mdast::Node::InlineMath(math) => out.push_str(&math.value),
            mdast::Node::Html(html) => out.push_str(&html.value),
            mdast::Node::Break(_) => out.push('\n'),
            mdast::Node::Strong(strong) => out.push_str(&inline_text(&strong.children)),
            mdast::Node::Emphasis(emphasis) => out.push_str(&inline_text(&emphasis.children)),
            mdast::Node::Delete(delete) => out.push_str(&inline_text(&delete.children)),
            mdast::Node::Link(link) => out.push_str(&inline_text(&link.children)),
            _ => {}
        }
    }
    out
}

/// Text of block-level nodes, one block per line.
fn block_text(nodes: &[mdast::Node]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            mdast::Node::Paragraph(paragraph) => inline_text(&paragraph.children),
            mdast::Node::Heading(heading) => inline_text(&heading.children),
            mdast::Node::Code(code) => code.value.clone(),
            mdast::Node::Math(math) => math.value.clone(),
            mdast::Node::Html(html) => html.value.clone(),
            mdast::Node::List(list) => block_text(&list.children),
            mdast::Node::ListItem(item) => block_text(&item.children),
            mdast::Node::Blockquote(quote) => block_text(&quote.children),
            mdast::Node::Table(table) => block_text(&table.children),
            mdast::Node::TableRow(row) => row
                .children
                .iter()
                .map(|cell| match cell {
                    mdast::Node::TableCell(cell) => inline_text(&cell.children),
                    _ => String::new(),
                })
                .collect::<Vec<_>>()
                .join(" | "),
            other => inline_text(std::slice::from_ref(other)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn has_code(children: &[mdast::Node]) -> bool {
    children.iter().any(|child| match child {
        mdast::Node::Code(_) => true,
        mdast::Node::List(list) => list.children.iter().any(|item| match item {
            mdast::Node::ListItem(item) => has_code(&item.children),
            _ => false,
        }),
        mdast::Node::Blockquote(quote) => has_code(&quote.children),
        _ => false,
    })
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
