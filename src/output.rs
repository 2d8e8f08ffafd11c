//! Output formatting for built trees

use crate::text::TextSet;
use crate::tree::{BuildStats, BuiltSuffixTree, Node, SuffixTree};
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

/// Summary of one build, printed by `gst stats`
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    pub name: String,
    pub documents: usize,
    pub excluded: u32,
    pub text_len: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub stats: BuildStats,
}

impl TreeReport {
    pub fn new(name: impl Into<String>, built: &BuiltSuffixTree) -> Self {
        Self {
            name: name.into(),
            documents: built.tree.text().segment_count(),
            excluded: built.excluded_count,
            text_len: built.tree.text().len(),
            nodes: built.root().node_count(),
            leaves: built.root().leaf_count(),
            stats: built.stats,
        }
    }
}

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print build statistics
pub fn print_report(report: &TreeReport) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", report.name)?;
    writeln!(out, "{}", "=".repeat(report.name.chars().count()))?;
    writeln!(out, "Documents:          {}", report.documents)?;
    if report.excluded > 0 {
        writeln!(out, "Excluded:           {}", report.excluded)?;
    }
    writeln!(out, "Text length:        {}", report.text_len)?;
    writeln!(out, "Nodes:              {}", report.nodes)?;
    writeln!(out, "Leaves:             {}", report.leaves)?;
    writeln!(out)?;
    let stats = &report.stats;
    writeln!(out, "Phases:             {}", stats.phases)?;
    writeln!(out, "Rule 1 (open end):  {}", stats.rule1_extensions)?;
    writeln!(out, "Rule 2 (leaf):      {}", stats.rule2_leaves)?;
    writeln!(out, "Rule 2 (split):     {}", stats.rule2_splits)?;
    writeln!(out, "Rule 3 (stop):      {}", stats.rule3_stops)?;
    writeln!(out, "Canonicalizations:  {}", stats.canonicalization_steps)?;
    writeln!(out, "Suffix links:       {}", stats.suffix_link_follows)?;
    writeln!(out, "Root re-derivation: {}", stats.root_rederivations)?;
    writeln!(out)
}

/// Print the tree, one edge per line, terminators highlighted
pub fn print_tree(tree: &SuffixTree, color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    write_tree(&mut out, tree)
}

/// Render the tree without colors
pub fn render_tree(tree: &SuffixTree) -> String {
    let mut out = NoColor::new(Vec::new());
    write_tree(&mut out, tree).ok();
    String::from_utf8_lossy(&out.into_inner()).into_owned()
}

/// Print every suffix as `doc:offset  suffix`
pub fn print_suffixes(tree: &SuffixTree, color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    let text = tree.text();
    for entry in tree.suffixes() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}:{}", entry.doc, entry.offset)?;
        out.reset()?;
        write!(out, "\t")?;
        write_label(&mut out, &entry.suffix, text)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_tree<W: WriteColor>(out: &mut W, tree: &SuffixTree) -> io::Result<()> {
    let text = tree.text();
    writeln!(out, "ROOT")?;

    let mut stack: Vec<(&Node, &[char], usize)> = Vec::new();
    for (edge, child) in tree.root().children().iter().rev() {
        stack.push((child.as_ref(), edge.label(text.chars()), 1));
    }

    while let Some((node, label, depth)) = stack.pop() {
        write!(out, "{}", "  ".repeat(depth))?;
        write_label(out, label, text)?;
        if let Some(start) = node.leaf_start() {
            let (doc, offset) = text.locate(start);
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, " [{}:{}]", doc, offset)?;
            out.reset()?;
        }
        writeln!(out)?;

        for (edge, child) in node.children().iter().rev() {
            stack.push((child.as_ref(), edge.label(text.chars()), depth + 1));
        }
    }
    Ok(())
}

fn write_label<W: WriteColor>(out: &mut W, label: &[char], text: &TextSet) -> io::Result<()> {
    let mut plain = String::new();
    for &c in label {
        if text.is_terminator(c) {
            if !plain.is_empty() {
                write!(out, "{}", plain)?;
                plain.clear();
            }
            out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
            write!(out, "{}", terminator_display(c, text))?;
            out.reset()?;
        } else {
            plain.push(c);
        }
    }
    write!(out, "{}", plain)
}

/// Printable form of a terminator: itself when visible, `$<doc>` otherwise
fn terminator_display(c: char, text: &TextSet) -> String {
    let private_use = matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0x10FFFD);
    if c.is_control() || private_use {
        let doc = text.terminators().iter().position(|&t| t == c).unwrap_or(0);
        format!("${}", doc)
    } else {
        c.to_string()
    }
}
