//! Nexus/Newick tree reading.
//!
//! Expects a Nexus file with a taxa block (`Dimensions ntax=<n>;` and a
//! `Translate` table mapping taxon numbers to names) followed by `tree`
//! lines carrying Newick strings. Taxon numbers become leaf arena indices
//! (`number - 1`); unnamed internal vertices are numbered upward from `n`.

use crate::error::{Error, Result};
use crate::model::{Tree, TreeBuilder};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::OnceLock;

/// Newick vertex token: optional numeric name, optional `[&...]` attribute
/// block, optional `:length` with scientific notation.
fn vertex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?P<name>\d*)(?:\[&(?P<attributes>[^\]]*)\])?(?::(?P<length>[0-9]*\.?[0-9]*(?:[Ee][-+]?[0-9]+)?))?",
        )
        .expect("newick vertex pattern is valid")
    })
}

pub fn read_trees(path: impl AsRef<Path>) -> Result<Vec<Tree>> {
    let text = std::fs::read_to_string(path)?;
    parse_nexus(&text)
}

pub fn parse_nexus(text: &str) -> Result<Vec<Tree>> {
    let mut lines = text.lines();

    let num_leaves = find_ntax(&mut lines)?;
    let taxa = parse_translate_block(&mut lines, num_leaves)?;

    let mut trees = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("tree ") else {
            continue;
        };
        let (name, newick) = split_tree_line(rest)?;
        let mut tree = parse_newick(newick, &taxa, num_leaves)?;
        tree.set_name(name);
        trees.push(tree);
    }
    Ok(trees)
}

fn find_ntax<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Result<usize> {
    for line in lines {
        let lower = line.to_ascii_lowercase();
        if let Some(at) = lower.find("ntax") {
            let digits: String = line[at..].chars().filter(char::is_ascii_digit).collect();
            return digits.parse().map_err(|_| Error::NexusParse {
                message: format!("unreadable taxa count in line: {line}"),
            });
        }
    }
    Err(Error::NexusParse {
        message: "no `Dimensions ntax=...` line found".to_string(),
    })
}

fn parse_translate_block<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    num_leaves: usize,
) -> Result<Vec<String>> {
    for line in lines.by_ref() {
        if line.trim().eq_ignore_ascii_case("translate") {
            break;
        }
    }

    let mut names: FxHashMap<usize, String> = FxHashMap::default();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.starts_with(';') {
            break;
        }
        let mut tokens = trimmed.split_whitespace();
        let (Some(number), Some(name)) = (tokens.next(), tokens.next()) else {
            return Err(Error::NexusParse {
                message: format!("unreadable translate entry: {trimmed}"),
            });
        };
        let number: usize = number.parse().map_err(|_| Error::NexusParse {
            message: format!("non-numeric taxon number: {trimmed}"),
        })?;
        names.insert(number, name.trim_end_matches([',', ';']).to_string());
        // The last entry may carry the block terminator inline.
        if name.ends_with(';') {
            break;
        }
    }

    let mut taxa = Vec::with_capacity(num_leaves);
    for number in 1..=num_leaves {
        let name = names.remove(&number).ok_or_else(|| Error::NexusParse {
            message: format!("translate table is missing taxon {number}"),
        })?;
        taxa.push(name);
    }
    Ok(taxa)
}

/// Splits `STATE_0 = [&R] (...)` into the tree name and the Newick string.
fn split_tree_line(rest: &str) -> Result<(&str, &str)> {
    let (name, newick) = rest.split_once('=').ok_or_else(|| Error::NexusParse {
        message: format!("tree line without `=`: {rest}"),
    })?;
    let mut newick = newick.trim_start();
    if newick.starts_with('[') {
        match newick.find(']') {
            Some(end) => newick = newick[end + 1..].trim_start(),
            None => {
                return Err(Error::NexusParse {
                    message: format!("unclosed rooting annotation in tree line: {rest}"),
                });
            }
        }
    }
    Ok((name.trim(), newick.trim_end()))
}

pub fn parse_newick(newick: &str, taxa: &[String], num_leaves: usize) -> Result<Tree> {
    if num_leaves == 0 {
        return Err(Error::NexusParse {
            message: "taxa count is zero".to_string(),
        });
    }
    let mut cursor = NewickCursor {
        text: newick,
        position: 0,
        next_inner_index: num_leaves,
        // First-child branch lengths feed vertex heights; remember them so an
        // unlabelled edge can inherit its first child's length, as BEAST
        // output sometimes omits the root length.
        lengths: vec![None; 2 * num_leaves - 1],
    };
    let mut builder = TreeBuilder::new(num_leaves);
    let root = cursor.parse_vertex(&mut builder, taxa)?;
    for (index, length) in cursor.lengths.iter().enumerate() {
        if let Some(length) = length {
            builder.set_branch_length(index, *length)?;
        }
    }
    builder.build(root)
}

struct NewickCursor<'a> {
    text: &'a str,
    position: usize,
    next_inner_index: usize,
    lengths: Vec<Option<f64>>,
}

impl NewickCursor<'_> {
    fn parse_vertex(&mut self, builder: &mut TreeBuilder, taxa: &[String]) -> Result<usize> {
        let children = if self.peek() == Some('(') {
            self.position += 1;
            let first = self.parse_vertex(builder, taxa)?;
            self.expect(',')?;
            let second = self.parse_vertex(builder, taxa)?;
            self.expect(')')?;
            Some((first, second))
        } else {
            None
        };

        let captures = vertex_pattern()
            .captures_at(self.text, self.position)
            .ok_or_else(|| self.error("expected a vertex token"))?;
        let token = captures.get(0).ok_or_else(|| self.error("empty vertex token"))?;

        let name = captures.name("name").map_or("", |m| m.as_str());
        let index = if name.is_empty() {
            let index = self.next_inner_index;
            self.next_inner_index += 1;
            index
        } else {
            let id: usize = name
                .parse()
                .map_err(|_| self.error("vertex name is not a number"))?;
            if id == 0 {
                return Err(self.error("vertex numbers start at 1"));
            }
            id - 1
        };

        match children {
            Some((first, second)) => {
                builder.inner(index, first, second)?;
                if let Some(length) = self.parse_length(&captures)? {
                    self.lengths[index] = Some(length);
                } else {
                    // No explicit length: inherit the first child's, matching
                    // the cladogram convention used for heights.
                    self.lengths[index] = self.lengths.get(first).copied().flatten();
                }
            }
            None => {
                let taxon = taxa.get(index).cloned();
                builder.leaf(index, taxon)?;
                self.lengths[index] = self.parse_length(&captures)?;
            }
        }

        self.position = token.end();
        Ok(index)
    }

    fn parse_length(&self, captures: &regex::Captures<'_>) -> Result<Option<f64>> {
        let Some(length) = captures.name("length") else {
            return Ok(None);
        };
        if length.as_str().is_empty() {
            return Ok(None);
        }
        length
            .as_str()
            .parse()
            .map(Some)
            .map_err(|_| self.error("unreadable branch length"))
    }

    fn peek(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected `{expected}`")))
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::NewickParse {
            position: self.position,
            message: message.into(),
        }
    }
}
