// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Readers for the plain-text node, edge and point-of-interest files.
//!
//! Every file starts with a line containing the number of records, followed by one
//! record per line, with fields separated by whitespace:
//!
//! - nodes: `id latitude longitude`
//! - edges: `from to weight` - any further columns (like length or speed limit) are ignored
//! - points of interest: `id category` - any further columns (like a name) are ignored
//!
//! Files with a `.gz` or `.bz2` extension are transparently decompressed.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::{Edge, Graph, GraphError, Node, NodeId, Weight};

/// Upper limit on the number of records pre-allocated based on the header alone.
const MAX_PREALLOCATED_RECORDS: usize = 1 << 20;

/// Error which can occur when loading node, edge or point-of-interest files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("missing record count on the first line")]
    MissingHeader,

    #[error("expected {expected} records, but the file ended after {found}")]
    UnexpectedEof { expected: usize, found: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    InvalidReference {
        line: usize,
        #[source]
        source: GraphError,
    },

    #[error("graph: {0}")]
    Graph(#[from] GraphError),
}

fn parse_field<T>(field: &str, line: usize) -> Result<T, LoadError>
where
    T: FromStr,
    T::Err: Display,
{
    field.parse().map_err(|e| LoadError::Parse {
        line,
        message: format!("{:?}: {}", field, e),
    })
}

/// Reads the record count header, and then passes the first `fields` columns
/// of every record line to `parse`, together with the line number.
fn read_records<R, T, F>(reader: R, fields: usize, mut parse: F) -> Result<Vec<T>, LoadError>
where
    R: io::Read,
    F: FnMut(&[&str], usize) -> Result<T, LoadError>,
{
    let mut lines = BufReader::new(reader).lines();

    let header = lines.next().ok_or(LoadError::MissingHeader)??;
    let header = header.trim();
    if header.is_empty() {
        return Err(LoadError::MissingHeader);
    }
    let expected: usize = parse_field(header, 1)?;

    let mut records = Vec::with_capacity(expected.min(MAX_PREALLOCATED_RECORDS));
    let mut line_no = 1;

    while records.len() < expected {
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(LoadError::UnexpectedEof {
                    expected,
                    found: records.len(),
                })
            }
        };
        line_no += 1;

        let columns: Vec<&str> = line.split_whitespace().take(fields).collect();
        if columns.is_empty() {
            continue;
        } else if columns.len() < fields {
            return Err(LoadError::Parse {
                line: line_no,
                message: format!("expected {} fields, got {}", fields, columns.len()),
            });
        }

        records.push(parse(&columns, line_no)?);
    }

    Ok(records)
}

/// Opens a file for reading, decompressing it if its name ends with `.gz` or `.bz2`.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn io::Read>, LoadError> {
    let path = path.as_ref();
    let f = File::open(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Ok(Box::new(flate2::read::MultiGzDecoder::new(f))),
        Some("bz2") => Ok(Box::new(bzip2::read::MultiBzDecoder::new(f))),
        _ => Ok(Box::new(f)),
    }
}

/// Parses [Nodes](Node) from a node file.
pub fn load_nodes<R: io::Read>(reader: R) -> Result<Vec<Node>, LoadError> {
    read_records(reader, 3, |fields, line| {
        Ok(Node::new(
            parse_field(fields[0], line)?,
            parse_field(fields[1], line)?,
            parse_field(fields[2], line)?,
        ))
    })
}

/// Parses [Edges](Edge) from an edge file.
pub fn load_edges<R: io::Read>(reader: R) -> Result<Vec<Edge>, LoadError> {
    read_records(reader, 3, |fields, line| {
        Ok(Edge {
            from: parse_field(fields[0], line)?,
            to: parse_field(fields[1], line)?,
            weight: parse_field::<Weight>(fields[2], line)?,
        })
    })
}

/// Sets point-of-interest categories of [Graph] nodes, as listed in a point-of-interest file.
///
/// Returns the number of updated nodes.
pub fn apply_pois<R: io::Read>(g: &mut Graph, reader: R) -> Result<usize, LoadError> {
    let pois = read_records(reader, 2, |fields, line| {
        let id: NodeId = parse_field(fields[0], line)?;
        let category: u32 = parse_field(fields[1], line)?;
        Ok((id, category, line))
    })?;

    for &(id, category, line) in &pois {
        g.set_category(id, category)
            .map_err(|source| LoadError::InvalidReference { line, source })?;
    }

    Ok(pois.len())
}

/// Parses [Nodes](Node) from a node file at the provided path.
pub fn load_nodes_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Node>, LoadError> {
    load_nodes(open(path)?)
}

/// Parses [Edges](Edge) from an edge file at the provided path.
pub fn load_edges_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>, LoadError> {
    load_edges(open(path)?)
}

/// Sets point-of-interest categories from a file at the provided path.
pub fn apply_pois_from_file<P: AsRef<Path>>(g: &mut Graph, path: P) -> Result<usize, LoadError> {
    let updated = apply_pois(g, open(path.as_ref())?)?;
    info!(
        "loaded {} points of interest from {}",
        updated,
        path.as_ref().display()
    );
    Ok(updated)
}
