use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use super::Vertex;
use crate::error::{Error, Result};

/// Reads one vertex per non-blank line, each given as `x1 y1 x2 y2`.
///
/// The reader is lazy: lines are parsed as the iterator advances and the
/// first malformed line is reported as an [`Error::Parse`].
pub struct VertexReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> VertexReader<R> {
    pub fn new(reader: R) -> Self {
        VertexReader {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl VertexReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(VertexReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for VertexReader<R> {
    type Item = Result<Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line += 1;

            let content = line.trim();
            if !content.is_empty() {
                return Some(parse_line(self.line, content));
            }
        }
    }
}

fn parse_line(line: usize, content: &str) -> Result<Vertex> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(Error::parse(
            line,
            content,
            format!("expected 4 fields, found {}", fields.len()),
        ));
    }

    let mut coords = [0.0; 4];
    for (coord, field) in coords.iter_mut().zip(&fields) {
        *coord = field
            .parse::<f64>()
            .map_err(|err| Error::parse(line, content, format!("{:?}: {}", field, err)))?;
        if !coord.is_finite() {
            return Err(Error::parse(
                line,
                content,
                format!("{:?}: non-finite coordinate", field),
            ));
        }
    }
    Ok(Vertex::new(coords[0], coords[1], coords[2], coords[3]))
}

impl Vertex {
    /// Lazily reads the vertices stored in `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<VertexReader<BufReader<File>>> {
        VertexReader::open(path)
    }
}

/// Reads every vertex in `path`. An empty source is an error.
pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<Vertex>> {
    let vertices = Vertex::read(path)?.collect::<Result<Vec<Vertex>>>()?;
    if vertices.is_empty() {
        return Err(Error::EmptyInput);
    }
    log::info!("Read {} vertices.", vertices.len());
    Ok(vertices)
}
