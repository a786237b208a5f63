use std::{
    error::Error,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tsp_cuts::{vertex::Space, Vertex};

/// Writes `vertices` in the input format read by `read_all`: `<x1> <y1> <x2> <y2>` per line.
pub fn write_points(filename: &Path, vertices: &[Vertex]) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    for vertex in vertices {
        let a = vertex.point(Space::A);
        let b = vertex.point(Space::B);
        writeln!(writer, "{} {} {} {}", a.x, a.y, b.x, b.y)?;
    }
    writer.flush()?;

    Ok(())
}
