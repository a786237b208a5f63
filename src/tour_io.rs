use std::{
    error::Error,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tsp_cuts::Tour;

/// Writes the vertex ids of `tour`, one per line, in tour order.
pub fn export_tour(filename: &Path, tour: &Tour) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    for vertex in tour {
        writeln!(writer, "{}", vertex.id())?;
    }
    writer.flush()?;

    Ok(())
}
