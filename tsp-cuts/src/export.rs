//! Export of a vertex table as a C++ header, for native consumers that embed
//! the coordinates at compile time.

use std::io::Write;

use crate::{error::Result, vertex::Space, vertex::Vertex};

/// Writes `vertices` as a `constexpr` array named `DEFAULT_VERTICES`. Entries
/// are numbered from 1 in the given order.
pub fn write_vertex_table<W: Write>(vertices: &[Vertex], mut out: W) -> Result<()> {
    writeln!(out, "/* AUTO GENERATED */")?;
    writeln!(out, "#pragma once")?;
    writeln!(out, "#include <array>")?;
    writeln!(out, "#include <cstdlib>")?;
    writeln!(out, "#include \"vertex.hpp\"")?;
    writeln!(out)?;
    writeln!(
        out,
        "static const constexpr std::array<vertex, {}> DEFAULT_VERTICES = {{",
        vertices.len()
    )?;
    for (idx, vertex) in vertices.iter().enumerate() {
        let a = vertex.point(Space::A);
        let b = vertex.point(Space::B);
        writeln!(
            out,
            "    vertex::with_id({}, {:?}, {:?}, {:?}, {:?}),",
            idx + 1,
            a.x,
            a.y,
            b.x,
            b.y
        )?;
    }
    writeln!(out, "}};")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod test_export {
    use super::*;

    #[test]
    fn test_vertex_table() {
        let vertices = vec![
            Vertex::new(0.0, 1.5, 2.0, 3.0),
            Vertex::new(-4.0, 5.0, 6.25, 7.0),
        ];
        let mut out = vec![];
        write_vertex_table(&vertices, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "/* AUTO GENERATED */");
        assert_eq!(
            lines[6],
            "static const constexpr std::array<vertex, 2> DEFAULT_VERTICES = {"
        );
        assert_eq!(lines[7], "    vertex::with_id(1, 0.0, 1.5, 2.0, 3.0),");
        assert_eq!(lines[8], "    vertex::with_id(2, -4.0, 5.0, 6.25, 7.0),");
        assert_eq!(lines[9], "};");
        assert_eq!(lines.len(), 10);
    }
}
