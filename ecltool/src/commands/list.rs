use anyhow::Result;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ecl_reader::ArrayEntry;

pub fn list_arrays(path: &Path) -> Result<()> {
    let file = super::open(path)?;
    let mut out = BufWriter::new(io::stdout().lock());
    write_listing(&mut out, file.entries())?;
    out.flush()?;
    Ok(())
}

fn write_listing<W: Write>(out: &mut W, entries: &[ArrayEntry]) -> io::Result<()> {
    for (i, e) in entries.iter().enumerate() {
        writeln!(
            out,
            "{:>6}  {:<8}  {}  {:>10}",
            i, e.name, e.element_type, e.element_count
        )?;
    }
    Ok(())
}
