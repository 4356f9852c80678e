use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};
use tracing::info;

use ecl_reader::EclArray;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpTarget {
    Index(usize),
    Name { name: String, occurrence: usize },
}

impl DumpTarget {
    /// Plain integers select by catalog index, anything else by name.
    pub fn parse(target: &str, occurrence: usize) -> Self {
        match target.parse::<usize>() {
            Ok(index) => DumpTarget::Index(index),
            Err(_) => DumpTarget::Name {
                name: target.to_string(),
                occurrence,
            },
        }
    }
}

pub fn dump_array(
    path: &Path,
    target: DumpTarget,
    limit: usize,
    out_path: Option<&Path>,
) -> Result<()> {
    let file = super::open(path)?;
    let array = match &target {
        DumpTarget::Index(index) => file.get(*index),
        DumpTarget::Name { name, occurrence } => file.get_occurrence(name, *occurrence),
    }
    .with_context(|| format!("read {target:?} from {}", path.display()))?;

    let mut out: Box<dyn Write> = match out_path {
        Some(p) => Box::new(io::BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(io::BufWriter::new(io::stdout())),
    };

    let written = write_values(&mut out, &array, limit)?;
    out.flush().context("flush output")?;
    info!(
        "done type={} values={} of {}",
        array.element_type(),
        written,
        array.len()
    );
    Ok(())
}

fn write_values<W: Write + ?Sized>(out: &mut W, array: &EclArray, limit: usize) -> io::Result<usize> {
    let n = if limit == 0 {
        array.len()
    } else {
        array.len().min(limit)
    };
    for i in 0..n {
        if let Some(v) = array.render(i) {
            writeln!(out, "{v}")?;
        }
    }
    Ok(n)
}
