use anyhow::Result;
use std::{
    collections::BTreeMap,
    io::{Read, Seek},
    path::Path,
};
use tracing::info;

use ecl_reader::EclFile;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TypeStat {
    pub arrays: u64,
    pub elements: u64,
    pub payload_bytes: u64,
}

#[derive(Default, Debug, Clone)]
pub struct FileReport {
    pub arrays: u64,
    pub empty_arrays: u64,
    pub distinct_names: u64,

    // data records as stored, markers included
    pub stored_bytes: u64,

    // type tag -> stats
    pub by_type: BTreeMap<String, TypeStat>,

    // name -> occurrences, only names seen more than once
    pub repeated: BTreeMap<String, u64>,
}

impl FileReport {
    pub fn payload_bytes(&self) -> u64 {
        self.by_type.values().map(|s| s.payload_bytes).sum()
    }
}

pub fn summarize<R: Read + Seek>(file: &EclFile<R>) -> FileReport {
    let mut rep = FileReport::default();
    let mut seen: BTreeMap<&str, u64> = BTreeMap::new();

    for e in file.entries() {
        rep.arrays += 1;
        if e.element_count == 0 {
            rep.empty_arrays += 1;
        }

        let stat = rep.by_type.entry(e.element_type.to_string()).or_default();
        stat.arrays += 1;
        stat.elements += e.element_count as u64;
        stat.payload_bytes += e.element_type.payload_len(e.element_count);

        rep.stored_bytes += e.end_offset - e.data_offset;
        *seen.entry(e.name.as_str()).or_default() += 1;
    }

    rep.distinct_names = seen.len() as u64;
    rep.repeated = seen
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    rep
}

pub fn summarize_file(path: &Path) -> Result<FileReport> {
    let file = super::open(path)?;
    let rep = summarize(&file);
    info!(
        "summary done arrays={} distinct_names={} payload_bytes={}",
        rep.arrays,
        rep.distinct_names,
        rep.payload_bytes()
    );
    Ok(rep)
}

pub fn print_summary(rep: &FileReport) {
    println!("arrays={}", rep.arrays);
    println!("empty_arrays={}", rep.empty_arrays);
    println!("distinct_names={}", rep.distinct_names);
    println!("payload_bytes_total={}", rep.payload_bytes());
    println!("stored_bytes_total={}", rep.stored_bytes);
    println!();

    let total = rep.payload_bytes() as f64;
    let pct = |x: u64| {
        if total > 0.0 {
            (x as f64) * 100.0 / total
        } else {
            0.0
        }
    };

    for (tag, s) in &rep.by_type {
        println!(
            "{:>8} {:>14} {:>14} {:>8.2}%  {}",
            s.arrays,
            s.elements,
            s.payload_bytes,
            pct(s.payload_bytes),
            tag
        );
    }

    if !rep.repeated.is_empty() {
        println!();
        println!("repeated names:");
        for (name, n) in &rep.repeated {
            println!("  {:>8}  {}", n, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecl_reader::{record::write_array, EclArray};
    use std::io::Cursor;

    #[test]
    fn test_summarize_counts() {
        let mut buf = Vec::new();
        write_array(&mut buf, "SEQNUM", &EclArray::Int32(vec![1])).unwrap();
        write_array(&mut buf, "PRESSURE", &EclArray::Float32(vec![1.0; 10])).unwrap();
        write_array(&mut buf, "SEQNUM", &EclArray::Int32(vec![2])).unwrap();
        write_array(&mut buf, "PRESSURE", &EclArray::Float32(vec![2.0; 10])).unwrap();
        write_array(&mut buf, "TRANNNC", &EclArray::Float64(Vec::new())).unwrap();
        let file = EclFile::from_reader(Cursor::new(buf)).unwrap();

        let rep = summarize(&file);
        assert_eq!(rep.arrays, 5);
        assert_eq!(rep.empty_arrays, 1);
        assert_eq!(rep.distinct_names, 3);
        assert_eq!(
            rep.by_type["REAL"],
            TypeStat {
                arrays: 2,
                elements: 20,
                payload_bytes: 80
            }
        );
        assert_eq!(rep.by_type["INTE"].payload_bytes, 8);
        assert_eq!(rep.by_type["DOUB"].arrays, 1);
        assert_eq!(rep.payload_bytes(), 88);
        // 88 payload bytes plus 8 marker bytes for each of the 4 data records
        assert_eq!(rep.stored_bytes, 120);
        assert_eq!(rep.repeated.get("PRESSURE"), Some(&2));
        assert!(!rep.repeated.contains_key("TRANNNC"));
    }
}
