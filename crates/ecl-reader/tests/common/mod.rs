#![allow(dead_code)]

use std::io::{BufWriter, Write};

use ecl_reader::{record::write_array, EclArray};
use tempfile::NamedTempFile;

pub const FT3_TO_BBL: f64 = 0.1781076;

pub const SPE9_NAMES: [&str; 24] = [
    "INTEHEAD", "LOGIHEAD", "DOUBHEAD", "PORV", "DEPTH", "DX", "DY", "DZ", "PORO", "PERMX",
    "PERMY", "PERMZ", "NTG", "TRANX", "TRANY", "TRANZ", "TABDIMS", "TAB", "ACTNUM", "EQLNUM",
    "FIPNUM", "PVTNUM", "SATNUM", "TRANNNC",
];

pub const REF_TABDIMS: [i32; 30] = [
    885, 1, 1, 1, 1, 1, 1, 67, 11, 2, 1, 78, 1, 78, 78, 0, 0, 0, 83, 1, 686, 40, 1, 86, 40, 1,
    286, 1, 80, 1,
];

pub const REF_TAB: [f64; 27] = [
    0.147E+02, 0.2E+21, 0.4E+03, 0.2E+21, 0.8E+03, 0.2E+21, 0.12E+04, 0.2E+21, 0.16E+04,
    0.2E+21, 0.2E+04, 0.2E+21, 0.24E+04, 0.2E+21, 0.28E+04, 0.2E+21, 0.32E+04, 0.2E+21,
    0.36E+04, 0.2E+21, 0.4E+04, 0.5E+04, 0.1E+01, 0.2E+21, 0.98814229249012E+00, 0.2E+21,
    0.97513408093613E+00,
];

const DZ: [f64; 15] = [
    20.0, 15.0, 26.0, 15.0, 16.0, 14.0, 8.0, 8.0, 18.0, 12.0, 19.0, 18.0, 20.0, 50.0, 100.0,
];

const PORO: [f64; 15] = [
    0.087, 0.097, 0.111, 0.16, 0.13, 0.17, 0.17, 0.08, 0.14, 0.13, 0.12, 0.105, 0.12, 0.116,
    0.157,
];

/// Pore volume in barrels for the 15 x 600 cell SPE9 grid.
pub fn reference_porv() -> Vec<f64> {
    reference_porv_ft3().into_iter().map(|v| v * FT3_TO_BBL).collect()
}

pub fn reference_porv_ft3() -> Vec<f64> {
    DZ.iter()
        .zip(PORO.iter())
        .flat_map(|(dz, poro)| std::iter::repeat(300.0 * 300.0 * dz * poro).take(600))
        .collect()
}

pub fn strings(values: &[&str]) -> EclArray {
    EclArray::FixedString {
        width: 8,
        values: values.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn write_arrays<W: Write>(w: &mut W, arrays: &[(&str, EclArray)]) {
    for (name, array) in arrays {
        write_array(w, name, array).unwrap();
    }
}

pub fn to_bytes(arrays: &[(&str, EclArray)]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_arrays(&mut buf, arrays);
    buf
}

pub fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(bytes).unwrap();
    f.flush().unwrap();
    f
}

pub fn write_temp(arrays: &[(&str, EclArray)]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    {
        let mut w = BufWriter::new(f.as_file_mut());
        write_arrays(&mut w, arrays);
        w.flush().unwrap();
    }
    f
}

fn grid_f32(v: f32) -> EclArray {
    EclArray::Float32(vec![v; 9000])
}

fn grid_i32(v: i32) -> EclArray {
    EclArray::Int32(vec![v; 9000])
}

/// INIT file with the SPE9 catalog.
pub fn spe9_init() -> Vec<(&'static str, EclArray)> {
    let mut logihead = vec![false; 121];
    for i in [0, 3, 8, 14, 120] {
        logihead[i] = true;
    }

    let mut tab = vec![0.2e21; 885];
    tab[..REF_TAB.len()].copy_from_slice(&REF_TAB);

    let porv = reference_porv().into_iter().map(|v| v as f32).collect();

    vec![
        ("INTEHEAD", EclArray::Int32((0..95).collect())),
        ("LOGIHEAD", EclArray::Bool(logihead)),
        ("DOUBHEAD", EclArray::Float64((0..229).map(f64::from).collect())),
        ("PORV", EclArray::Float32(porv)),
        ("DEPTH", grid_f32(9000.0)),
        ("DX", grid_f32(300.0)),
        ("DY", grid_f32(300.0)),
        ("DZ", grid_f32(20.0)),
        ("PORO", grid_f32(0.087)),
        ("PERMX", grid_f32(108.0)),
        ("PERMY", grid_f32(108.0)),
        ("PERMZ", grid_f32(10.8)),
        ("NTG", grid_f32(1.0)),
        ("TRANX", grid_f32(12.5)),
        ("TRANY", grid_f32(12.5)),
        ("TRANZ", grid_f32(1.25)),
        ("TABDIMS", EclArray::Int32(REF_TABDIMS.to_vec())),
        ("TAB", EclArray::Float64(tab)),
        ("ACTNUM", grid_i32(1)),
        ("EQLNUM", grid_i32(1)),
        ("FIPNUM", grid_i32(1)),
        ("PVTNUM", grid_i32(1)),
        ("SATNUM", grid_i32(1)),
        ("TRANNNC", EclArray::Float32(Vec::new())),
    ]
}

/// SMSPEC file whose KEYWORDS array spans three data records.
pub fn smspec() -> Vec<(&'static str, EclArray)> {
    let mut keywords: Vec<String> = (0..312).map(|i| format!("WBHP{i}")).collect();
    keywords[0] = "TIME".to_string();
    keywords[16] = "FWCT".to_string();

    vec![
        ("INTEHEAD", EclArray::Int32(vec![1, 100])),
        ("DIMENS", EclArray::Int32(vec![312, 24, 25, 15, 0, -1])),
        (
            "KEYWORDS",
            EclArray::FixedString {
                width: 8,
                values: keywords,
            },
        ),
        ("NUMS", EclArray::Int32((0..312).collect())),
    ]
}
