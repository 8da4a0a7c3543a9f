//! Exports real-valued arrays, such as intensities and phase screens, to file.
//!
//! Two formats are written:
//! * CSV, one record per grid row.
//! * Binary: the row count and column count as little-endian `u64`, followed by the
//!   samples as little-endian `f64` in row-major order.

use crate::dataset::Dataset;
use crate::error::{BeamError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use nalgebra::DMatrix;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

type Endianness = LittleEndian;

/// Writes `matrix` as CSV, one record per row.
pub fn write_csv_to<W: Write>(writer: W, matrix: &DMatrix<f64>) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in matrix.row_iter() {
        wtr.serialize(row.iter().collect::<Vec<_>>())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `matrix` to a CSV file at `path`, replacing any existing file.
pub fn write_csv<P: AsRef<Path>>(path: P, matrix: &DMatrix<f64>) -> Result<()> {
    debug!(path = %path.as_ref().display(), shape = ?matrix.shape(), "writing csv");
    write_csv_to(BufWriter::new(File::create(path)?), matrix)
}

/// Reads a matrix written by [write_csv].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DMatrix<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(BufReader::new(File::open(path)?));
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for record in rdr.deserialize::<Vec<f64>>() {
        rows.push(record?);
    }
    let columns = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != columns) {
        return Err(BeamError::InvalidParameters(
            "csv rows have different lengths".to_string(),
        ));
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        columns,
        rows.into_iter().flatten(),
    ))
}

/// Writes `matrix` in the binary format.
pub fn write_binary<W: Write>(writer: &mut W, matrix: &DMatrix<f64>) -> Result<()> {
    let (rows, columns) = matrix.shape();
    writer.write_u64::<Endianness>(rows as u64)?;
    writer.write_u64::<Endianness>(columns as u64)?;
    for row in matrix.row_iter() {
        for &value in row.iter() {
            writer.write_f64::<Endianness>(value)?;
        }
    }
    Ok(())
}

/// Reads a matrix in the binary format.
pub fn read_binary<R: Read>(reader: &mut R) -> Result<DMatrix<f64>> {
    let rows = reader.read_u64::<Endianness>()? as usize;
    let columns = reader.read_u64::<Endianness>()? as usize;
    let count = rows.checked_mul(columns).ok_or_else(|| {
        BeamError::InvalidParameters(format!(
            "binary header shape {}x{} is too large",
            rows, columns
        ))
    })?;
    let mut values = Vec::with_capacity(count.min(1 << 20));
    for _ in 0..count {
        values.push(reader.read_f64::<Endianness>()?);
    }
    Ok(DMatrix::from_row_slice(rows, columns, &values))
}

#[derive(Serialize)]
struct IndexRecord<'a> {
    file: String,
    family: &'a str,
    order: &'a str,
    cn2: f64,
    class_index: usize,
}

/// Writes every sample of `dataset` to `directory` as a binary file, along with
/// `index.csv` listing each file's labels.
pub fn write_dataset<P: AsRef<Path>>(directory: P, dataset: &Dataset) -> Result<()> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    let mut index = csv::Writer::from_writer(BufWriter::new(File::create(
        directory.join("index.csv"),
    )?));
    for (i, sample) in dataset.samples.iter().enumerate() {
        let file = format!("sample_{:06}.bin", i);
        let mut writer = BufWriter::new(File::create(directory.join(&file))?);
        write_binary(&mut writer, &sample.intensity)?;
        writer.flush()?;
        index.serialize(IndexRecord {
            file,
            family: &sample.family,
            order: &sample.order_label,
            cn2: sample.cn2,
            class_index: sample.class_index,
        })?;
    }
    index.flush()?;
    debug!(
        directory = %directory.display(),
        samples = dataset.len(),
        "dataset written"
    );
    Ok(())
}
