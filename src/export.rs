//! Export module - CSV serialisation of simulation results
//!
//! Format: header `Time,Before_PID,After_PID,Control_Signal`, then one row per
//! sample with time at 4 decimals and the other columns at 6 decimals (ties
//! rounded half up), each row terminated by `\n`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{Result, SimError};
use crate::simulation::SimulationResult;

pub const HEADER: [&str; 4] = ["Time", "Before_PID", "After_PID", "Control_Signal"];

pub fn write_csv<W: Write>(result: &SimulationResult, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let rows = result
        .time()
        .iter()
        .zip(result.output_before())
        .zip(result.output_after())
        .zip(result.control_signal());
    for (((t, before), after), control) in rows {
        wtr.write_record([
            fixed(*t, 4),
            fixed(*before, 6),
            fixed(*after, 6),
            fixed(*control, 6),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed-point text of `value` with `places` decimals. Rounds the shortest
/// decimal representation half away from zero, so `0.0078125` becomes
/// `0.007813` rather than the half-to-even `0.007812`.
pub fn fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let shortest = value.abs().to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let round_up = frac_part.len() > places && frac_part.as_bytes()[places] >= b'5';
    let mut digits: Vec<u8> = int_part.bytes().collect();
    digits.extend(frac_part.bytes().take(places));
    digits.resize(int_part.len() + places, b'0');

    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    for (i, d) in digits.into_iter().enumerate() {
        if i == split {
            out.push('.');
        }
        out.push(char::from(d));
    }
    out
}

pub fn to_csv_string(result: &SimulationResult) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(result, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_csv(result: &SimulationResult, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(result, BufWriter::new(file))?;
    info!("Exported {} samples to {}", result.len(), path.display());
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> Result<SimulationResult> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?;
    if headers.iter().ne(HEADER) {
        return Err(SimError::CsvFormat {
            line: 1,
            message: format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()),
        });
    }

    let mut columns: [Vec<f64>; 4] = Default::default();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            let value = field.trim().parse::<f64>().map_err(|e| SimError::CsvFormat {
                line,
                message: format!("{field:?}: {e}"),
            })?;
            column.push(value);
        }
    }

    let [time, before, after, control] = columns;
    SimulationResult::from_columns(time, before, after, control)
}

pub fn import_csv(path: &Path) -> Result<SimulationResult> {
    read_csv(BufReader::new(File::open(path)?))
}
