use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::dataframe::{format_float, Column, DataFrame};
use crate::na::NA;
use crate::series::Series;

/// Cells that read as missing: the empty string and the literal "NA".
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell == "NA"
}

/// Read a DataFrame from a CSV file
///
/// The header row defines the column names. A column whose every non-missing
/// cell parses as a number becomes `Float64`; any other column becomes `Str`.
/// Empty cells and the literal `NA` are read as missing in both cases.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(Error::Csv)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Collect cell text per column, preserving row order
    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result.map_err(Error::Csv)?;
        for (i, column) in raw_columns.iter_mut().enumerate() {
            // A short row reads as missing cells on the right
            column.push(record.get(i).unwrap_or("").to_string());
        }
    }

    let mut df = DataFrame::new();
    for (header, cells) in headers.into_iter().zip(raw_columns) {
        let column = infer_column(&header, cells);
        df.add_column(header, column)?;
    }

    Ok(df)
}

/// Decide the column type from its cell text and build the column.
fn infer_column(name: &str, cells: Vec<String>) -> Column {
    let numeric = cells
        .iter()
        .filter(|c| !is_missing(c))
        .all(|c| c.parse::<f64>().is_ok());
    let has_values = cells.iter().any(|c| !is_missing(c));

    if numeric && has_values {
        let values: Vec<NA<f64>> = cells
            .iter()
            .map(|c| {
                if is_missing(c) {
                    NA::NA
                } else {
                    // Guarded by the all-parse check above
                    NA::Value(c.parse::<f64>().unwrap())
                }
            })
            .collect();
        Column::Float64(Series::new(values, Some(name.to_string())))
    } else {
        let values: Vec<NA<String>> = cells
            .into_iter()
            .map(|c| if is_missing(&c) { NA::NA } else { NA::Value(c) })
            .collect();
        Column::Str(Series::new(values, Some(name.to_string())))
    }
}

/// Write a DataFrame to a CSV file
///
/// Missing entries are written as empty cells.
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    let column_names = df.column_names();
    wtr.write_record(&column_names).map_err(Error::Csv)?;

    let rendered: Vec<Vec<String>> = column_names
        .iter()
        .map(|name| df.column(name).map(|c| c.to_display_strings()))
        .collect::<Result<_>>()?;

    for i in 0..df.row_count() {
        let row: Vec<&str> = rendered.iter().map(|col| col[i].as_str()).collect();
        wtr.write_record(&row).map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}

/// Write a submission file with exactly two columns: `Id` and the target.
///
/// One row per prediction, in input order. Fails with
/// `InconsistentRowCount` if the ids and predictions differ in length.
pub fn write_submission<P: AsRef<Path>>(
    ids: &[String],
    predictions: &[f64],
    target_name: &str,
    path: P,
) -> Result<()> {
    if ids.len() != predictions.len() {
        return Err(Error::InconsistentRowCount {
            expected: ids.len(),
            found: predictions.len(),
        });
    }

    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(["Id", target_name]).map_err(Error::Csv)?;
    for (id, prediction) in ids.iter().zip(predictions.iter()) {
        let rendered = format_float(*prediction);
        wtr.write_record([id.as_str(), rendered.as_str()])
            .map_err(Error::Csv)?;
    }

    wtr.flush().map_err(Error::Io)?;
    Ok(())
}
