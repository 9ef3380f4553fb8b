//! Column names of the persisted tables and typed access to frame columns.
//!
//! Header lookups ignore case, surrounding whitespace and a leading byte-order mark, and
//! accept `state` wherever `region` is asked for, so the weather and energy exports can
//! be read without renaming their columns first.

use crate::table::error::TableError;
use crate::types::quality::Stage;
use polars::prelude::*;

pub const REGION: &str = "region";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DATE: &str = "date";
pub const CATEGORY: &str = "Category";
pub const VARIABLE: &str = "Variable";
pub const VALUE: &str = "Value";

const REGION_ALIASES: [&str; 2] = [REGION, "state"];

fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

fn header_matches(header: &str, wanted: &str) -> bool {
    let header = normalize_header(header);
    if wanted.eq_ignore_ascii_case(REGION) {
        REGION_ALIASES
            .iter()
            .any(|alias| header.eq_ignore_ascii_case(alias))
    } else {
        header.eq_ignore_ascii_case(wanted)
    }
}

pub(crate) fn find_column<'a>(frame: &'a DataFrame, name: &str) -> Option<&'a Column> {
    frame
        .get_columns()
        .iter()
        .find(|column| header_matches(column.name().as_str(), name))
}

pub(crate) fn has_column(frame: &DataFrame, name: &str) -> bool {
    find_column(frame, name).is_some()
}

pub(crate) fn require_column<'a>(
    frame: &'a DataFrame,
    stage: Stage,
    name: &str,
) -> Result<&'a Column, TableError> {
    find_column(frame, name).ok_or_else(|| TableError::MissingColumn {
        stage,
        column: name.to_string(),
    })
}

fn cast(
    column: &Column,
    stage: Stage,
    name: &str,
    dtype: &DataType,
    expected: &'static str,
) -> Result<Column, TableError> {
    column.cast(dtype).map_err(|source| TableError::ColumnType {
        stage,
        column: name.to_string(),
        expected,
        source,
    })
}

fn type_error<'a>(
    stage: Stage,
    name: &'a str,
    expected: &'static str,
) -> impl Fn(PolarsError) -> TableError + 'a {
    move |source| TableError::ColumnType {
        stage,
        column: name.to_string(),
        expected,
        source,
    }
}

fn column_floats(
    column: &Column,
    stage: Stage,
    name: &str,
) -> Result<Vec<Option<f64>>, TableError> {
    let cast = cast(column, stage, name, &DataType::Float64, "numbers")?;
    let values = cast.f64().map_err(type_error(stage, name, "numbers"))?;
    Ok(values
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite()))
        .collect())
}

/// A numeric column; unparseable cells and non-finite values come back as `None`.
pub(crate) fn float_values(
    frame: &DataFrame,
    stage: Stage,
    name: &str,
) -> Result<Vec<Option<f64>>, TableError> {
    column_floats(require_column(frame, stage, name)?, stage, name)
}

/// Like [`float_values`], but `None` when the column is absent.
pub(crate) fn optional_float_values(
    frame: &DataFrame,
    stage: Stage,
    name: &str,
) -> Result<Option<Vec<Option<f64>>>, TableError> {
    find_column(frame, name)
        .map(|column| column_floats(column, stage, name))
        .transpose()
}

pub(crate) fn int_values(
    frame: &DataFrame,
    stage: Stage,
    name: &str,
) -> Result<Vec<Option<i64>>, TableError> {
    // Through Float64 first so "2024.0" style cells still read as integers.
    let floats = float_values(frame, stage, name)?;
    Ok(floats
        .into_iter()
        .map(|v| v.filter(|v| v.fract() == 0.0).map(|v| v as i64))
        .collect())
}

/// A column as text. Numeric columns are rendered, so a `YYYYMMDD` date inferred as an
/// integer still reads back as its digits.
pub(crate) fn string_values(
    frame: &DataFrame,
    stage: Stage,
    name: &str,
) -> Result<Vec<Option<String>>, TableError> {
    let column = require_column(frame, stage, name)?;
    let cast = cast(column, stage, name, &DataType::String, "text")?;
    let values = cast.str().map_err(type_error(stage, name, "text"))?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}
