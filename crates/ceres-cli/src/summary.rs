use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use ceres_common::any_to_string;

use crate::types::{EnrichResult, EventizeResult};

pub fn print_enrich_summary(result: &EnrichResult) {
    println!("Input: {}", result.input.display());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    table.add_row(vec![
        dim_cell("read"),
        dim_cell("-"),
        Cell::new(result.rows_in),
        dim_cell("-"),
    ]);
    for step in &result.steps {
        table.add_row(vec![
            Cell::new(&step.step),
            Cell::new(step.rows_in),
            rows_out_cell(step.rows_in, step.rows_out),
            Cell::new(step.columns),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows_in).add_attribute(Attribute::Bold),
        Cell::new(result.table.height()).add_attribute(Attribute::Bold),
        Cell::new(result.table.width()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_preview(&result.table, result.preview);
}

pub fn print_eventize_summary(result: &EventizeResult) {
    println!("Items: {}", result.items);
    println!("Events: {}", result.table.height());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    print_preview(&result.table, result.preview);
}

/// Print the first `rows` rows of `df`, rendering cells the way they
/// are compared by the enrichments.
pub fn print_preview(df: &DataFrame, rows: usize) {
    if rows == 0 || df.width() == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let shown = rows.min(df.height());
    for idx in 0..shown {
        let row = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx) {
                Ok(AnyValue::Null) | Err(_) => dim_cell("null"),
                Ok(value) => Cell::new(any_to_string(value)),
            })
            .collect::<Vec<_>>();
        table.add_row(row);
    }
    println!();
    println!("Preview ({shown} of {} rows):", df.height());
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn rows_out_cell(rows_in: usize, rows_out: usize) -> Cell {
    if rows_out > rows_in {
        Cell::new(rows_out).fg(Color::Green)
    } else if rows_out < rows_in {
        Cell::new(rows_out).fg(Color::Yellow)
    } else {
        Cell::new(rows_out)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
