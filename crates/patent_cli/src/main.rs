//! Command-line interface for patent attribute extraction.
//!
//! Usage:
//!   patent-extract `<xml_file>` [--path `<selector>`] [--fields `<f1,f2,...>`]
//!                  [--format text|json] [--fail-empty] [--log-file]
//!
//! Reads a (possibly malformed) patent XML file, repairs it, and prints
//! the selected field values in priority order.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use patent_engine::{
    require_non_empty, ExtractionRequest, PatentExtractor, ProjectionTable, ResultProjection,
};
use pipeline_logging::LogDestination;

const RULE_WIDTH: usize = 50;

fn main() -> ExitCode {
    let matches = Command::new("patent-extract")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract attributes from patent XML documents in priority order")
        .arg(
            Arg::new("xml_file")
                .help("Path to the XML file to process")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .short('p')
                .help("Selector for the elements to extract from")
                .default_value("document-id"),
        )
        .arg(
            Arg::new("fields")
                .long("fields")
                .short('f')
                .value_delimiter(',')
                .num_args(1..)
                .default_value("doc-number")
                .help("Fields to extract (attributes or child elements)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("fail-empty")
                .long("fail-empty")
                .action(ArgAction::SetTrue)
                .help("Exit with an error when the selector matches nothing"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .action(ArgAction::SetTrue)
                .help("Also write logs to ./patent-extract.log"),
        )
        .get_matches();

    let destination = if matches.get_flag("log-file") {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    pipeline_logging::initialize(destination, Path::new("./patent-extract.log"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let file = matches
        .get_one::<String>("xml_file")
        .expect("xml_file is required");
    let xml = fs::read_to_string(file).map_err(|e| format!("cannot read '{file}': {e}"))?;

    let request = ExtractionRequest {
        path: matches
            .get_one::<String>("path")
            .expect("path has a default")
            .clone(),
        fields: matches
            .get_many::<String>("fields")
            .expect("fields has a default")
            .cloned()
            .collect(),
        ..ExtractionRequest::default()
    };
    debug!("extracting {:?} from {file}", request.fields);

    let extractor = PatentExtractor::new(&xml);
    let mut projection = extractor.extract(&request).map_err(|e| e.to_string())?;
    if matches.get_flag("fail-empty") {
        projection = require_non_empty(projection).map_err(|e| e.to_string())?;
    }

    match matches
        .get_one::<String>("format")
        .expect("format has a default")
        .as_str()
    {
        "json" => print_json(&projection),
        _ => print_text(&projection),
    }
    Ok(())
}

fn print_json(projection: &ResultProjection) {
    let payload = match projection {
        ResultProjection::Values(values) => serde_json::json!({ "values": values }),
        ResultProjection::Table(table) => serde_json::json!({
            "columns": table.columns,
            "rows": table.rows,
        }),
    };
    println!("{payload}");
}

fn print_text(projection: &ResultProjection) {
    let rule = "=".repeat(RULE_WIDTH);
    println!();
    println!("Extracted attributes (in priority order):");
    println!("{rule}");
    match projection {
        ResultProjection::Values(values) => {
            for (i, value) in values.iter().enumerate() {
                println!("{}. {value}", i + 1);
            }
            println!("{rule}");
            println!("Total: {} values extracted", values.len());
        }
        ResultProjection::Table(table) => {
            print_table(table);
            println!("{rule}");
            println!("Total: {} rows extracted", table.rows.len());
        }
    }
}

fn print_table(table: &ProjectionTable) {
    let mut widths: Vec<usize> = table.columns.iter().map(String::len).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(name, width)| format!("{name:width$}"))
        .collect();
    println!("{}", header.join("  ").trim_end());

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}
