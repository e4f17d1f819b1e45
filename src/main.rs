//! # Folio CLI
//!
//! Usage:
//!   folio report.json -o pages.json
//!   echo '{ ... }' | folio --fit-to-page
//!   folio --example > report.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use folio::error::LayoutError;
use folio::font::TrueTypeMetrics;
use folio::model::Report;

/// Paginate a report and print the laid-out pages as JSON.
#[derive(Debug, Parser)]
#[command(name = "folio", about, version)]
struct Cli {
    /// Report JSON. Read from stdin when omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Where to write the pages. Default: stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Scale pages whose content overflows the page
    #[arg(long)]
    fit_to_page: bool,

    /// Only explicit page breaks end a page
    #[arg(long)]
    pagination_only: bool,

    /// TrueType font used to measure text instead of the built-in metrics
    #[arg(long, value_name = "TTF")]
    font: Option<PathBuf>,

    /// Print an example report and exit
    #[arg(long)]
    example: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.example {
        print!("{}", example_report_json());
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), LayoutError> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut report: Report = serde_json::from_str(&input)?;
    report.options.fit_to_page |= cli.fit_to_page;
    report.options.pagination_only |= cli.pagination_only;

    let rendered = match &cli.font {
        Some(path) => {
            let data = fs::read(path)?;
            match TrueTypeMetrics::from_font_data(&data) {
                Some(metrics) => folio::render_with(&report, &metrics)?,
                None => {
                    warn!("{} is not a usable TrueType font, using built-in metrics", path.display());
                    folio::render(&report)?
                }
            }
        }
        None => folio::render(&report)?,
    };

    let json = serde_json::to_string_pretty(&rendered)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, &json)?;
            info!("wrote {} pages to {}", rendered.summary.pages_emitted, path.display());
            eprintln!("✓ {} pages written to {}", rendered.summary.pages_emitted, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn example_report_json() -> &'static str {
    r##"{
  "options": { "fitToPage": false },
  "masterPage": {
    "name": "report",
    "margin": {
      "top": { "points": 36 },
      "right": { "points": 36 },
      "bottom": { "points": 36 },
      "left": { "points": 36 }
    },
    "headerHeight": { "points": 24 },
    "footerHeight": { "points": 18 },
    "header": {
      "kind": { "type": "Text", "text": "Quarterly Sales", "font": { "size": 14, "bold": true } }
    },
    "footer": {
      "kind": {
        "type": "Block",
        "children": [
          { "kind": { "type": "AutoText", "kind": "PageNumber", "pattern": "'Page '0" } },
          { "id": "total", "kind": { "type": "AutoText", "kind": "TotalPage", "pattern": "'of '0" } }
        ]
      }
    },
    "variant": { "type": "Simple", "showHeaderOnFirst": true, "showFooterOnLast": true }
  },
  "body": [
    { "kind": { "type": "Text", "text": "Summary", "font": { "size": 18, "bold": true } } },
    {
      "kind": {
        "type": "Table",
        "columns": [{ "percent": 50 }, { "percent": 25 }, { "percent": 25 }],
        "header": {
          "cells": [
            { "kind": { "type": "Text", "text": "Region", "font": { "bold": true } } },
            { "kind": { "type": "Text", "text": "Units", "font": { "bold": true } } },
            { "kind": { "type": "Text", "text": "Revenue", "font": { "bold": true } } }
          ]
        },
        "rows": [
          {
            "cells": [
              { "kind": { "type": "Text", "text": "North" } },
              { "kind": { "type": "Text", "text": "1,204" } },
              { "kind": { "type": "Text", "text": "48,160" } }
            ]
          },
          {
            "cells": [
              { "kind": { "type": "Text", "text": "South" } },
              { "kind": { "type": "Text", "text": "980" } },
              { "kind": { "type": "Text", "text": "39,200" } }
            ]
          }
        ]
      }
    },
    { "kind": { "type": "PageBreak" } },
    { "kind": { "type": "Box", "width": { "percent": 100 }, "height": { "points": 240 } } }
  ]
}
"##
}
