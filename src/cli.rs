use crate::dispatch::{Plan, Request};
use crate::logging::LogFormat;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Two-letter short flags clap cannot express, rewritten to their long form.
const MULTI_CHAR_SHORTS: &[(&str, &str)] = &[("-bp", "--boxplot"), ("-hg", "--histogram")];

#[derive(Parser, Debug)]
#[command(
    name = "vizzy",
    author,
    version,
    about = "Vizzy - A command-line tool for data visualization.",
    long_about = None
)]
pub struct Cli {
    /// Path to the CSV file
    #[arg(short = 'p', long = "path", required = true)]
    pub path: PathBuf,

    /// Display data as a table
    #[arg(short = 't', long = "table")]
    pub table: bool,

    /// Display a summary of numeric columns (mean, median, min, max, std dev)
    #[arg(short = 's', long = "summary")]
    pub summary: bool,

    /// Draw boxplots for comma-separated columns (alias: -bp)
    #[arg(long = "boxplot", value_name = "COLUMNS", value_delimiter = ',')]
    pub boxplot: Option<Vec<String>>,

    /// Draw 20-bin histograms for comma-separated columns (alias: -hg)
    #[arg(long = "histogram", value_name = "COLUMNS", value_delimiter = ',')]
    pub histogram: Option<Vec<String>>,

    /// Field delimiter of the data file
    #[arg(short = 'd', long = "delimiter", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Format of diagnostics written to stderr
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

impl From<Cli> for Plan {
    fn from(cli: Cli) -> Self {
        let mut requests = Vec::new();
        if cli.table {
            requests.push(Request::Table);
        }
        if cli.summary {
            requests.push(Request::Summary);
        }
        if let Some(columns) = cli.boxplot {
            requests.push(Request::Boxplot(columns));
        }
        if let Some(columns) = cli.histogram {
            requests.push(Request::Histogram(columns));
        }
        Plan::new(cli.path, cli.delimiter, requests)
    }
}

/// Rewrites `-bp` / `-hg` (and their `=value` forms) to the long flags so
/// clap does not read them as bundled single-letter shorts. Arguments after
/// `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            for (short, long) in MULTI_CHAR_SHORTS {
                if text == *short {
                    return OsString::from(*long);
                }
                if let Some(value) = text
                    .strip_prefix(short)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match raw.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got `{raw}`"
            )),
        },
    }
}
