// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
svg2avd converts SVG files into Android Vector Drawable XML files.

USAGE:
  svg2avd [OPTIONS] <in-svg> <out-xml>   # a single file
  svg2avd [OPTIONS] <in-dir> <out-dir>   # every *.svg in a directory

OPTIONS:
  -h, --help            Prints help information
  -V, --version         Prints version information

  --indent INDENT       Sets the XML nodes indent
                        [values: none, 0, 1, 2, 3, 4, tabs] [default: 4]
  --default-width PX    Sets the canvas width used when the document
                        provides neither 'width' nor 'viewBox'
                        [default: 24]
  --default-height PX   Sets the canvas height used when the document
                        provides neither 'height' nor 'viewBox'
                        [default: 24]

  --quiet               Disables warnings

ARGS:
  <in>                  Input file or directory
  <out>                 Output file or directory
";

#[derive(Debug)]
struct Args {
    indent: xmlwriter::Indent,
    default_width: f64,
    default_height: f64,
    quiet: bool,

    input: PathBuf,
    output: PathBuf,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        indent: input
            .opt_value_from_fn("--indent", parse_indent)?
            .unwrap_or(xmlwriter::Indent::Spaces(4)),
        default_width: input
            .opt_value_from_fn("--default-width", parse_length)?
            .unwrap_or(24.0),
        default_height: input
            .opt_value_from_fn("--default-height", parse_length)?
            .unwrap_or(24.0),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.free_from_str()?,
    })
}

fn parse_indent(s: &str) -> Result<xmlwriter::Indent, String> {
    let indent = match s {
        "none" => xmlwriter::Indent::None,
        "0" => xmlwriter::Indent::Spaces(0),
        "1" => xmlwriter::Indent::Spaces(1),
        "2" => xmlwriter::Indent::Spaces(2),
        "3" => xmlwriter::Indent::Spaces(3),
        "4" => xmlwriter::Indent::Spaces(4),
        "tabs" => xmlwriter::Indent::Tabs,
        _ => return Err("invalid INDENT value".to_string()),
    };

    Ok(indent)
}

fn parse_length(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid number")?;

    if n > 0.0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero or negative".to_string())
    }
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let opt = svg2avd::Options {
        default_width: args.default_width,
        default_height: args.default_height,
    };

    let xml_opt = xmlwriter::Options {
        use_single_quote: false,
        indent: args.indent,
        attributes_indent: xmlwriter::Indent::None,
    };

    if args.input.is_dir() {
        process_dir(&args.input, &args.output, &opt, &xml_opt)
    } else {
        process_file(&args.input, &args.output, &opt, &xml_opt)
    }
}

fn process_file(
    input: &Path,
    output: &Path,
    opt: &svg2avd::Options,
    xml_opt: &svg2avd::XmlOptions,
) -> Result<(), String> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| format!("failed to read '{}': {}", input.display(), e))?;

    let tree = svg2avd::Tree::from_str(&text, opt).map_err(|e| e.to_string())?;
    let xml = tree.to_string(xml_opt);

    std::fs::write(output, xml)
        .map_err(|e| format!("failed to write '{}': {}", output.display(), e))?;

    Ok(())
}

fn process_dir(
    input: &Path,
    output: &Path,
    opt: &svg2avd::Options,
    xml_opt: &svg2avd::XmlOptions,
) -> Result<(), String> {
    std::fs::create_dir_all(output)
        .map_err(|e| format!("failed to create '{}': {}", output.display(), e))?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(input)
        .map_err(|e| format!("failed to read '{}': {}", input.display(), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"))
        })
        .collect();
    // `read_dir` order is platform-dependent.
    files.sort();

    let mut failed = 0;
    for file in &files {
        let file_name = match file.file_stem() {
            Some(v) => v,
            None => continue,
        };

        let out_file = output.join(file_name).with_extension("xml");
        println!("Converting {} -> {}", file.display(), out_file.display());

        // A broken file must not abort the whole batch.
        if let Err(e) = process_file(file, &out_file, opt, xml_opt) {
            log::warn!("Failed to convert '{}': {}.", file.display(), e);
            failed += 1;
        }
    }

    if failed == 0 {
        Ok(())
    } else {
        Err(format!("{} out of {} files failed", failed, files.len()))
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
