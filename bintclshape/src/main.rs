//! Command-line tool for parsing Tcl-style data by shape and transcoding it.
//!
//! Usage: tclshape -s SHAPE [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -s, --shape <SHAPE>    Comma-separated level tags (list, dict, string)
//!   -t, --to <FORMAT>      Output format (tcl, json, yaml, toml, cbor, diag)
//!                          [default: json]
//!   -w, --write            Write output to file with inferred name
//!   -o, --output <FILE>    Write output to specified file
//!   --strict               Fail on unterminated groups instead of truncating
//!   --check                Check if input is valid (implies --strict)
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Log verbosity follows `RUST_LOG` (default `warn`).

use libtclshape::{encode, parse_with_options, Format, ParseOptions, Shape, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

mod transcode;

/// Output target: a library encoder or one of the transcoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tcl,
    Json,
    Yaml,
    Toml,
    Cbor,
    CborDiag,
}

/// Settings shared by every input processed in one run.
struct Settings<'a> {
    shape: Shape,
    target: Target,
    output_file: Option<&'a str>,
    write_back: bool,
    strict: bool,
    check_only: bool,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    let mut shape_arg: Option<&str> = None;
    let mut to_format: Option<&str> = None;
    let mut write_back = false;
    let mut output_file: Option<&str> = None;
    let mut strict = false;
    let mut check_only = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("tclshape {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-s" | "--shape" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -s requires a shape argument");
                    process::exit(1);
                }
                shape_arg = Some(&args[i]);
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                if parse_target(&args[i]).is_none() {
                    eprintln!("Error: Unknown format: {}", args[i]);
                    process::exit(1);
                }
                to_format = Some(&args[i]);
            }
            "-w" | "--write" => {
                write_back = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--strict" => {
                strict = true;
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    let shape = match shape_arg {
        Some(s) => match s.parse::<Shape>() {
            Ok(shape) if !shape.is_empty() => shape,
            Ok(_) => {
                eprintln!("Error: --shape needs at least one tag");
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Invalid shape: {}", e);
                process::exit(1);
            }
        },
        None => {
            eprintln!("Error: --shape is required (e.g. -s dict,string)");
            process::exit(1);
        }
    };

    if write_back && output_file.is_some() {
        eprintln!("Error: --write and --output are mutually exclusive");
        process::exit(1);
    }

    let settings = Settings {
        shape,
        target: to_format.and_then(parse_target).unwrap_or(Target::Json),
        output_file,
        write_back,
        strict: strict || check_only,
        check_only,
    };

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if output_file.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process_directory(path, &settings);
            return;
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    process::exit(process_input(&input, input_path, &settings));
}

/// Install a stderr subscriber honoring `RUST_LOG`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn parse_target(s: &str) -> Option<Target> {
    match s {
        "tcl" => Some(Target::Tcl),
        "json" => Some(Target::Json),
        "yaml" | "yml" => Some(Target::Yaml),
        "toml" => Some(Target::Toml),
        "cbor" => Some(Target::Cbor),
        "diag" => Some(Target::CborDiag),
        _ => None,
    }
}

fn target_extension(target: Target) -> &'static str {
    match target {
        Target::Tcl => "tcl",
        Target::Json => "json",
        Target::Yaml => "yaml",
        Target::Toml => "toml",
        Target::Cbor => "cbor",
        Target::CborDiag => "diag",
    }
}

fn process_directory(dir_path: &str, settings: &Settings<'_>) {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            process::exit(1);
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "tcl").unwrap_or(false))
        .collect();
    paths.sort();

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        let input = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path_str, e);
                had_errors = true;
                continue;
            }
        };
        if process_input(&input, Some(&path_str), settings) != 0 {
            had_errors = true;
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

fn process_input(input: &str, input_file: Option<&str>, settings: &Settings<'_>) -> i32 {
    let mut options = ParseOptions::new().strict(settings.strict);
    if let Some(name) = input_file.and_then(|p| Path::new(p).file_name()) {
        options = options.filename(name.to_string_lossy());
    }

    tracing::debug!(file = input_label(input_file), shape = %settings.shape, "parsing");

    let value = match parse_with_options(input, &settings.shape, &options) {
        Ok(v) => v,
        Err(e) => {
            match input_file {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };

    if settings.check_only {
        println!("{}: ok", input_label(input_file));
        return 0;
    }

    match render(&value, settings.target) {
        Ok(Rendered::Text(output)) => {
            write_text_output(&output, settings, input_file);
            0
        }
        Ok(Rendered::Binary(bytes)) => {
            write_binary_output(&bytes, settings, input_file);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

enum Rendered {
    Text(String),
    Binary(Vec<u8>),
}

fn render(value: &Value, target: Target) -> Result<Rendered, String> {
    match target {
        Target::Tcl => Ok(Rendered::Text(encode(value, Format::Tcl))),
        Target::Json => Ok(Rendered::Text(encode(value, Format::Json))),
        Target::Yaml => transcode::yaml::encode(value)
            .map(Rendered::Text)
            .map_err(|e| format!("Cannot convert to YAML: {}", e)),
        Target::Toml => transcode::toml::encode(value)
            .map(Rendered::Text)
            .map_err(|e| format!("Cannot convert to TOML: {}", e)),
        Target::Cbor => transcode::cbor::encode(value)
            .map(Rendered::Binary)
            .map_err(|e| format!("Cannot convert to CBOR: {}", e)),
        Target::CborDiag => {
            // Render from the encoded bytes so the notation matches the wire.
            let bytes = transcode::cbor::encode(value)
                .map_err(|e| format!("Cannot convert to CBOR: {}", e))?;
            transcode::cbor::diagnostic(&bytes)
                .map(Rendered::Text)
                .map_err(|e| format!("Cannot render CBOR diagnostic notation: {}", e))
        }
    }
}

/// Where output goes when it is not stdout.
fn output_destination(settings: &Settings<'_>, input_file: Option<&str>) -> Option<String> {
    if let Some(path) = settings.output_file {
        return Some(path.to_string());
    }
    if settings.write_back {
        match input_file {
            Some(input_path) => {
                let ext = target_extension(settings.target);
                let output_path = Path::new(input_path).with_extension(ext);
                return Some(output_path.to_string_lossy().to_string());
            }
            None => {
                eprintln!("Error: --write requires an input file");
                process::exit(1);
            }
        }
    }
    None
}

fn write_text_output(output: &str, settings: &Settings<'_>, input_file: Option<&str>) {
    match output_destination(settings, input_file) {
        Some(path) => {
            if let Err(e) = fs::write(&path, output) {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            }
        }
        None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }
}

fn write_binary_output(output: &[u8], settings: &Settings<'_>, input_file: Option<&str>) {
    match output_destination(settings, input_file) {
        Some(path) => {
            if let Err(e) = fs::write(&path, output) {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = handle.write_all(output) {
                eprintln!("Error writing to stdout: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Name an input in status lines; stdin has no path.
fn input_label(input_file: Option<&str>) -> &str {
    input_file.unwrap_or("<stdin>")
}

fn print_help() {
    print!("{}", HELP);
}

const HELP: &str = "tclshape - parse Tcl-style lists and dicts by shape

USAGE:
    tclshape -s SHAPE [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .tcl files in it

OPTIONS:
    -s, --shape <SHAPE>    Comma-separated tags, one per nesting level.
                           Each tag is list, dict, or string.

    -t, --to <FORMAT>      Output format [default: json]
                           Supported: tcl, json, yaml, toml, cbor, diag

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --strict               Fail on unterminated groups instead of keeping the
                           partial result

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)
                           Implies --strict

    -h, --help             Print help

    -V, --version          Print version

ENVIRONMENT:
    RUST_LOG               Log filter for diagnostics on stderr [default: warn]

EXAMPLES:
    # Read a flat dict
    echo 'a 4711 b xyz c {This is a Test.} d {}' | tclshape -s dict,string

    # A list of records, written as YAML
    tclshape -s list,dict,string -t yaml users.tcl

    # Normalize Tcl text
    tclshape -s dict,list,string -t tcl config.tcl

    # Validate every .tcl file in a directory
    tclshape -s dict,string --check ./data/

    # CBOR, and its diagnostic notation
    tclshape -s dict,string -t cbor config.tcl -o config.cbor
    tclshape -s dict,string -t diag config.tcl
";
