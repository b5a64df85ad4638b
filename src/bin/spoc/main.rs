//! SPOC CLI - Tool for inspecting and converting SPOC point cloud files.

mod diff;
mod summary;
mod text;

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use spoc::io::is_spoc_path;
use spoc::{read_file, read_header, write_file_with, WriteOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use diff::Scope;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut compression_level: Option<u32> = None;
    let mut filtered_args: Vec<&str> = Vec::new();
    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            "--level" => match iter.next().and_then(|s| s.parse().ok()) {
                Some(l) => compression_level = Some(l),
                None => {
                    eprintln!("Error: --level expects a number 0-9");
                    return ExitCode::FAILURE;
                }
            },
            _ => filtered_args.push(arg.as_str()),
        }
    }
    init_tracing(level);

    let mut options = WriteOptions::default();
    if let Some(l) = compression_level {
        options = options.compression_level(l);
    }

    if filtered_args.is_empty() {
        print_help();
        return ExitCode::SUCCESS;
    }

    let result = match filtered_args[0] {
        // Info command - header-only catalog of one or more files
        "info" | "i" => {
            let json = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            let summary = filtered_args.iter().any(|&s| s == "--summary" || s == "-s");
            let files: Vec<&str> = filtered_args[1..]
                .iter()
                .copied()
                .filter(|s| !s.starts_with('-'))
                .collect();
            if files.is_empty() {
                usage("spoc-cli info <file.spoc>... [--summary] [--json]")
            } else {
                cmd_info(&files, json, summary)
            }
        }

        // Diff command - compare headers and/or point data
        "diff" => {
            let files: Vec<&str> = filtered_args[1..]
                .iter()
                .copied()
                .filter(|s| !s.starts_with('-'))
                .collect();
            let fields = filtered_args
                .iter()
                .position(|&s| s == "--fields" || s == "-f")
                .and_then(|i| filtered_args.get(i + 1));
            let scope = if let Some(spec) = fields {
                Scope::fields(spec)
            } else if filtered_args.contains(&"--header-only") {
                Ok(Scope::HeaderOnly)
            } else if filtered_args.contains(&"--data-only") {
                Ok(Scope::DataOnly)
            } else {
                Ok(Scope::All)
            };
            // the --fields value is not a file
            let files: Vec<&str> = files
                .into_iter()
                .filter(|s| Some(s) != fields)
                .collect();
            match (scope, files.as_slice()) {
                (Err(e), _) => {
                    eprintln!("Error: {}", e);
                    false
                }
                (Ok(scope), [a, b]) => cmd_diff(a, b, &scope),
                _ => usage("spoc-cli diff <a.spoc> <b.spoc> [--header-only|--data-only|--fields xyz0]"),
            }
        }

        // From-text command - inverse of dump
        "from-text" | "t2s" => {
            let compressed = filtered_args.iter().any(|&s| s == "--compressed" || s == "-z");
            let files: Vec<&str> = filtered_args[1..]
                .iter()
                .copied()
                .filter(|s| !s.starts_with('-'))
                .collect();
            match files.as_slice() {
                [input, output] => cmd_from_text(input, output, compressed, &options),
                _ => usage("spoc-cli from-text <input.txt> <output.spoc> [--compressed]"),
            }
        }

        // Dump command - point records as text
        "dump" | "d" => match filtered_args.get(1) {
            Some(file) => {
                let limit = filtered_args
                    .iter()
                    .position(|&s| s == "--limit" || s == "-n")
                    .and_then(|i| filtered_args.get(i + 1))
                    .and_then(|s| s.parse().ok());
                cmd_dump(file, limit)
            }
            None => usage("spoc-cli dump <file.spoc> [--limit N]"),
        },

        // Classes command - classification histogram
        "classes" | "cls" => match filtered_args.get(1) {
            Some(file) => cmd_classes(file),
            None => usage("spoc-cli classes <file.spoc>"),
        },

        "compress" | "z" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(input), Some(output)) => cmd_rewrite(input, output, true, &options),
            _ => usage("spoc-cli compress <input.spoc> <output.zpoc>"),
        },

        "decompress" | "unz" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(input), Some(output)) => cmd_rewrite(input, output, false, &options),
            _ => usage("spoc-cli decompress <input.zpoc> <output.spoc>"),
        },

        "version" | "--version" => {
            println!(
                "spoc-cli {} (format {}.{}, built {} {})",
                env!("CARGO_PKG_VERSION"),
                spoc::library_major_version(),
                spoc::library_minor_version(),
                env!("SPOC_BUILD_DATE"),
                env!("SPOC_BUILD_TIME"),
            );
            true
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            true
        }

        // Default: if a SPOC file was passed, show info; otherwise error
        _ => {
            if is_spoc_path(filtered_args[0]) && Path::new(filtered_args[0]).exists() {
                cmd_info(&filtered_args, false, false)
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                false
            }
        }
    };

    if result {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn usage(text: &str) -> bool {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: {}", text);
    false
}

fn print_help() {
    println!("spoc-cli - SPOC point cloud file toolkit");
    println!();
    println!("USAGE:");
    println!("    spoc-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info       <files...> [--json]   Show header of each file (header-only read)");
    println!("                  [--summary]           Also show per-column range and quartiles");
    println!("    d, dump       <file> [--limit N]    Print WKT and point records as tab-separated text");
    println!("    t2s, from-text <in> <out> [-z]      Build a file from 'dump' output");
    println!("    diff          <a> <b>               Compare two files (exit 1 if they differ)");
    println!("                  [--header-only | --data-only | --fields xyzcpirgb0-9]");
    println!("    cls, classes  <file>                Count points per classification");
    println!("    z, compress   <in> <out>            Rewrite with a compressed point block");
    println!("    unz, decompress <in> <out>          Rewrite with a raw point block");
    println!("    version                             Show library and format version");
    println!("    h, help                             Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!("    --level N        zlib level 0-9 for compress");
    println!();
    println!("NOTES:");
    println!("    - Passing a .spoc/.zpoc file directly is equivalent to 'info'");
    println!("    - 'dump' output can be turned back into a file with 'from-text'");
    println!("    - RUST_LOG overrides the log level flags");
}

fn cmd_info(files: &[&str], json: bool, summary: bool) -> bool {
    let mut ok = true;
    let mut entries = Vec::new();

    for path in files {
        let start = Instant::now();
        // the summary needs the points, the header alone does not
        let (header, columns) = if summary {
            match read_file(path) {
                Ok(f) => {
                    let mut header = f.header();
                    header.major_version = f.major_version();
                    header.minor_version = f.minor_version();
                    (header, Some(f.columns()))
                }
                Err(e) => {
                    eprintln!("Failed to read {}: {}", path, e);
                    ok = false;
                    continue;
                }
            }
        } else {
            match read_header(path) {
                Ok(h) => (h, None),
                Err(e) => {
                    eprintln!("Failed to read {}: {}", path, e);
                    ok = false;
                    continue;
                }
            }
        };
        debug!("Read {} in {:?}", path, start.elapsed());

        if json {
            let mut entry = serde_json::json!({
                "file": path,
                "major_version": header.major_version,
                "minor_version": header.minor_version,
                "wkt": header.wkt,
                "extra_fields": header.extra_fields,
                "total_points": header.total_points,
                "compressed": header.compressed,
            });
            if let Some(cols) = &columns {
                entry["summary"] = summary::summary_json(cols);
            }
            entries.push(entry);
        } else {
            println!("File: {}", path);
            println!("{}", header);
            if let Some(cols) = &columns {
                print!("{}", summary::summary_text(cols));
            }
            println!();
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries).unwrap_or_default());
    }
    ok
}

fn cmd_dump(path: &str, limit: Option<usize>) -> bool {
    let file = match read_file(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            return false;
        }
    };

    let mut out = io::BufWriter::new(io::stdout().lock());
    match text::write_text(&mut out, &file, limit) {
        Ok(shown) => {
            info!("Dumped {} of {} records from {}", shown, file.len(), path);
            true
        }
        Err(e) => {
            eprintln!("Failed to dump {}: {}", path, e);
            false
        }
    }
}

fn cmd_from_text(input: &str, output: &str, compressed: bool, options: &WriteOptions) -> bool {
    let reader = match File::open(input) {
        Ok(f) => BufReader::new(f),
        Err(e) => {
            eprintln!("Failed to open {}: {}", input, e);
            return false;
        }
    };
    let file = match text::read_text(reader, compressed) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", input, e);
            return false;
        }
    };
    if let Err(e) = write_file_with(output, &file, options) {
        eprintln!("Failed to write {}: {}", output, e);
        return false;
    }
    println!("Wrote {} points to {}", file.len(), output);
    true
}

fn cmd_diff(a: &str, b: &str, scope: &Scope) -> bool {
    let (fa, fb) = match (read_file(a), read_file(b)) {
        (Ok(fa), Ok(fb)) => (fa, fb),
        (Err(e), _) => {
            eprintln!("Failed to read {}: {}", a, e);
            return false;
        }
        (_, Err(e)) => {
            eprintln!("Failed to read {}: {}", b, e);
            return false;
        }
    };

    let diffs = diff::differences(&fa, &fb, scope);
    for d in &diffs {
        println!("{} differs", d);
    }
    diffs.is_empty()
}

fn cmd_classes(path: &str) -> bool {
    let file = match read_file(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            return false;
        }
    };

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for c in file.c() {
        *counts.entry(c).or_default() += 1;
    }

    println!("File: {}", path);
    println!("Points: {}", file.len());
    for (class, count) in counts {
        println!("  {:03}  {}", class, count);
    }
    true
}

fn cmd_rewrite(input: &str, output: &str, compressed: bool, options: &WriteOptions) -> bool {
    info!("Rewriting {} -> {} (compressed={})", input, output, compressed);
    let start = Instant::now();

    let mut file = match read_file(input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input, e);
            return false;
        }
    };
    debug!("Read {} points in {:?}", file.len(), start.elapsed());

    file.set_compressed(compressed);
    if let Err(e) = write_file_with(output, &file, options) {
        eprintln!("Failed to write {}: {}", output, e);
        return false;
    }

    println!("Wrote {} points to {} in {:?}", file.len(), output, start.elapsed());
    true
}
