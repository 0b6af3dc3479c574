// Command-line interface for mill
//
// This binary drives the mill site generator: a full build of the content
// tree, an incremental watch mode, and an inspect command that dumps the
// intermediate stages of the conversion pipeline for one document.
//
// All real work lives in the mill-site and mill-core libraries; this layer
// parses arguments, loads configuration, prints and picks exit codes.
//
// Usage:
//  mill build [-w] [-f] [--ignore-errors]  - Generate the site (in memory unless -w)
//  mill watch                              - Build, then rebuild files as they change
//  mill inspect <path> [<transform>]       - Dump a pipeline stage (defaults to "events-json")
//
// Configuration is layered: embedded defaults, then mill.toml in the working
// directory (or the file given with --config), see mill-config.

use std::io::Write;
use std::path::Path;
use std::process::exit;
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fs, io};

use clap::{Arg, ArgAction, Command, ValueHint};

use mill_config::{Loader, MillConfig};
use mill_core::generator::generate;
use mill_core::lexer::lex;
use mill_core::preprocessor::preprocess;
use mill_site::builder::{BuildOptions, SiteBuilder};
use mill_site::entry::EntryCache;
use mill_site::inject::standard_registry;
use mill_site::watch::{FileAction, Watcher};

const AVAILABLE_TRANSFORMS: &[&str] = &["text", "events-json", "html"];

fn build_cli() -> Command {
    Command::new("mill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A static site generator for a small markup dialect")
        .long_about(
            "mill converts a tree of markup documents into a static website.\n\n\
            Commands:\n  \
            - build:   Convert the whole content tree (dry run unless --write)\n  \
            - watch:   Build, then rebuild individual files as they change\n  \
            - inspect: Dump a document's pipeline stages for debugging\n\n\
            Examples:\n  \
            mill build -w            # Generate the site into the output directory\n  \
            mill build -w -f         # Same, deleting stale output first\n  \
            mill watch               # Keep the output in sync while editing\n  \
            mill inspect post.md html",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mill.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Convert the content tree into the output tree")
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Write the generated files to the output directory")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Delete the output directory before writing")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("ignore-errors")
                        .long("ignore-errors")
                        .help("Report broken documents but build the rest")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Build once, then rebuild files as they change")
                .long_about(
                    "Runs a full build, then polls the content tree and regenerates\n\
                    individual files as they are added or modified. Stop with Ctrl-C.",
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump a document's pipeline stages")
                .long_about(
                    "View a document at different stages of the conversion pipeline.\n\n\
                    Transforms:\n  \
                    - text:        The stripped text, syntax removed\n  \
                    - events-json: The format events after preprocessing (default)\n  \
                    - html:        The rendered document body, unminified and untemplated",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markup file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Pipeline stage to dump. Defaults to 'events-json'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("mill: {err}");
    exit(1);
}

fn load_cli_config(path: Option<&str>) -> MillConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file("mill.toml"),
    };
    loader.build().unwrap_or_else(|e| fail(e))
}

fn site_builder(config: &MillConfig) -> SiteBuilder {
    SiteBuilder::new(
        &config.paths.input,
        &config.paths.output,
        &config.paths.template,
        &config.site.title,
        &config.site.cname,
    )
}

fn main() {
    let matches = build_cli().get_matches();
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("build", sub_matches)) => {
            let options = BuildOptions {
                write: sub_matches.get_flag("write"),
                force: sub_matches.get_flag("force"),
                ignore_errors: sub_matches.get_flag("ignore-errors"),
            };
            handle_build_command(&config, &options);
        }
        Some(("watch", _)) => {
            handle_watch_command(&config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("events-json");
            handle_inspect_command(&config, path, transform);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            exit(1);
        }
    }
}

fn handle_build_command(config: &MillConfig, options: &BuildOptions) {
    let builder = site_builder(config);
    let report = builder.build(options).unwrap_or_else(|e| fail(e));
    for (_, err) in &report.failures {
        eprintln!("mill: {err}");
    }
}

fn handle_watch_command(config: &MillConfig) {
    let builder = site_builder(config);
    let report = builder
        .build(&BuildOptions {
            write: true,
            force: false,
            ignore_errors: true,
        })
        .unwrap_or_else(|e| fail(e));
    for (_, err) in &report.failures {
        eprintln!("mill: {err}");
    }

    let watcher = Watcher::spawn(builder.input(), (&config.watch).into());
    eprintln!("watching {}", builder.input().display());

    loop {
        let Some((action, path)) = watcher.poll(Duration::from_secs(1)) else {
            continue;
        };
        if !matches!(
            action,
            FileAction::Added | FileAction::Modified | FileAction::RenamedTo
        ) {
            continue;
        }
        let Ok(rel) = path.strip_prefix(builder.input()) else {
            continue;
        };
        if builder.input().join(rel) == builder.template_path() {
            continue;
        }

        let start = Instant::now();
        builder.cache().invalidate(rel);
        match builder.process_file(rel) {
            Ok((out_rel, content)) => {
                let out_path = builder.output().join(&out_rel);
                if let Err(err) = commit_file(&out_path, &content) {
                    eprintln!("mill: {}: {err}", out_path.display());
                    continue;
                }
                eprintln!(
                    "regenerated {} in {:.3}s",
                    rel.display(),
                    start.elapsed().as_secs_f64()
                );
            }
            Err(err) => eprintln!("mill: {err}"),
        }
    }
}

fn commit_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn handle_inspect_command(config: &MillConfig, path: &str, transform: &str) {
    let raw = fs::read(path).unwrap_or_else(|e| {
        eprintln!("mill: {path}: {e}");
        exit(1);
    });

    // Injections resolve against the configured content root, so inspecting
    // a real document behaves like building it.
    let cache = Arc::new(EntryCache::new(&config.paths.input));
    let registry = standard_registry(cache);

    let (text, formats) = lex(&raw).unwrap_or_else(|e| fail(e));

    let output = match transform {
        "text" => text.clone(),
        "events-json" => {
            let formats = preprocess(&text, formats, &registry).unwrap_or_else(|e| fail(e));
            let mut json = serde_json::to_vec_pretty(&formats).unwrap_or_else(|e| fail(e));
            json.push(b'\n');
            json
        }
        "html" => {
            let formats = preprocess(&text, formats, &registry).unwrap_or_else(|e| fail(e));
            generate(&text, &formats)
        }
        other => {
            eprintln!("mill: unknown transform: {other}");
            exit(1);
        }
    };

    io::stdout()
        .write_all(&output)
        .unwrap_or_else(|e| fail(e));
}
