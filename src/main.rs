//! Cosmic Lessons - A Markdown course viewer for the COSMIC desktop
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization, and application bootstrap.

mod app;
mod catalog;
mod config;
mod error;
mod fetch;
mod markdown;
mod menu;
mod message;
mod state;
mod ui;
mod utils;
mod viewer;

use app::{CosmicLessons, Flags};
use catalog::LessonPath;
use std::path::PathBuf;

/// Application name for logging
const APP_NAME: &str = "cosmic-lessons";

fn main() -> cosmic::iced::Result {
    // Initialize logging
    init_logging();

    log::info!("Starting Cosmic Lessons");

    // Parse command line arguments
    let flags = parse_args();

    // Note: Don't use .size() with cosmic apps - it can cause Wayland protocol errors
    cosmic::app::run::<CosmicLessons>(
        cosmic::app::Settings::default()
            .size_limits(cosmic::iced::Limits::NONE.min_width(480.0).min_height(320.0)),
        flags,
    )
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,cosmic_lessons=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments
fn parse_args() -> Flags {
    let args: Vec<String> = std::env::args().collect();
    let mut flags = Flags::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-m" | "--manifest" => {
                flags.manifest = Some(utils::path::expand_tilde(&PathBuf::from(option_value(
                    &args,
                    i,
                    "--manifest",
                ))));
                i += 1;
            }
            "-b" | "--base-url" => {
                flags.base_url = Some(option_value(&args, i, "--base-url").to_string());
                i += 1;
            }
            "-l" | "--lesson" => {
                flags.lesson = Some(LessonPath::parse(option_value(&args, i, "--lesson")));
                i += 1;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
            root => {
                if flags.root.is_some() {
                    eprintln!("Error: only one course root may be given");
                    std::process::exit(1);
                }
                flags.root = Some(utils::path::expand_tilde(&PathBuf::from(root)));
            }
        }
        i += 1;
    }

    // An explicit manifest without a root catalogs the manifest's directory
    if flags.root.is_none() {
        if let Some(parent) = flags.manifest.as_ref().and_then(|m| m.parent()) {
            if !parent.as_os_str().is_empty() {
                flags.root = Some(parent.to_path_buf());
            }
        }
    }

    flags
}

/// Value following option `args[i]`, or exit with an error
fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value,
        None => {
            eprintln!("Error: {} requires an argument", name);
            std::process::exit(1);
        }
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"Cosmic Lessons - A Markdown course viewer

USAGE:
    cosmic-lessons [OPTIONS] [ROOT]

ARGS:
    ROOT                    Course directory (default: last session or current directory)

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
    -m, --manifest <FILE>   Course manifest to load instead of ROOT/courses.json
    -b, --base-url <URL>    Base URL relative lesson paths resolve against
    -l, --lesson <PATH>     Lesson file or URL to open on startup

EXAMPLES:
    cosmic-lessons ~/courses
    cosmic-lessons -m ~/courses/rust.json
    cosmic-lessons -l https://example.org/lessons/intro.md

KEYBOARD SHORTCUTS:
    Ctrl+B              Toggle sidebar
    Ctrl+T              Toggle outline
    Ctrl+R              Reload lesson
    Ctrl+Shift+R        Reload courses
    Ctrl+E              Export lesson as HTML
    Ctrl+= / Ctrl+-     Zoom in / out
    Ctrl+0              Reset zoom
    Ctrl+Q              Quit
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
