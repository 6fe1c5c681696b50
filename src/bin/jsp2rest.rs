//! Command-line interface for jsp2rest
//! This binary converts JSP pages into JAX-RS endpoint classes and exposes the intermediate stages for inspection.
//!
//! Usage:
//!   jsp2rest convert `<path>` [--package `<pkg>`] [--route `<route>`] [--class-name `<name>`]
//!                    [--named-component] [--no-source] [--output `<file>`] [--config `<file>`]
//!   jsp2rest inspect `<path>` [--format `<format>`]  - Print tokens, IR or Java for a template
//!   jsp2rest list-formats                          - List all available inspect formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use jsp2rest::jsp::config::{Jsp2RestConfig, Loader, LOCAL_CONFIG_FILE};
use jsp2rest::jsp::processor::{available_formats, process_file, ProcessingSpec};
use jsp2rest::jsp::Driver;
use std::fmt::Display;
use std::path::Path;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() {
    let matches = Command::new("jsp2rest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert JSP pages into stateless JAX-RS endpoint classes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults and ./jsp2rest.toml"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert one template into a Java class")
                .arg(
                    Arg::new("path")
                        .help("Path to the JSP template")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("package")
                        .long("package")
                        .short('p')
                        .help("Java package of the generated class"),
                )
                .arg(
                    Arg::new("route")
                        .long("route")
                        .short('r')
                        .help("Route path of the endpoint (defaults to the template file name)"),
                )
                .arg(
                    Arg::new("class-name")
                        .long("class-name")
                        .help("Override the class name derived from the route"),
                )
                .arg(
                    Arg::new("named-component")
                        .long("named-component")
                        .action(ArgAction::SetTrue)
                        .help("Emit @Stateless(name=\"{package}-{ClassName}\")"),
                )
                .arg(
                    Arg::new("no-source")
                        .long("no-source")
                        .action(ArgAction::SetTrue)
                        .help("Do not echo the template in a trailing comment"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the class to this file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an intermediate stage of the conversion")
                .arg(
                    Arg::new("path")
                        .help("Path to the JSP template")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'token-simple', 'ir-json', 'java')")
                        .default_value("token-simple"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available inspect formats"))
        .get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| fail("Configuration error", e));
    init_tracing(&config.logging.level);

    match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(convert_matches, &config),
        Some(("inspect", inspect_matches)) => {
            let path = required(inspect_matches, "path");
            let format = required(inspect_matches, "format");
            handle_inspect_command(path, format);
        }
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    }
}

/// Defaults, then ./jsp2rest.toml, then --config, then convert flags
fn load_config(matches: &ArgMatches) -> Result<Jsp2RestConfig, config::ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    if let Some(("convert", convert_matches)) = matches.subcommand() {
        if let Some(package) = convert_matches.get_one::<String>("package") {
            loader = loader.set_override("convert.package", package.as_str())?;
        }
        if convert_matches.get_flag("named-component") {
            loader = loader.set_override("convert.named_component", true)?;
        }
        if convert_matches.get_flag("no-source") {
            loader = loader.set_override("convert.embed_source", false)?;
        }
    }

    loader.build()
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &Jsp2RestConfig) {
    let path = required(matches, "path");
    let route = match matches.get_one::<String>("route") {
        Some(route) => route.clone(),
        None => Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string()),
    };

    let driver = Driver::open(path, config.convert.package.as_str(), &route)
        .unwrap_or_else(|e| fail("Conversion error", e))
        .with_options(config.convert.driver_options());
    let mut document = driver.run().unwrap_or_else(|e| fail("Conversion error", e));

    if let Some(class_name) = matches.get_one::<String>("class-name") {
        document.set_class_name(class_name.as_str());
        if config.convert.named_component {
            document.set_component_name(format!("{}-{}", config.convert.package, class_name));
        }
    }

    let code = document.to_code();
    match matches.get_one::<String>("output") {
        Some(output) => {
            std::fs::write(output, code).unwrap_or_else(|e| fail("Error writing output", e));
        }
        None => println!("{}", code),
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, format: &str) {
    let spec = ProcessingSpec::from_string(format).unwrap_or_else(|e| fail("Error", e));
    let output = process_file(path, &spec).unwrap_or_else(|e| fail("Execution error", e));
    print!("{}", output);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail("Missing argument", name))
}

fn fail<E: Display, T>(context: &str, error: E) -> T {
    eprintln!("{}: {}", context, error);
    std::process::exit(1);
}
