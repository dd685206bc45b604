//! ruta CLI — driving adapter for the segment route engine.
//!
//! Subcommands:
//! - `match <config> <path> [--offset N] [...]` — match a path against a route
//! - `assemble <config> [--param key=value...] [...]` — build a path from values
//! - `check <config>` — validate a route config loads without errors

use std::collections::HashMap;
use std::process;

use ruta::{AssembleOptions, MatchOptions, Segment, SegmentConfig, StaticTranslator};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "match" => cmd_match(&args[2..]),
        "assemble" => cmd_assemble(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_match(args: &[String]) -> Result<(), String> {
    if args.len() < 2 {
        return Err("match requires a config file path and a subject path".into());
    }

    let route = load_route(&args[0])?;
    let subject = &args[1];
    let flags = parse_flags(&args[2..])?;

    let options = MatchOptions {
        translator: flags.translator(),
        text_domain: flags.text_domain.as_deref(),
        locale: flags.locale.as_deref(),
    };

    match route
        .match_path(subject, flags.offset, &options)
        .map_err(|e| e.to_string())?
    {
        Some(m) => {
            println!("matched {} bytes", m.matched_length());
            let mut names: Vec<&String> = m.params().keys().collect();
            names.sort();
            for name in names {
                println!("{name} = {}", m.params()[name]);
            }
        }
        None => println!("(no match)"),
    }

    Ok(())
}

fn cmd_assemble(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("assemble requires a config file path".into());
    }

    let route = load_route(&args[0])?;
    let flags = parse_flags(&args[1..])?;

    let options = AssembleOptions {
        translator: flags.translator(),
        text_domain: flags.text_domain.as_deref(),
        locale: flags.locale.as_deref(),
        has_child: flags.has_child,
    };

    let path = route
        .assemble(&flags.params, &options)
        .map_err(|e| e.to_string())?;
    println!("{path}");

    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("check requires a config file path".into());
    }

    let route = load_route(&args[0])?;

    println!("Route valid");
    println!("pattern: {}", route.pattern());
    let names = route.parameter_names();
    if !names.is_empty() {
        println!("parameters: {}", names.join(", "));
    }
    if route.needs_translator() {
        println!("requires a translator (pattern contains translated literals)");
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_route(path: &str) -> Result<Segment, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: SegmentConfig = if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))?
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))?
    };

    Segment::from_config(config).map_err(|e| format!("route invalid: {e}"))
}

/// Translation file format: `{ "<text domain>": { "<message id>": "<text>" } }`.
fn load_translations(path: &str) -> Result<StaticTranslator, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let catalogs: HashMap<String, HashMap<String, String>> =
        serde_json::from_str(&content).map_err(|e| format!("translations parse error: {e}"))?;

    let mut translator = StaticTranslator::new();
    for (domain, messages) in &catalogs {
        for (id, text) in messages {
            translator.insert(domain, None, id, text);
        }
    }

    Ok(translator)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Flags {
    offset: Option<usize>,
    params: HashMap<String, String>,
    translations: Option<StaticTranslator>,
    text_domain: Option<String>,
    locale: Option<String>,
    has_child: bool,
}

impl Flags {
    fn translator(&self) -> Option<&dyn ruta::Translator> {
        self.translations
            .as_ref()
            .map(|t| t as &dyn ruta::Translator)
    }
}

fn parse_flags(args: &[String]) -> Result<Flags, String> {
    let mut flags = Flags::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--offset" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--offset requires a value".to_string())?;
                flags.offset = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid offset \"{value}\""))?,
                );
            }
            "--param" => {
                i += 1;
                let pair = args
                    .get(i)
                    .ok_or_else(|| "--param requires key=value".to_string())?;
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("invalid param \"{pair}\", expected key=value"))?;
                flags.params.insert(key.to_owned(), value.to_owned());
            }
            "--translations" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "--translations requires a file path".to_string())?;
                flags.translations = Some(load_translations(path)?);
            }
            "--text-domain" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--text-domain requires a value".to_string())?;
                flags.text_domain = Some(value.clone());
            }
            "--locale" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--locale requires a value".to_string())?;
                flags.locale = Some(value.clone());
            }
            "--has-child" => flags.has_child = true,
            other => return Err(format!("unexpected argument \"{other}\"")),
        }
        i += 1;
    }

    Ok(flags)
}

fn print_usage() {
    eprintln!(
        "Usage: ruta <command> [options]

Commands:
  match <config> <path> [--offset N]        Match a subject path against the route
  assemble <config> [--param key=value...]  Assemble a path from parameter values
  check <config>                            Validate the route config
  help                                      Show this help

Options:
  --offset N             Match starting at byte N (prefix mode)
  --param key=value      Parameter value for assemble (repeatable)
  --translations FILE    JSON message catalogs for translated literals
  --text-domain NAME     Catalog text domain (default: \"default\")
  --locale NAME          Catalog locale
  --has-child            Force optional group emission when assembling"
    );
}
