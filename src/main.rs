//! faqforge – command-line FAQ renderer and template authoring helper.
//!
//! Usage:
//!   faqforge render <config.json> [--templates <dir>] [--output <file>] [--json] [--expanded | --first-open]
//!   faqforge extract <template.css> [--template <id>]
//!   faqforge protect <template.css>
//!
//! `render` writes the final HTML document (or, with `--json`, the public
//! embed response) to stdout unless `--output` is given. Templates are read
//! from `--templates`, then `$FAQ_TEMPLATES_DIR`; without either the
//! built-in template is used.

use std::path::{Path, PathBuf};
use std::{env, fs, process};

use faq_forge::accordion::AnswerVisibility;
use faq_forge::extract::extract_styles;
use faq_forge::payload::EmbedResponse;
use faq_forge::pipeline::{render_with_store, FaqConfig, RenderOptions};
use faq_forge::protection::ProtectionMap;
use faq_forge::templates::{FsTemplateStore, MemoryTemplateStore, TemplateStore};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("faqforge");

    let Some(command) = args.get(1) else {
        eprintln!("Error: no command specified.");
        print_usage(prog);
        process::exit(1);
    };
    let rest = &args[2..];

    match command.as_str() {
        "render" => render(prog, rest),
        "extract" => extract(prog, rest),
        "protect" => protect(prog, rest),
        "--help" | "-h" | "help" => print_usage(prog),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn render(prog: &str, args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut templates_dir: Option<PathBuf> = env::var_os("FAQ_TEMPLATES_DIR").map(PathBuf::from);
    let mut output_path: Option<PathBuf> = None;
    let mut as_json = false;
    let mut visibility = AnswerVisibility::Collapsed;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--templates" | "-t" => templates_dir = Some(PathBuf::from(flag_value(prog, arg, iter.next()))),
            "--output" | "-o" => output_path = Some(PathBuf::from(flag_value(prog, arg, iter.next()))),
            "--json" => as_json = true,
            "--expanded" => visibility = AnswerVisibility::Expanded,
            "--first-open" => visibility = AnswerVisibility::FirstExpanded,
            other if other.starts_with('-') => unknown_flag(prog, other),
            path => {
                if config_path.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(prog);
                    process::exit(1);
                }
                config_path = Some(PathBuf::from(path));
            }
        }
    }

    let Some(config_path) = config_path else {
        eprintln!("Error: no config file specified.");
        print_usage(prog);
        process::exit(1);
    };

    let text = read_file(&config_path);
    let config = match FaqConfig::from_json(&text) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error parsing '{}': {e}", config_path.display());
            process::exit(1);
        }
    };

    let store: Box<dyn TemplateStore> = match templates_dir {
        Some(dir) => Box::new(FsTemplateStore::new(dir)),
        None => Box::new(MemoryTemplateStore::new()),
    };
    let options = RenderOptions {
        answer_visibility: visibility,
    };
    let payload = render_with_store(store.as_ref(), &config, &options);

    let output = if as_json {
        EmbedResponse::from(payload).to_json()
    } else {
        payload.html
    };

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = fs::create_dir_all(parent) {
                        eprintln!("Error creating output directory: {e}");
                        process::exit(1);
                    }
                }
            }
            if let Err(e) = fs::write(&path, &output) {
                eprintln!("Error writing '{}': {e}", path.display());
                process::exit(1);
            }
            eprintln!(
                "Wrote '{}' ({} bytes, {} item{})",
                path.display(),
                output.len(),
                config.content.items.len(),
                if config.content.items.len() == 1 { "" } else { "s" }
            );
        }
        None => println!("{output}"),
    }
}

fn extract(prog: &str, args: &[String]) {
    let mut css_path: Option<PathBuf> = None;
    let mut template_id: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--template" => template_id = Some(flag_value(prog, arg, iter.next()).to_string()),
            other if other.starts_with('-') => unknown_flag(prog, other),
            path => css_path = Some(PathBuf::from(path)),
        }
    }

    let Some(css_path) = css_path else {
        eprintln!("Error: no CSS file specified.");
        print_usage(prog);
        process::exit(1);
    };

    let css = read_file(&css_path);
    let Some(styles) = extract_styles(&css, template_id.as_deref()) else {
        eprintln!("Error: '{}' is empty, nothing to extract.", css_path.display());
        process::exit(1);
    };
    match serde_json::to_string_pretty(&styles) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serialising styles: {e}");
            process::exit(1);
        }
    }
}

fn protect(prog: &str, args: &[String]) {
    let css_path = match args {
        [path] if !path.starts_with('-') => PathBuf::from(path),
        _ => {
            eprintln!("Error: expected exactly one CSS file.");
            print_usage(prog);
            process::exit(1);
        }
    };

    let protection = ProtectionMap::parse(&read_file(&css_path));
    for path in protection.paths() {
        println!("{path}");
    }
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", path.display());
            process::exit(1);
        }
    }
}

fn flag_value<'a>(prog: &str, flag: &str, value: Option<&'a String>) -> &'a str {
    match value {
        Some(v) => v,
        None => {
            eprintln!("Error: {flag} needs a value.");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn unknown_flag(prog: &str, flag: &str) -> ! {
    eprintln!("Unknown flag: {flag}");
    print_usage(prog);
    process::exit(1);
}

fn print_usage(prog: &str) {
    eprintln!("faqforge – FAQ embed renderer (faq-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} render <config.json> [--templates <dir>] [--output <file>] [--json] [--expanded | --first-open]");
    eprintln!("  {prog} extract <template.css> [--template <id>]");
    eprintln!("  {prog} protect <template.css>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render         Render a saved FAQ config to HTML");
    eprintln!("  extract        Print the style config a stylesheet implies, as JSON");
    eprintln!("  protect        List the style paths a stylesheet locks");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --templates, -t  Template directory (default: $FAQ_TEMPLATES_DIR, else built-in)");
    eprintln!("  --output, -o     Write to a file instead of stdout");
    eprintln!("  --json           Emit the embed response {{html, css, schema, integrity}}");
    eprintln!("  --expanded       Render every answer open");
    eprintln!("  --first-open     Render only the first answer open");
    eprintln!("  --template       Template id whose scoped rules to read");
    eprintln!("  --help           Print this message");
}
