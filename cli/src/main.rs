use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blockpad::catalog::pattern::Pattern;
use blockpad::codegen;
use blockpad::exec::ExecutionRequest;
use blockpad::{BlockTemplate, Catalog, Workspace};

#[derive(Parser)]
#[command(name = "blockpad", version, about = "Block-programming sandbox code generator")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the block palette
    Palette(PaletteArgs),

    /// Validate a catalog file's statement patterns
    Check(CheckArgs),

    /// Assemble a sample program and print its generated code
    Demo(DemoArgs),
}

#[derive(clap::Args)]
struct PaletteArgs {
    /// Catalog file (.json or .toml); defaults to the built-in palette
    #[arg(long)]
    catalog: Option<String>,

    /// Show statement patterns instead of labels
    #[arg(long)]
    patterns: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Catalog file to validate (.json or .toml)
    file: String,
}

#[derive(clap::Args)]
struct DemoArgs {
    /// Which sample program to build
    #[arg(long, default_value = "guess")]
    scenario: String,

    /// Print the JSON run request instead of bare source
    #[arg(long)]
    request: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Palette(args) => do_palette(args),
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Demo(args) => do_demo(args),
    }
}

/// Read a catalog from disk. TOML for hand-authored palettes, JSON for
/// palettes saved from the sandbox's palette endpoint.
fn load_catalog(path: &str) -> Result<Catalog, String> {
    let source =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?;
    if path.ends_with(".toml") {
        toml::from_str(&source).map_err(|e| format!("TOML parse error in '{}': {}", path, e))
    } else {
        serde_json::from_str(&source).map_err(|e| format!("JSON parse error in '{}': {}", path, e))
    }
}

fn load_catalog_or_exit(path: &str) -> Catalog {
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn do_palette(args: PaletteArgs) {
    let catalog = match args.catalog.as_deref() {
        Some(path) => load_catalog_or_exit(path),
        None => Catalog::builtin(),
    };

    for category in &catalog.categories {
        if category.color.is_empty() {
            println!("{}", category.name);
        } else {
            println!("{} [{}]", category.name, category.color);
        }
        for block in &category.blocks {
            let marker = if block.has_alternate_body {
                " (body + else)"
            } else if block.accepts_body {
                " (body)"
            } else if block.is_expression {
                " (expression)"
            } else {
                ""
            };
            let shown = if args.patterns {
                block.pattern.text()
            } else {
                block.label.as_str()
            };
            println!("  {:<20} {}{}", block.kind, shown, marker);
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let catalog = load_catalog_or_exit(&args.file);

    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let mut files = SimpleFiles::new();
    let mut issues_found = 0usize;

    for block in catalog.templates() {
        let (pattern, issues) = Pattern::parse_checked(block.pattern.text());
        if !issues.is_empty() {
            let file_id = files.add(
                format!("{}:{}.pattern", args.file, block.kind),
                block.pattern.text().to_string(),
            );
            for issue in &issues {
                let _ = term::emit_to_write_style(
                    &mut writer.lock(),
                    &config,
                    &files,
                    &issue.to_diagnostic(file_id),
                );
            }
            issues_found += issues.len();
        }
        issues_found += check_inputs(block, &pattern);
    }

    if issues_found == 0 {
        eprintln!("ok: {} checked, no issues", args.file);
    } else {
        eprintln!("{}: {} issue(s)", args.file, issues_found);
    }
}

/// Cross-check a template's declared inputs against the slot names its
/// pattern actually contains.
fn check_inputs(block: &BlockTemplate, pattern: &Pattern) -> usize {
    let mut count = 0;
    for input in &block.inputs {
        if !pattern.slot_names().contains(input) {
            eprintln!(
                "warning: {}: input '{}' never appears in the pattern",
                block.kind, input
            );
            count += 1;
        }
    }
    // A missing inputs list just means no input fields; only flag declared
    // lists that are out of sync.
    if !block.inputs.is_empty() {
        for name in pattern.slot_names() {
            if !block.inputs.contains(name) {
                eprintln!(
                    "warning: {}: slot '{}' is not a declared input",
                    block.kind, name
                );
                count += 1;
            }
        }
    }
    count
}

fn do_demo(args: DemoArgs) {
    let catalog = Catalog::builtin();
    let workspace = match args.scenario.as_str() {
        "guess" => build_guess(&catalog),
        "countdown" => build_countdown(&catalog),
        other => {
            eprintln!(
                "error: unknown scenario '{}' (available: guess, countdown)",
                other
            );
            process::exit(1);
        }
    };

    let code = codegen::generate(&workspace);
    if args.request {
        match serde_json::to_string_pretty(&ExecutionRequest::new(code)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot encode request: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", code);
    }
}

fn template<'a>(catalog: &'a Catalog, kind: &str) -> &'a BlockTemplate {
    match catalog.template(kind) {
        Some(t) => t,
        None => {
            eprintln!("error: builtin palette is missing '{}'", kind);
            process::exit(1);
        }
    }
}

/// The number-guessing lesson: a secret, a guess, and a branch on the
/// comparison.
fn build_guess(catalog: &Catalog) -> Workspace {
    let mut ws = Workspace::new();

    let set = template(catalog, "var_set");
    let secret = ws.instantiate_with(set, [("name", "secret"), ("value", "7")]);
    ws.insert_at_root(secret);
    let guess = ws.instantiate_with(set, [("name", "guess"), ("value", "7")]);
    ws.insert_at_root(guess);

    let branch = ws.instantiate_with(
        template(catalog, "if_else_block"),
        [("condition", "guess == secret")],
    );
    let branch_id = branch.id;
    ws.insert_at_root(branch);

    ws.set_selection(branch_id, false);
    let win = ws.instantiate_with(template(catalog, "print_msg"), [("message", "\"You got it!\"")]);
    ws.insert_at_cursor(win);

    ws.set_selection(branch_id, true);
    let lose = ws.instantiate_with(template(catalog, "print_msg"), [("message", "\"Try again!\"")]);
    ws.insert_at_cursor(lose);

    ws.clear_selection();
    ws
}

/// The countdown lesson: a counter decremented inside a repeat block.
fn build_countdown(catalog: &Catalog) -> Workspace {
    let mut ws = Workspace::new();

    let count = ws.instantiate_with(
        template(catalog, "var_create"),
        [("name", "count"), ("value", "3")],
    );
    ws.insert_at_root(count);

    let repeat = ws.instantiate_with(template(catalog, "repeat_times"), [("times", "3")]);
    let repeat_id = repeat.id;
    ws.insert_at_root(repeat);

    ws.set_selection(repeat_id, false);
    let show = ws.instantiate_with(template(catalog, "var_print"), [("name", "count")]);
    ws.insert_at_cursor(show);
    let step = ws.instantiate_with(
        template(catalog, "var_change"),
        [("name", "count"), ("value", "-1")],
    );
    ws.insert_at_cursor(step);

    ws.clear_selection();
    let done = ws.instantiate_with(template(catalog, "print_msg"), [("message", "\"Liftoff!\"")]);
    ws.insert_at_root(done);

    ws
}
