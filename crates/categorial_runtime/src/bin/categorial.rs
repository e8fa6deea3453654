//! Categorial CLI entry point.

use std::env;
use std::process::ExitCode;

use categorial_engine::ParseConfig;
use categorial_runtime::{ParseReport, Repl, Session, brackets, render_all, save_to_file, to_json};

/// How parsed sentences are printed in batch mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Drawn derivations.
    #[default]
    Text,
    /// One bracketed tree per line.
    Brackets,
    /// A JSON array of parse reports.
    Json,
}

/// CLI configuration parsed from arguments.
#[derive(Debug, Default)]
struct CliConfig {
    grammar: Option<String>,
    sentences: Vec<String>,
    show_help: bool,
    show_version: bool,
    type_raising: bool,
    no_semantics: bool,
    format: OutputFormat,
    max_derivations: Option<usize>,
    generate: Option<usize>,
    seed: u64,
    save_snapshot: Option<String>,
}

impl CliConfig {
    /// True when there is batch work to do instead of starting the REPL.
    fn is_batch(&self) -> bool {
        !self.sentences.is_empty() || self.generate.is_some() || self.save_snapshot.is_some()
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn option_value<'a>(
    args: &'a [String],
    i: &mut usize,
    name: &str,
) -> Result<&'a str, Box<dyn std::error::Error>> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{name} requires a value").into())
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--raise" => config.type_raising = true,
            "--no-sem" => config.no_semantics = true,
            "--json" => config.format = OutputFormat::Json,
            "--brackets" => config.format = OutputFormat::Brackets,
            "--max-derivations" => {
                let value = option_value(args, &mut i, "--max-derivations")?;
                config.max_derivations = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --max-derivations value: {value}"))?,
                );
            }
            "--generate" => {
                let value = option_value(args, &mut i, "--generate")?;
                config.generate = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --generate value: {value}"))?,
                );
            }
            "--seed" => {
                let value = option_value(args, &mut i, "--seed")?;
                config.seed = value
                    .parse()
                    .map_err(|_| format!("invalid --seed value: {value}"))?;
            }
            "--save-snapshot" => {
                let value = option_value(args, &mut i, "--save-snapshot")?;
                config.save_snapshot = Some(value.to_string());
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option: {arg}").into());
            }
            positional => {
                if config.grammar.is_none() {
                    config.grammar = Some(positional.to_string());
                } else {
                    config.sentences.push(positional.to_string());
                }
            }
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("categorial {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut parse_config = ParseConfig::default();
    if let Some(max) = config.max_derivations {
        parse_config = parse_config.with_max_derivations(max);
    }
    let mut session = Session::new()
        .with_config(parse_config)
        .with_seed(config.seed);

    match &config.grammar {
        Some(path) => {
            session.load_grammar(path).map_err(|e| match &e.context {
                Some(context) => format!("{e} {context}"),
                None => e.to_string(),
            })?;
        }
        None if config.is_batch() => return Err("a grammar file is required".into()),
        None => {}
    }
    if let Some(grammar) = session.grammar_mut() {
        grammar.set_type_raising(config.type_raising);
        grammar.set_semantics(!config.no_semantics);
    }

    if !config.is_batch() {
        let mut repl = Repl::new()?.with_session(session);
        repl.run()?;
        return Ok(());
    }

    if let Some(path) = &config.save_snapshot {
        save_to_file(session.require_grammar()?, path)?;
        eprintln!("Saved snapshot to {path}");
    }

    if let Some(count) = config.generate {
        for sentence in session.generate(count)? {
            println!("{sentence}");
        }
    }

    if !config.sentences.is_empty() {
        parse_sentences(&mut session, &config)?;
    }
    Ok(())
}

fn parse_sentences(
    session: &mut Session,
    config: &CliConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let semantics = !config.no_semantics;
    let mut reports = Vec::new();

    for (i, sentence) in config.sentences.iter().enumerate() {
        let parse = session.parse(sentence)?;
        match config.format {
            OutputFormat::Json => reports.push(ParseReport::new(sentence.as_str(), &parse)),
            OutputFormat::Brackets => {
                for tree in parse.derivations() {
                    println!("{}", brackets(tree));
                }
                if parse.is_empty() {
                    println!("()");
                }
            }
            OutputFormat::Text => {
                if i > 0 {
                    println!();
                }
                println!("\x1b[1m{sentence}\x1b[0m");
                if parse.is_empty() {
                    println!("No parse.");
                } else {
                    println!("{}", render_all(parse.derivations(), semantics));
                }
            }
        }
    }

    if config.format == OutputFormat::Json {
        println!("{}", to_json(&reports)?);
    }
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mCategorial\x1b[0m - Weighted CKY parser for combinatory categorial grammars

\x1b[1mUSAGE:\x1b[0m
    categorial [OPTIONS] [GRAMMAR] [SENTENCES...]

\x1b[1mARGUMENTS:\x1b[0m
    [GRAMMAR]        Grammar source file, or a .msgpack snapshot
    [SENTENCES...]   Sentences to parse (quote each one); without any,
                     an interactive REPL starts

\x1b[1mOPTIONS:\x1b[0m
    -h, --help               Print help information
    -V, --version            Print version information
    --raise                  Enable type raising
    --no-sem                 Disable semantic composition
    --json                   Print parses as JSON
    --brackets               Print parses as bracketed trees
    --max-derivations N      Fail when a sentence has more than N best derivations
    --generate N             Print N random sentences of the start category
    --seed S                 Seed for --generate and :gen (default 0)
    --save-snapshot PATH     Save the loaded grammar as a .msgpack snapshot

\x1b[1mEXAMPLES:\x1b[0m
    categorial french.ccg                      Start the REPL with a grammar
    categorial french.ccg \"Le chat dort\"       Parse one sentence
    categorial --json french.ccg \"Le chat dort\" Print the parse as JSON
    categorial --generate 5 --seed 42 french.ccg

\x1b[1mREPL COMMANDS:\x1b[0m
    :load PATH       Load a grammar or snapshot
    :raise on|off    Toggle type raising
    :sem on|off      Toggle semantics
    :stats           Chart statistics of the last parse
    :gen [N]         Generate sentences
    :help            List every command
    Ctrl+D           Exit REPL"
    );
}
