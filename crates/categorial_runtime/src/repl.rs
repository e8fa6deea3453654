//! The interactive REPL.
//!
//! Every input line is either a `:command` or a sentence. Sentences are
//! parsed with the session grammar and their best derivations drawn with
//! [`render_all`](crate::render::render_all).

use std::fmt::Write as _;
use std::io::{self, Write};

use categorial_foundation::{Error, Result};
use categorial_grammar::{Grammar, parse_category};

use crate::editor::{COMMANDS, LineEditor, ReadResult, RustylineEditor};
use crate::render;
use crate::serialize;
use crate::session::Session;

/// What the REPL does after evaluating one input.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print this text.
    Output(String),
    /// Print nothing.
    Silent,
    /// Leave the loop.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Session state (grammar, limits, seed).
    session: Session,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            show_banner: true,
            prompt: "ccg> ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self.refresh_words();
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        while self.read_eval_print()? {}

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let input = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => {
                println!();
                return Ok(true);
            }
            ReadResult::Eof => return Ok(false),
        };

        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(Reply::Output(text)) => println!("{text}"),
            Ok(Reply::Silent) => {}
            Ok(Reply::Quit) => return Ok(false),
            Err(e) => self.print_error(&e),
        }
        Ok(true)
    }

    /// Evaluates one input line.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, bad arguments, load failures,
    /// and exceeded parse limits. A sentence without a derivation is not an
    /// error.
    pub fn eval(&mut self, input: &str) -> Result<Reply> {
        let input = input.trim();
        if input.is_empty() || input.starts_with('#') {
            return Ok(Reply::Silent);
        }
        if let Some(command) = input.strip_prefix(':') {
            let (name, args) = command
                .split_once(char::is_whitespace)
                .map_or((command, ""), |(name, args)| (name, args.trim()));
            return self.command(name, args);
        }
        self.parse_sentence(input).map(Reply::Output)
    }

    fn parse_sentence(&mut self, sentence: &str) -> Result<String> {
        let parse = self.session.parse(sentence)?;
        if parse.is_empty() {
            return Ok("No parse.".to_string());
        }
        let semantics = self.session.require_grammar()?.use_semantics();
        Ok(render::render_all(parse.derivations(), semantics))
    }

    fn command(&mut self, name: &str, args: &str) -> Result<Reply> {
        match name {
            "load" => self.load(args),
            "save" => self.save(args),
            "raise" => self.toggle(Flag::TypeRaising, args),
            "sem" => self.toggle(Flag::Semantics, args),
            "stats" => Ok(Reply::Output(self.stats())),
            "gen" => self.generate(args),
            "start" => self.start(args),
            "lex" => self.lexicon(args),
            "help" | "h" => Ok(Reply::Output(help_text())),
            "quit" | "q" | "exit" => Ok(Reply::Quit),
            other => Err(Error::internal(format!(
                "unknown command ':{other}' (try :help)"
            ))),
        }
    }

    fn load(&mut self, path: &str) -> Result<Reply> {
        if path.is_empty() {
            return Err(Error::internal("usage: :load PATH"));
        }
        let grammar = self.session.load_grammar(path)?;
        let summary = format!(
            "Loaded {path}: {} words, {} entries, start {}",
            grammar.word_count(),
            grammar.entry_count(),
            grammar.start()
        );
        self.refresh_words();
        Ok(Reply::Output(summary))
    }

    fn save(&mut self, path: &str) -> Result<Reply> {
        if path.is_empty() {
            return Err(Error::internal("usage: :save PATH"));
        }
        let resolved = self.session.resolve_path(path);
        serialize::save_to_file(self.session.require_grammar()?, &resolved)?;
        Ok(Reply::Output(format!("Saved snapshot to {}", resolved.display())))
    }

    fn toggle(&mut self, flag: Flag, arg: &str) -> Result<Reply> {
        let on = match arg {
            "on" => true,
            "off" => false,
            "" => flag.get(self.session.require_grammar()?),
            other => {
                return Err(Error::internal(format!(
                    "expected 'on' or 'off', got '{other}'"
                )));
            }
        };
        let grammar = self
            .session
            .grammar_mut()
            .ok_or_else(|| Error::internal("no grammar loaded (use :load PATH)"))?;
        flag.set(grammar, on);
        Ok(Reply::Output(format!(
            "{}: {}",
            flag.label(),
            if on { "on" } else { "off" }
        )))
    }

    fn stats(&self) -> String {
        match self.session.last_stats() {
            Some(stats) => format!(
                "cells: {}, judgements: {}, backpointers: {}, raised: {}",
                stats.cells, stats.judgements, stats.backpointers, stats.raised
            ),
            None => "No parse yet.".to_string(),
        }
    }

    fn generate(&mut self, arg: &str) -> Result<Reply> {
        let count = if arg.is_empty() {
            1
        } else {
            arg.parse::<usize>()
                .map_err(|_| Error::internal(format!("expected a count, got '{arg}'")))?
        };
        let sentences = self.session.generate(count)?;
        if sentences.is_empty() {
            return Ok(Reply::Output("No sentence generated.".to_string()));
        }
        Ok(Reply::Output(sentences.join("\n")))
    }

    fn start(&mut self, arg: &str) -> Result<Reply> {
        if arg.is_empty() {
            let start = self.session.require_grammar()?.start();
            return Ok(Reply::Output(format!("start: {start}")));
        }
        let category = parse_category(arg)?;
        let grammar = self
            .session
            .grammar_mut()
            .ok_or_else(|| Error::internal("no grammar loaded (use :load PATH)"))?;
        let reply = format!("start: {category}");
        grammar.set_start(category);
        Ok(Reply::Output(reply))
    }

    fn lexicon(&self, word: &str) -> Result<Reply> {
        let grammar = self.session.require_grammar()?;
        if word.is_empty() {
            return Err(Error::internal("usage: :lex WORD"));
        }
        let entries = grammar.entries(word);
        if entries.is_empty() {
            return Ok(Reply::Output(format!("{word}: not in lexicon")));
        }
        let mut out = String::new();
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{word} => {entry}");
        }
        Ok(Reply::Output(out))
    }

    /// Offers the lexicon of the current grammar for completion.
    fn refresh_words(&mut self) {
        let words = self
            .session
            .grammar()
            .map(|grammar| grammar.lexicon().map(|(word, _)| word.clone()).collect())
            .unwrap_or_default();
        self.editor.set_words(words);
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        match &error.context {
            Some(context) => eprintln!("\x1b[31mError: {error} {context}\x1b[0m"),
            None => eprintln!("\x1b[31mError: {error}\x1b[0m"),
        }
    }

    /// Prints the welcome banner.
    fn print_banner(&self) {
        println!("\x1b[1;36mCategorial\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        match self.session.grammar() {
            Some(grammar) => println!(
                "Grammar: {} words, start {}",
                grammar.word_count(),
                grammar.start()
            ),
            None => println!("No grammar loaded. Use :load PATH."),
        }
        println!("Type a sentence to parse it, :help for commands, Ctrl+D to exit.\n");

        // Flush to ensure banner appears
        let _ = io::stdout().flush();
    }
}

/// Grammar switches exposed as `on|off` commands.
#[derive(Clone, Copy)]
enum Flag {
    TypeRaising,
    Semantics,
}

impl Flag {
    const fn label(self) -> &'static str {
        match self {
            Self::TypeRaising => "type raising",
            Self::Semantics => "semantics",
        }
    }

    const fn get(self, grammar: &Grammar) -> bool {
        match self {
            Self::TypeRaising => grammar.use_type_raising(),
            Self::Semantics => grammar.use_semantics(),
        }
    }

    fn set(self, grammar: &mut Grammar, on: bool) {
        match self {
            Self::TypeRaising => grammar.set_type_raising(on),
            Self::Semantics => grammar.set_semantics(on),
        }
    }
}

fn help_text() -> String {
    let descriptions = [
        ("PATH", "load a grammar source file or .msgpack snapshot"),
        ("PATH", "save the grammar as a snapshot"),
        ("[on|off]", "toggle type raising"),
        ("[on|off]", "toggle semantic composition"),
        ("", "chart statistics of the last parse"),
        ("[N]", "generate N sentences (default 1)"),
        ("[CAT]", "show or set the start category"),
        ("WORD", "show the lexical entries of a word"),
        ("", "show this help"),
        ("", "leave the REPL"),
    ];
    let mut out = String::from("Any other input is parsed as a sentence.\n");
    for (command, (args, description)) in COMMANDS.iter().zip(descriptions) {
        let usage = format!("{command} {args}");
        let _ = write!(out, "\n  {usage:<18}{description}");
    }
    out
}
