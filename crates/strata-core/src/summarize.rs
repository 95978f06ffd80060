//! Built-in summarization strategies.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::Summarizer;
use crate::types::{Block, Document};

/// Keeps the leading sentence of every node and joins them.
///
/// Deterministic and offline; useful as a baseline and for tests.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    pub max_chars: usize,
    pub separator: String,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self { Self { max_chars: 600, separator: " ".to_string() } }
}

impl ExtractiveSummarizer {
    pub fn new() -> Self { Self::default() }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_separator(mut self, sep: impl Into<String>) -> Self {
        self.separator = sep.into();
        self
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, block: &Block) -> Result<Document> {
        let leads: Vec<&str> = block.nodes.iter().map(|n| leading_sentence(&n.text)).filter(|s| !s.is_empty()).collect();
        if leads.is_empty() {
            return Err(Error::Summarization(format!("block [{}] has no text", block.node_ids().join(", "))));
        }
        let text = truncate_chars(&leads.join(&self.separator), self.max_chars);
        Ok(Document::summary_of(text, &block.nodes))
    }
}

/// Pipes the block text to an external program and uses its stdout.
///
/// Intended for local LLM command-line tools. The call is blocking; any
/// timeout belongs to the program itself.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    program: String,
    args: Vec<String>,
}

impl CommandSummarizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// First element is the program, the rest its arguments.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| Error::InvalidConfig("summarizer command is empty".into()))?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }
}

impl Summarizer for CommandSummarizer {
    fn summarize(&self, block: &Block) -> Result<Document> {
        let input = block.text("\n\n");
        debug!(program = %self.program, nodes = block.len(), bytes = input.len(), "running summarizer command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Summarization(format!("failed to start {}: {e}", self.program)))?;
        let mut stdin = child.stdin.take().ok_or_else(|| Error::Summarization(format!("{} has no stdin", self.program)))?;
        // stdin is fed from its own thread while stdout and stderr are drained
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || stdin.write_all(input.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output.map_err(|e| Error::Summarization(format!("{} failed: {e}", self.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Summarization(format!("{} exited with {}: {}", self.program, output.status, stderr.trim())));
        }
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(Error::Summarization(format!("failed to write to {}: {e}", self.program))),
            Err(_) => return Err(Error::Summarization(format!("stdin writer for {} panicked", self.program))),
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(Error::Summarization(format!("{} returned no summary", self.program)));
        }
        Ok(Document::summary_of(text, &block.nodes))
    }
}

fn leading_sentence(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().find(|&(i, c)| matches!(c, '.' | '!' | '?') && text[i + c.len_utf8()..].starts_with(char::is_whitespace)) {
        Some((i, c)) => &text[..i + c.len_utf8()],
        None => text,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars { return text.to_string(); }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}
