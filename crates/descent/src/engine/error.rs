//! Parse errors and failure rendering.

use std::fmt;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use descent_core::TextPos;

use super::expect::Expectation;

/// Errors surfaced by a parse. Element- and rule-level mismatches are
/// handled internally by back-tracking; only top-level exhaustion (or
/// the recursion guard) reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Parse(ParseFailure),

    #[error("recursion limit exceeded (depth {0})")]
    RecursionLimitExceeded(u32),
}

/// Top-level failure: the farthest position the parser reached and what
/// it expected there.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub pos: TextPos,
    pub expected: Vec<Expectation>,
}

impl ParseFailure {
    fn title(&self) -> String {
        let mut terminals: Vec<String> = Vec::new();
        for expectation in &self.expected {
            let text = expectation.expected.to_string();
            if !terminals.contains(&text) {
                terminals.push(text);
            }
        }
        if terminals.is_empty() {
            format!("parse failed at {}", self.pos)
        } else {
            format!("expected {}", terminals.join(" or "))
        }
    }

    /// Render the failure as an annotated snippet of the source.
    pub fn render(&self, source: &str) -> String {
        self.render_with(source, Renderer::plain())
    }

    /// Like [`ParseFailure::render`], with terminal colors.
    pub fn render_colored(&self, source: &str) -> String {
        self.render_with(source, Renderer::styled())
    }

    fn render_with(&self, source: &str, renderer: Renderer) -> String {
        let span = caret_span(self.pos.offset, source.len());
        let title = self.title();
        let label = match self.expected.first().and_then(|e| e.context.first()) {
            Some((name, _)) => format!("while parsing {name}"),
            None => "parsing cannot continue here".to_owned(),
        };
        let report: Vec<Group> = vec![Level::ERROR.primary_title(&title).element(
            Snippet::source(source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(span).label(&label)),
        )];
        renderer.render(&report).to_string()
    }
}

/// The failure position is a point; widen it to one byte for annotation,
/// clamped to the source.
fn caret_span(offset: usize, limit: usize) -> std::ops::Range<usize> {
    offset..(offset + 1).min(limit)
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} expected:", self.pos)?;
        if self.expected.is_empty() {
            write!(f, " (nothing recorded)")?;
            return Ok(());
        }
        for expectation in &self.expected {
            write!(f, "\n  {}", expectation.expected)?;
            let names: Vec<&str> = expectation
                .context
                .iter()
                .map(|(name, _)| name.as_str())
                .collect();
            if !names.is_empty() {
                write!(f, " in {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}
