//! Tracing instrumentation for debugging parses.
//!
//! The tracer is a zero-cost abstraction: [`NoopTracer`] methods are
//! empty `#[inline(always)]` functions and vanish from the compiled
//! engine, while [`PrintTracer`] collects an indented entry/exit log of
//! non-terminal activations.

use descent_core::TextPos;

/// Receives engine events during a parse.
pub trait Tracer {
    /// A non-terminal activation begins (cache misses only).
    fn enter_nonterminal(&mut self, name: &str, pos: TextPos);

    /// The activation ends, having matched or not.
    fn leave_nonterminal(&mut self, name: &str, matched: bool);

    /// The cache answered for a non-terminal at a position.
    fn cache_hit(&mut self, name: &str, pos: TextPos, matched: bool);

    /// A left-recursive alternative extended the current result.
    fn grow_recursive(&mut self, name: &str);
}

/// Tracer that does nothing and compiles to nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn enter_nonterminal(&mut self, _name: &str, _pos: TextPos) {}

    #[inline(always)]
    fn leave_nonterminal(&mut self, _name: &str, _matched: bool) {}

    #[inline(always)]
    fn cache_hit(&mut self, _name: &str, _pos: TextPos, _matched: bool) {}

    #[inline(always)]
    fn grow_recursive(&mut self, _name: &str) {}
}

/// Tracer that collects one line per event, indented by activation depth.
#[derive(Default)]
pub struct PrintTracer {
    lines: Vec<String>,
    depth: usize,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, line: String) {
        let indent = self.depth * 2;
        self.lines.push(format!("{:indent$}{line}", ""));
    }

    /// The collected trace as one string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

impl Tracer for PrintTracer {
    fn enter_nonterminal(&mut self, name: &str, pos: TextPos) {
        self.push(format!("enter {name} @{pos}"));
        self.depth += 1;
    }

    fn leave_nonterminal(&mut self, name: &str, matched: bool) {
        self.depth = self.depth.saturating_sub(1);
        let verdict = if matched { "match" } else { "fail" };
        self.push(format!("leave {name} = {verdict}"));
    }

    fn cache_hit(&mut self, name: &str, pos: TextPos, matched: bool) {
        let verdict = if matched { "match" } else { "fail" };
        self.push(format!("cache {name} @{pos} = {verdict}"));
    }

    fn grow_recursive(&mut self, name: &str) {
        self.push(format!("grow {name}"));
    }
}
