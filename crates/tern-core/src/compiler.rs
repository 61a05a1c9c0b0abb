//! Main compiler driver.
//!
//! High-level API for running the front-end pipeline over source files:
//! Read → Lex → Parse → Resolve → Type-complete. Every phase failure is
//! recorded in the context's diagnostics before it propagates, and a
//! failed phase prevents the later ones from running.

use crate::ast::Unit;
use crate::complete::{complete_types, TypeError};
use crate::context::CompilerContext;
use crate::diagnostic::Diagnostic;
use crate::resolve::{resolve, ResolveError};
use crate::source::SourceId;
use crate::syntax::parser::{parse_unit, ParseError};

use std::path::{Path, PathBuf};

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Compilation error.
#[derive(Debug)]
pub enum CompileError {
    /// Lexical or syntax error.
    Parse(ParseError),
    /// Unresolved symbol.
    Resolve(ResolveError),
    /// Kind mismatch or incomplete type.
    Type(TypeError),
    /// IO error.
    Io(std::io::Error),
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<ResolveError> for CompileError {
    fn from(e: ResolveError) -> Self {
        CompileError::Resolve(e)
    }
}

impl From<TypeError> for CompileError {
    fn from(e: TypeError) -> Self {
        CompileError::Type(e)
    }
}

impl From<std::io::Error> for CompileError {
    fn from(e: std::io::Error) -> Self {
        CompileError::Io(e)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Parse(e) => write!(f, "parse error: {}", e),
            CompileError::Resolve(e) => write!(f, "resolve error: {}", e),
            CompileError::Type(e) => write!(f, "type error: {}", e),
            CompileError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for CompileError {}

fn parse_error_to_diagnostic(e: &ParseError) -> Diagnostic {
    Diagnostic::error(e.to_string()).with_span(e.span())
}

fn resolve_error_to_diagnostic(e: &ResolveError) -> Diagnostic {
    Diagnostic::error(e.to_string()).with_span(e.span())
}

fn type_error_to_diagnostic(e: &TypeError) -> Diagnostic {
    let diag = Diagnostic::error(e.to_string());
    match e.span() {
        Some(span) => diag.with_span(span),
        None => diag,
    }
}

/// Compiler instance.
pub struct Compiler {
    ctx: CompilerContext,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> Self {
        Self {
            ctx: CompilerContext::new(),
        }
    }

    /// Get the compiler context.
    pub fn context(&self) -> &CompilerContext {
        &self.ctx
    }

    /// Get mutable compiler context.
    pub fn context_mut(&mut self) -> &mut CompilerContext {
        &mut self.ctx
    }

    /// Load and parse a source file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> CompileResult<Unit> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            self.ctx
                .diagnostics
                .push(Diagnostic::error(format!("cannot read {}: {}", path.display(), e)));
            CompileError::Io(e)
        })?;
        let source = self.ctx.source_map.add_file(path.to_path_buf(), content);
        self.parse_source_id(source)
    }

    /// Parse a source string.
    pub fn parse_source(&mut self, source_text: &str) -> CompileResult<Unit> {
        let source = self.ctx.source_map.add_inline(source_text);
        self.parse_source_id(source)
    }

    /// Parse an already-registered source.
    ///
    /// On failure, the error is added to diagnostics before it is
    /// returned.
    pub fn parse_source_id(&mut self, source: SourceId) -> CompileResult<Unit> {
        match parse_unit(&mut self.ctx, source) {
            Ok(unit) => {
                tracing::debug!(items = unit.items.len(), %source, "parsed");
                Ok(unit)
            }
            Err(e) => {
                self.ctx.diagnostics.push(parse_error_to_diagnostic(&e));
                Err(e.into())
            }
        }
    }

    /// Bind every symbol reference (after all sources have parsed).
    pub fn resolve(&mut self) -> CompileResult<()> {
        resolve(&mut self.ctx).map_err(|e| {
            self.ctx.diagnostics.push(resolve_error_to_diagnostic(&e));
            CompileError::Resolve(e)
        })
    }

    /// Bind and complete every type (after resolution).
    pub fn complete_types(&mut self) -> CompileResult<()> {
        complete_types(&mut self.ctx).map_err(|e| {
            self.ctx.diagnostics.push(type_error_to_diagnostic(&e));
            CompileError::Type(e)
        })
    }

    /// Run the full front-end over one source string.
    pub fn compile_source(&mut self, source_text: &str) -> CompileResult<Unit> {
        let unit = self.parse_source(source_text)?;
        self.resolve()?;
        self.complete_types()?;
        Ok(unit)
    }

    /// Run the full front-end over a list of files as one compilation.
    pub fn compile_files(&mut self, paths: &[PathBuf]) -> CompileResult<Vec<Unit>> {
        let mut units = Vec::new();
        for path in paths {
            units.push(self.load_file(path)?);
        }
        self.resolve()?;
        self.complete_types()?;
        Ok(units)
    }

    /// Check if there were any errors.
    pub fn has_errors(&self) -> bool {
        self.ctx.has_errors()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.ctx.error_count()
    }

    /// Render all diagnostics.
    pub fn render_diagnostics(&self) -> String {
        self.ctx.render_diagnostics()
    }
}
