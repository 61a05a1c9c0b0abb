//! Parser for Tern.
//!
//! Recursive descent for declarations and statements, precedence climbing
//! for expressions. The parser does not build a tree: it appends entities
//! to the context's arenas as productions complete, maintaining the
//! dense-linking invariant for parameter, child-statement, and
//! call-argument runs by flushing a container's children when the
//! container closes (nested containers close, and flush, first).

use crate::ast::{
    Array, BinopKind, CallArg, ChildStmt, Data, Expr, ExprKind, Item, Param, Proc, Stmt, StmtKind,
    Unit, UnopKind,
};
use crate::context::CompilerContext;
use crate::ids::{ArrayId, DataId, ExprId, ProcId, ScopeId, StmtId, SymbolId, TokenId, TypeId};
use crate::interner::Name;
use crate::source::{SourceId, Span};
use crate::symbols::{ScopeKind, SymbolKind};
use crate::syntax::lexer::lex;
use crate::syntax::token::TokenKind;

/// Maximum depth of the scope stack, the global scope included.
pub const MAX_SCOPE_DEPTH: usize = 16;

/// Parse error with source location.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized byte 0x{byte:02x}")]
    UnrecognizedByte { byte: u8, span: Span },

    #[error("integer literal does not fit a signed 64-bit value")]
    IntegerOverflow { span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unknown escape `\\{ch}`")]
    UnknownEscape { ch: char, span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String, span: Span },

    #[error("scope overflow: nesting deeper than {MAX_SCOPE_DEPTH} levels")]
    ScopeOverflow { span: Span },

    #[error("duplicate symbol `{name}`")]
    DuplicateSymbol { name: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnrecognizedByte { span, .. }
            | ParseError::IntegerOverflow { span }
            | ParseError::UnterminatedString { span }
            | ParseError::UnknownEscape { span, .. }
            | ParseError::UnterminatedComment { span }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::ScopeOverflow { span }
            | ParseError::DuplicateSymbol { span, .. } => *span,
        }
    }
}

/// Map a token to the prefix operator it introduces, if any.
fn prefix_unop(kind: TokenKind) -> Option<UnopKind> {
    match kind {
        TokenKind::Tilde => Some(UnopKind::InvertBits),
        TokenKind::Bang => Some(UnopKind::Not),
        TokenKind::Amp => Some(UnopKind::AddressOf),
        TokenKind::Caret => Some(UnopKind::Deref),
        TokenKind::Minus => Some(UnopKind::Negative),
        TokenKind::Plus => Some(UnopKind::Positive),
        TokenKind::MinusMinus => Some(UnopKind::PreDecrement),
        TokenKind::PlusPlus => Some(UnopKind::PreIncrement),
        _ => None,
    }
}

/// Map a token to the postfix operator it introduces, if any.
fn postfix_unop(kind: TokenKind) -> Option<UnopKind> {
    match kind {
        TokenKind::PlusPlus => Some(UnopKind::PostIncrement),
        TokenKind::MinusMinus => Some(UnopKind::PostDecrement),
        _ => None,
    }
}

/// Map a token to the binary operator it introduces, if any.
fn binop(kind: TokenKind) -> Option<BinopKind> {
    match kind {
        TokenKind::Assign => Some(BinopKind::Assign),
        TokenKind::EqEq => Some(BinopKind::Equals),
        TokenKind::Minus => Some(BinopKind::Minus),
        TokenKind::Plus => Some(BinopKind::Plus),
        TokenKind::Star => Some(BinopKind::Mul),
        TokenKind::Slash => Some(BinopKind::Div),
        TokenKind::Amp => Some(BinopKind::BitAnd),
        TokenKind::Pipe => Some(BinopKind::BitOr),
        TokenKind::Caret => Some(BinopKind::BitXor),
        _ => None,
    }
}

/// Lex and parse one source file into the context's arenas.
pub fn parse_unit(ctx: &mut CompilerContext, source: SourceId) -> Result<Unit, ParseError> {
    let interner = ctx.interner.clone();
    let source_text = &ctx
        .source_map
        .get(source)
        .expect("source not registered in source map")
        .content;
    let src_len = source_text.len();
    let token_ids = lex(source_text, source, &interner, &mut ctx.ast.tokens)?;

    tracing::debug!(tokens = token_ids.len(), %source, "lexed");

    let global = ctx.syms.global_scope();
    let mut parser = Parser {
        ctx,
        source,
        src_len,
        token_ids,
        pos: 0,
        scope_stack: vec![global],
    };
    parser.parse_items()
}

struct Parser<'ctx> {
    ctx: &'ctx mut CompilerContext,
    source: SourceId,
    src_len: usize,
    token_ids: Vec<TokenId>,
    pos: usize,
    scope_stack: Vec<ScopeId>,
}

impl<'ctx> Parser<'ctx> {
    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn at_eof(&self) -> bool {
        self.pos >= self.token_ids.len()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.token_ids
            .get(self.pos)
            .map(|&id| self.ctx.ast.tokens[id].kind)
    }

    fn advance(&mut self) -> TokenId {
        let id = self.token_ids[self.pos];
        self.pos += 1;
        id
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Span of the current token, or a point span at end of input.
    fn here(&self) -> Span {
        match self.token_ids.get(self.pos) {
            Some(&id) => self.ctx.ast.tokens[id].span(),
            None => Span::point(self.source, self.src_len),
        }
    }

    fn found(&self, kind: TokenKind) -> String {
        match kind {
            TokenKind::Word(name) => format!("`{}`", self.ctx.str(name)),
            TokenKind::Int(value) => format!("`{}`", value),
            other => other.describe().to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek_kind() {
            Some(kind) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.found(kind),
                span: self.here(),
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span: self.here(),
            },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<TokenId, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<(TokenId, Name), ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Word(name)) => Ok((self.advance(), name)),
            _ => Err(self.unexpected(expected)),
        }
    }

    // ------------------------------------------------------------------
    // Scope stack
    // ------------------------------------------------------------------

    fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack underflow")
    }

    fn push_scope(&mut self, kind: ScopeKind) -> Result<ScopeId, ParseError> {
        if self.scope_stack.len() >= MAX_SCOPE_DEPTH {
            return Err(ParseError::ScopeOverflow { span: self.here() });
        }
        let scope = self.ctx.syms.new_scope(self.current_scope(), kind);
        self.scope_stack.push(scope);
        Ok(scope)
    }

    fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn define(&mut self, name: Name, tok: TokenId, kind: SymbolKind) -> Result<SymbolId, ParseError> {
        let scope = self.current_scope();
        self.ctx
            .syms
            .define(scope, name, kind)
            .map_err(|_| ParseError::DuplicateSymbol {
                name: self.ctx.str(name),
                span: self.ctx.ast.tokens[tok].span(),
            })
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_items(&mut self) -> Result<Unit, ParseError> {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_global_decl()?);
        }
        Ok(Unit {
            source: self.source,
            items,
        })
    }

    fn parse_global_decl(&mut self) -> Result<Item, ParseError> {
        let kw = self.ctx.kw;
        match self.peek_kind() {
            Some(TokenKind::Word(name)) if name == kw.kw_data => {
                self.advance();
                Ok(Item::Data(self.parse_data_decl()?))
            }
            Some(TokenKind::Word(name)) if name == kw.kw_array => {
                self.advance();
                Ok(Item::Array(self.parse_array_decl()?))
            }
            Some(TokenKind::Word(name)) if name == kw.kw_proc => {
                self.advance();
                Ok(Item::Proc(self.parse_proc_decl()?))
            }
            Some(TokenKind::Word(name)) if name == kw.kw_entity => {
                self.advance();
                Ok(Item::Entity(self.parse_entity_decl()?))
            }
            _ => Err(self.unexpected("`data`, `array`, `proc`, or `entity`")),
        }
    }

    /// A type position: `NAME` or `^NAME`, either way a reference type
    /// whose symref is resolved after parsing.
    fn parse_type(&mut self) -> Result<TypeId, ParseError> {
        let pointer = self.eat(TokenKind::Caret);
        let (tok, name) = self.expect_word("a type name")?;
        let symref = self.ctx.syms.add_symref(name, self.current_scope(), tok);
        Ok(self.ctx.types.reference(symref, pointer))
    }

    fn parse_data_decl(&mut self) -> Result<DataId, ParseError> {
        let (name_tok, name) = self.expect_word("a name")?;
        let tp = self.parse_type()?;
        self.expect(TokenKind::Semicolon, "`;`")?;

        let data = self.ctx.ast.datas.next_idx();
        let sym = self.define(name, name_tok, SymbolKind::Data(data))?;
        self.ctx.ast.datas.push(Data {
            scope: self.current_scope(),
            tp,
            sym,
        });
        Ok(data)
    }

    fn parse_array_decl(&mut self) -> Result<ArrayId, ParseError> {
        let (name_tok, name) = self.expect_word("a name")?;
        self.expect(TokenKind::LBracket, "`[`")?;
        let index = self.parse_type()?;
        self.expect(TokenKind::RBracket, "`]`")?;
        let value = self.parse_type()?;
        self.expect(TokenKind::Semicolon, "`;`")?;

        let tp = self.ctx.types.array(index, value);
        let array = self.ctx.ast.arrays.next_idx();
        let sym = self.define(name, name_tok, SymbolKind::Array(array))?;
        self.ctx.ast.arrays.push(Array {
            scope: self.current_scope(),
            tp,
            sym,
        });
        Ok(array)
    }

    fn parse_entity_decl(&mut self) -> Result<TypeId, ParseError> {
        let (name_tok, name) = self.expect_word("a name")?;
        let inner = self.parse_type()?;
        self.expect(TokenKind::Semicolon, "`;`")?;

        let tp = self.ctx.types.entity(name, inner);
        self.define(name, name_tok, SymbolKind::Type(tp))?;
        Ok(tp)
    }

    fn parse_proc_decl(&mut self) -> Result<ProcId, ParseError> {
        let (name_tok, name) = self.expect_word("a name")?;
        self.expect(TokenKind::LParen, "`(`")?;

        let mut params: Vec<(TokenId, Name, TypeId)> = Vec::new();
        while !self.check(TokenKind::RParen) {
            let (ptok, pname) = self.expect_word("a parameter name or `)`")?;
            let ptp = self.parse_type()?;
            params.push((ptok, pname, ptp));
        }
        self.expect(TokenKind::RParen, "`)`")?;
        let ret = self.parse_type()?;

        let param_tps: Vec<TypeId> = params.iter().map(|&(_, _, tp)| tp).collect();
        let proc_tp = self.ctx.types.proc(ret, &param_tps);

        let proc = self.ctx.ast.procs.next_idx();
        let sym = self.define(name, name_tok, SymbolKind::Proc(proc))?;
        let scope = self.push_scope(ScopeKind::Proc(proc))?;

        let first_param = self.ctx.ast.params.next_idx();
        for (rank, &(ptok, pname, ptp)) in params.iter().enumerate() {
            let param = self.ctx.ast.params.next_idx();
            let psym = self.define(pname, ptok, SymbolKind::Param(param))?;
            self.ctx.ast.params.push(Param {
                proc,
                sym: psym,
                tp: ptp,
                rank: rank as u32,
            });
        }

        self.ctx.ast.procs.push(Proc {
            scope,
            tp: proc_tp,
            sym,
            nparams: params.len() as u32,
            first_param,
            body: None,
        });

        let body = self.parse_compound_stmt()?;
        self.pop_scope();
        self.ctx.ast.set_proc_body(proc, body);
        Ok(proc)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn push_stmt(&mut self, kind: StmtKind) -> StmtId {
        self.ctx.ast.stmts.push(Stmt { kind })
    }

    fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        let kw = self.ctx.kw;
        match self.peek_kind() {
            Some(TokenKind::LBrace) => self.parse_compound_stmt(),
            Some(TokenKind::Word(name)) if name == kw.kw_if => {
                self.advance();
                self.parse_if_stmt()
            }
            Some(TokenKind::Word(name)) if name == kw.kw_while => {
                self.advance();
                self.parse_while_stmt()
            }
            Some(TokenKind::Word(name)) if name == kw.kw_for => {
                self.advance();
                self.parse_for_stmt()
            }
            Some(TokenKind::Word(name)) if name == kw.kw_return => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "`;`")?;
                Ok(self.push_stmt(StmtKind::Return { expr }))
            }
            Some(TokenKind::Word(name)) if name == kw.kw_data => {
                self.advance();
                let data = self.parse_data_decl()?;
                Ok(self.push_stmt(StmtKind::Data(data)))
            }
            Some(TokenKind::Word(name)) if name == kw.kw_array => {
                self.advance();
                let array = self.parse_array_decl()?;
                Ok(self.push_stmt(StmtKind::Array(array)))
            }
            Some(_) => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "`;`")?;
                Ok(self.push_stmt(StmtKind::Expr { expr }))
            }
            None => Err(self.unexpected("a statement")),
        }
    }

    fn parse_compound_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.expect(TokenKind::LBrace, "`{`")?;
        self.push_scope(ScopeKind::Block)?;

        let mut children = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.at_eof() {
                return Err(self.unexpected("`}`"));
            }
            children.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        self.pop_scope();

        let first_child = self.ctx.ast.child_stmts.next_idx();
        let stmt = self.push_stmt(StmtKind::Compound {
            nchildren: children.len() as u32,
            first_child,
        });
        for (rank, child) in children.into_iter().enumerate() {
            self.ctx.ast.child_stmts.push(ChildStmt {
                parent: stmt,
                child,
                rank: rank as u32,
            });
        }
        Ok(stmt)
    }

    fn parse_if_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_stmt()?;
        Ok(self.push_stmt(StmtKind::If { cond, body }))
    }

    fn parse_while_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_stmt()?;
        Ok(self.push_stmt(StmtKind::While { cond, body }))
    }

    /// An init/step clause of a `for` head: an expression statement whose
    /// terminator belongs to the `for` syntax, not the clause.
    fn parse_clause_stmt(&mut self) -> Result<StmtId, ParseError> {
        let expr = self.parse_expr()?;
        Ok(self.push_stmt(StmtKind::Expr { expr }))
    }

    fn parse_for_stmt(&mut self) -> Result<StmtId, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let init = self.parse_clause_stmt()?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        let step = self.parse_clause_stmt()?;
        self.expect(TokenKind::RParen, "`)`")?;
        let body = self.parse_stmt()?;
        Ok(self.push_stmt(StmtKind::For {
            init,
            cond,
            step,
            body,
        }))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn push_expr(&mut self, kind: ExprKind) -> ExprId {
        self.ctx.ast.exprs.push(Expr { kind, ty: None })
    }

    fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.parse_expr_prec(0)
    }

    /// Precedence climbing: consume binops whose precedence is at least
    /// `min_prec`, recursing with `prec + 1` (left-associative) or `prec`
    /// (right-associative, i.e. assignment) for the right operand.
    fn parse_expr_prec(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some(op) = self.peek_kind().and_then(binop) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let tok = self.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let rhs = self.parse_expr_prec(next_min)?;
            lhs = self.push_expr(ExprKind::Binop { op, tok, lhs, rhs });
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        if let Some(op) = self.peek_kind().and_then(prefix_unop) {
            let tok = self.advance();
            let operand = self.parse_unary()?;
            return Ok(self.push_expr(ExprKind::Unop { op, tok, operand }));
        }
        let primary = self.parse_primary()?;
        self.parse_suffixes(primary)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Int(_)) | Some(TokenKind::Str(_)) => {
                let tok = self.advance();
                Ok(self.push_expr(ExprKind::Literal { tok }))
            }
            Some(TokenKind::Word(name)) => {
                let tok = self.advance();
                let symref = self.ctx.syms.add_symref(name, self.current_scope(), tok);
                Ok(self.push_expr(ExprKind::Symref { symref }))
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Greedily consume call, subscript, member, and postfix-operator
    /// suffixes after a primary.
    fn parse_suffixes(&mut self, mut expr: ExprId) -> Result<ExprId, ParseError> {
        loop {
            match self.peek_kind() {
                Some(TokenKind::LParen) => {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.eat(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RParen, "`)`")?;

                    let first_arg = self.ctx.ast.call_args.next_idx();
                    let call = self.push_expr(ExprKind::Call {
                        callee: expr,
                        first_arg,
                        nargs: args.len() as u32,
                    });
                    for (rank, arg) in args.into_iter().enumerate() {
                        self.ctx.ast.call_args.push(CallArg {
                            call,
                            arg,
                            rank: rank as u32,
                        });
                    }
                    expr = call;
                }
                Some(TokenKind::LBracket) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "`]`")?;
                    expr = self.push_expr(ExprKind::Subscript { base: expr, index });
                }
                Some(TokenKind::Dot) => {
                    self.advance();
                    let (_, name) = self.expect_word("a member name")?;
                    expr = self.push_expr(ExprKind::Member { base: expr, name });
                }
                Some(kind) => match postfix_unop(kind) {
                    Some(op) => {
                        let tok = self.advance();
                        expr = self.push_expr(ExprKind::Unop {
                            op,
                            tok,
                            operand: expr,
                        });
                    }
                    None => break,
                },
                None => break,
            }
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinopKind, ExprKind, Item, StmtKind, UnopKind};
    use crate::syntax::token::TokenKind;

    fn parse_ok(src: &str) -> (CompilerContext, Unit) {
        let mut ctx = CompilerContext::new();
        let source = ctx.source_map.add_inline(src);
        let unit = parse_unit(&mut ctx, source).expect("parse failed");
        (ctx, unit)
    }

    fn parse_err(src: &str) -> ParseError {
        let mut ctx = CompilerContext::new();
        let source = ctx.source_map.add_inline(src);
        parse_unit(&mut ctx, source).expect_err("expected parse failure")
    }

    /// The expression of the first statement of the first proc's body.
    fn first_body_expr(ctx: &CompilerContext, unit: &Unit) -> ExprId {
        let proc = unit
            .items
            .iter()
            .find_map(|item| match item {
                Item::Proc(p) => Some(*p),
                _ => None,
            })
            .expect("no proc in unit");
        let body = ctx.ast.procs[proc].body.expect("proc has no body");
        let (first_child, nchildren) = match ctx.ast.stmts[body].kind {
            StmtKind::Compound {
                first_child,
                nchildren,
            } => (first_child, nchildren),
            ref other => panic!("expected compound body, got {:?}", other),
        };
        assert!(nchildren > 0, "empty body");
        let child = ctx.ast.child_run(first_child, nchildren)[0].child;
        match ctx.ast.stmts[child].kind {
            StmtKind::Expr { expr } => expr,
            ref other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn parse_expr_str(src: &str) -> (CompilerContext, ExprId) {
        let (ctx, unit) = parse_ok(&format!("proc main () int {{ {}; }}", src));
        let expr = first_body_expr(&ctx, &unit);
        (ctx, expr)
    }

    fn literal_value(ctx: &CompilerContext, expr: ExprId) -> i64 {
        match ctx.ast.exprs[expr].kind {
            ExprKind::Literal { tok } => match ctx.ast.tokens[tok].kind {
                TokenKind::Int(v) => v,
                ref other => panic!("expected integer literal, got {:?}", other),
            },
            ref other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_has_no_items() {
        let (_, unit) = parse_ok("");
        assert!(unit.items.is_empty());
    }

    #[test]
    fn test_data_decl_defines_symbol() {
        let (ctx, unit) = parse_ok("data x int;");
        assert_eq!(unit.items.len(), 1);

        let x = ctx.intern("x");
        let sym = ctx.syms.lookup(ctx.syms.global_scope(), x).expect("x undefined");
        match ctx.syms.symbol(sym).kind {
            SymbolKind::Data(data) => assert_eq!(ctx.ast.datas[data].sym, sym),
            other => panic!("expected data symbol, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_decl_without_semicolon() {
        match parse_err("data x int") {
            ParseError::UnexpectedEof { expected, .. } => assert_eq!(expected, "`;`"),
            other => panic!("expected eof error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_symbol_is_fatal() {
        match parse_err("data x int; data x int;") {
            ParseError::DuplicateSymbol { name, .. } => assert_eq!(name, "x"),
            other => panic!("expected duplicate symbol, got {:?}", other),
        }
    }

    #[test]
    fn test_proc_params_are_dense() {
        let (ctx, unit) = parse_ok("proc f (a int b int c byte) int { return a; }");

        let proc = match unit.items[0] {
            Item::Proc(p) => p,
            other => panic!("expected proc, got {:?}", other),
        };
        let info = &ctx.ast.procs[proc];
        assert_eq!(info.nparams, 3);

        let run = ctx.ast.param_run(info.first_param, info.nparams);
        for (i, param) in run.iter().enumerate() {
            assert_eq!(param.proc, proc);
            assert_eq!(param.rank, i as u32);
        }
    }

    #[test]
    fn test_precedence_mul_over_add() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let (ctx, expr) = parse_expr_str("1 + 2 * 3");

        let (lhs, rhs) = match ctx.ast.exprs[expr].kind {
            ExprKind::Binop {
                op: BinopKind::Plus,
                lhs,
                rhs,
                ..
            } => (lhs, rhs),
            ref other => panic!("expected `+` at root, got {:?}", other),
        };
        assert_eq!(literal_value(&ctx, lhs), 1);
        match ctx.ast.exprs[rhs].kind {
            ExprKind::Binop {
                op: BinopKind::Mul,
                lhs,
                rhs,
                ..
            } => {
                assert_eq!(literal_value(&ctx, lhs), 2);
                assert_eq!(literal_value(&ctx, rhs), 3);
            }
            ref other => panic!("expected `*` on the right, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let (ctx, expr) = parse_expr_str("a = b = 1");

        match ctx.ast.exprs[expr].kind {
            ExprKind::Binop {
                op: BinopKind::Assign,
                rhs,
                ..
            } => match ctx.ast.exprs[rhs].kind {
                ExprKind::Binop {
                    op: BinopKind::Assign,
                    ..
                } => {}
                ref other => panic!("expected nested assignment, got {:?}", other),
            },
            ref other => panic!("expected assignment at root, got {:?}", other),
        }
    }

    #[test]
    fn test_call_args_are_dense() {
        let (ctx, expr) = parse_expr_str("f(a, b + c)");

        let (callee, first_arg, nargs) = match ctx.ast.exprs[expr].kind {
            ExprKind::Call {
                callee,
                first_arg,
                nargs,
            } => (callee, first_arg, nargs),
            ref other => panic!("expected call, got {:?}", other),
        };
        assert!(matches!(ctx.ast.exprs[callee].kind, ExprKind::Symref { .. }));
        assert_eq!(nargs, 2);

        let run = ctx.ast.arg_run(first_arg, nargs);
        for (i, arg) in run.iter().enumerate() {
            assert_eq!(arg.call, expr);
            assert_eq!(arg.rank, i as u32);
        }
        assert!(matches!(
            ctx.ast.exprs[run[1].arg].kind,
            ExprKind::Binop {
                op: BinopKind::Plus,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_call_args_stay_contiguous() {
        let (ctx, expr) = parse_expr_str("f(g(x, h(1)), y)");

        // Every call's argument run must be contiguous and self-parented,
        // even with calls nested inside argument lists.
        let mut calls = vec![expr];
        while let Some(call) = calls.pop() {
            if let ExprKind::Call {
                first_arg, nargs, ..
            } = ctx.ast.exprs[call].kind
            {
                for (i, arg) in ctx.ast.arg_run(first_arg, nargs).iter().enumerate() {
                    assert_eq!(arg.call, call);
                    assert_eq!(arg.rank, i as u32);
                    calls.push(arg.arg);
                }
            }
        }
    }

    #[test]
    fn test_postfix_and_member_suffixes() {
        // ^p.x++ parses as ^((p.x)++)
        let (ctx, expr) = parse_expr_str("^p.x++");

        let operand = match ctx.ast.exprs[expr].kind {
            ExprKind::Unop {
                op: UnopKind::Deref,
                operand,
                ..
            } => operand,
            ref other => panic!("expected deref at root, got {:?}", other),
        };
        let inner = match ctx.ast.exprs[operand].kind {
            ExprKind::Unop {
                op: UnopKind::PostIncrement,
                operand,
                ..
            } => operand,
            ref other => panic!("expected post-increment, got {:?}", other),
        };
        assert!(matches!(ctx.ast.exprs[inner].kind, ExprKind::Member { .. }));
    }

    #[test]
    fn test_compound_children_are_dense() {
        let (ctx, unit) = parse_ok("proc f () int { data a int; { a = 1; } return a; }");

        let proc = match unit.items[0] {
            Item::Proc(p) => p,
            other => panic!("expected proc, got {:?}", other),
        };
        let body = ctx.ast.procs[proc].body.unwrap();
        let (first_child, nchildren) = match ctx.ast.stmts[body].kind {
            StmtKind::Compound {
                first_child,
                nchildren,
            } => (first_child, nchildren),
            ref other => panic!("expected compound, got {:?}", other),
        };
        assert_eq!(nchildren, 3);
        for (i, child) in ctx.ast.child_run(first_child, nchildren).iter().enumerate() {
            assert_eq!(child.parent, body);
            assert_eq!(child.rank, i as u32);
        }
    }

    #[test]
    fn test_inner_data_goes_to_block_scope() {
        let (ctx, _) = parse_ok("proc f () int { data local int; return local; }");

        let local = ctx.intern("local");
        assert!(ctx.syms.lookup(ctx.syms.global_scope(), local).is_none());

        // The declaration landed in some non-global scope.
        let sym = ctx
            .syms
            .symbols_in(ctx.syms.global_scope())
            .find(|(_, s)| s.name == local);
        assert!(sym.is_none());
    }

    #[test]
    fn test_scope_overflow_at_depth_17() {
        // global + proc scope + body block + 13 nested blocks = 16: fine.
        let deep_ok = format!("proc f () int {{ {} return 1; {} }}", "{".repeat(13), "}".repeat(13));
        parse_ok(&deep_ok);

        // One more block pushes the 17th scope.
        let deep_err = format!("proc f () int {{ {} return 1; {} }}", "{".repeat(14), "}".repeat(14));
        match parse_err(&deep_err) {
            ParseError::ScopeOverflow { .. } => {}
            other => panic!("expected scope overflow, got {:?}", other),
        }
    }

    #[test]
    fn test_for_statement_shape() {
        let (ctx, unit) = parse_ok("proc f () int { for (i = 0; i; i++) { i = i; } return 1; }");

        let proc = match unit.items[0] {
            Item::Proc(p) => p,
            other => panic!("expected proc, got {:?}", other),
        };
        let body = ctx.ast.procs[proc].body.unwrap();
        let (first_child, nchildren) = match ctx.ast.stmts[body].kind {
            StmtKind::Compound {
                first_child,
                nchildren,
            } => (first_child, nchildren),
            ref other => panic!("expected compound, got {:?}", other),
        };
        assert_eq!(nchildren, 2);

        let for_stmt = ctx.ast.child_run(first_child, nchildren)[0].child;
        match ctx.ast.stmts[for_stmt].kind {
            StmtKind::For { init, step, body, .. } => {
                assert!(matches!(ctx.ast.stmts[init].kind, StmtKind::Expr { .. }));
                assert!(matches!(ctx.ast.stmts[step].kind, StmtKind::Expr { .. }));
                assert!(matches!(ctx.ast.stmts[body].kind, StmtKind::Compound { .. }));
            }
            ref other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_toplevel_token() {
        match parse_err("frobnicate x;") {
            ParseError::UnexpectedToken { found, .. } => assert_eq!(found, "`frobnicate`"),
            other => panic!("expected unexpected-token error, got {:?}", other),
        }
    }
}
