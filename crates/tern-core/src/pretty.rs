//! Pretty-printer.
//!
//! Renders a parsed unit back to surface syntax. Output re-parses to the
//! same structure: operator precedence and associativity decide where
//! parentheses are required, and prefix-operator chains are parenthesized
//! so `-` and `+` never coalesce into `--`/`++` on the way back in.

use crate::ast::{ExprKind, Item, StmtKind, Unit};
use crate::context::CompilerContext;
use crate::ids::{ArrayId, DataId, ExprId, ProcId, StmtId, SymbolId, TypeId};
use crate::syntax::token::TokenKind;
use crate::types::TypeKind;

/// Binding strength of prefix operators; tighter than any binop.
const PREC_UNARY: u8 = 8;
/// Binding strength of call/subscript/member/postfix suffixes.
const PREC_POSTFIX: u8 = 9;

/// Render a unit to source text.
pub fn print_unit(ctx: &CompilerContext, unit: &Unit) -> String {
    let mut printer = Printer {
        ctx,
        out: String::new(),
        indent: 0,
    };
    for &item in &unit.items {
        printer.item(item);
    }
    printer.out
}

struct Printer<'a> {
    ctx: &'a CompilerContext,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn sym_name(&self, sym: SymbolId) -> String {
        self.ctx.str(self.ctx.syms.symbol(sym).name)
    }

    /// A type as written in a type position (`NAME` or `^NAME`).
    fn type_str(&self, tp: TypeId) -> String {
        match &self.ctx.types.get(tp).kind {
            TypeKind::Base { name, .. } => self.ctx.str(*name),
            TypeKind::Entity { name, .. } => self.ctx.str(*name),
            TypeKind::Reference(r) => {
                let name = self.ctx.str(self.ctx.syms.symref(r.symref).name);
                if r.pointer {
                    format!("^{}", name)
                } else {
                    name
                }
            }
            // Array and proc types never occur in type positions; they are
            // destructured at their declarations.
            TypeKind::Array { .. } => "<array type>".to_string(),
            TypeKind::Proc { .. } => "<proc type>".to_string(),
        }
    }

    fn item(&mut self, item: Item) {
        match item {
            Item::Entity(tp) => {
                let (name, inner) = match &self.ctx.types.get(tp).kind {
                    TypeKind::Entity { name, inner } => (*name, *inner),
                    other => unreachable!("entity item with non-entity type {:?}", other),
                };
                self.out.push_str(&format!(
                    "entity {} {};\n",
                    self.ctx.str(name),
                    self.type_str(inner)
                ));
            }
            Item::Data(data) => {
                self.data_decl(data);
                self.out.push('\n');
            }
            Item::Array(array) => {
                self.array_decl(array);
                self.out.push('\n');
            }
            Item::Proc(proc) => self.proc_decl(proc),
        }
    }

    fn data_decl(&mut self, data: DataId) {
        let info = &self.ctx.ast.datas[data];
        self.out.push_str(&format!(
            "data {} {};",
            self.sym_name(info.sym),
            self.type_str(info.tp)
        ));
    }

    fn array_decl(&mut self, array: ArrayId) {
        let info = &self.ctx.ast.arrays[array];
        let (index, value) = match &self.ctx.types.get(info.tp).kind {
            TypeKind::Array { index, value } => (*index, *value),
            other => unreachable!("array declaration with non-array type {:?}", other),
        };
        self.out.push_str(&format!(
            "array {} [{}] {};",
            self.sym_name(info.sym),
            self.type_str(index),
            self.type_str(value)
        ));
    }

    fn proc_decl(&mut self, proc: ProcId) {
        let info = &self.ctx.ast.procs[proc];
        let ret = match &self.ctx.types.get(info.tp).kind {
            TypeKind::Proc { ret, .. } => *ret,
            other => unreachable!("proc declaration with non-proc type {:?}", other),
        };

        self.out.push_str(&format!("proc {} (", self.sym_name(info.sym)));
        let params = self.ctx.ast.param_run(info.first_param, info.nparams);
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push(' ');
            }
            self.out.push_str(&format!(
                "{} {}",
                self.sym_name(param.sym),
                self.type_str(param.tp)
            ));
        }
        self.out.push_str(&format!(") {} ", self.type_str(ret)));

        match info.body {
            Some(body) => {
                self.stmt_here(body);
                self.out.push('\n');
            }
            None => self.out.push_str("{}\n"),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// One statement on its own line at the current indent.
    fn stmt(&mut self, id: StmtId) {
        self.write_indent();
        self.stmt_here(id);
        self.out.push('\n');
    }

    /// A statement without leading indent or trailing newline.
    fn stmt_here(&mut self, id: StmtId) {
        match &self.ctx.ast.stmts[id].kind {
            StmtKind::Expr { expr } => {
                self.expr(*expr);
                self.out.push(';');
            }
            StmtKind::Return { expr } => {
                self.out.push_str("return ");
                self.expr(*expr);
                self.out.push(';');
            }
            StmtKind::Data(data) => self.data_decl(*data),
            StmtKind::Array(array) => self.array_decl(*array),
            StmtKind::If { cond, body } => {
                self.out.push_str("if (");
                self.expr(*cond);
                self.out.push_str(") ");
                self.stmt_here(*body);
            }
            StmtKind::While { cond, body } => {
                self.out.push_str("while (");
                self.expr(*cond);
                self.out.push_str(") ");
                self.stmt_here(*body);
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                self.out.push_str("for (");
                self.clause(*init);
                self.out.push_str("; ");
                self.expr(*cond);
                self.out.push_str("; ");
                self.clause(*step);
                self.out.push_str(") ");
                self.stmt_here(*body);
            }
            StmtKind::Compound {
                nchildren,
                first_child,
            } => {
                self.out.push_str("{\n");
                self.indent += 1;
                let children = self.ctx.ast.child_run(*first_child, *nchildren);
                for child in children {
                    self.stmt(child.child);
                }
                self.indent -= 1;
                self.write_indent();
                self.out.push('}');
            }
        }
    }

    /// A `for` head clause: an expression statement without its `;`.
    fn clause(&mut self, id: StmtId) {
        match &self.ctx.ast.stmts[id].kind {
            StmtKind::Expr { expr } => self.expr(*expr),
            other => unreachable!("non-expression for clause {:?}", other),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, id: ExprId) {
        self.expr_prec(id, 0);
    }

    fn expr_prec(&mut self, id: ExprId, min_prec: u8) {
        match &self.ctx.ast.exprs[id].kind {
            ExprKind::Literal { tok } => match self.ctx.ast.tokens[*tok].kind {
                TokenKind::Int(value) => self.out.push_str(&value.to_string()),
                TokenKind::Str(name) => {
                    let value = self.ctx.str(name);
                    self.string_lit(&value);
                }
                other => unreachable!("non-literal token {:?} in literal", other),
            },
            ExprKind::Symref { symref } => {
                let name = self.ctx.syms.symref(*symref).name;
                self.out.push_str(&self.ctx.str(name));
            }
            ExprKind::Unop { op, operand, .. } => {
                let prec = if op.is_prefix() { PREC_UNARY } else { PREC_POSTFIX };
                let paren = prec < min_prec;
                if paren {
                    self.out.push('(');
                }
                if op.is_prefix() {
                    self.out.push_str(op.token_str());
                    self.unary_operand(*operand);
                } else {
                    self.expr_prec(*operand, PREC_POSTFIX);
                    self.out.push_str(op.token_str());
                }
                if paren {
                    self.out.push(')');
                }
            }
            ExprKind::Binop { op, lhs, rhs, .. } => {
                let prec = op.precedence();
                let paren = prec < min_prec;
                if paren {
                    self.out.push('(');
                }
                let (lmin, rmin) = if op.is_right_assoc() {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expr_prec(*lhs, lmin);
                self.out.push_str(&format!(" {} ", op.token_str()));
                self.expr_prec(*rhs, rmin);
                if paren {
                    self.out.push(')');
                }
            }
            ExprKind::Member { base, name } => {
                self.expr_prec(*base, PREC_POSTFIX);
                self.out.push('.');
                self.out.push_str(&self.ctx.str(*name));
            }
            ExprKind::Subscript { base, index } => {
                self.expr_prec(*base, PREC_POSTFIX);
                self.out.push('[');
                self.expr(*index);
                self.out.push(']');
            }
            ExprKind::Call {
                callee,
                first_arg,
                nargs,
            } => {
                self.expr_prec(*callee, PREC_POSTFIX);
                self.out.push('(');
                let args = self.ctx.ast.arg_run(*first_arg, *nargs);
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg.arg);
                }
                self.out.push(')');
            }
        }
    }

    /// The operand of a prefix operator. A nested prefix operator is
    /// parenthesized so `-` `-` does not print as `--`.
    fn unary_operand(&mut self, id: ExprId) {
        let nested_prefix = matches!(
            &self.ctx.ast.exprs[id].kind,
            ExprKind::Unop { op, .. } if op.is_prefix()
        );
        if nested_prefix {
            self.out.push('(');
            self.expr_prec(id, 0);
            self.out.push(')');
        } else {
            self.expr_prec(id, PREC_UNARY);
        }
    }

    fn string_lit(&mut self, value: &str) {
        self.out.push('"');
        for ch in value.chars() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\0' => self.out.push_str("\\0"),
                _ => self.out.push(ch),
            }
        }
        self.out.push('"');
    }
}
