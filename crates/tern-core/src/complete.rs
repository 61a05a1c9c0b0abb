//! Type completion.
//!
//! Runs after name resolution. First every reference type is bound to the
//! type its symref resolved to (resolving to a non-type symbol is fatal).
//! Then completeness is propagated through the type arena to a fixed
//! point; the flag only ever flips false -> true. A second, relaxed fixed
//! point accepts cycles that pass through an explicit `^` reference level
//! (a pointer's representation does not depend on its target being
//! complete). Anything still incomplete after both passes is reported and
//! fails the compilation.

use crate::context::CompilerContext;
use crate::ids::TypeId;
use crate::source::Span;
use crate::types::{TypeKind, Types};

/// Type-completion error.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    #[error("`{name}` does not name a type (found {found})")]
    KindMismatch {
        name: String,
        found: &'static str,
        span: Span,
    },

    #[error("incomplete type: {what}")]
    Incomplete { what: String, span: Option<Span> },
}

impl TypeError {
    pub fn span(&self) -> Option<Span> {
        match self {
            TypeError::KindMismatch { span, .. } => Some(*span),
            TypeError::Incomplete { span, .. } => *span,
        }
    }
}

/// Complete every type or fail.
pub fn complete_types(ctx: &mut CompilerContext) -> Result<(), TypeError> {
    bind_references(ctx)?;

    let ids: Vec<TypeId> = ctx.types.ids().collect();
    let iterations = strict_pass(&mut ctx.types, &ids);
    tracing::debug!(iterations, types = ids.len(), "type completion fixed point");

    relaxed_pass(&mut ctx.types, &ids);

    for &id in &ids {
        if !ctx.types.get(id).complete {
            return Err(TypeError::Incomplete {
                what: describe_type(ctx, id),
                span: type_span(ctx, id),
            });
        }
    }
    Ok(())
}

/// Bind each reference type to the type of its resolved symbol.
///
/// A symref in type position that resolved to a non-type symbol is a fatal
/// kind mismatch. Already-bound references are left alone, so the pass is
/// idempotent.
fn bind_references(ctx: &mut CompilerContext) -> Result<(), TypeError> {
    for i in 0..ctx.types.len() {
        let id = TypeId::new(i as u32);
        let (symref, bound) = match &ctx.types.get(id).kind {
            TypeKind::Reference(r) => (r.symref, r.resolved),
            _ => continue,
        };
        if bound.is_some() {
            continue;
        }

        let (name, tok, sym) = {
            let r = ctx.syms.symref(symref);
            (r.name, r.tok, r.sym)
        };
        // An unbound symref means resolution already failed; leave the
        // reference incomplete.
        let Some(sym) = sym else { continue };

        let kind = ctx.syms.symbol(sym).kind;
        match kind.as_type() {
            Some(target) => ctx.types.bind_reference(id, target),
            None => {
                return Err(TypeError::KindMismatch {
                    name: ctx.str(name),
                    found: kind.describe(),
                    span: ctx.ast.tokens[tok].span(),
                })
            }
        }
    }
    Ok(())
}

/// One type's completion rule, under a given notion of "done".
fn rule_satisfied(
    types: &Types,
    id: TypeId,
    relax_pointers: bool,
    done: impl Fn(TypeId) -> bool,
) -> bool {
    match &types.get(id).kind {
        TypeKind::Base { .. } => true,
        TypeKind::Entity { inner, .. } => done(*inner),
        TypeKind::Array { index, value } => done(*index) && done(*value),
        TypeKind::Proc {
            ret,
            nparams,
            first_paramtype,
        } => {
            done(*ret)
                && types
                    .param_run(*first_paramtype, *nparams)
                    .iter()
                    .all(|pt| done(pt.param))
        }
        TypeKind::Reference(r) => match r.resolved {
            Some(target) => (relax_pointers && r.pointer) || done(target),
            None => false,
        },
    }
}

/// The strict fixed point: a reference is complete only once its target
/// is. Returns the number of rounds that flipped at least one flag.
fn strict_pass(types: &mut Types, ids: &[TypeId]) -> u32 {
    let mut rounds = 0;
    loop {
        let mut changed = false;
        for &id in ids {
            if types.get(id).complete {
                continue;
            }
            let satisfied = {
                let current: &Types = types;
                rule_satisfied(current, id, false, |t| current.get(t).complete)
            };
            if satisfied {
                types.mark_complete(id);
                changed = true;
            }
        }
        if !changed {
            break;
        }
        rounds += 1;
    }
    rounds
}

/// The relaxed fixed point: a bound `^` reference counts as complete even
/// if its target is not. Types that complete under this rule are accepted.
fn relaxed_pass(types: &mut Types, ids: &[TypeId]) {
    let mut relaxed: Vec<bool> = ids.iter().map(|&id| types.get(id).complete).collect();
    loop {
        let mut changed = false;
        for (i, &id) in ids.iter().enumerate() {
            if relaxed[i] {
                continue;
            }
            if rule_satisfied(types, id, true, |t| relaxed[t.index()]) {
                relaxed[i] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for (i, &id) in ids.iter().enumerate() {
        if relaxed[i] && !types.get(id).complete {
            types.mark_complete(id);
        }
    }
}

fn describe_type(ctx: &CompilerContext, id: TypeId) -> String {
    match &ctx.types.get(id).kind {
        TypeKind::Base { name, .. } => format!("base type `{}`", ctx.str(*name)),
        TypeKind::Entity { name, .. } => format!("entity `{}`", ctx.str(*name)),
        TypeKind::Array { .. } => "array type".to_string(),
        TypeKind::Proc { .. } => "proc type".to_string(),
        TypeKind::Reference(r) => {
            let name = ctx.str(ctx.syms.symref(r.symref).name);
            if r.pointer {
                format!("reference `^{}`", name)
            } else {
                format!("reference `{}`", name)
            }
        }
    }
}

fn type_span(ctx: &CompilerContext, id: TypeId) -> Option<Span> {
    match &ctx.types.get(id).kind {
        TypeKind::Reference(r) => Some(ctx.ast.tokens[ctx.syms.symref(r.symref).tok].span()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::syntax::parser::parse_unit;

    fn front_end(src: &str) -> Result<CompilerContext, TypeError> {
        let mut ctx = CompilerContext::new();
        let source = ctx.source_map.add_inline(src);
        parse_unit(&mut ctx, source).expect("parse failed");
        resolve(&mut ctx).expect("resolution failed");
        complete_types(&mut ctx)?;
        Ok(ctx)
    }

    fn all_complete(ctx: &CompilerContext) -> bool {
        ctx.types.ids().all(|id| ctx.types.get(id).complete)
    }

    #[test]
    fn test_simple_declaration_completes() {
        let ctx = front_end("data x int;").expect("completion failed");
        assert!(all_complete(&ctx));

        // The data's type reference resolved to the builtin int.
        let x = ctx.intern("x");
        let sym = ctx.syms.lookup(ctx.syms.global_scope(), x).unwrap();
        let data = match ctx.syms.symbol(sym).kind {
            crate::symbols::SymbolKind::Data(d) => d,
            other => panic!("expected data, got {:?}", other),
        };
        match &ctx.types.get(ctx.ast.datas[data].tp).kind {
            TypeKind::Reference(r) => assert_eq!(r.resolved, Some(ctx.base.int)),
            other => panic!("expected reference type, got {:?}", other),
        }
    }

    #[test]
    fn test_forward_reference_needs_second_round() {
        // `^b` is created before `b` exists in the arena, so the strict
        // fixed point flips it only in its second round.
        let mut ctx = CompilerContext::new();
        let source = ctx.source_map.add_inline("data a ^b; entity b int;");
        parse_unit(&mut ctx, source).expect("parse failed");
        resolve(&mut ctx).expect("resolution failed");

        bind_references(&mut ctx).expect("binding failed");
        let ids: Vec<TypeId> = ctx.types.ids().collect();
        let rounds = strict_pass(&mut ctx.types, &ids);

        assert_eq!(rounds, 2);
        assert!(all_complete(&ctx));
    }

    #[test]
    fn test_pointer_self_reference_is_accepted() {
        let ctx = front_end("entity node ^node;").expect("completion failed");
        assert!(all_complete(&ctx));
    }

    #[test]
    fn test_direct_self_containment_is_incomplete() {
        match front_end("entity node node;") {
            Err(TypeError::Incomplete { what, .. }) => {
                assert!(what.contains("node"), "unexpected description: {}", what);
            }
            Ok(_) => panic!("expected incomplete type"),
            Err(other) => panic!("expected incomplete type, got {:?}", other),
        }
    }

    #[test]
    fn test_mutual_pointer_recursion_is_accepted() {
        let ctx =
            front_end("entity a ^b; entity b ^a;").expect("completion failed");
        assert!(all_complete(&ctx));
    }

    #[test]
    fn test_kind_mismatch_in_type_position() {
        match front_end("data x int; data y x;") {
            Err(TypeError::KindMismatch { name, found, .. }) => {
                assert_eq!(name, "x");
                assert_eq!(found, "data");
            }
            other => panic!("expected kind mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_completion_is_monotone_and_idempotent() {
        let mut ctx = CompilerContext::new();
        let source = ctx
            .source_map
            .add_inline("data a ^b; entity b int; proc f (p b) int { return p; }");
        parse_unit(&mut ctx, source).expect("parse failed");
        resolve(&mut ctx).expect("resolution failed");
        complete_types(&mut ctx).expect("completion failed");
        assert!(all_complete(&ctx));

        // A second run has nothing left to flip.
        let ids: Vec<TypeId> = ctx.types.ids().collect();
        assert_eq!(strict_pass(&mut ctx.types, &ids), 0);
        complete_types(&mut ctx).expect("second completion failed");
    }
}
