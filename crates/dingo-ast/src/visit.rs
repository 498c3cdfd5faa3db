// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Read-only tree traversal.
//!
//! Override the `visit_*` hooks you care about and call the matching
//! `walk_*` function to keep descending.

use crate::decl::{Decl, DeclKind, ImportAlias, VariantPayload};
use crate::expr::{Element, ElementValue, Expr, ExprBody, ExprKind, LiteralValue};
use crate::pattern::{Pattern, PatternKind};
use crate::stmt::{Block, ElseBranch, ForHeader, IfStmt, Stmt, StmtKind};
use crate::ty::{ArrayLen, FuncSig, InterfaceElem, Param, Type, TypeKind, TypeParam};
use crate::{Ident, SourceFile};

pub trait Visitor<'ast>: Sized {
    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        walk_type(self, ty);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern) {
        walk_pattern(self, pattern);
    }

    fn visit_ident(&mut self, _ident: &'ast Ident) {}
}

pub fn walk_source_file<'ast, V: Visitor<'ast>>(v: &mut V, file: &'ast SourceFile) {
    for decl in &file.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<'ast, V: Visitor<'ast>>(v: &mut V, decl: &'ast Decl) {
    match &decl.kind {
        DeclKind::Package(name) => v.visit_ident(name),
        DeclKind::Import(import) => {
            for spec in &import.specs {
                if let Some(ImportAlias::Name(name)) = &spec.alias {
                    v.visit_ident(name);
                }
            }
        }
        DeclKind::Func(f) => {
            v.visit_ident(&f.name);
            walk_type_params(v, &f.type_params);
            walk_sig(v, &f.sig);
            if let Some(body) = &f.body {
                walk_block(v, body);
            }
        }
        DeclKind::Method(m) => {
            walk_param(v, &m.receiver);
            v.visit_ident(&m.name);
            walk_sig(v, &m.sig);
            if let Some(body) = &m.body {
                walk_block(v, body);
            }
        }
        DeclKind::Type(specs) => {
            for spec in specs {
                v.visit_ident(&spec.name);
                walk_type_params(v, &spec.type_params);
                v.visit_type(&spec.ty);
            }
        }
        DeclKind::Const(specs) | DeclKind::Var(specs) => {
            for spec in specs {
                for name in &spec.names {
                    v.visit_ident(name);
                }
                if let Some(ty) = &spec.ty {
                    v.visit_type(ty);
                }
                for value in &spec.values {
                    v.visit_expr(value);
                }
            }
        }
        DeclKind::Let(l) => {
            v.visit_ident(&l.name);
            if let Some(ty) = &l.ty {
                v.visit_type(ty);
            }
            v.visit_expr(&l.value);
        }
        DeclKind::Enum(e) => {
            v.visit_ident(&e.name);
            walk_type_params(v, &e.type_params);
            for variant in &e.variants {
                v.visit_ident(&variant.name);
                match &variant.payload {
                    Some(VariantPayload::Tuple(types)) => {
                        for ty in types {
                            v.visit_type(ty);
                        }
                    }
                    Some(VariantPayload::Struct(fields)) => {
                        for field in fields {
                            v.visit_ident(&field.name);
                            v.visit_type(&field.ty);
                        }
                    }
                    None => {}
                }
            }
        }
        DeclKind::Stmt(stmt) => v.visit_stmt(stmt),
        DeclKind::Bad => {}
    }
}

pub fn walk_block<'ast, V: Visitor<'ast>>(v: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(v: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Expr(e) | StmtKind::Go(e) | StmtKind::Defer(e) => v.visit_expr(e),
        StmtKind::Send { channel, value } => {
            v.visit_expr(channel);
            v.visit_expr(value);
        }
        StmtKind::IncDec { target, .. } => v.visit_expr(target),
        StmtKind::Assign { targets, values, .. } => {
            for e in targets.iter().chain(values) {
                v.visit_expr(e);
            }
        }
        StmtKind::ShortVarDecl { names, values } => {
            for name in names {
                v.visit_ident(name);
            }
            for value in values {
                v.visit_expr(value);
            }
        }
        StmtKind::Return(values) => {
            for value in values {
                v.visit_expr(value);
            }
        }
        StmtKind::If(if_stmt) => walk_if(v, if_stmt),
        StmtKind::For(for_stmt) => {
            match &for_stmt.header {
                ForHeader::Infinite => {}
                ForHeader::Cond(cond) => v.visit_expr(cond),
                ForHeader::Clause { init, cond, post } => {
                    if let Some(init) = init {
                        v.visit_stmt(init);
                    }
                    if let Some(cond) = cond {
                        v.visit_expr(cond);
                    }
                    if let Some(post) = post {
                        v.visit_stmt(post);
                    }
                }
                ForHeader::Range { key, value, iter, .. } => {
                    for e in key.iter().chain(value) {
                        v.visit_expr(e);
                    }
                    v.visit_expr(iter);
                }
            }
            walk_block(v, &for_stmt.body);
        }
        StmtKind::Switch(switch) => {
            if let Some(init) = &switch.init {
                v.visit_stmt(init);
            }
            if let Some(binding) = &switch.binding {
                v.visit_ident(binding);
            }
            if let Some(tag) = &switch.tag {
                v.visit_expr(tag);
            }
            for case in &switch.cases {
                for e in &case.exprs {
                    v.visit_expr(e);
                }
                for s in &case.body {
                    v.visit_stmt(s);
                }
            }
        }
        StmtKind::Select(clauses) => {
            for clause in clauses {
                if let Some(comm) = &clause.comm {
                    v.visit_stmt(comm);
                }
                for s in &clause.body {
                    v.visit_stmt(s);
                }
            }
        }
        StmtKind::Block(block) => walk_block(v, block),
        StmtKind::Break(label) | StmtKind::Continue(label) => {
            if let Some(label) = label {
                v.visit_ident(label);
            }
        }
        StmtKind::Goto(label) => v.visit_ident(label),
        StmtKind::Labeled { label, stmt } => {
            v.visit_ident(label);
            v.visit_stmt(stmt);
        }
        StmtKind::Decl(decl) => v.visit_decl(decl),
        StmtKind::Empty | StmtKind::Fallthrough | StmtKind::Bad => {}
    }
}

fn walk_if<'ast, V: Visitor<'ast>>(v: &mut V, if_stmt: &'ast IfStmt) {
    if let Some(init) = &if_stmt.init {
        v.visit_stmt(init);
    }
    v.visit_expr(&if_stmt.cond);
    walk_block(v, &if_stmt.then_block);
    match &if_stmt.else_branch {
        Some(ElseBranch::If(stmt)) => v.visit_stmt(stmt),
        Some(ElseBranch::Block(block)) => walk_block(v, block),
        None => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Literal(_) | ExprKind::Error => {}
        ExprKind::CompositeLit { ty, body } => {
            v.visit_type(ty);
            walk_literal_value(v, body);
        }
        ExprKind::FuncLit { sig, body } => {
            walk_sig(v, sig);
            walk_block(v, body);
        }
        ExprKind::Lambda { params, body, .. } => {
            for param in params {
                v.visit_ident(&param.name);
                if let Some(ty) = &param.ty {
                    v.visit_type(ty);
                }
            }
            walk_body(v, body);
        }
        ExprKind::Match { subject, arms } => {
            v.visit_expr(subject);
            for arm in arms {
                v.visit_pattern(&arm.pattern);
                if let Some(guard) = &arm.guard {
                    v.visit_expr(guard);
                }
                walk_body(v, &arm.body);
            }
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Binary { left, right, .. } | ExprKind::NullCoalesce { left, right } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        ExprKind::ErrorProp(inner) | ExprKind::Paren(inner) => v.visit_expr(inner),
        ExprKind::SafeNav { operand, field } | ExprKind::Selector { operand, field } => {
            v.visit_expr(operand);
            v.visit_ident(field);
        }
        ExprKind::Index { operand, index } => {
            v.visit_expr(operand);
            v.visit_expr(index);
        }
        ExprKind::Slice { operand, low, high, max } => {
            v.visit_expr(operand);
            for bound in [low, high, max].into_iter().flatten() {
                v.visit_expr(bound);
            }
        }
        ExprKind::Call { func, type_args, args, .. } => {
            v.visit_expr(func);
            for ty in type_args {
                v.visit_type(ty);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        ExprKind::TypeAssert { operand, ty } => {
            v.visit_expr(operand);
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
        }
        ExprKind::TypeExpr(ty) => v.visit_type(ty),
    }
}

fn walk_body<'ast, V: Visitor<'ast>>(v: &mut V, body: &'ast ExprBody) {
    match body {
        ExprBody::Expr(e) => v.visit_expr(e),
        ExprBody::Block(b) => walk_block(v, b),
    }
}

fn walk_literal_value<'ast, V: Visitor<'ast>>(v: &mut V, lit: &'ast LiteralValue) {
    for Element { key, value, .. } in &lit.elements {
        for part in key.iter().chain(std::iter::once(value)) {
            match part {
                ElementValue::Expr(e) => v.visit_expr(e),
                ElementValue::Nested(nested) => walk_literal_value(v, nested),
            }
        }
    }
}

pub fn walk_type<'ast, V: Visitor<'ast>>(v: &mut V, ty: &'ast Type) {
    match &ty.kind {
        TypeKind::Name(name) => v.visit_ident(name),
        TypeKind::Qualified { package, name } => {
            v.visit_ident(package);
            v.visit_ident(name);
        }
        TypeKind::Pointer(inner)
        | TypeKind::Slice(inner)
        | TypeKind::Paren(inner)
        | TypeKind::Approx(inner) => v.visit_type(inner),
        TypeKind::Array { len, elem } => {
            if let ArrayLen::Expr(len) = len {
                v.visit_expr(len);
            }
            v.visit_type(elem);
        }
        TypeKind::Map { key, value } => {
            v.visit_type(key);
            v.visit_type(value);
        }
        TypeKind::Chan { elem, .. } => v.visit_type(elem),
        TypeKind::Func(sig) => walk_sig(v, sig),
        TypeKind::Struct(fields) => {
            for field in fields {
                for name in &field.names {
                    v.visit_ident(name);
                }
                v.visit_type(&field.ty);
            }
        }
        TypeKind::Interface(elems) => {
            for elem in elems {
                match elem {
                    InterfaceElem::Method { name, sig } => {
                        v.visit_ident(name);
                        walk_sig(v, sig);
                    }
                    InterfaceElem::Embed(ty) => v.visit_type(ty),
                }
            }
        }
        TypeKind::Generic { base, args } => {
            v.visit_type(base);
            for arg in args {
                v.visit_type(arg);
            }
        }
        TypeKind::Union(types) => {
            for t in types {
                v.visit_type(t);
            }
        }
        TypeKind::Error => {}
    }
}

pub fn walk_pattern<'ast, V: Visitor<'ast>>(v: &mut V, pattern: &'ast Pattern) {
    match &pattern.kind {
        PatternKind::Wildcard | PatternKind::Literal { .. } | PatternKind::Error => {}
        PatternKind::Binding(name) => v.visit_ident(name),
        PatternKind::Variant { qualifier, name, args } => {
            if let Some(q) = qualifier {
                v.visit_ident(q);
            }
            v.visit_ident(name);
            for arg in args {
                v.visit_pattern(arg);
            }
        }
    }
}

fn walk_sig<'ast, V: Visitor<'ast>>(v: &mut V, sig: &'ast FuncSig) {
    for param in sig.params.iter().chain(&sig.results) {
        walk_param(v, param);
    }
}

fn walk_param<'ast, V: Visitor<'ast>>(v: &mut V, param: &'ast Param) {
    for name in &param.names {
        v.visit_ident(name);
    }
    v.visit_type(&param.ty);
}

fn walk_type_params<'ast, V: Visitor<'ast>>(v: &mut V, params: &'ast [TypeParam]) {
    for param in params {
        for name in &param.names {
            v.visit_ident(name);
        }
        if let Some(c) = &param.constraint {
            v.visit_type(c);
        }
    }
}
