use worklets_common::BindingKind;

use crate::scope::{Binding, Scope, ScopeTrait};

pub fn declare_ident(scope: &Scope, ident: &swc_ecma_ast::Ident, kind: BindingKind) {
  scope.set(
    &ident.sym,
    Binding {
      kind,
      span: ident.span,
    },
  );
}

pub fn declare_pat(scope: &Scope, pat: &swc_ecma_ast::Pat, kind: BindingKind) {
  for ident in pat_idents(pat) {
    declare_ident(scope, &ident, kind);
  }
}

pub fn var_kind(kind: swc_ecma_ast::VarDeclKind) -> BindingKind {
  match kind {
    swc_ecma_ast::VarDeclKind::Var => BindingKind::Var,
    swc_ecma_ast::VarDeclKind::Let => BindingKind::Let,
    swc_ecma_ast::VarDeclKind::Const => BindingKind::Const,
  }
}

pub fn pat_idents(pat: &swc_ecma_ast::Pat) -> Vec<swc_ecma_ast::Ident> {
  let mut idents = Vec::new();
  pat_idents_impl(&mut idents, pat);
  idents
}

fn pat_idents_impl(idents: &mut Vec<swc_ecma_ast::Ident>, pat: &swc_ecma_ast::Pat) {
  use swc_ecma_ast::Pat;

  match pat {
    Pat::Ident(ident) => {
      idents.push(ident.id.clone());
    }
    Pat::Array(array_pat) => {
      for elem in array_pat.elems.iter().flatten() {
        pat_idents_impl(idents, elem);
      }
    }
    Pat::Rest(rest_pat) => {
      pat_idents_impl(idents, &rest_pat.arg);
    }
    Pat::Object(object_pat) => {
      for prop in &object_pat.props {
        match prop {
          swc_ecma_ast::ObjectPatProp::KeyValue(key_value) => {
            pat_idents_impl(idents, &key_value.value);
          }
          swc_ecma_ast::ObjectPatProp::Assign(assign) => {
            idents.push(assign.key.clone());
          }
          swc_ecma_ast::ObjectPatProp::Rest(rest) => {
            pat_idents_impl(idents, &rest.arg);
          }
        }
      }
    }
    Pat::Assign(assign_pat) => {
      pat_idents_impl(idents, &assign_pat.left);
    }
    Pat::Expr(_) => {}
    Pat::Invalid(_) => {}
  }
}

pub fn module_level_hoists(scope: &Scope, module: &swc_ecma_ast::Module) {
  for item in &module.body {
    module_level_hoists_item(scope, item);
  }
}

fn module_level_hoists_item(scope: &Scope, module_item: &swc_ecma_ast::ModuleItem) {
  use swc_ecma_ast::ModuleDecl;
  use swc_ecma_ast::ModuleItem;

  match module_item {
    ModuleItem::ModuleDecl(module_decl) => match module_decl {
      ModuleDecl::Import(import_decl) => {
        for specifier in &import_decl.specifiers {
          import_specifier(scope, specifier);
        }
      }
      ModuleDecl::ExportDecl(ed) => {
        decl_hoists(scope, &ed.decl);
      }
      ModuleDecl::ExportDefaultDecl(edd) => match &edd.decl {
        swc_ecma_ast::DefaultDecl::Class(class_expr) => {
          if let Some(ident) = &class_expr.ident {
            declare_ident(scope, ident, BindingKind::Class);
          }
        }
        swc_ecma_ast::DefaultDecl::Fn(fn_expr) => {
          if let Some(ident) = &fn_expr.ident {
            declare_ident(scope, ident, BindingKind::Function);
          }
        }
        swc_ecma_ast::DefaultDecl::TsInterfaceDecl(_) => {}
      },
      ModuleDecl::ExportNamed(_) => {}
      ModuleDecl::ExportDefaultExpr(_) => {}
      ModuleDecl::ExportAll(_) => {}
      ModuleDecl::TsImportEquals(ts_import_equals) => {
        declare_ident(scope, &ts_import_equals.id, BindingKind::Import);
      }
      ModuleDecl::TsExportAssignment(_) => {}
      ModuleDecl::TsNamespaceExport(_) => {}
    },
    ModuleItem::Stmt(stmt) => {
      function_level_hoists_stmt(scope, stmt);
      block_level_hoists_stmt(scope, stmt);
    }
  }
}

fn import_specifier(scope: &Scope, import_specifier: &swc_ecma_ast::ImportSpecifier) {
  use swc_ecma_ast::ImportSpecifier::*;

  match import_specifier {
    Named(named_specifier) => {
      if named_specifier.is_type_only {
        return;
      }

      declare_ident(scope, &named_specifier.local, BindingKind::Import);
    }
    Default(default_specifier) => {
      declare_ident(scope, &default_specifier.local, BindingKind::Import);
    }
    Namespace(namespace_specifier) => {
      declare_ident(scope, &namespace_specifier.local, BindingKind::Import);
    }
  }
}

/// `var` declarations anywhere in a function body (outside nested functions)
/// belong to the function's scope.
pub fn function_level_hoists(scope: &Scope, stmts: &[swc_ecma_ast::Stmt]) {
  for stmt in stmts {
    function_level_hoists_stmt(scope, stmt);
  }
}

fn function_level_hoists_var_decl(scope: &Scope, var_decl: &swc_ecma_ast::VarDecl) {
  if var_decl.kind != swc_ecma_ast::VarDeclKind::Var {
    return;
  }

  for decl in &var_decl.decls {
    declare_pat(scope, &decl.name, BindingKind::Var);
  }
}

fn function_level_hoists_stmt(scope: &Scope, stmt: &swc_ecma_ast::Stmt) {
  use swc_ecma_ast::Stmt;

  match stmt {
    Stmt::Decl(swc_ecma_ast::Decl::Var(var_decl)) => {
      function_level_hoists_var_decl(scope, var_decl);
    }
    Stmt::Block(block_stmt) => {
      function_level_hoists(scope, &block_stmt.stmts);
    }
    Stmt::If(if_) => {
      function_level_hoists_stmt(scope, &if_.cons);

      if let Some(alt) = &if_.alt {
        function_level_hoists_stmt(scope, alt);
      }
    }
    Stmt::For(for_) => {
      if let Some(swc_ecma_ast::VarDeclOrExpr::VarDecl(var_decl)) = &for_.init {
        function_level_hoists_var_decl(scope, var_decl);
      }

      function_level_hoists_stmt(scope, &for_.body);
    }
    Stmt::ForIn(for_in) => {
      if let swc_ecma_ast::VarDeclOrPat::VarDecl(var_decl) = &for_in.left {
        function_level_hoists_var_decl(scope, var_decl);
      }

      function_level_hoists_stmt(scope, &for_in.body);
    }
    Stmt::ForOf(for_of) => {
      if let swc_ecma_ast::VarDeclOrPat::VarDecl(var_decl) = &for_of.left {
        function_level_hoists_var_decl(scope, var_decl);
      }

      function_level_hoists_stmt(scope, &for_of.body);
    }
    Stmt::While(while_) => function_level_hoists_stmt(scope, &while_.body),
    Stmt::DoWhile(do_while) => function_level_hoists_stmt(scope, &do_while.body),
    Stmt::Labeled(labeled) => function_level_hoists_stmt(scope, &labeled.body),
    Stmt::With(with) => function_level_hoists_stmt(scope, &with.body),
    Stmt::Switch(switch) => {
      for case in &switch.cases {
        function_level_hoists(scope, &case.cons);
      }
    }
    Stmt::Try(try_) => {
      function_level_hoists(scope, &try_.block.stmts);

      if let Some(handler) = &try_.handler {
        function_level_hoists(scope, &handler.body.stmts);
      }

      if let Some(finalizer) = &try_.finalizer {
        function_level_hoists(scope, &finalizer.stmts);
      }
    }
    _ => {}
  }
}

/// `let`, `const`, classes and function declarations belong to the block
/// that directly contains them.
pub fn block_level_hoists(scope: &Scope, stmts: &[swc_ecma_ast::Stmt]) {
  for stmt in stmts {
    block_level_hoists_stmt(scope, stmt);
  }
}

fn block_level_hoists_stmt(scope: &Scope, stmt: &swc_ecma_ast::Stmt) {
  if let swc_ecma_ast::Stmt::Decl(decl) = stmt {
    decl_hoists(scope, decl);
  }
}

fn decl_hoists(scope: &Scope, decl: &swc_ecma_ast::Decl) {
  use swc_ecma_ast::Decl;

  match decl {
    Decl::Class(class_decl) => {
      declare_ident(scope, &class_decl.ident, BindingKind::Class);
    }
    Decl::Fn(fn_decl) => {
      declare_ident(scope, &fn_decl.ident, BindingKind::Function);
    }
    Decl::Var(var_decl) => {
      let kind = var_kind(var_decl.kind);

      for decl in &var_decl.decls {
        declare_pat(scope, &decl.name, kind);
      }
    }
    Decl::TsEnum(ts_enum) => {
      declare_ident(scope, &ts_enum.id, BindingKind::Const);
    }
    Decl::TsInterface(_) => {}
    Decl::TsTypeAlias(_) => {}
    Decl::TsModule(_) => {}
  }
}
