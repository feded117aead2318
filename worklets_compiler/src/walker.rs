use swc_common::Span;
use worklets_common::BindingKind;

use crate::functionish::{FunctionBody, Functionish};
use crate::hoist::{
  block_level_hoists, declare_ident, declare_pat, function_level_hoists, module_level_hoists,
  var_kind,
};
use crate::scope::{Binding, Scope, ScopeTrait};

/// Callbacks for a scope-aware walk over a module.
///
/// The walker owns scope bookkeeping; implementors only see references and
/// the handful of nodes the worklet pass cares about.
pub trait ScopeVisitor {
  fn ident_ref(&mut self, scope: &Scope, ident: &swc_ecma_ast::Ident, mutation: bool);

  /// `this` that is not bound by any function between it and the walk root.
  fn lexical_this(&mut self, _span: Span) {}

  /// `super` that is not bound by any method between it and the walk root.
  fn lexical_super(&mut self, _span: Span) {}

  fn unsupported(&mut self, _span: Span, _construct: &str) {}

  /// Return false to leave the function unvisited.
  fn enter_function(&mut self, _scope: &Scope, _function: Functionish) -> bool {
    true
  }

  /// Called before the callee and arguments are visited.
  fn call(&mut self, _scope: &Scope, _call: &swc_ecma_ast::CallExpr) {}

  /// Return false to leave the object literal unvisited.
  fn enter_object(&mut self, _scope: &Scope, _object: &swc_ecma_ast::ObjectLit) -> bool {
    true
  }
}

pub struct Walker<'v, V: ScopeVisitor> {
  visitor: &'v mut V,
  this_barriers: usize,
  super_barriers: usize,
}

impl<'v, V: ScopeVisitor> Walker<'v, V> {
  pub fn new(visitor: &'v mut V) -> Self {
    Walker {
      visitor,
      this_barriers: 0,
      super_barriers: 0,
    }
  }

  pub fn module(&mut self, scope: &Scope, module: &swc_ecma_ast::Module) {
    module_level_hoists(scope, module);

    for module_item in &module.body {
      self.module_item(scope, module_item);
    }
  }

  pub fn script(&mut self, scope: &Scope, script: &swc_ecma_ast::Script) {
    function_level_hoists(scope, &script.body);
    block_level_hoists(scope, &script.body);

    for stmt in &script.body {
      self.stmt(scope, stmt);
    }
  }

  /// Walks `function` as the root: no `enter_function` callback for it, and
  /// `super` in its body counts as lexical.
  pub fn root_function(&mut self, scope: &Scope, function: Functionish) {
    self.function_inner(scope, function, true);
  }

  /// Walks the properties of `object` as the body of a function returning it:
  /// `this` and `arguments` belong to that function.
  pub fn root_object(&mut self, scope: &Scope, object: &swc_ecma_ast::ObjectLit) {
    let child_scope = scope.nest();

    self.with_barriers(true, false, |walker| {
      declare_arguments(&child_scope);

      for prop_or_spread in &object.props {
        walker.prop_or_spread(&child_scope, prop_or_spread);
      }
    });
  }

  fn with_barriers(&mut self, this: bool, super_: bool, f: impl FnOnce(&mut Self)) {
    let saved = (self.this_barriers, self.super_barriers);

    if this {
      self.this_barriers += 1;
    }

    if super_ {
      self.super_barriers += 1;
    }

    f(self);

    self.this_barriers = saved.0;
    self.super_barriers = saved.1;
  }

  fn module_item(&mut self, scope: &Scope, module_item: &swc_ecma_ast::ModuleItem) {
    use swc_ecma_ast::ModuleDecl;
    use swc_ecma_ast::ModuleItem;

    match module_item {
      ModuleItem::ModuleDecl(module_decl) => match module_decl {
        ModuleDecl::Import(_) => {}
        ModuleDecl::ExportDecl(ed) => self.decl(scope, &ed.decl),
        ModuleDecl::ExportNamed(_) => {}
        ModuleDecl::ExportDefaultDecl(edd) => match &edd.decl {
          swc_ecma_ast::DefaultDecl::Class(class_expr) => {
            self.class(scope, class_expr.ident.as_ref(), &class_expr.class);
          }
          swc_ecma_ast::DefaultDecl::Fn(fn_expr) => match fn_expr.ident {
            Some(_) => self.functionish(
              scope,
              Functionish::DefaultExport {
                export: edd,
                function: fn_expr,
              },
            ),
            None => self.functionish(scope, Functionish::Expr(fn_expr)),
          },
          swc_ecma_ast::DefaultDecl::TsInterfaceDecl(_) => {}
        },
        ModuleDecl::ExportDefaultExpr(ede) => self.expr(scope, &ede.expr),
        ModuleDecl::ExportAll(_) => {}
        ModuleDecl::TsImportEquals(_) => {}
        ModuleDecl::TsExportAssignment(tea) => self.expr(scope, &tea.expr),
        ModuleDecl::TsNamespaceExport(_) => {}
      },
      ModuleItem::Stmt(stmt) => self.stmt(scope, stmt),
    }
  }

  fn functionish(&mut self, scope: &Scope, function: Functionish) {
    if self.visitor.enter_function(scope, function) {
      self.function_inner(scope, function, false);
    }
  }

  fn function_inner(&mut self, scope: &Scope, function: Functionish, is_root: bool) {
    let child_scope = scope.nest();

    if let Some(ident) = function.own_name() {
      declare_ident(&child_scope, ident, BindingKind::Function);
    }

    let binds_this = !function.is_arrow();
    let binds_super = !is_root && matches!(function, Functionish::Method { .. });

    self.with_barriers(binds_this, binds_super, |walker| {
      if binds_this {
        declare_arguments(&child_scope);
      }

      let params = function.param_pats();

      for pat in &params {
        declare_pat(&child_scope, pat, BindingKind::Param);
      }

      for pat in &params {
        walker.binding_pat(&child_scope, pat);
      }

      match function.body() {
        FunctionBody::Block(block) => walker.function_body(&child_scope, block),
        FunctionBody::Expr(expr) => walker.expr(&child_scope, expr),
        FunctionBody::Missing => {}
      }
    });
  }

  /// Class members, accessors and constructors: they bind both `this` and
  /// `super` and are never worklet candidates themselves.
  fn method_function(&mut self, scope: &Scope, function: &swc_ecma_ast::Function) {
    let child_scope = scope.nest();

    self.with_barriers(true, true, |walker| {
      declare_arguments(&child_scope);

      for param in &function.params {
        declare_pat(&child_scope, &param.pat, BindingKind::Param);
      }

      for param in &function.params {
        walker.binding_pat(&child_scope, &param.pat);
      }

      if let Some(body) = &function.body {
        walker.function_body(&child_scope, body);
      }
    });
  }

  fn function_body(&mut self, scope: &Scope, block: &swc_ecma_ast::BlockStmt) {
    function_level_hoists(scope, &block.stmts);
    block_level_hoists(scope, &block.stmts);

    for stmt in &block.stmts {
      self.stmt(scope, stmt);
    }
  }

  fn block(&mut self, parent_scope: &Scope, block: &swc_ecma_ast::BlockStmt) {
    let scope = parent_scope.nest();
    block_level_hoists(&scope, &block.stmts);

    for stmt in &block.stmts {
      self.stmt(&scope, stmt);
    }
  }

  fn stmt(&mut self, scope: &Scope, stmt: &swc_ecma_ast::Stmt) {
    use swc_ecma_ast::Stmt;

    match stmt {
      Stmt::Block(block) => self.block(scope, block),
      Stmt::Empty(_) => {}
      Stmt::Debugger(_) => {}
      Stmt::With(with) => {
        self.visitor.unsupported(with.span, "with statement");
        self.expr(scope, &with.obj);
        self.stmt(scope, &with.body);
      }
      Stmt::Return(return_) => {
        if let Some(arg) = &return_.arg {
          self.expr(scope, arg);
        }
      }
      Stmt::Labeled(labeled) => self.stmt(scope, &labeled.body),
      Stmt::Break(_) => {}
      Stmt::Continue(_) => {}
      Stmt::If(if_) => {
        self.expr(scope, &if_.test);
        self.stmt(scope, &if_.cons);

        if let Some(alt) = &if_.alt {
          self.stmt(scope, alt);
        }
      }
      Stmt::Switch(switch) => {
        self.expr(scope, &switch.discriminant);

        let switch_scope = scope.nest();

        for case in &switch.cases {
          block_level_hoists(&switch_scope, &case.cons);
        }

        for case in &switch.cases {
          if let Some(test) = &case.test {
            self.expr(&switch_scope, test);
          }

          for stmt in &case.cons {
            self.stmt(&switch_scope, stmt);
          }
        }
      }
      Stmt::Throw(throw) => self.expr(scope, &throw.arg),
      Stmt::Try(try_) => {
        self.block(scope, &try_.block);

        if let Some(handler) = &try_.handler {
          let catch_scope = scope.nest();

          if let Some(param) = &handler.param {
            declare_pat(&catch_scope, param, BindingKind::Catch);
            self.binding_pat(&catch_scope, param);
          }

          self.block(&catch_scope, &handler.body);
        }

        if let Some(finalizer) = &try_.finalizer {
          self.block(scope, finalizer);
        }
      }
      Stmt::While(while_) => {
        self.expr(scope, &while_.test);
        self.stmt(scope, &while_.body);
      }
      Stmt::DoWhile(do_while) => {
        self.stmt(scope, &do_while.body);
        self.expr(scope, &do_while.test);
      }
      Stmt::For(for_) => {
        let for_scope = scope.nest();

        match &for_.init {
          None => {}
          Some(swc_ecma_ast::VarDeclOrExpr::VarDecl(var_decl)) => {
            self.var_decl(&for_scope, var_decl);
          }
          Some(swc_ecma_ast::VarDeclOrExpr::Expr(expr)) => self.expr(&for_scope, expr),
        }

        if let Some(test) = &for_.test {
          self.expr(&for_scope, test);
        }

        if let Some(update) = &for_.update {
          self.expr(&for_scope, update);
        }

        self.stmt(&for_scope, &for_.body);
      }
      Stmt::ForIn(for_in) => {
        let for_scope = scope.nest();
        self.for_head(&for_scope, &for_in.left);
        self.expr(&for_scope, &for_in.right);
        self.stmt(&for_scope, &for_in.body);
      }
      Stmt::ForOf(for_of) => {
        let for_scope = scope.nest();
        self.for_head(&for_scope, &for_of.left);
        self.expr(&for_scope, &for_of.right);
        self.stmt(&for_scope, &for_of.body);
      }
      Stmt::Decl(decl) => self.decl(scope, decl),
      Stmt::Expr(expr_stmt) => self.expr(scope, &expr_stmt.expr),
    }
  }

  fn for_head(&mut self, scope: &Scope, left: &swc_ecma_ast::VarDeclOrPat) {
    match left {
      swc_ecma_ast::VarDeclOrPat::VarDecl(var_decl) => self.var_decl(scope, var_decl),
      swc_ecma_ast::VarDeclOrPat::Pat(pat) => self.assign_target(scope, pat),
    }
  }

  fn decl(&mut self, scope: &Scope, decl: &swc_ecma_ast::Decl) {
    use swc_ecma_ast::Decl;

    match decl {
      Decl::Class(class_decl) => self.class(scope, None, &class_decl.class),
      Decl::Fn(fn_decl) => self.functionish(scope, Functionish::Decl(fn_decl)),
      Decl::Var(var_decl) => self.var_decl(scope, var_decl),
      Decl::TsInterface(_) => {}
      Decl::TsTypeAlias(_) => {}
      Decl::TsEnum(_) => {}
      Decl::TsModule(_) => {}
    }
  }

  fn var_decl(&mut self, scope: &Scope, var_decl: &swc_ecma_ast::VarDecl) {
    let kind = var_kind(var_decl.kind);

    for decl in &var_decl.decls {
      // `var` names were hoisted to the function scope already.
      if kind != BindingKind::Var {
        declare_pat(scope, &decl.name, kind);
      }

      self.binding_pat(scope, &decl.name);

      if let Some(init) = &decl.init {
        self.expr(scope, init);
      }
    }
  }

  /// Visits the expressions inside a declaring pattern: defaults and computed
  /// keys. The declared names themselves are not references.
  fn binding_pat(&mut self, scope: &Scope, pat: &swc_ecma_ast::Pat) {
    use swc_ecma_ast::Pat;

    match pat {
      Pat::Ident(_) => {}
      Pat::Array(array) => {
        for elem in array.elems.iter().flatten() {
          self.binding_pat(scope, elem);
        }
      }
      Pat::Rest(rest) => self.binding_pat(scope, &rest.arg),
      Pat::Object(object) => {
        for prop in &object.props {
          match prop {
            swc_ecma_ast::ObjectPatProp::KeyValue(key_value) => {
              self.prop_name(scope, &key_value.key);
              self.binding_pat(scope, &key_value.value);
            }
            swc_ecma_ast::ObjectPatProp::Assign(assign) => {
              if let Some(value) = &assign.value {
                self.expr(scope, value);
              }
            }
            swc_ecma_ast::ObjectPatProp::Rest(rest) => self.binding_pat(scope, &rest.arg),
          }
        }
      }
      Pat::Assign(assign) => {
        self.binding_pat(scope, &assign.left);
        self.expr(scope, &assign.right);
      }
      Pat::Expr(expr) => self.expr(scope, expr),
      Pat::Invalid(_) => {}
    }
  }

  /// Visits the target of an assignment; plain names in it are mutations.
  fn assign_target(&mut self, scope: &Scope, pat: &swc_ecma_ast::Pat) {
    use swc_ecma_ast::Pat;

    match pat {
      Pat::Ident(ident) => self.visitor.ident_ref(scope, &ident.id, true),
      Pat::Array(array) => {
        for elem in array.elems.iter().flatten() {
          self.assign_target(scope, elem);
        }
      }
      Pat::Rest(rest) => self.assign_target(scope, &rest.arg),
      Pat::Object(object) => {
        for prop in &object.props {
          match prop {
            swc_ecma_ast::ObjectPatProp::KeyValue(key_value) => {
              self.prop_name(scope, &key_value.key);
              self.assign_target(scope, &key_value.value);
            }
            swc_ecma_ast::ObjectPatProp::Assign(assign) => {
              self.visitor.ident_ref(scope, &assign.key, true);

              if let Some(value) = &assign.value {
                self.expr(scope, value);
              }
            }
            swc_ecma_ast::ObjectPatProp::Rest(rest) => self.assign_target(scope, &rest.arg),
          }
        }
      }
      Pat::Assign(assign) => {
        self.assign_target(scope, &assign.left);
        self.expr(scope, &assign.right);
      }
      Pat::Expr(expr) => self.mutate_expr(scope, expr),
      Pat::Invalid(_) => {}
    }
  }

  fn mutate_expr(&mut self, scope: &Scope, expr: &swc_ecma_ast::Expr) {
    match expr {
      swc_ecma_ast::Expr::Ident(ident) => self.visitor.ident_ref(scope, ident, true),
      swc_ecma_ast::Expr::Paren(paren) => self.mutate_expr(scope, &paren.expr),
      _ => self.expr(scope, expr),
    }
  }

  fn prop_name(&mut self, scope: &Scope, prop_name: &swc_ecma_ast::PropName) {
    if let swc_ecma_ast::PropName::Computed(computed) = prop_name {
      self.expr(scope, &computed.expr);
    }
  }

  fn class(
    &mut self,
    scope: &Scope,
    ident: Option<&swc_ecma_ast::Ident>,
    class: &swc_ecma_ast::Class,
  ) {
    let class_scope = scope.nest();

    if let Some(ident) = ident {
      declare_ident(&class_scope, ident, BindingKind::Class);
    }

    if let Some(super_class) = &class.super_class {
      self.expr(&class_scope, super_class);
    }

    for member in &class.body {
      self.class_member(&class_scope, member);
    }
  }

  fn class_member(&mut self, scope: &Scope, class_member: &swc_ecma_ast::ClassMember) {
    use swc_ecma_ast::ClassMember::*;

    match class_member {
      Constructor(constructor) => {
        let child_scope = scope.nest();

        self.with_barriers(true, true, |walker| {
          declare_arguments(&child_scope);

          for param in &constructor.params {
            match param {
              swc_ecma_ast::ParamOrTsParamProp::Param(param) => {
                declare_pat(&child_scope, &param.pat, BindingKind::Param);
                walker.binding_pat(&child_scope, &param.pat);
              }
              swc_ecma_ast::ParamOrTsParamProp::TsParamProp(ts_param_prop) => {
                match &ts_param_prop.param {
                  swc_ecma_ast::TsParamPropParam::Ident(ident) => {
                    declare_ident(&child_scope, &ident.id, BindingKind::Param);
                  }
                  swc_ecma_ast::TsParamPropParam::Assign(assign) => {
                    declare_pat(&child_scope, &assign.left, BindingKind::Param);
                    walker.expr(&child_scope, &assign.right);
                  }
                }
              }
            }
          }

          if let Some(body) = &constructor.body {
            walker.function_body(&child_scope, body);
          }
        });
      }
      Method(method) => {
        self.prop_name(scope, &method.key);
        self.method_function(scope, &method.function);
      }
      PrivateMethod(private_method) => {
        self.method_function(scope, &private_method.function);
      }
      ClassProp(class_prop) => {
        self.prop_name(scope, &class_prop.key);

        if let Some(value) = &class_prop.value {
          self.with_barriers(true, true, |walker| walker.expr(scope, value));
        }
      }
      PrivateProp(private_prop) => {
        if let Some(value) = &private_prop.value {
          self.with_barriers(true, true, |walker| walker.expr(scope, value));
        }
      }
      StaticBlock(static_block) => {
        self.with_barriers(true, true, |walker| walker.block(scope, &static_block.body));
      }
      TsIndexSignature(_) => {}
      Empty(_) => {}
    }
  }

  fn prop_or_spread(&mut self, scope: &Scope, prop_or_spread: &swc_ecma_ast::PropOrSpread) {
    use swc_ecma_ast::Prop;

    let prop = match prop_or_spread {
      swc_ecma_ast::PropOrSpread::Spread(spread) => return self.expr(scope, &spread.expr),
      swc_ecma_ast::PropOrSpread::Prop(prop) => prop,
    };

    match &**prop {
      Prop::Shorthand(ident) => self.visitor.ident_ref(scope, ident, false),
      Prop::KeyValue(kv) => {
        self.prop_name(scope, &kv.key);
        self.expr(scope, &kv.value);
      }
      Prop::Assign(assign) => self.expr(scope, &assign.value),
      Prop::Getter(getter) => {
        self.prop_name(scope, &getter.key);
        let child_scope = scope.nest();

        self.with_barriers(true, true, |walker| {
          declare_arguments(&child_scope);

          if let Some(body) = &getter.body {
            walker.function_body(&child_scope, body);
          }
        });
      }
      Prop::Setter(setter) => {
        self.prop_name(scope, &setter.key);
        let child_scope = scope.nest();

        self.with_barriers(true, true, |walker| {
          declare_arguments(&child_scope);
          declare_pat(&child_scope, &setter.param, BindingKind::Param);
          walker.binding_pat(&child_scope, &setter.param);

          if let Some(body) = &setter.body {
            walker.function_body(&child_scope, body);
          }
        });
      }
      Prop::Method(method) => {
        self.prop_name(scope, &method.key);
        self.functionish(
          scope,
          Functionish::Method {
            key: &method.key,
            function: &method.function,
          },
        );
      }
    }
  }

  fn expr(&mut self, scope: &Scope, expr: &swc_ecma_ast::Expr) {
    use swc_ecma_ast::Expr;

    match expr {
      Expr::This(this) => {
        if self.this_barriers == 0 {
          self.visitor.lexical_this(this.span);
        }
      }
      Expr::Ident(ident) => self.visitor.ident_ref(scope, ident, false),
      Expr::Lit(_) => {}
      Expr::Array(array) => {
        for elem in array.elems.iter().flatten() {
          self.expr(scope, &elem.expr);
        }
      }
      Expr::Object(object) => {
        if self.visitor.enter_object(scope, object) {
          for prop_or_spread in &object.props {
            self.prop_or_spread(scope, prop_or_spread);
          }
        }
      }
      Expr::Fn(fn_expr) => self.functionish(scope, Functionish::Expr(fn_expr)),
      Expr::Arrow(arrow) => self.functionish(scope, Functionish::Arrow(arrow)),
      Expr::Class(class_expr) => self.class(scope, class_expr.ident.as_ref(), &class_expr.class),
      Expr::Unary(unary) => self.expr(scope, &unary.arg),
      Expr::Update(update) => self.mutate_expr(scope, &update.arg),
      Expr::Bin(bin) => {
        self.expr(scope, &bin.left);
        self.expr(scope, &bin.right);
      }
      Expr::Assign(assign) => {
        match &assign.left {
          swc_ecma_ast::PatOrExpr::Pat(pat) => self.assign_target(scope, pat),
          swc_ecma_ast::PatOrExpr::Expr(expr) => self.mutate_expr(scope, expr),
        }

        self.expr(scope, &assign.right);
      }
      Expr::Seq(seq) => {
        for expr in &seq.exprs {
          self.expr(scope, expr);
        }
      }
      Expr::Cond(cond) => {
        self.expr(scope, &cond.test);
        self.expr(scope, &cond.cons);
        self.expr(scope, &cond.alt);
      }
      Expr::Yield(yield_) => {
        if let Some(arg) = &yield_.arg {
          self.expr(scope, arg);
        }
      }
      Expr::Await(await_) => self.expr(scope, &await_.arg),
      Expr::Member(member) => {
        self.expr(scope, &member.obj);

        if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
          self.expr(scope, &computed.expr);
        }
      }
      Expr::SuperProp(super_prop) => {
        if self.super_barriers == 0 {
          self.visitor.lexical_super(super_prop.span);
        }

        if let swc_ecma_ast::SuperProp::Computed(computed) = &super_prop.prop {
          self.expr(scope, &computed.expr);
        }
      }
      Expr::Call(call) => {
        self.visitor.call(scope, call);

        match &call.callee {
          swc_ecma_ast::Callee::Expr(callee) => self.expr(scope, callee),
          swc_ecma_ast::Callee::Super(super_) => {
            if self.super_barriers == 0 {
              self.visitor.lexical_super(super_.span);
            }
          }
          swc_ecma_ast::Callee::Import(_) => {}
        }

        for arg in &call.args {
          self.expr(scope, &arg.expr);
        }
      }
      Expr::New(new) => {
        self.expr(scope, &new.callee);

        if let Some(args) = &new.args {
          for arg in args {
            self.expr(scope, &arg.expr);
          }
        }
      }
      Expr::Paren(paren) => self.expr(scope, &paren.expr),
      Expr::Tpl(tpl) => {
        for elem in &tpl.exprs {
          self.expr(scope, elem);
        }
      }
      Expr::TaggedTpl(tagged_tpl) => {
        self.expr(scope, &tagged_tpl.tag);

        for elem in &tagged_tpl.tpl.exprs {
          self.expr(scope, elem);
        }
      }
      Expr::MetaProp(_) => {}
      Expr::Invalid(_) => {}
      Expr::TsTypeAssertion(ts) => self.expr(scope, &ts.expr),
      Expr::TsConstAssertion(ts) => self.expr(scope, &ts.expr),
      Expr::TsNonNull(ts) => self.expr(scope, &ts.expr),
      Expr::TsAs(ts) => self.expr(scope, &ts.expr),
      Expr::TsInstantiation(ts) => self.expr(scope, &ts.expr),
      Expr::OptChain(opt_chain) => self.expr(scope, &opt_chain.expr),
      Expr::PrivateName(_) => {}
      Expr::JSXMember(jsx_member) => self.jsx_member(scope, jsx_member),
      Expr::JSXNamespacedName(_) => {}
      Expr::JSXEmpty(_) => {}
      Expr::JSXElement(jsx_element) => self.jsx_element(scope, jsx_element),
      Expr::JSXFragment(jsx_fragment) => self.jsx_children(scope, &jsx_fragment.children),
    }
  }

  fn jsx_member(&mut self, scope: &Scope, jsx_member: &swc_ecma_ast::JSXMemberExpr) {
    match &jsx_member.obj {
      swc_ecma_ast::JSXObject::Ident(ident) => self.visitor.ident_ref(scope, ident, false),
      swc_ecma_ast::JSXObject::JSXMemberExpr(inner) => self.jsx_member(scope, inner),
    }
  }

  fn jsx_element(&mut self, scope: &Scope, jsx_element: &swc_ecma_ast::JSXElement) {
    match &jsx_element.opening.name {
      swc_ecma_ast::JSXElementName::Ident(ident) => {
        // Lower-case tags are intrinsic elements, not references.
        if ident.sym.starts_with(|c: char| c.is_ascii_uppercase() || c == '_' || c == '$') {
          self.visitor.ident_ref(scope, ident, false);
        }
      }
      swc_ecma_ast::JSXElementName::JSXMemberExpr(jsx_member) => {
        self.jsx_member(scope, jsx_member);
      }
      swc_ecma_ast::JSXElementName::JSXNamespacedName(_) => {}
    }

    for attr in &jsx_element.opening.attrs {
      match attr {
        swc_ecma_ast::JSXAttrOrSpread::JSXAttr(attr) => match &attr.value {
          Some(swc_ecma_ast::JSXAttrValue::JSXExprContainer(container)) => {
            self.jsx_expr_container(scope, container);
          }
          Some(swc_ecma_ast::JSXAttrValue::JSXElement(element)) => {
            self.jsx_element(scope, element);
          }
          Some(swc_ecma_ast::JSXAttrValue::JSXFragment(fragment)) => {
            self.jsx_children(scope, &fragment.children);
          }
          Some(swc_ecma_ast::JSXAttrValue::Lit(_)) | None => {}
        },
        swc_ecma_ast::JSXAttrOrSpread::SpreadElement(spread) => self.expr(scope, &spread.expr),
      }
    }

    self.jsx_children(scope, &jsx_element.children);
  }

  fn jsx_children(&mut self, scope: &Scope, children: &[swc_ecma_ast::JSXElementChild]) {
    use swc_ecma_ast::JSXElementChild;

    for child in children {
      match child {
        JSXElementChild::JSXText(_) => {}
        JSXElementChild::JSXExprContainer(container) => self.jsx_expr_container(scope, container),
        JSXElementChild::JSXSpreadChild(spread) => self.expr(scope, &spread.expr),
        JSXElementChild::JSXElement(element) => self.jsx_element(scope, element),
        JSXElementChild::JSXFragment(fragment) => self.jsx_children(scope, &fragment.children),
      }
    }
  }

  fn jsx_expr_container(&mut self, scope: &Scope, container: &swc_ecma_ast::JSXExprContainer) {
    if let swc_ecma_ast::JSXExpr::Expr(expr) = &container.expr {
      self.expr(scope, expr);
    }
  }
}

fn declare_arguments(scope: &Scope) {
  scope.set(
    &swc_atoms::JsWord::from("arguments"),
    Binding {
      kind: BindingKind::Var,
      span: swc_common::DUMMY_SP,
    },
  );
}
