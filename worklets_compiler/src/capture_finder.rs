use std::collections::HashSet;

use swc_common::Span;
use worklets_common::BindingKind;

use crate::diagnostic::Diagnostic;
use crate::functionish::Functionish;
use crate::scope::{root_scope, Scope, ScopeTrait};
use crate::walker::{ScopeVisitor, Walker};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CapturedName {
  pub name: String,
  pub kind: BindingKind,
  pub first_ref: Span,
}

/// Free variables of a function that resolve to bindings in its enclosing
/// scopes, in first-reference order.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct CaptureSet {
  pub names: Vec<CapturedName>,
}

impl CaptureSet {
  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.iter().any(|captured| captured.name == name)
  }
}

pub struct CaptureFinder<'g> {
  outside_scope: Scope,
  globals: &'g HashSet<String>,
  names: HashSet<swc_atoms::JsWord>,
  captures: CaptureSet,
  diagnostics: Vec<Diagnostic>,
}

impl<'g> CaptureFinder<'g> {
  fn new(outside_scope: &Scope, globals: &'g HashSet<String>) -> Self {
    CaptureFinder {
      outside_scope: outside_scope.clone(),
      globals,
      names: Default::default(),
      captures: Default::default(),
      diagnostics: Default::default(),
    }
  }

  /// Computes what `function` captures from `outside_scope`, along with
  /// diagnostics for references the closure model cannot snapshot.
  pub fn find(
    outside_scope: &Scope,
    globals: &'g HashSet<String>,
    function: Functionish,
  ) -> (CaptureSet, Vec<Diagnostic>) {
    let mut finder = CaptureFinder::new(outside_scope, globals);

    // The function's own names live in a fresh chain so that they can be
    // told apart from the enclosing ones.
    let inside_scope = root_scope();
    Walker::new(&mut finder).root_function(&inside_scope, function);

    (finder.captures, finder.diagnostics)
  }

  /// Same as `find`, for an object literal recreated by a worklet factory.
  pub fn find_in_object(
    outside_scope: &Scope,
    globals: &'g HashSet<String>,
    object: &swc_ecma_ast::ObjectLit,
  ) -> (CaptureSet, Vec<Diagnostic>) {
    let mut finder = CaptureFinder::new(outside_scope, globals);

    let inside_scope = root_scope();
    Walker::new(&mut finder).root_object(&inside_scope, object);

    (finder.captures, finder.diagnostics)
  }
}

impl<'g> ScopeVisitor for CaptureFinder<'g> {
  fn ident_ref(&mut self, scope: &Scope, ident: &swc_ecma_ast::Ident, mutation: bool) {
    if scope.get(&ident.sym).is_some() {
      return;
    }

    if &*ident.sym == "arguments" {
      self.diagnostics.push(Diagnostic::error(
        "`arguments` of an enclosing function cannot be captured by a worklet".to_string(),
        ident.span,
      ));

      return;
    }

    if self.globals.contains(&*ident.sym) {
      return;
    }

    let binding = match self.outside_scope.get(&ident.sym) {
      Some(binding) => binding,
      None => return, // Global
    };

    if self.names.insert(ident.sym.clone()) {
      self.captures.names.push(CapturedName {
        name: ident.sym.to_string(),
        kind: binding.kind,
        first_ref: ident.span,
      });
    }

    if mutation && !binding.kind.is_mutable() {
      self.diagnostics.push(Diagnostic::error(
        format!(
          "Cannot assign to captured {:?} binding `{}`; worklets receive a copy of it",
          binding.kind, ident.sym
        ),
        ident.span,
      ));
    }
  }

  fn lexical_this(&mut self, span: Span) {
    self.diagnostics.push(Diagnostic::error(
      "`this` inside an arrow worklet refers to the enclosing scope and cannot be captured"
        .to_string(),
      span,
    ));
  }

  fn lexical_super(&mut self, span: Span) {
    self.diagnostics.push(Diagnostic::error(
      "`super` cannot be used directly inside a worklet".to_string(),
      span,
    ));
  }

  fn unsupported(&mut self, span: Span, construct: &str) {
    self.diagnostics.push(Diagnostic::error(
      format!("{} is not supported inside worklets", construct),
      span,
    ));
  }
}
