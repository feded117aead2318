use std::collections::HashSet;

use swc_ecma_parser::Syntax;
use tracing::debug;
use worklets_common::WorkletPayload;

use crate::capture_finder::CaptureFinder;
use crate::classify::{
  callee_name, classify, classify_object, CallContext, WorkletCandidate, WorkletClass,
};
use crate::diagnostic::Diagnostic;
use crate::functionish::{Functionish, NodeKind};
use crate::options::CompilerOptions;
use crate::recursion_guard::RecursionGuard;
use crate::scope::Scope;
use crate::source_text::SourceText;
use crate::transform::{
  transform_context_object, transform_worklet, CompilationPassState, TransformedWorklet,
};
use crate::walker::ScopeVisitor;

#[derive(serde::Serialize, Clone, Debug)]
pub struct CompiledWorklet {
  pub ordinal: u32,
  pub kind: NodeKind,
  pub class: WorkletClass,
  pub payload: WorkletPayload,
}

/// A replacement of `lo..hi` (byte offsets into the file text).
pub struct Edit {
  pub lo: usize,
  pub hi: usize,
  pub text: String,
}

/// Classifies every function-like node it meets and transforms the worklets.
pub struct WorkletPass<'a> {
  source: &'a SourceText<'a>,
  options: &'a CompilerOptions,
  globals: HashSet<String>,
  state: CompilationPassState,
  guard: RecursionGuard,
  pub worklets: Vec<CompiledWorklet>,
  pub edits: Vec<Edit>,
  pub diagnostics: Vec<Diagnostic>,
}

impl<'a> WorkletPass<'a> {
  pub fn new(
    file: &str,
    syntax: Syntax,
    source: &'a SourceText<'a>,
    options: &'a CompilerOptions,
  ) -> Self {
    WorkletPass {
      source,
      options,
      globals: options.global_set(),
      state: CompilationPassState::new(file, syntax),
      guard: RecursionGuard::default(),
      worklets: vec![],
      edits: vec![],
      diagnostics: vec![],
    }
  }

  /// Returns true when the candidate was a worklet, whether or not its
  /// transformation succeeded.
  fn process(&mut self, scope: &Scope, candidate: WorkletCandidate) -> bool {
    let class = classify(&candidate, &self.options.auto_workletize, &self.guard);

    if class == WorkletClass::NotAWorklet {
      return false;
    }

    let function = candidate.function;
    self.guard.mark(function.span());

    let (captures, capture_diagnostics) = CaptureFinder::find(scope, &self.globals, function);

    let result = transform_worklet(
      function,
      &captures,
      capture_diagnostics,
      self.source,
      &mut self.state,
    );

    self.record(result, candidate.kind(), class, captures.len());
    true
  }

  fn record(
    &mut self,
    result: Result<TransformedWorklet, Vec<Diagnostic>>,
    kind: NodeKind,
    class: WorkletClass,
    capture_count: usize,
  ) {
    match result {
      Ok(transformed) => {
        debug!(
          file = %self.state.file,
          ordinal = transformed.ordinal,
          id = %transformed.payload.id,
          captures = capture_count,
          "transformed worklet"
        );

        self.edits.push(Edit {
          lo: self.source.offset(transformed.span.lo),
          hi: self.source.offset(transformed.span.hi),
          text: transformed.replacement,
        });

        self.worklets.push(CompiledWorklet {
          ordinal: transformed.ordinal,
          kind,
          class,
          payload: transformed.payload,
        });
      }
      Err(mut diagnostics) => {
        debug!(file = %self.state.file, "worklet left untransformed");
        self.diagnostics.append(&mut diagnostics);
      }
    }
  }
}

impl<'a> ScopeVisitor for WorkletPass<'a> {
  fn ident_ref(&mut self, _scope: &Scope, _ident: &swc_ecma_ast::Ident, _mutation: bool) {}

  fn enter_function(&mut self, scope: &Scope, function: Functionish) -> bool {
    if self.guard.is_processed(function.span()) {
      return false;
    }

    // Functions nested in a worklet belong to it and are not revisited.
    !self.process(scope, WorkletCandidate::new(function, None))
  }

  fn call(&mut self, scope: &Scope, call: &swc_ecma_ast::CallExpr) {
    let callee = match callee_name(&call.callee) {
      Some(callee) => callee,
      None => return,
    };

    for (arg_index, arg) in call.args.iter().enumerate() {
      if arg.spread.is_some() {
        continue;
      }

      let function = match &*arg.expr {
        swc_ecma_ast::Expr::Arrow(arrow) => Functionish::Arrow(arrow),
        swc_ecma_ast::Expr::Fn(fn_expr) => Functionish::Expr(fn_expr),
        _ => continue,
      };

      let call_context = CallContext {
        callee: callee.clone(),
        arg_index,
      };

      self.process(scope, WorkletCandidate::new(function, Some(call_context)));
    }
  }

  fn enter_object(&mut self, scope: &Scope, object: &swc_ecma_ast::ObjectLit) -> bool {
    if RecursionGuard::is_payload_object(object) {
      self.guard.mark(object.span);
      return false;
    }

    let class = classify_object(object, &self.guard);

    if class == WorkletClass::NotAWorklet {
      return true;
    }

    self.guard.mark(object.span);

    let (captures, capture_diagnostics) = CaptureFinder::find_in_object(scope, &self.globals, object);

    let result = transform_context_object(
      object,
      &captures,
      capture_diagnostics,
      self.source,
      &mut self.state,
    );

    // The object's methods travel inside the factory.
    self.record(result, NodeKind::ContextObject, class, captures.len());
    false
  }
}
