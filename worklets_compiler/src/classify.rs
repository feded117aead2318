use crate::functionish::{Functionish, NodeKind};
use crate::options::AutoWorkletTable;
use crate::recursion_guard::RecursionGuard;

/// The call a candidate function is passed to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CallContext {
  pub callee: String,
  pub arg_index: usize,
}

pub struct WorkletCandidate<'a> {
  pub function: Functionish<'a>,
  pub has_directive: bool,
  pub enclosing_call: Option<CallContext>,
}

impl<'a> WorkletCandidate<'a> {
  pub fn new(function: Functionish<'a>, enclosing_call: Option<CallContext>) -> Self {
    WorkletCandidate {
      has_directive: function.worklet_directive().is_some(),
      function,
      enclosing_call,
    }
  }

  pub fn kind(&self) -> NodeKind {
    self.function.kind()
  }
}

#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkletClass {
  ExplicitWorklet,
  AutoWorklet { callee: String },
  ContextObject,
  NotAWorklet,
}

pub fn classify(
  candidate: &WorkletCandidate,
  table: &AutoWorkletTable,
  guard: &RecursionGuard,
) -> WorkletClass {
  if guard.is_processed(candidate.function.span()) {
    return WorkletClass::NotAWorklet;
  }

  if candidate.has_directive {
    return WorkletClass::ExplicitWorklet;
  }

  match &candidate.enclosing_call {
    Some(call) if table.matches(&call.callee, call.arg_index) => WorkletClass::AutoWorklet {
      callee: call.callee.clone(),
    },
    _ => WorkletClass::NotAWorklet,
  }
}

pub const CONTEXT_OBJECT_MARKER: &str = "__workletContextObject";
pub const CONTEXT_OBJECT_FACTORY: &str = "__workletContextObjectFactory";

/// Object literals are worklets only as a whole, when they carry the context
/// object marker.
pub fn classify_object(object: &swc_ecma_ast::ObjectLit, guard: &RecursionGuard) -> WorkletClass {
  if guard.is_processed(object.span) || !object.props.iter().any(is_context_object_marker) {
    return WorkletClass::NotAWorklet;
  }

  WorkletClass::ContextObject
}

pub fn is_context_object_marker(prop: &swc_ecma_ast::PropOrSpread) -> bool {
  let prop = match prop {
    swc_ecma_ast::PropOrSpread::Prop(prop) => prop,
    swc_ecma_ast::PropOrSpread::Spread(_) => return false,
  };

  match &**prop {
    swc_ecma_ast::Prop::KeyValue(kv) => match &kv.key {
      swc_ecma_ast::PropName::Ident(ident) => &*ident.sym == CONTEXT_OBJECT_MARKER,
      swc_ecma_ast::PropName::Str(str_) => &*str_.value == CONTEXT_OBJECT_MARKER,
      _ => false,
    },
    _ => false,
  }
}

/// Name used to look a callee up in the auto-workletization table.
pub fn callee_name(callee: &swc_ecma_ast::Callee) -> Option<String> {
  let expr = match callee {
    swc_ecma_ast::Callee::Expr(expr) => expr,
    swc_ecma_ast::Callee::Super(_) | swc_ecma_ast::Callee::Import(_) => return None,
  };

  match &**expr {
    swc_ecma_ast::Expr::Ident(ident) => Some(ident.sym.to_string()),
    swc_ecma_ast::Expr::Member(member) => match (&*member.obj, &member.prop) {
      (swc_ecma_ast::Expr::Ident(obj), swc_ecma_ast::MemberProp::Ident(prop)) => {
        Some(format!("{}.{}", obj.sym, prop.sym))
      }
      _ => None,
    },
    _ => None,
  }
}
