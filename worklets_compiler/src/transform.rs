use swc_common::{Span, Spanned};
use swc_ecma_parser::Syntax;
use worklets_common::{js_string_literal, ClosureBinding, Location, WorkletPayload, COMPILER_VERSION};

use crate::capture_finder::CaptureSet;
use crate::classify::{is_context_object_marker, CONTEXT_OBJECT_FACTORY};
use crate::compile::strip_types;
use crate::diagnostic::Diagnostic;
use crate::functionish::{FunctionBody, Functionish};
use crate::source_hash::worklet_hash;
use crate::source_text::SourceText;

/// Per-file compilation state. The ordinal restarts at 1 for every file.
pub struct CompilationPassState {
  pub file: String,
  pub syntax: Syntax,
  pub worklet_number: u32,
}

impl CompilationPassState {
  pub fn new(file: &str, syntax: Syntax) -> Self {
    CompilationPassState {
      file: file.to_string(),
      syntax,
      worklet_number: 1,
    }
  }
}

pub struct TransformedWorklet {
  pub ordinal: u32,
  pub payload: WorkletPayload,
  pub span: Span,
  pub replacement: String,
}

/// Turns a classified function into its payload and the source text that
/// replaces it. On failure nothing is consumed: the ordinal is unchanged and
/// the caller leaves the node as it was.
pub fn transform_worklet(
  function: Functionish,
  captures: &CaptureSet,
  capture_diagnostics: Vec<Diagnostic>,
  source: &SourceText,
  state: &mut CompilationPassState,
) -> Result<TransformedWorklet, Vec<Diagnostic>> {
  if capture_diagnostics.iter().any(|d| d.is_error()) {
    return Err(capture_diagnostics);
  }

  let code = match function_code(source, function) {
    Some(code) => code,
    None => {
      return Err(vec![Diagnostic::error(
        "Worklet has no body".to_string(),
        function.span(),
      )]);
    }
  };

  let span = function.span();
  let (ordinal, payload) = build_payload(code, captures, span, source, state)?;

  let literal = payload_literal(&payload);

  let replacement = match function {
    Functionish::Arrow(_) | Functionish::Expr(_) => format!("({})", literal),
    Functionish::Decl(fn_decl) => format!("const {} = ({});", fn_decl.ident.sym, literal),
    Functionish::Method { key, .. } => format!("{}: ({})", source.slice(key.span()), literal),
    Functionish::DefaultExport { function: fn_expr, .. } => match &fn_expr.ident {
      Some(ident) => format!(
        "const {} = ({});\nexport default {};",
        ident.sym, literal, ident.sym
      ),
      None => format!("export default ({});", literal),
    },
  };

  Ok(TransformedWorklet {
    ordinal,
    payload,
    span,
    replacement,
  })
}

/// Rewrites a context object: the marker is dropped and a worklet factory
/// returning a copy of the object is added as one more property.
pub fn transform_context_object(
  object: &swc_ecma_ast::ObjectLit,
  captures: &CaptureSet,
  capture_diagnostics: Vec<Diagnostic>,
  source: &SourceText,
  state: &mut CompilationPassState,
) -> Result<TransformedWorklet, Vec<Diagnostic>> {
  if capture_diagnostics.iter().any(|d| d.is_error()) {
    return Err(capture_diagnostics);
  }

  let mut fields = object
    .props
    .iter()
    .filter(|prop| !is_context_object_marker(prop))
    .map(|prop| source.slice(field_span(prop)).to_string())
    .collect::<Vec<_>>();

  let code = format!("function () {{\n  return {};\n}}", object_text(&fields));
  let (ordinal, payload) = build_payload(code, captures, object.span, source, state)?;

  fields.push(format!(
    "{}: ({})",
    CONTEXT_OBJECT_FACTORY,
    payload_literal(&payload)
  ));

  Ok(TransformedWorklet {
    ordinal,
    payload,
    span: object.span,
    replacement: object_text(&fields),
  })
}

fn field_span(prop: &swc_ecma_ast::PropOrSpread) -> Span {
  if let swc_ecma_ast::PropOrSpread::Prop(prop) = prop {
    if let swc_ecma_ast::Prop::Method(method) = &**prop {
      return Functionish::Method {
        key: &method.key,
        function: &method.function,
      }
      .span();
    }
  }

  prop.span()
}

fn object_text(fields: &[String]) -> String {
  if fields.is_empty() {
    "{}".to_string()
  } else {
    format!("{{ {} }}", fields.join(", "))
  }
}

/// Lowers `code` to JavaScript when the file is TypeScript, then takes the
/// next ordinal. Nothing is consumed when lowering fails.
fn build_payload(
  code: String,
  captures: &CaptureSet,
  span: Span,
  source: &SourceText,
  state: &mut CompilationPassState,
) -> Result<(u32, WorkletPayload), Vec<Diagnostic>> {
  let code = if matches!(state.syntax, Syntax::Typescript(_)) {
    strip_types(&state.file, &code, state.syntax).map_err(|message| {
      vec![Diagnostic::error(
        format!("Cannot lower worklet to JavaScript: {}", message),
        span,
      )]
    })?
  } else {
    code
  };

  let ordinal = state.worklet_number;
  state.worklet_number += 1;

  let (line, column) = source.line_col(span.lo);

  let payload = WorkletPayload {
    id: worklet_hash(&state.file, ordinal, &code),
    version: COMPILER_VERSION,
    code,
    closure: captures
      .names
      .iter()
      .map(|captured| ClosureBinding {
        name: captured.name.clone(),
        kind: captured.kind,
        expr: captured.name.clone(),
      })
      .collect(),
    location: Location {
      file: state.file.clone(),
      line,
      column,
    },
  };

  Ok((ordinal, payload))
}

/// Re-emits the function as a standalone function expression with the
/// directive removed and an expression body turned into a block.
pub fn function_code(source: &SourceText, function: Functionish) -> Option<String> {
  let body = match function.body() {
    FunctionBody::Block(block) => match function.worklet_directive() {
      Some(directive) => source.slice_without(block.span, directive.span()),
      None => source.slice(block.span).to_string(),
    },
    FunctionBody::Expr(expr) => format!("{{\n  return {};\n}}", source.slice(expr.span())),
    FunctionBody::Missing => return None,
  };

  let mut code = String::new();

  if function.is_async() {
    code.push_str("async ");
  }

  code.push_str("function");

  if function.is_generator() {
    code.push('*');
  }

  code.push(' ');

  if let Some(name) = function.code_name() {
    code.push_str(&name);
  }

  code.push('(');

  let param_spans = function.param_spans();

  if let (Some(first), Some(last)) = (param_spans.first(), param_spans.last()) {
    code.push_str(source.slice(Span::new(first.lo, last.hi, Default::default())));
  }

  code.push_str(") ");
  code.push_str(&body);

  Some(code)
}

/// The object literal embedded in compiled output in place of a worklet.
pub fn payload_literal(payload: &WorkletPayload) -> String {
  let closure = payload
    .closure
    .iter()
    .map(|binding| format!("{}: {}", binding.name, binding.expr))
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    "{{ __worklet: true, code: {}, __closure: {{ {} }}, __workletHash: {}, __version: {}, \
    __location: {{ file: {}, line: {}, column: {} }} }}",
    js_string_literal(&payload.code),
    closure,
    js_string_literal(&payload.id),
    payload.version,
    js_string_literal(&payload.location.file),
    payload.location.line,
    payload.location.column,
  )
}
