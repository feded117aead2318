use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use swc_common::errors::{DiagnosticBuilder, Emitter, Handler};
use swc_common::{FileName, Globals, SourceMap, DUMMY_SP, GLOBALS};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsConfig, Syntax, TsConfig};
use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::options::CompilerOptions;
use crate::scope::root_scope;
use crate::source_text::SourceText;
use crate::walker::Walker;
use crate::worklet_pass::{CompiledWorklet, Edit, WorkletPass};

struct DiagnosticCollector {
  diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Emitter for DiagnosticCollector {
  fn emit(&mut self, db: &DiagnosticBuilder<'_>) {
    if let Some(diagnostic) = Diagnostic::from_swc(&**db) {
      if let Ok(mut diagnostics) = self.diagnostics.lock() {
        diagnostics.push(diagnostic);
      }
    }
  }
}

pub struct ParsedFile {
  pub program: Option<swc_ecma_ast::Program>,
  pub diagnostics: Vec<Diagnostic>,
  pub text: String,
  pub start_pos: swc_common::BytePos,
}

pub fn syntax_for(file_name: &str) -> Syntax {
  if file_name.ends_with(".tsx") {
    Syntax::Typescript(TsConfig {
      tsx: true,
      ..Default::default()
    })
  } else if file_name.ends_with(".ts") || file_name.ends_with(".mts") {
    Syntax::Typescript(TsConfig::default())
  } else {
    Syntax::Es(EsConfig {
      jsx: true,
      ..Default::default()
    })
  }
}

pub fn parse(file_name: &str, source: &str) -> ParsedFile {
  let source_map = Arc::<SourceMap>::default();

  let diagnostics_arc = Arc::new(Mutex::new(Vec::<Diagnostic>::new()));

  let handler = Handler::with_emitter(
    true,
    false,
    Box::new(DiagnosticCollector {
      diagnostics: diagnostics_arc.clone(),
    }),
  );

  let swc_compiler = swc::Compiler::new(source_map.clone());

  let file = source_map.new_source_file(FileName::Real(file_name.into()), source.into());
  let text = file.src.to_string();
  let start_pos = file.start_pos;

  let result = swc_compiler.parse_js(
    file,
    &handler,
    EsVersion::Es2022,
    syntax_for(file_name),
    swc::config::IsModule::Bool(true),
    None,
  );

  let diagnostics = take_diagnostics(&diagnostics_arc);

  ParsedFile {
    program: result.ok(),
    diagnostics,
    text,
    start_pos,
  }
}

fn take_diagnostics(diagnostics: &Mutex<Vec<Diagnostic>>) -> Vec<Diagnostic> {
  match diagnostics.lock() {
    Ok(mut diagnostics) => std::mem::take(&mut *diagnostics),
    Err(_) => vec![],
  }
}

/// Lowers a TypeScript function expression to plain JavaScript: annotations,
/// casts, non-null assertions and type-only declarations are removed and the
/// function is printed again by swc.
pub fn strip_types(file_name: &str, function_code: &str, syntax: Syntax) -> Result<String, String> {
  let source_map = Arc::<SourceMap>::default();
  let diagnostics_arc = Arc::new(Mutex::new(Vec::<Diagnostic>::new()));

  let handler = Handler::with_emitter(
    true,
    false,
    Box::new(DiagnosticCollector {
      diagnostics: diagnostics_arc.clone(),
    }),
  );

  let swc_compiler = swc::Compiler::new(source_map.clone());

  let file = source_map.new_source_file(
    FileName::Custom(format!("{} (worklet)", file_name)),
    format!("({});", function_code),
  );

  let options = swc::config::Options {
    config: swc::config::Config {
      jsc: swc::config::JscConfig {
        syntax: Some(syntax),
        target: Some(EsVersion::Es2022),
        ..Default::default()
      },
      ..Default::default()
    },
    ..Default::default()
  };

  let output = GLOBALS
    .set(&Globals::new(), || {
      swc_compiler.process_js_file(file, &handler, &options)
    })
    .map_err(|error| match take_diagnostics(&diagnostics_arc).into_iter().next() {
      Some(diagnostic) => diagnostic.message,
      None => error.to_string(),
    })?;

  unwrap_expression_statement(&output.code)
    .map(|code| code.to_string())
    .ok_or_else(|| format!("unexpected output: {}", output.code))
}

/// `(function () {});` back to `function () {}`.
fn unwrap_expression_statement(code: &str) -> Option<&str> {
  let code = code.trim();
  let code = code.strip_suffix(';').unwrap_or(code).trim_end();

  code.strip_prefix('(')?.strip_suffix(')').map(str::trim)
}

#[derive(Default, serde::Serialize)]
pub struct CompilerOutput {
  pub code: String,
  pub worklets: Vec<CompiledWorklet>,
  pub diagnostics: Vec<Diagnostic>,

  /// Position of the file's first byte; diagnostic spans are relative to it.
  #[serde(skip)]
  pub start_pos: swc_common::BytePos,
}

impl CompilerOutput {
  pub fn has_errors(&self) -> bool {
    self.diagnostics.iter().any(|d| d.is_error())
  }
}

/// Compiles files one after another with the same options. Nothing but the
/// options carries over from one file to the next.
pub struct Compiler {
  options: CompilerOptions,
}

impl Compiler {
  pub fn new(options: CompilerOptions) -> Self {
    Compiler { options }
  }

  pub fn options(&self) -> &CompilerOptions {
    &self.options
  }

  pub fn compile_file(&self, file_name: &str, source: &str) -> CompilerOutput {
    let parsed = parse(file_name, source);
    let mut diagnostics = parsed.diagnostics;

    let program = match parsed.program {
      Some(program) => program,
      None => {
        return CompilerOutput {
          code: source.to_string(),
          worklets: vec![],
          diagnostics,
          start_pos: parsed.start_pos,
        };
      }
    };

    let source_text = SourceText {
      text: parsed.text.as_str(),
      start_pos: parsed.start_pos,
    };

    let pass_result = catch_unwind(AssertUnwindSafe(|| {
      let mut pass = WorkletPass::new(file_name, syntax_for(file_name), &source_text, &self.options);
      let scope = root_scope();

      match &program {
        swc_ecma_ast::Program::Module(module) => Walker::new(&mut pass).module(&scope, module),
        swc_ecma_ast::Program::Script(script) => Walker::new(&mut pass).script(&scope, script),
      }

      (pass.edits, pass.worklets, pass.diagnostics)
    }));

    let (edits, worklets, mut pass_diagnostics) = match pass_result {
      Ok(result) => result,
      Err(panic) => {
        let reason = panic
          .downcast_ref::<&str>()
          .map(|s| s.to_string())
          .or_else(|| panic.downcast_ref::<String>().cloned())
          .unwrap_or_else(|| "unknown panic".to_string());

        diagnostics.push(Diagnostic {
          level: DiagnosticLevel::InternalError,
          message: format!("[worklets] compiler exception: {}", reason),
          span: DUMMY_SP,
        });

        return CompilerOutput {
          code: source.to_string(),
          worklets: vec![],
          diagnostics,
          start_pos: parsed.start_pos,
        };
      }
    };

    diagnostics.append(&mut pass_diagnostics);

    debug!(
      file = file_name,
      worklets = worklets.len(),
      diagnostics = diagnostics.len(),
      "compiled file"
    );

    CompilerOutput {
      code: apply_edits(&parsed.text, edits),
      worklets,
      diagnostics,
      start_pos: parsed.start_pos,
    }
  }
}

pub fn compile(file_name: &str, source: &str, options: &CompilerOptions) -> CompilerOutput {
  Compiler::new(options.clone()).compile_file(file_name, source)
}

/// Edits never overlap: a transformed node is not descended into.
fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
  edits.sort_by(|a, b| b.lo.cmp(&a.lo));

  let mut code = text.to_string();

  for edit in edits {
    if edit.lo <= edit.hi && edit.hi <= code.len() {
      code.replace_range(edit.lo..edit.hi, &edit.text);
    }
  }

  code
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unwraps_printed_function_expression() {
    assert_eq!(
      unwrap_expression_statement("(function(a) {\n    return a;\n});\n"),
      Some("function(a) {\n    return a;\n}")
    );
    assert_eq!(unwrap_expression_statement("function(a) {}"), None);
  }

  #[test]
  fn strips_annotations_from_typescript() {
    let code = strip_types(
      "test.ts",
      "function (a: number, b?: string): number {\n  return (a as number)!;\n}",
      syntax_for("test.ts"),
    )
    .unwrap();

    assert!(code.starts_with("function"), "{}", code);
    assert!(!code.contains("number"), "{}", code);
    assert!(!code.contains("string"), "{}", code);
  }
}
