use worklets_compiler::{pos_to_line_col, CompilerOutput, DiagnosticLevel};

/// Prints every diagnostic as `file:line:col: Level: message` and exits when
/// any of them is an error.
pub fn handle_diagnostics_cli(file_path: &str, source: &str, output: &CompilerOutput) {
  let mut has_error = false;

  for diagnostic in &output.diagnostics {
    let offset = diagnostic.span.lo.0.saturating_sub(output.start_pos.0) as usize;
    let (line, col) = pos_to_line_col(source, offset);

    eprintln!(
      "{}:{}:{}: {}: {}",
      file_path, line, col, diagnostic.level, diagnostic.message
    );

    match diagnostic.level {
      DiagnosticLevel::Error | DiagnosticLevel::InternalError => {
        has_error = true;
      }
      DiagnosticLevel::Lint => {}
    }
  }

  if has_error {
    std::process::exit(1);
  }
}
