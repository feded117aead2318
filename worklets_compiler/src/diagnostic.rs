use std::fmt;

#[derive(serde::Serialize, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum DiagnosticLevel {
  Lint,
  Error,
  InternalError,
}

impl fmt::Display for DiagnosticLevel {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DiagnosticLevel::Lint => write!(f, "Lint"),
      DiagnosticLevel::Error => write!(f, "Error"),
      DiagnosticLevel::InternalError => write!(f, "Internal Error"),
    }
  }
}

#[derive(serde::Serialize, Clone, Debug)]
pub struct Diagnostic {
  pub level: DiagnosticLevel,
  pub message: String,
  pub span: swc_common::Span,
}

impl Diagnostic {
  pub fn error(message: String, span: swc_common::Span) -> Diagnostic {
    Diagnostic {
      level: DiagnosticLevel::Error,
      message,
      span,
    }
  }

  pub fn is_error(&self) -> bool {
    match self.level {
      DiagnosticLevel::Error | DiagnosticLevel::InternalError => true,
      DiagnosticLevel::Lint => false,
    }
  }

  pub fn from_swc(swc_diagnostic: &swc_common::errors::Diagnostic) -> Option<Diagnostic> {
    use swc_common::errors::Level;

    let level = match swc_diagnostic.level {
      Level::Bug => DiagnosticLevel::InternalError,
      Level::Fatal => DiagnosticLevel::Error,
      Level::PhaseFatal => DiagnosticLevel::Error,
      Level::Error => DiagnosticLevel::Error,
      Level::Warning => DiagnosticLevel::Lint,
      Level::Note => return None,
      Level::Help => return None,
      Level::Cancelled => return None,
      Level::FailureNote => return None,
    };

    Some(Diagnostic {
      level,
      message: swc_diagnostic.message(),
      span: swc_diagnostic
        .span
        .primary_span()
        .unwrap_or(swc_common::DUMMY_SP),
    })
  }
}
