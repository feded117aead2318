use thiserror::Error;

/// Why a secondary runtime could not be brought up. A runtime that hit one of
/// these stays unusable.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum BootstrapError {
  #[error("class-support shims failed to install: {0}")]
  Shims(String),

  #[error("{stage} failed to install: {message}")]
  Stage {
    stage: &'static str,
    message: String,
  },
}

#[derive(Error, Debug)]
pub enum RuntimeError {
  #[error("worklet runtime has not been bootstrapped")]
  NotBootstrapped,

  #[error("worklet runtime has already been bootstrapped")]
  AlreadyBootstrapped,

  #[error("worklet runtime is unusable after a failed bootstrap: {0}")]
  Poisoned(BootstrapError),

  #[error("uncaught exception: {message}")]
  Exception {
    message: String,
    stack: Option<String>,
  },

  #[error("payload version {found} is not supported (expected {expected})")]
  UnsupportedVersion { found: u32, expected: u32 },

  #[error("closure values do not match the payload: {0}")]
  ClosureMismatch(String),

  #[error(transparent)]
  Engine(#[from] rquickjs::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

/// Best description of a failed engine call. For thrown exceptions that is
/// the exception's own message.
pub fn describe_js_error(ctx: &rquickjs::Ctx<'_>, error: rquickjs::Error) -> String {
  match error {
    rquickjs::Error::Exception => {
      let thrown = ctx.catch();

      match thrown.as_exception() {
        Some(exception) => exception
          .message()
          .unwrap_or_else(|| "unknown exception".to_string()),
        None => match thrown.as_string() {
          Some(string) => string
            .to_string()
            .unwrap_or_else(|_| "unknown exception".to_string()),
          None => format!("non-error value thrown ({:?})", thrown.type_of()),
        },
      }
    }
    other => other.to_string(),
  }
}
