use rquickjs::{Ctx, Function};
use tracing::{error, warn};

use crate::relay::{ErrorDescriptor, Relay, RelayMessage};

/// Global the guard calls with `(message, stack)` for every uncaught
/// exception.
pub const REPORT_FATAL_ERROR: &str = "__reportFatalError";

/// Forwards uncaught worklet exceptions to the orchestration runtime.
#[derive(Clone)]
pub struct CrossRuntimeErrorReporter {
  relay: Relay,
  hook_enabled: bool,
}

impl CrossRuntimeErrorReporter {
  pub fn new(relay: Relay, hook_enabled: bool) -> Self {
    CrossRuntimeErrorReporter {
      relay,
      hook_enabled,
    }
  }

  /// Never fails and never waits for the other side. Without a registered
  /// hook the error is only logged here.
  pub fn report(&self, descriptor: ErrorDescriptor) {
    if !self.hook_enabled {
      error!(
        error = %descriptor.message,
        stack = descriptor.stack.as_deref().unwrap_or(""),
        "uncaught worklet exception"
      );

      return;
    }

    if self.relay.is_closed() {
      warn!(error = %descriptor.message, "cannot relay worklet exception; orchestration side is gone");
    }

    self.relay.send(RelayMessage::FatalError(descriptor));
  }

  pub fn install<'js>(&self, ctx: &Ctx<'js>) -> rquickjs::Result<()> {
    let reporter = self.clone();

    let report = Function::new(ctx.clone(), move |message: String, stack: String| {
      reporter.report(ErrorDescriptor {
        message,
        stack: if stack.is_empty() { None } else { Some(stack) },
      });
    })?;

    ctx.globals().set(REPORT_FATAL_ERROR, report)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn relays_only_with_hook() {
    let (relay, mut receiver) = Relay::channel();

    let descriptor = ErrorDescriptor {
      message: "boom".to_string(),
      stack: Some("at f".to_string()),
    };

    CrossRuntimeErrorReporter::new(relay.clone(), false).report(descriptor.clone());
    assert!(receiver.try_recv().is_err());

    CrossRuntimeErrorReporter::new(relay, true).report(descriptor.clone());
    assert_eq!(
      receiver.try_recv().unwrap(),
      RelayMessage::FatalError(descriptor)
    );
  }

  #[test]
  fn installed_function_is_callable_from_js() {
    let (relay, mut receiver) = Relay::channel();
    let runtime = rquickjs::Runtime::new().unwrap();
    let context = rquickjs::Context::full(&runtime).unwrap();

    context.with(|ctx| {
      CrossRuntimeErrorReporter::new(relay, true)
        .install(&ctx)
        .unwrap();

      ctx
        .eval::<(), _>("__reportFatalError('bad', '')")
        .unwrap();
    });

    match receiver.try_recv().unwrap() {
      RelayMessage::FatalError(descriptor) => {
        assert_eq!(descriptor.message, "bad");
        assert_eq!(descriptor.stack, None);
      }
      other => panic!("unexpected message {:?}", other),
    }
  }
}
