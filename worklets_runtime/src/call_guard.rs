use rquickjs::{Ctx, Function};

use crate::errors::{describe_js_error, BootstrapError};

/// Host entry points the Rust side calls into. Every call returns a JSON
/// completion record instead of throwing.
pub const HOST_GLOBAL: &str = "__workletHost";

const GUARD_SOURCE: &str = r#"(function (global, hookEnabled) {
  'use strict';

  if (typeof global.__callGuard === 'function') {
    return;
  }

  var report = global.__reportFatalError;

  function describe(error) {
    if (error !== null && typeof error === 'object' && 'message' in error) {
      return {
        message: String(error.message),
        stack: error.stack ? String(error.stack) : null,
      };
    }

    return { message: String(error), stack: null };
  }

  var ErrorUtils = {
    hookEnabled: hookEnabled,

    report: function (error) {
      try {
        var described = describe(error);
        report(described.message, described.stack || '');
      } catch (e) {
        // The relay must not throw over the error it is reporting.
      }
    },
  };

  function callGuard(fn, args, thisArg) {
    try {
      return fn.apply(thisArg, args || []);
    } catch (error) {
      if (ErrorUtils.hookEnabled) {
        ErrorUtils.report(error);
        return undefined;
      }

      throw error;
    }
  }

  function copy(value) {
    if (value === undefined || typeof value === 'function' || typeof value === 'symbol') {
      return null;
    }

    if (typeof value === 'bigint') {
      return String(value);
    }

    return value;
  }

  function complete(thunk) {
    try {
      return JSON.stringify({ status: 'ok', value: copy(thunk()) });
    } catch (error) {
      var described = describe(error);
      return JSON.stringify({
        status: 'threw',
        message: described.message,
        stack: described.stack,
      });
    }
  }

  var host = {
    run: function (code, namesJson, valuesJson, argsJson) {
      return complete(function () {
        var names = JSON.parse(namesJson);
        var values = JSON.parse(valuesJson);
        var factory = Function.apply(null, names.concat(['return (' + code + ');']));
        var worklet = factory.apply(undefined, values);
        return callGuard(worklet, JSON.parse(argsJson));
      });
    },

    evaluate: function (source) {
      return complete(function () {
        return (0, eval)(source);
      });
    },
  };

  var hidden = { writable: false, enumerable: false, configurable: false };

  Object.defineProperty(global, '__callGuard', Object.assign({ value: callGuard }, hidden));
  Object.defineProperty(global, '__ErrorUtils', Object.assign({ value: ErrorUtils }, hidden));
  Object.defineProperty(global, '__workletHost', Object.assign({ value: host }, hidden));
})"#;

/// The completion record produced by the host entry points.
#[derive(serde::Deserialize, Debug)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Completion {
  Ok {
    #[serde(default)]
    value: serde_json::Value,
  },
  Threw {
    message: String,
    stack: Option<String>,
  },
}

/// Installs `__callGuard`, `__ErrorUtils` and the host entry points. Expects
/// the fatal error reporter to be installed already.
pub fn install<'js>(ctx: &Ctx<'js>, hook_enabled: bool) -> Result<(), BootstrapError> {
  ctx
    .eval::<Function, _>(GUARD_SOURCE)
    .and_then(|installer| installer.call::<_, ()>((ctx.globals(), hook_enabled)))
    .map_err(|error| BootstrapError::Stage {
      stage: "call guard",
      message: describe_js_error(ctx, error),
    })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error_reporter::CrossRuntimeErrorReporter;
  use crate::relay::{Relay, RelayMessage};
  use rquickjs::{Context, Runtime};

  fn completion(ctx: &Ctx, source: &str) -> Completion {
    let host: rquickjs::Object = ctx.globals().get(HOST_GLOBAL).unwrap();
    let evaluate: Function = host.get("evaluate").unwrap();
    let json: String = evaluate.call((source.to_string(),)).unwrap();
    serde_json::from_str(&json).unwrap()
  }

  #[test]
  fn guard_reports_when_hooked() {
    let (relay, mut receiver) = Relay::channel();
    let runtime = Runtime::new().unwrap();
    let context = Context::full(&runtime).unwrap();

    context.with(|ctx| {
      CrossRuntimeErrorReporter::new(relay, true)
        .install(&ctx)
        .unwrap();
      install(&ctx, true).unwrap();

      match completion(&ctx, "__callGuard(function () { throw new Error('inner'); })") {
        Completion::Ok { value } => assert_eq!(value, serde_json::Value::Null),
        other => panic!("unexpected {:?}", other),
      }
    });

    match receiver.try_recv().unwrap() {
      RelayMessage::FatalError(descriptor) => assert_eq!(descriptor.message, "inner"),
      other => panic!("unexpected {:?}", other),
    }
  }

  #[test]
  fn guard_rethrows_without_hook() {
    let (relay, mut receiver) = Relay::channel();
    let runtime = Runtime::new().unwrap();
    let context = Context::full(&runtime).unwrap();

    context.with(|ctx| {
      CrossRuntimeErrorReporter::new(relay, false)
        .install(&ctx)
        .unwrap();
      install(&ctx, false).unwrap();

      match completion(&ctx, "__callGuard(function (a, b) { return a + b; }, [1, 2])") {
        Completion::Ok { value } => assert_eq!(value, serde_json::json!(3)),
        other => panic!("unexpected {:?}", other),
      }

      match completion(&ctx, "__callGuard(function () { throw new TypeError('nope'); })") {
        Completion::Threw { message, .. } => assert_eq!(message, "nope"),
        other => panic!("unexpected {:?}", other),
      }
    });

    assert!(receiver.try_recv().is_err());
  }
}
