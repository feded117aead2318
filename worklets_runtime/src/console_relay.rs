use rquickjs::{Ctx, Function};
use tracing::warn;

use crate::errors::{describe_js_error, BootstrapError};
use crate::relay::{ConsoleMethod, Relay, RelayMessage};

const RELAY_CONSOLE: &str = "__relayConsole";

const CONSOLE_SOURCE: &str = r#"(function (global, methods) {
  'use strict';

  var console = global.console;

  if (console !== undefined && console.__relayed === true) {
    return;
  }

  if (console === undefined || console === null) {
    console = {};
    global.console = console;
  }

  var relay = global.__relayConsole;

  function copyArg(value) {
    switch (typeof value) {
      case 'undefined':
        return 'undefined';
      case 'function':
        return '[Function ' + (value.name || 'anonymous') + ']';
      case 'symbol':
      case 'bigint':
        return String(value);
    }

    if (value instanceof Error) {
      return value.stack ? String(value) + '\n' + value.stack : String(value);
    }

    try {
      JSON.stringify(value);
      return value;
    } catch (e) {
      return String(value);
    }
  }

  methods.forEach(function (method) {
    console[method] = function () {
      try {
        var args = Array.prototype.slice.call(arguments).map(copyArg);
        relay(method, JSON.stringify(args));
      } catch (e) {
        // Relay failures stay local.
      }
    };
  });

  Object.defineProperty(console, '__relayed', { value: true, enumerable: false });
})"#;

/// Replaces the secondary runtime's console methods with proxies that send
/// each call, arguments in order, to the orchestration runtime.
pub fn install<'js>(ctx: &Ctx<'js>, relay: &Relay) -> Result<(), BootstrapError> {
  let stage_error = |error: rquickjs::Error| BootstrapError::Stage {
    stage: "console relay",
    message: describe_js_error(ctx, error),
  };

  let relay = relay.clone();

  let relay_console = Function::new(ctx.clone(), move |method: String, args_json: String| {
    let method = match ConsoleMethod::from_name(&method) {
      Some(method) => method,
      None => {
        warn!(method = %method, "unknown console method; call dropped");
        return;
      }
    };

    match serde_json::from_str::<Vec<serde_json::Value>>(&args_json) {
      Ok(args) => relay.send(RelayMessage::Console { method, args }),
      Err(error) => warn!(%error, "console arguments could not be copied; call dropped"),
    }
  })
  .map_err(stage_error)?;

  ctx
    .globals()
    .set(RELAY_CONSOLE, relay_console)
    .map_err(stage_error)?;

  let methods: Vec<&str> = ConsoleMethod::ALL.iter().map(|m| m.name()).collect();

  ctx
    .eval::<Function, _>(CONSOLE_SOURCE)
    .and_then(|installer| installer.call::<_, ()>((ctx.globals(), methods)))
    .map_err(stage_error)
}
