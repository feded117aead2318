use rquickjs::Ctx;
use tracing::debug;

use crate::call_guard;
use crate::console_relay;
use crate::error_reporter::CrossRuntimeErrorReporter;
use crate::errors::{describe_js_error, BootstrapError};
use crate::frame_scheduler;
use crate::options::{RuntimeMode, RuntimeOptions};
use crate::relay::Relay;
use crate::shims;

/// Proof that a runtime's global scope has been set up. Only a successful
/// bootstrap produces one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BootstrapHandle {
  pub shim_version: u32,
  pub mode: RuntimeMode,
  pub console_relay: bool,
  pub frame_scheduler: bool,
  pub fatal_error_hook: bool,
}

/// Installs everything a payload may rely on into the scope of `ctx`.
///
/// Shims go first and are all-or-nothing. Each later stage checks for its own
/// marker, so running this on a scope that is already set up changes nothing.
pub fn install<'js>(
  ctx: &Ctx<'js>,
  options: &RuntimeOptions,
  relay: &Relay,
) -> Result<BootstrapHandle, BootstrapError> {
  let shim_version = shims::install(ctx)?;
  debug!(shim_version, "class-support shims installed");

  CrossRuntimeErrorReporter::new(relay.clone(), options.fatal_error_hook)
    .install(ctx)
    .map_err(|error| BootstrapError::Stage {
      stage: "error reporter",
      message: describe_js_error(ctx, error),
    })?;

  call_guard::install(ctx, options.fatal_error_hook)?;

  let console_relay = options.installs_console_relay();

  if console_relay {
    console_relay::install(ctx, relay)?;
    debug!("console relay installed");
  }

  let frame_scheduler = options.installs_frame_scheduler();

  if frame_scheduler {
    frame_scheduler::install(ctx)?;
    debug!("frame scheduler installed");
  }

  Ok(BootstrapHandle {
    shim_version,
    mode: options.mode,
    console_relay,
    frame_scheduler,
    fatal_error_hook: options.fatal_error_hook,
  })
}
