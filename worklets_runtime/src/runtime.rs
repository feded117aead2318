use rquickjs::{Context, Function, Object, Runtime};
use tracing::{debug, error, warn};
use worklets_common::{is_identifier_name, WorkletPayload, COMPILER_VERSION};

use crate::bootstrap::{self, BootstrapHandle};
use crate::call_guard::{Completion, HOST_GLOBAL};
use crate::errors::{describe_js_error, BootstrapError, RuntimeError};
use crate::frame_scheduler::{FrameClock, FLUSH_ANIMATION_FRAME, PENDING_FRAME_CALLBACKS};
use crate::options::RuntimeOptions;
use crate::relay::Relay;

enum BootstrapState {
  Pending,
  Ready(BootstrapHandle),
  Poisoned(BootstrapError),
}

/// One secondary runtime: a QuickJS runtime and context that only ever run
/// worklets, plus the state that has to outlive individual calls.
pub struct WorkletRuntime {
  runtime: Runtime,
  context: Context,
  options: RuntimeOptions,
  relay: Relay,
  state: BootstrapState,
  clock: FrameClock,
}

impl WorkletRuntime {
  pub fn new(options: RuntimeOptions, relay: Relay) -> Result<Self, RuntimeError> {
    let runtime = Runtime::new()?;
    let context = Context::full(&runtime)?;

    Ok(WorkletRuntime {
      runtime,
      context,
      options,
      relay,
      state: BootstrapState::Pending,
      clock: FrameClock::default(),
    })
  }

  pub fn options(&self) -> &RuntimeOptions {
    &self.options
  }

  /// Runs host-provided setup code before the scope is bootstrapped, such as
  /// polyfills the shims build on.
  pub fn preload(&mut self, source: &str) -> Result<(), RuntimeError> {
    if !matches!(self.state, BootstrapState::Pending) {
      return Err(RuntimeError::AlreadyBootstrapped);
    }

    self.context.with(|ctx| {
      ctx
        .eval::<(), _>(source)
        .map_err(|error| RuntimeError::Exception {
          message: describe_js_error(&ctx, error),
          stack: None,
        })
    })
  }

  /// Sets up the global scope. Only the first call does any work; later calls
  /// return the same handle, or the same error if the first one failed.
  pub fn bootstrap(&mut self) -> Result<BootstrapHandle, BootstrapError> {
    match &self.state {
      BootstrapState::Ready(handle) => return Ok(handle.clone()),
      BootstrapState::Poisoned(error) => return Err(error.clone()),
      BootstrapState::Pending => {}
    }

    let options = &self.options;
    let relay = &self.relay;
    let result = self
      .context
      .with(|ctx| bootstrap::install(&ctx, options, relay));

    match result {
      Ok(handle) => {
        debug!(?handle, "worklet runtime bootstrapped");
        self.state = BootstrapState::Ready(handle.clone());
        Ok(handle)
      }
      Err(bootstrap_error) => {
        error!(error = %bootstrap_error, "worklet runtime bootstrap failed");
        self.state = BootstrapState::Poisoned(bootstrap_error.clone());
        Err(bootstrap_error)
      }
    }
  }

  pub fn handle(&self) -> Option<&BootstrapHandle> {
    match &self.state {
      BootstrapState::Ready(handle) => Some(handle),
      _ => None,
    }
  }

  pub fn is_poisoned(&self) -> bool {
    matches!(self.state, BootstrapState::Poisoned(_))
  }

  fn ready(&self) -> Result<&BootstrapHandle, RuntimeError> {
    match &self.state {
      BootstrapState::Ready(handle) => Ok(handle),
      BootstrapState::Pending => Err(RuntimeError::NotBootstrapped),
      BootstrapState::Poisoned(error) => Err(RuntimeError::Poisoned(error.clone())),
    }
  }

  /// Instantiates `payload` with `closure_values` copied in and calls it with
  /// `args` through the guard. The result comes back as a JSON copy.
  ///
  /// `closure_values` must be an object with exactly the payload's closure
  /// names as keys.
  pub fn run_worklet(
    &mut self,
    payload: &WorkletPayload,
    closure_values: &serde_json::Value,
    args: &[serde_json::Value],
  ) -> Result<serde_json::Value, RuntimeError> {
    self.ready()?;

    if payload.version != COMPILER_VERSION {
      return Err(RuntimeError::UnsupportedVersion {
        found: payload.version,
        expected: COMPILER_VERSION,
      });
    }

    let values = closure_values.as_object().ok_or_else(|| {
      RuntimeError::ClosureMismatch("closure values must be an object".to_string())
    })?;

    let mut names = Vec::<&str>::new();
    let mut ordered_values = Vec::<&serde_json::Value>::new();

    for name in payload.closure_names() {
      if !is_identifier_name(name) {
        return Err(RuntimeError::ClosureMismatch(format!("invalid name `{}`", name)));
      }

      match values.get(name) {
        Some(value) => {
          names.push(name);
          ordered_values.push(value);
        }
        None => return Err(RuntimeError::ClosureMismatch(format!("missing `{}`", name))),
      }
    }

    if let Some(extra) = values.keys().find(|key| !names.contains(&key.as_str())) {
      return Err(RuntimeError::ClosureMismatch(format!("unexpected `{}`", extra)));
    }

    let names_json = serde_json::to_string(&names)?;
    let values_json = serde_json::to_string(&ordered_values)?;
    let args_json = serde_json::to_string(args)?;

    debug!(id = %payload.id, file = %payload.location.file, "running worklet");

    let completion = self.call_host(
      "run",
      (payload.code.clone(), names_json, values_json, args_json),
    );

    self.drain_microtasks();
    completion
  }

  /// Runs arbitrary source in the secondary runtime's global scope and
  /// returns a JSON copy of its completion value.
  pub fn evaluate(&mut self, source: &str) -> Result<serde_json::Value, RuntimeError> {
    self.ready()?;

    let completion = self.call_host("evaluate", (source.to_string(),));
    self.drain_microtasks();
    completion
  }

  fn call_host<A>(&self, entry: &str, args: A) -> Result<serde_json::Value, RuntimeError>
  where
    A: for<'js> rquickjs::function::IntoArgs<'js>,
  {
    let json = self.context.with(|ctx| -> rquickjs::Result<String> {
      let host: Object = ctx.globals().get(HOST_GLOBAL)?;
      let function: Function = host.get(entry)?;
      function.call(args)
    })?;

    match serde_json::from_str::<Completion>(&json)? {
      Completion::Ok { value } => Ok(value),
      Completion::Threw { message, stack } => Err(RuntimeError::Exception { message, stack }),
    }
  }

  /// Native tick entry point. Returns whether a batch of frame callbacks was
  /// flushed; duplicate and stale ticks are ignored.
  pub fn on_native_tick(&mut self, timestamp: f64) -> Result<bool, RuntimeError> {
    if !self.ready()?.frame_scheduler {
      return Ok(false);
    }

    if !self.clock.advance(timestamp) {
      debug!(timestamp, "ignoring stale frame tick");
      return Ok(false);
    }

    let flushed = self.context.with(|ctx| -> rquickjs::Result<u32> {
      let flush: Function = ctx.globals().get(FLUSH_ANIMATION_FRAME)?;
      flush.call((timestamp,))
    })?;

    debug!(timestamp, flushed, "frame callbacks flushed");

    self.drain_microtasks();
    Ok(true)
  }

  /// Whether frame callbacks are waiting for the next tick.
  pub fn has_pending_frame_callbacks(&self) -> Result<bool, RuntimeError> {
    if !self.ready()?.frame_scheduler {
      return Ok(false);
    }

    let pending = self.context.with(|ctx| -> rquickjs::Result<u32> {
      let pending: Function = ctx.globals().get(PENDING_FRAME_CALLBACKS)?;
      pending.call(())
    })?;

    Ok(pending > 0)
  }

  /// Runs promise jobs until none are left.
  fn drain_microtasks(&self) {
    loop {
      match self.runtime.execute_pending_job() {
        Ok(true) => {}
        Ok(false) => break,
        Err(_) => warn!("a promise job threw"),
      }
    }
  }
}
