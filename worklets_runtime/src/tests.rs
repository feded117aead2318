#[cfg(test)]
mod tests_ {
  use std::sync::{Arc, Mutex};

  use serde_json::json;
  use worklets_common::WorkletPayload;
  use worklets_compiler::{compile, CompilerOptions};

  use crate::{
    BootstrapError, ConsoleMethod, ConsoleSink, ErrorDescriptor, OrchestratorEndpoint, Relay,
    RuntimeError, RuntimeMode, RuntimeOptions, WorkletRuntime,
  };

  type ConsoleCalls = Arc<Mutex<Vec<(ConsoleMethod, Vec<serde_json::Value>)>>>;

  struct RecordingConsole(ConsoleCalls);

  impl ConsoleSink for RecordingConsole {
    fn call(&mut self, method: ConsoleMethod, args: &[serde_json::Value]) {
      self.0.lock().unwrap().push((method, args.to_vec()));
    }
  }

  struct Harness {
    runtime: WorkletRuntime,
    endpoint: OrchestratorEndpoint,
    console: ConsoleCalls,
    fatal: Arc<Mutex<Vec<ErrorDescriptor>>>,
  }

  fn harness(options: RuntimeOptions) -> Harness {
    let (relay, receiver) = Relay::channel();
    let console = ConsoleCalls::default();
    let fatal = Arc::new(Mutex::new(Vec::new()));
    let fatal_clone = fatal.clone();

    let endpoint = OrchestratorEndpoint::new(receiver)
      .with_console(RecordingConsole(console.clone()))
      .on_fatal_error(move |descriptor| fatal_clone.lock().unwrap().push(descriptor));

    Harness {
      runtime: WorkletRuntime::new(options, relay).unwrap(),
      endpoint,
      console,
      fatal,
    }
  }

  fn booted(options: RuntimeOptions) -> Harness {
    let mut h = harness(options);
    h.runtime.bootstrap().unwrap();
    h
  }

  fn hooked() -> RuntimeOptions {
    RuntimeOptions {
      fatal_error_hook: true,
      ..Default::default()
    }
  }

  fn compile_single(source: &str) -> WorkletPayload {
    let output = compile("app.js", source, &CompilerOptions::default());
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(output.worklets.len(), 1);
    output.worklets[0].payload.clone()
  }

  #[test]
  fn nothing_runs_before_bootstrap() {
    let mut h = harness(RuntimeOptions::default());

    assert!(matches!(
      h.runtime.evaluate("1 + 1"),
      Err(RuntimeError::NotBootstrapped)
    ));
    assert!(matches!(
      h.runtime.on_native_tick(16.0),
      Err(RuntimeError::NotBootstrapped)
    ));
  }

  #[test]
  fn bootstrap_is_idempotent() {
    let mut h = harness(RuntimeOptions::default());

    let first = h.runtime.bootstrap().unwrap();
    assert!(first.console_relay);
    assert!(first.frame_scheduler);

    h.runtime
      .evaluate(
        "globalThis.firstLog = console.log;\n\
        globalThis.firstGuard = __callGuard;\n\
        globalThis.firstShims = __workletShims;\n\
        globalThis.firstFlush = __flushAnimationFrame;",
      )
      .unwrap();

    let second = h.runtime.bootstrap().unwrap();
    assert_eq!(first, second);

    let same = h
      .runtime
      .evaluate(
        "firstLog === console.log && firstGuard === __callGuard && \
        firstShims === __workletShims && firstFlush === __flushAnimationFrame",
      )
      .unwrap();

    assert_eq!(same, json!(true));

    h.runtime.evaluate("console.log('once')").unwrap();
    assert_eq!(h.endpoint.drain(), 1);
  }

  #[test]
  fn failed_bootstrap_poisons_the_runtime() {
    let mut h = harness(RuntimeOptions::default());
    h.runtime
      .preload("delete Object.getOwnPropertyDescriptor")
      .unwrap();

    let error = h.runtime.bootstrap().unwrap_err();
    assert!(matches!(error, BootstrapError::Shims(_)));
    assert!(h.runtime.is_poisoned());
    assert_eq!(h.runtime.bootstrap().unwrap_err(), error);

    match h.runtime.evaluate("1") {
      Err(RuntimeError::Poisoned(inner)) => assert_eq!(inner, error),
      other => panic!("expected a poisoned runtime, got {:?}", other),
    }
  }

  #[test]
  fn preload_only_before_bootstrap() {
    let mut h = harness(RuntimeOptions::default());
    h.runtime.preload("globalThis.answer = 42;").unwrap();
    h.runtime.bootstrap().unwrap();

    assert_eq!(h.runtime.evaluate("answer").unwrap(), json!(42));
    assert!(matches!(
      h.runtime.preload("1"),
      Err(RuntimeError::AlreadyBootstrapped)
    ));
  }

  #[test]
  fn frame_callbacks_run_in_batches() {
    let mut h = booted(RuntimeOptions::default());

    let id = h
      .runtime
      .evaluate(
        "globalThis.calls = [];\n\
        requestAnimationFrame(function (t) {\n\
          calls.push('A:' + t);\n\
          requestAnimationFrame(function (t2) { calls.push('C:' + t2); });\n\
        });\n\
        requestAnimationFrame(function (t) { calls.push('B:' + t + ':' + __frameTimestamp); });",
      )
      .unwrap();

    assert_eq!(id, json!(-1));
    assert!(h.runtime.has_pending_frame_callbacks().unwrap());

    assert!(h.runtime.on_native_tick(16.0).unwrap());
    assert_eq!(
      h.runtime.evaluate("calls").unwrap(),
      json!(["A:16", "B:16:16"])
    );
    assert_eq!(
      h.runtime.evaluate("typeof __frameTimestamp").unwrap(),
      json!("undefined")
    );

    // C was queued during the flush and waits for the next tick.
    assert!(h.runtime.has_pending_frame_callbacks().unwrap());

    assert!(!h.runtime.on_native_tick(16.0).unwrap());
    assert!(!h.runtime.on_native_tick(12.0).unwrap());
    assert_eq!(h.runtime.evaluate("calls.length").unwrap(), json!(2));

    assert!(h.runtime.on_native_tick(33.0).unwrap());
    assert_eq!(
      h.runtime.evaluate("calls").unwrap(),
      json!(["A:16", "B:16:16", "C:33"])
    );
    assert!(!h.runtime.has_pending_frame_callbacks().unwrap());
  }

  #[test]
  fn flush_cannot_be_reentered_from_a_callback() {
    let mut h = booted(RuntimeOptions::default());

    h.runtime
      .evaluate(
        "globalThis.n = 0;\n\
        requestAnimationFrame(function (t) {\n\
          n++;\n\
          requestAnimationFrame(function () { n += 10; });\n\
          __flushAnimationFrame(t);\n\
          __flushAnimationFrame(t + 1);\n\
        });",
      )
      .unwrap();

    assert!(h.runtime.on_native_tick(16.0).unwrap());
    assert_eq!(h.runtime.evaluate("n").unwrap(), json!(1));
    assert!(h.runtime.has_pending_frame_callbacks().unwrap());

    // A direct call with an old timestamp is ignored too.
    assert_eq!(h.runtime.evaluate("__flushAnimationFrame(16)").unwrap(), json!(0));
    assert_eq!(h.runtime.evaluate("n").unwrap(), json!(1));

    assert!(h.runtime.on_native_tick(33.0).unwrap());
    assert_eq!(h.runtime.evaluate("n").unwrap(), json!(11));
  }

  #[test]
  fn microtasks_drain_after_the_batch() {
    let mut h = booted(RuntimeOptions::default());

    h.runtime
      .evaluate(
        "globalThis.order = [];\n\
        requestAnimationFrame(function () {\n\
          Promise.resolve().then(function () { order.push('micro'); });\n\
          order.push('first');\n\
        });\n\
        requestAnimationFrame(function () { order.push('second'); });",
      )
      .unwrap();

    h.runtime.on_native_tick(1.0).unwrap();

    assert_eq!(
      h.runtime.evaluate("order").unwrap(),
      json!(["first", "second", "micro"])
    );
  }

  #[test]
  fn throwing_callback_does_not_stop_the_batch() {
    let mut h = booted(hooked());

    h.runtime
      .evaluate(
        "globalThis.counter = 0;\n\
        requestAnimationFrame(function () { throw new Error('boom'); });\n\
        requestAnimationFrame(function () { counter += 1; });",
      )
      .unwrap();

    assert!(h.runtime.on_native_tick(16.0).unwrap());
    assert_eq!(h.runtime.evaluate("counter").unwrap(), json!(1));

    assert_eq!(h.endpoint.drain(), 1);
    {
      let fatal = h.fatal.lock().unwrap();
      assert_eq!(fatal.len(), 1);
      assert_eq!(fatal[0].message, "boom");
    }

    h.runtime
      .evaluate("requestAnimationFrame(function () { counter += 1; })")
      .unwrap();

    assert!(h.runtime.on_native_tick(32.0).unwrap());
    assert_eq!(h.runtime.evaluate("counter").unwrap(), json!(2));
  }

  #[test]
  fn without_hook_errors_stay_local() {
    let mut h = booted(RuntimeOptions::default());

    h.runtime
      .evaluate(
        "globalThis.counter = 0;\n\
        requestAnimationFrame(function () { throw new Error('boom'); });\n\
        requestAnimationFrame(function () { counter += 1; });",
      )
      .unwrap();

    assert!(h.runtime.on_native_tick(16.0).unwrap());
    assert_eq!(h.runtime.evaluate("counter").unwrap(), json!(1));
    assert_eq!(h.endpoint.drain(), 0);
    assert!(h.fatal.lock().unwrap().is_empty());
  }

  #[test]
  fn console_calls_are_relayed_in_order() {
    let mut h = booted(RuntimeOptions::default());

    h.runtime
      .evaluate("console.log('a', 1, { b: 2 }, undefined); console.warn('careful');")
      .unwrap();

    assert_eq!(h.endpoint.drain(), 2);

    let calls = h.console.lock().unwrap();
    assert_eq!(calls[0].0, ConsoleMethod::Log);
    assert_eq!(calls[0].1, vec![json!("a"), json!(1), json!({ "b": 2 }), json!("undefined")]);
    assert_eq!(calls[1].0, ConsoleMethod::Warn);
    assert_eq!(calls[1].1, vec![json!("careful")]);
  }

  #[test]
  fn relay_never_waits_for_the_other_side() {
    let Harness {
      mut runtime,
      endpoint,
      ..
    } = booted(hooked());

    drop(endpoint);

    let payload = compile_single("const f = () => { 'worklet'; console.log('hi'); throw new Error('lost'); };");

    assert_eq!(
      runtime.run_worklet(&payload, &json!({}), &[]).unwrap(),
      serde_json::Value::Null
    );
  }

  #[test]
  fn headless_mode_installs_only_shims_and_guard() {
    let mut h = harness(RuntimeOptions::headless());

    let handle = h.runtime.bootstrap().unwrap();
    assert_eq!(handle.mode, RuntimeMode::Headless);
    assert!(!handle.console_relay);
    assert!(!handle.frame_scheduler);

    assert_eq!(
      h.runtime
        .evaluate("[typeof requestAnimationFrame, typeof _createClass, typeof __callGuard]")
        .unwrap(),
      json!(["undefined", "function", "function"])
    );

    assert!(!h.runtime.on_native_tick(16.0).unwrap());
    assert!(!h.runtime.has_pending_frame_callbacks().unwrap());
  }

  #[test]
  fn attached_debugger_keeps_native_console() {
    let mut h = harness(RuntimeOptions {
      debugger_attached: true,
      ..Default::default()
    });

    let handle = h.runtime.bootstrap().unwrap();
    assert!(!handle.console_relay);
    assert!(handle.frame_scheduler);
  }

  #[test]
  fn compiled_worklet_runs_with_its_closure() {
    let mut h = booted(RuntimeOptions::default());

    let payload = compile_single(
      "const x = 1;\n\
      const y = 2;\n\
      const f = () => { 'worklet'; return x + y; };\n",
    );

    assert_eq!(payload.closure_names().collect::<Vec<_>>(), vec!["x", "y"]);

    let result = h
      .runtime
      .run_worklet(&payload, &json!({ "x": 1, "y": 2 }), &[])
      .unwrap();

    assert_eq!(result, json!(3));
  }

  #[test]
  fn typescript_worklet_runs() {
    let mut h = booted(RuntimeOptions::default());

    let output = compile(
      "app.ts",
      "const x: number = 10;\n\
      const f = (a: number, c: number): number => {\n\
        'worklet';\n\
        const b: number = a as number;\n\
        return b + c + x!;\n\
      };\n",
      &CompilerOptions::default(),
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let result = h
      .runtime
      .run_worklet(&output.worklets[0].payload, &json!({ "x": 10 }), &[json!(1), json!(2)])
      .unwrap();

    assert_eq!(result, json!(13));
  }

  #[test]
  fn context_object_factory_recreates_the_object() {
    let mut h = booted(RuntimeOptions::default());

    let payload = compile_single(
      "const step = 2;\n\
      const counter = {\n\
        __workletContextObject: true,\n\
        value: 0,\n\
        bump() { this.value += step; return this.value; },\n\
      };\n",
    );

    let copy = h
      .runtime
      .run_worklet(&payload, &json!({ "step": 2 }), &[])
      .unwrap();
    assert_eq!(copy, json!({ "value": 0 }));

    let bumped = h
      .runtime
      .evaluate(&format!(
        "(function (step) {{ var o = ({})(); o.bump(); return o.bump(); }})(2)",
        payload.code
      ))
      .unwrap();
    assert_eq!(bumped, json!(4));
  }

  #[test]
  fn worklet_arguments_and_nested_functions() {
    let mut h = booted(RuntimeOptions::default());

    let payload = compile_single(
      "const k = 3;\n\
      function scaleAll(values) {\n\
        'worklet';\n\
        return values.map((v) => v * k);\n\
      }\n",
    );

    let result = h
      .runtime
      .run_worklet(&payload, &json!({ "k": 3 }), &[json!([1, 2, 4])])
      .unwrap();

    assert_eq!(result, json!([3, 6, 12]));
  }

  #[test]
  fn closure_values_must_match() {
    let mut h = booted(RuntimeOptions::default());
    let payload = compile_single("const x = 1;\nconst f = () => { 'worklet'; return x; };\n");

    assert!(matches!(
      h.runtime.run_worklet(&payload, &json!({}), &[]),
      Err(RuntimeError::ClosureMismatch(_))
    ));
    assert!(matches!(
      h.runtime.run_worklet(&payload, &json!({ "x": 1, "z": 2 }), &[]),
      Err(RuntimeError::ClosureMismatch(_))
    ));

    let mut tampered = payload.clone();
    tampered.closure[0].name = "x) { throw 1; } (".to_string();

    assert!(matches!(
      h.runtime.run_worklet(&tampered, &json!({ "x) { throw 1; } (": 1 }), &[]),
      Err(RuntimeError::ClosureMismatch(_))
    ));

    let mut newer = payload.clone();
    newer.version += 1;

    assert!(matches!(
      h.runtime.run_worklet(&newer, &json!({ "x": 1 }), &[]),
      Err(RuntimeError::UnsupportedVersion { .. })
    ));
  }

  #[test]
  fn unhooked_exception_reaches_the_caller() {
    let mut h = booted(RuntimeOptions::default());
    let payload = compile_single("const f = () => { 'worklet'; throw new Error('bad'); };\n");

    match h.runtime.run_worklet(&payload, &json!({}), &[]) {
      Err(RuntimeError::Exception { message, .. }) => assert_eq!(message, "bad"),
      other => panic!("expected an exception, got {:?}", other),
    }
  }
}
