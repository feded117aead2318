use serde::Deserialize;

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeMode {
  /// Everything is installed and the native tick source drives the frame
  /// scheduler.
  #[default]
  Native,

  /// Tests and tooling: shims and the call guard only. No console relay and
  /// no frame scheduler.
  Headless,
}

#[derive(Deserialize, Default, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeOptions {
  #[serde(default)]
  pub mode: RuntimeMode,

  /// A debugger attached to the secondary runtime brings its own console, so
  /// the relay is not installed.
  #[serde(default)]
  pub debugger_attached: bool,

  /// Whether uncaught worklet exceptions are reported to the orchestration
  /// runtime instead of being rethrown.
  #[serde(default)]
  pub fatal_error_hook: bool,
}

impl RuntimeOptions {
  pub fn from_json(json: &str) -> Result<RuntimeOptions, serde_json::Error> {
    serde_json::from_str(json)
  }

  pub fn headless() -> RuntimeOptions {
    RuntimeOptions {
      mode: RuntimeMode::Headless,
      ..Default::default()
    }
  }

  pub fn installs_console_relay(&self) -> bool {
    self.mode == RuntimeMode::Native && !self.debugger_attached
  }

  pub fn installs_frame_scheduler(&self) -> bool {
    self.mode == RuntimeMode::Native
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_camel_case() {
    let options =
      RuntimeOptions::from_json(r#"{ "mode": "headless", "fatalErrorHook": true }"#).unwrap();

    assert_eq!(options.mode, RuntimeMode::Headless);
    assert!(options.fatal_error_hook);
    assert!(!options.debugger_attached);
    assert!(!options.installs_console_relay());
    assert!(!options.installs_frame_scheduler());
  }

  #[test]
  fn debugger_keeps_the_native_console() {
    let options = RuntimeOptions {
      debugger_attached: true,
      ..Default::default()
    };

    assert!(!options.installs_console_relay());
    assert!(options.installs_frame_scheduler());
  }
}
