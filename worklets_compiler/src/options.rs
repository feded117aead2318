use std::collections::HashSet;

use serde::Deserialize;

/// One callee whose function arguments are workletized without a directive.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AutoWorkletEntry {
  /// Either a bare identifier (`useThing`) or a dotted member callee
  /// (`Thing.run`).
  pub callee: String,

  /// Argument positions to workletize. All function arguments when absent.
  #[serde(default)]
  pub args: Option<Vec<usize>>,
}

/// The allow-list of auto-workletizable callees. It is supplied by the
/// embedding framework and versioned with it; nothing is built in.
#[derive(Deserialize, Default, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AutoWorkletTable {
  #[serde(default)]
  pub version: u32,

  #[serde(default)]
  pub entries: Vec<AutoWorkletEntry>,
}

impl AutoWorkletTable {
  pub fn matches(&self, callee: &str, arg_index: usize) -> bool {
    self.entries.iter().any(|entry| {
      entry.callee == callee
        && match &entry.args {
          Some(args) => args.contains(&arg_index),
          None => true,
        }
    })
  }
}

#[derive(Deserialize, Default, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
  /// Consumed by the host's platform-check rewrite, which runs alongside this
  /// pass. Carried here so one configuration file drives both.
  #[serde(default)]
  pub substitute_web_platform_checks: bool,

  /// Names that are never captured, even when a module binding shadows them.
  #[serde(default)]
  pub globals: Vec<String>,

  #[serde(default)]
  pub auto_workletize: AutoWorkletTable,
}

impl CompilerOptions {
  pub fn from_json(json: &str) -> Result<CompilerOptions, serde_json::Error> {
    serde_json::from_str(json)
  }

  pub fn global_set(&self) -> HashSet<String> {
    self.globals.iter().cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_camel_case_config() {
    let options = CompilerOptions::from_json(
      r#"{
        "substituteWebPlatformChecks": true,
        "globals": ["_WORKLET"],
        "autoWorkletize": {
          "version": 3,
          "entries": [
            { "callee": "useFrameCallback" },
            { "callee": "Gesture.onUpdate", "args": [0] }
          ]
        }
      }"#,
    )
    .unwrap();

    assert!(options.substitute_web_platform_checks);
    assert_eq!(options.globals, vec!["_WORKLET".to_string()]);
    assert_eq!(options.auto_workletize.version, 3);
    assert!(options.auto_workletize.matches("useFrameCallback", 2));
    assert!(options.auto_workletize.matches("Gesture.onUpdate", 0));
    assert!(!options.auto_workletize.matches("Gesture.onUpdate", 1));
    assert!(!options.auto_workletize.matches("onUpdate", 0));
  }

  #[test]
  fn empty_config_has_no_auto_worklets() {
    let options = CompilerOptions::from_json("{}").unwrap();
    assert_eq!(options.auto_workletize, AutoWorkletTable::default());
    assert!(!options.auto_workletize.matches("useAnything", 0));
  }
}
