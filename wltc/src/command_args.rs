use worklets_compiler::CompilerOptions;

use crate::exit_command_failed::exit_command_failed;

/// Arguments after the subcommand name.
#[derive(Default, PartialEq, Eq, Debug)]
pub struct CommandArgs {
  pub config: Option<String>,
  pub positional: Vec<String>,
}

impl CommandArgs {
  pub fn parse(args: &[String]) -> Result<CommandArgs, String> {
    let mut parsed = CommandArgs::default();
    let mut iter = args.iter().skip(2);

    while let Some(arg) = iter.next() {
      match arg.as_str() {
        "--config" | "-c" => match iter.next() {
          Some(path) => parsed.config = Some(path.clone()),
          None => return Err(format!("{} needs a file", arg)),
        },
        flag if flag.starts_with('-') && flag != "-" => {
          return Err(format!("Unrecognized option {}", flag));
        }
        _ => parsed.positional.push(arg.clone()),
      }
    }

    Ok(parsed)
  }

  pub fn parse_or_exit(args: &[String], help: &str) -> CommandArgs {
    match CommandArgs::parse(args) {
      Ok(parsed) => parsed,
      Err(message) => exit_command_failed(args, Some(&message), help),
    }
  }

  /// Options from `--config`, or the defaults without one.
  pub fn compiler_options(&self, args: &[String], help: &str) -> CompilerOptions {
    let path = match &self.config {
      Some(path) => path,
      None => return CompilerOptions::default(),
    };

    let json = match std::fs::read_to_string(path) {
      Ok(json) => json,
      Err(err) => exit_command_failed(
        args,
        Some(&format!("Failed to read {}: {}", path, err)),
        help,
      ),
    };

    match CompilerOptions::from_json(&json) {
      Ok(options) => options,
      Err(err) => exit_command_failed(args, Some(&format!("Invalid config {}: {}", path, err)), help),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn reads_config_and_positionals() {
    let parsed = CommandArgs::parse(&args(&["wltc", "compile", "-c", "w.json", "in.js", "out.js"]))
      .unwrap();

    assert_eq!(parsed.config.as_deref(), Some("w.json"));
    assert_eq!(parsed.positional, args(&["in.js", "out.js"]));
  }

  #[test]
  fn rejects_unknown_flags() {
    assert!(CommandArgs::parse(&args(&["wltc", "compile", "--fast", "in.js"])).is_err());
    assert!(CommandArgs::parse(&args(&["wltc", "compile", "--config"])).is_err());
  }
}
