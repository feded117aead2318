use std::process::exit;

use worklets_compiler::Compiler;

use crate::command_args::CommandArgs;
use crate::exit_command_failed::exit_command_failed;
use crate::handle_diagnostics_cli::handle_diagnostics_cli;

const HELP: &str = "wltc payloads --help";

pub fn payloads_command(args: &Vec<String>) {
  if args.get(2).map(|s| s.as_str()) == Some("--help") {
    show_help();
    return;
  }

  let command_args = CommandArgs::parse_or_exit(args, HELP);

  if command_args.positional.is_empty() {
    println!("ERROR: Unrecognized command\n");
    show_help();
    exit(1);
  }

  let compiler = Compiler::new(command_args.compiler_options(args, HELP));
  let mut table = serde_json::Map::new();

  for input in &command_args.positional {
    let source = match std::fs::read_to_string(input) {
      Ok(source) => source,
      Err(err) => {
        exit_command_failed(args, Some(&format!("Failed to read {}: {}", input, err)), HELP)
      }
    };

    let compiler_output = compiler.compile_file(input, &source);
    handle_diagnostics_cli(input, &source, &compiler_output);

    match serde_json::to_value(&compiler_output.worklets) {
      Ok(worklets) => {
        table.insert(input.clone(), worklets);
      }
      Err(err) => exit_command_failed(args, Some(&err.to_string()), HELP),
    }
  }

  match serde_json::to_string_pretty(&table) {
    Ok(json) => println!("{}", json),
    Err(err) => exit_command_failed(args, Some(&err.to_string()), HELP),
  }
}

fn show_help() {
  println!("wltc payloads");
  println!();
  println!("Print the worklet payloads of each file as JSON, keyed by file");
  println!();
  println!("USAGE:");
  println!("    wltc payloads [--config <options.json>] <input>...");
}
