use std::process::exit;

use tracing::debug;
use worklets_compiler::Compiler;

use crate::command_args::CommandArgs;
use crate::exit_command_failed::exit_command_failed;
use crate::handle_diagnostics_cli::handle_diagnostics_cli;

const HELP: &str = "wltc compile --help";

pub fn compile_command(args: &Vec<String>) {
  if args.get(2).map(|s| s.as_str()) == Some("--help") {
    show_help();
    return;
  }

  let command_args = CommandArgs::parse_or_exit(args, HELP);

  let (input, output_path) = match command_args.positional.as_slice() {
    [input] => (input, None),
    [input, output] => (input, Some(output)),
    _ => {
      println!("ERROR: Unrecognized command\n");
      show_help();
      exit(1);
    }
  };

  let compiler = Compiler::new(command_args.compiler_options(args, HELP));

  let source = match std::fs::read_to_string(input) {
    Ok(source) => source,
    Err(err) => exit_command_failed(args, Some(&format!("Failed to read {}: {}", input, err)), HELP),
  };

  let compiler_output = compiler.compile_file(input, &source);
  handle_diagnostics_cli(input, &source, &compiler_output);

  debug!(
    file = %input,
    worklets = compiler_output.worklets.len(),
    "writing compiled output"
  );

  match output_path {
    Some(path) => {
      if let Err(err) = std::fs::write(path, &compiler_output.code) {
        exit_command_failed(args, Some(&format!("Failed to write {}: {}", path, err)), HELP);
      }
    }
    None => print!("{}", compiler_output.code),
  }
}

fn show_help() {
  println!("wltc compile");
  println!();
  println!("Replace every worklet in a source file with its payload");
  println!();
  println!("USAGE:");
  println!("    wltc compile [--config <options.json>] <input> [<output>]");
  println!();
  println!("The compiled source goes to <output>, or to stdout without one.");
}
