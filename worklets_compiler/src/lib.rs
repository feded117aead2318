mod capture_finder;
mod classify;
mod compile;
mod diagnostic;
mod functionish;
mod hoist;
mod options;
mod recursion_guard;
mod scope;
mod source_hash;
mod source_text;
mod transform;
mod walker;
mod worklet_pass;


pub use capture_finder::{CaptureSet, CapturedName};
pub use classify::WorkletClass;
pub use compile::{compile, parse, Compiler, CompilerOutput, ParsedFile};
pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use functionish::NodeKind;
pub use options::{AutoWorkletEntry, AutoWorkletTable, CompilerOptions};
pub use recursion_guard::PAYLOAD_MARKER_KEY;
pub use source_text::pos_to_line_col;
pub use worklet_pass::CompiledWorklet;
