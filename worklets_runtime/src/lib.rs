mod bootstrap;
mod call_guard;
mod console_relay;
mod error_reporter;
mod errors;
mod frame_scheduler;
mod options;
mod relay;
mod runtime;
mod shims;

mod tests;

pub use bootstrap::BootstrapHandle;
pub use error_reporter::CrossRuntimeErrorReporter;
pub use errors::{BootstrapError, RuntimeError};
pub use frame_scheduler::FrameClock;
pub use options::{RuntimeMode, RuntimeOptions};
pub use relay::{
  ConsoleMethod, ConsoleSink, ErrorDescriptor, FatalErrorHandler, OrchestratorEndpoint, Relay,
  RelayMessage, TracingConsole,
};
pub use runtime::WorkletRuntime;
pub use shims::{SHIM_NAMES, SHIM_VERSION};
