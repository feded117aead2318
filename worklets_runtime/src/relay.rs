use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub enum ConsoleMethod {
  Assert,
  Debug,
  Log,
  Warn,
  Error,
  Info,
}

impl ConsoleMethod {
  pub const ALL: [ConsoleMethod; 6] = [
    ConsoleMethod::Assert,
    ConsoleMethod::Debug,
    ConsoleMethod::Log,
    ConsoleMethod::Warn,
    ConsoleMethod::Error,
    ConsoleMethod::Info,
  ];

  pub fn name(self) -> &'static str {
    match self {
      ConsoleMethod::Assert => "assert",
      ConsoleMethod::Debug => "debug",
      ConsoleMethod::Log => "log",
      ConsoleMethod::Warn => "warn",
      ConsoleMethod::Error => "error",
      ConsoleMethod::Info => "info",
    }
  }

  pub fn from_name(name: &str) -> Option<ConsoleMethod> {
    ConsoleMethod::ALL
      .iter()
      .copied()
      .find(|method| method.name() == name)
  }
}

/// An uncaught exception as seen by the secondary runtime.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ErrorDescriptor {
  pub message: String,
  pub stack: Option<String>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum RelayMessage {
  Console {
    method: ConsoleMethod,
    args: Vec<serde_json::Value>,
  },
  FatalError(ErrorDescriptor),
}

/// Sending half of the one-way channel from the secondary runtime to the
/// orchestration runtime.
///
/// Nothing sent through it is ever answered. A send to a closed channel is
/// dropped with a warning.
#[derive(Clone)]
pub struct Relay {
  sender: mpsc::UnboundedSender<RelayMessage>,
}

impl Relay {
  pub fn channel() -> (Relay, mpsc::UnboundedReceiver<RelayMessage>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Relay { sender }, receiver)
  }

  pub fn send(&self, message: RelayMessage) {
    if self.sender.send(message).is_err() {
      warn!("orchestration side is gone; relay message dropped");
    }
  }

  pub fn is_closed(&self) -> bool {
    self.sender.is_closed()
  }
}

/// Where relayed console calls end up on the orchestration side.
pub trait ConsoleSink: Send {
  fn call(&mut self, method: ConsoleMethod, args: &[serde_json::Value]);
}

/// Writes relayed console calls to the `tracing` subscriber.
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
  fn call(&mut self, method: ConsoleMethod, args: &[serde_json::Value]) {
    let line = args
      .iter()
      .map(|arg| match arg {
        serde_json::Value::String(string) => string.clone(),
        other => other.to_string(),
      })
      .collect::<Vec<_>>()
      .join(" ");

    match method {
      ConsoleMethod::Debug => debug!(target: "worklet", "{}", line),
      ConsoleMethod::Log | ConsoleMethod::Info => info!(target: "worklet", "{}", line),
      ConsoleMethod::Warn => warn!(target: "worklet", "{}", line),
      ConsoleMethod::Error => error!(target: "worklet", "{}", line),
      ConsoleMethod::Assert => {
        // console.assert(condition, ...data) only prints when the condition
        // is falsy.
        let holds = match args.first() {
          Some(serde_json::Value::Bool(b)) => *b,
          Some(serde_json::Value::Null) | None => false,
          Some(serde_json::Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
          Some(serde_json::Value::String(s)) => !s.is_empty(),
          Some(_) => true,
        };

        if !holds {
          error!(target: "worklet", "Assertion failed: {}", line);
        }
      }
    }
  }
}

pub type FatalErrorHandler = Box<dyn FnMut(ErrorDescriptor) + Send>;

/// Receiving half, living on the orchestration runtime.
pub struct OrchestratorEndpoint {
  receiver: mpsc::UnboundedReceiver<RelayMessage>,
  console: Box<dyn ConsoleSink>,
  fatal_error_handler: Option<FatalErrorHandler>,
}

impl OrchestratorEndpoint {
  pub fn new(receiver: mpsc::UnboundedReceiver<RelayMessage>) -> Self {
    OrchestratorEndpoint {
      receiver,
      console: Box::new(TracingConsole),
      fatal_error_handler: None,
    }
  }

  pub fn with_console(mut self, console: impl ConsoleSink + 'static) -> Self {
    self.console = Box::new(console);
    self
  }

  pub fn on_fatal_error(mut self, handler: impl FnMut(ErrorDescriptor) + Send + 'static) -> Self {
    self.fatal_error_handler = Some(Box::new(handler));
    self
  }

  /// Handles every message already in the channel and returns how many there
  /// were.
  pub fn drain(&mut self) -> usize {
    let mut count = 0;

    while let Ok(message) = self.receiver.try_recv() {
      self.dispatch(message);
      count += 1;
    }

    count
  }

  /// Handles messages until every `Relay` has been dropped.
  pub async fn run(mut self) {
    while let Some(message) = self.receiver.recv().await {
      self.dispatch(message);
    }

    debug!("relay channel closed");
  }

  fn dispatch(&mut self, message: RelayMessage) {
    match message {
      RelayMessage::Console { method, args } => self.console.call(method, &args),
      RelayMessage::FatalError(descriptor) => match &mut self.fatal_error_handler {
        Some(handler) => handler(descriptor),
        None => error!(
          error = %descriptor.message,
          stack = descriptor.stack.as_deref().unwrap_or(""),
          "uncaught worklet exception"
        ),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  #[derive(Clone, Default)]
  struct Recorded(Arc<Mutex<Vec<(ConsoleMethod, Vec<serde_json::Value>)>>>);

  impl ConsoleSink for Recorded {
    fn call(&mut self, method: ConsoleMethod, args: &[serde_json::Value]) {
      self.0.lock().unwrap().push((method, args.to_vec()));
    }
  }

  #[test]
  fn method_names_round_trip() {
    for method in ConsoleMethod::ALL {
      assert_eq!(ConsoleMethod::from_name(method.name()), Some(method));
    }

    assert_eq!(ConsoleMethod::from_name("table"), None);
  }

  #[test]
  fn drain_dispatches_in_issue_order() {
    let (relay, receiver) = Relay::channel();
    let recorded = Recorded::default();
    let fatal = Arc::new(Mutex::new(Vec::new()));
    let fatal_clone = fatal.clone();

    let mut endpoint = OrchestratorEndpoint::new(receiver)
      .with_console(recorded.clone())
      .on_fatal_error(move |descriptor| fatal_clone.lock().unwrap().push(descriptor));

    relay.send(RelayMessage::Console {
      method: ConsoleMethod::Log,
      args: vec![serde_json::json!("a"), serde_json::json!(1)],
    });
    relay.send(RelayMessage::FatalError(ErrorDescriptor {
      message: "boom".to_string(),
      stack: None,
    }));
    relay.send(RelayMessage::Console {
      method: ConsoleMethod::Warn,
      args: vec![],
    });

    assert_eq!(endpoint.drain(), 3);
    assert_eq!(endpoint.drain(), 0);

    let calls = recorded.0.lock().unwrap();
    assert_eq!(calls[0].0, ConsoleMethod::Log);
    assert_eq!(calls[0].1, vec![serde_json::json!("a"), serde_json::json!(1)]);
    assert_eq!(calls[1].0, ConsoleMethod::Warn);
    assert_eq!(fatal.lock().unwrap()[0].message, "boom");
  }

  #[test]
  fn send_after_close_is_silent() {
    let (relay, receiver) = Relay::channel();
    drop(receiver);

    assert!(relay.is_closed());
    relay.send(RelayMessage::FatalError(ErrorDescriptor {
      message: "nobody listens".to_string(),
      stack: None,
    }));
  }

  #[tokio::test]
  async fn run_finishes_when_relays_are_dropped() {
    let (relay, receiver) = Relay::channel();
    let recorded = Recorded::default();
    let endpoint = OrchestratorEndpoint::new(receiver).with_console(recorded.clone());

    let other = relay.clone();
    relay.send(RelayMessage::Console {
      method: ConsoleMethod::Info,
      args: vec![serde_json::json!("first")],
    });
    other.send(RelayMessage::Console {
      method: ConsoleMethod::Info,
      args: vec![serde_json::json!("second")],
    });
    drop(relay);
    drop(other);

    endpoint.run().await;

    let calls = recorded.0.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, vec![serde_json::json!("second")]);
  }
}
