use rquickjs::{Ctx, Function};

use crate::errors::{describe_js_error, BootstrapError};

pub const FLUSH_ANIMATION_FRAME: &str = "__flushAnimationFrame";
pub const PENDING_FRAME_CALLBACKS: &str = "__pendingFrameCallbacks";

// Callbacks registered during a flush land in the fresh queue and wait for the
// next tick. A flush for a timestamp that is not newer than the last one, or
// one started from inside a running flush, does nothing.
const FRAME_SOURCE: &str = r#"(function (global) {
  'use strict';

  if (typeof global.__flushAnimationFrame === 'function') {
    return;
  }

  var queue = [];
  var lastTimestamp = -Infinity;
  var flushing = false;

  global.requestAnimationFrame = function (callback) {
    queue.push(callback);
    return -1;
  };

  function flush(timestamp) {
    if (flushing || !(timestamp > lastTimestamp)) {
      return 0;
    }

    lastTimestamp = timestamp;
    flushing = true;

    var batch = queue;
    queue = [];
    global.__frameTimestamp = timestamp;

    try {
      for (var i = 0; i < batch.length; i++) {
        try {
          global.__callGuard(batch[i], [timestamp]);
        } catch (error) {
          global.__ErrorUtils.report(error);
        }
      }
    } finally {
      global.__frameTimestamp = undefined;
      flushing = false;
    }

    return batch.length;
  }

  function pending() {
    return queue.length;
  }

  var hidden = { writable: false, enumerable: false, configurable: false };

  Object.defineProperty(global, '__flushAnimationFrame', Object.assign({ value: flush }, hidden));
  Object.defineProperty(global, '__pendingFrameCallbacks', Object.assign({ value: pending }, hidden));
})"#;

pub fn install<'js>(ctx: &Ctx<'js>) -> Result<(), BootstrapError> {
  ctx
    .eval::<Function, _>(FRAME_SOURCE)
    .and_then(|installer| installer.call::<_, ()>((ctx.globals(),)))
    .map_err(|error| BootstrapError::Stage {
      stage: "frame scheduler",
      message: describe_js_error(ctx, error),
    })
}

/// Last tick timestamp the scheduler flushed for. Native ticks may be
/// delivered more than once; only strictly increasing timestamps pass.
#[derive(Default, Debug)]
pub struct FrameClock {
  last: Option<f64>,
}

impl FrameClock {
  pub fn advance(&mut self, timestamp: f64) -> bool {
    if !timestamp.is_finite() {
      return false;
    }

    match self.last {
      Some(last) if timestamp <= last => false,
      _ => {
        self.last = Some(timestamp);
        true
      }
    }
  }

  pub fn last(&self) -> Option<f64> {
    self.last
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_increasing_ticks_pass() {
    let mut clock = FrameClock::default();

    assert!(clock.advance(16.0));
    assert!(!clock.advance(16.0));
    assert!(!clock.advance(8.0));
    assert!(!clock.advance(f64::NAN));
    assert!(clock.advance(32.5));
    assert_eq!(clock.last(), Some(32.5));
  }
}
