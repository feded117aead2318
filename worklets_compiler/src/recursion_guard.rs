use std::collections::HashSet;

use swc_common::Span;

/// Property that marks an object literal as an already emitted payload.
pub const PAYLOAD_MARKER_KEY: &str = "__workletHash";

/// Remembers which nodes have been handled so that nothing is transformed
/// twice, whichever classification path reaches it first.
#[derive(Default)]
pub struct RecursionGuard {
  processed: HashSet<Span>,
}

impl RecursionGuard {
  pub fn mark(&mut self, span: Span) {
    self.processed.insert(span);
  }

  pub fn is_processed(&self, span: Span) -> bool {
    self.processed.contains(&span)
  }

  /// Payload object literals are compiler output; neither they nor the
  /// functions nested in them are candidates.
  pub fn is_payload_object(object: &swc_ecma_ast::ObjectLit) -> bool {
    object.props.iter().any(|prop| match prop {
      swc_ecma_ast::PropOrSpread::Prop(prop) => match &**prop {
        swc_ecma_ast::Prop::KeyValue(kv) => match &kv.key {
          swc_ecma_ast::PropName::Ident(ident) => &*ident.sym == PAYLOAD_MARKER_KEY,
          swc_ecma_ast::PropName::Str(str_) => &*str_.value == PAYLOAD_MARKER_KEY,
          _ => false,
        },
        _ => false,
      },
      swc_ecma_ast::PropOrSpread::Spread(_) => false,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use swc_common::BytePos;

  #[test]
  fn marks_are_per_span() {
    let mut guard = RecursionGuard::default();
    let a = Span::new(BytePos(1), BytePos(5), Default::default());
    let b = Span::new(BytePos(1), BytePos(6), Default::default());

    guard.mark(a);
    assert!(guard.is_processed(a));
    assert!(!guard.is_processed(b));
  }
}
