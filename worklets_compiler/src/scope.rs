use std::{cell::RefCell, collections::HashMap, rc::Rc};

use worklets_common::BindingKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Binding {
  pub kind: BindingKind,
  pub span: swc_common::Span,
}

pub struct ScopeData {
  pub name_map: HashMap<swc_atoms::JsWord, Binding>,
  pub parent: Option<Rc<RefCell<ScopeData>>>,
}

pub type Scope = Rc<RefCell<ScopeData>>;

pub trait ScopeTrait {
  fn get(&self, name: &swc_atoms::JsWord) -> Option<Binding>;
  fn get_local(&self, name: &swc_atoms::JsWord) -> Option<Binding>;
  fn set(&self, name: &swc_atoms::JsWord, binding: Binding);
  fn nest(&self) -> Rc<RefCell<ScopeData>>;
}

impl ScopeTrait for Scope {
  fn get(&self, name: &swc_atoms::JsWord) -> Option<Binding> {
    match self.borrow().name_map.get(name) {
      Some(binding) => Some(*binding),
      None => match &self.borrow().parent {
        Some(parent) => parent.get(name),
        None => None,
      },
    }
  }

  fn get_local(&self, name: &swc_atoms::JsWord) -> Option<Binding> {
    self.borrow().name_map.get(name).copied()
  }

  fn set(&self, name: &swc_atoms::JsWord, binding: Binding) {
    // Redeclaring a `var` or a function keeps the first binding.
    self
      .borrow_mut()
      .name_map
      .entry(name.clone())
      .or_insert(binding);
  }

  fn nest(&self) -> Rc<RefCell<ScopeData>> {
    Rc::new(RefCell::new(ScopeData {
      name_map: Default::default(),
      parent: Some(self.clone()),
    }))
  }
}

pub fn root_scope() -> Scope {
  Rc::new(RefCell::new(ScopeData {
    name_map: Default::default(),
    parent: None,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn binding(kind: BindingKind) -> Binding {
    Binding {
      kind,
      span: swc_common::DUMMY_SP,
    }
  }

  #[test]
  fn inner_binding_shadows_outer() {
    let outer = root_scope();
    let name = swc_atoms::JsWord::from("x");
    outer.set(&name, binding(BindingKind::Const));

    let inner = outer.nest();
    assert_eq!(inner.get(&name).map(|b| b.kind), Some(BindingKind::Const));
    assert!(inner.get_local(&name).is_none());

    inner.set(&name, binding(BindingKind::Let));
    assert_eq!(inner.get(&name).map(|b| b.kind), Some(BindingKind::Let));
    assert_eq!(outer.get(&name).map(|b| b.kind), Some(BindingKind::Const));
  }

  #[test]
  fn redeclaration_keeps_first() {
    let scope = root_scope();
    let name = swc_atoms::JsWord::from("v");
    scope.set(&name, binding(BindingKind::Var));
    scope.set(&name, binding(BindingKind::Function));
    assert_eq!(scope.get(&name).map(|b| b.kind), Some(BindingKind::Var));
  }
}
