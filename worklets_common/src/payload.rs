use serde::{Deserialize, Serialize};

/// Bumped whenever the shape of emitted payloads or the code they carry
/// changes in a way the runtime has to know about.
pub const COMPILER_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "camelCase")]
pub enum BindingKind {
  Const,
  Let,
  Var,
  Param,
  Function,
  Class,
  Import,
  Catch,
}

impl BindingKind {
  pub fn is_mutable(self) -> bool {
    match self {
      BindingKind::Const | BindingKind::Class | BindingKind::Import => false,
      BindingKind::Let
      | BindingKind::Var
      | BindingKind::Param
      | BindingKind::Function
      | BindingKind::Catch => true,
    }
  }
}

/// One captured outer binding: the name as seen inside the worklet and the
/// expression that reads it in the scope the worklet was defined in.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ClosureBinding {
  pub name: String,
  pub kind: BindingKind,
  pub expr: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Location {
  pub file: String,
  pub line: u32,
  pub column: u32,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct WorkletPayload {
  pub id: String,
  pub version: u32,
  pub code: String,
  pub closure: Vec<ClosureBinding>,
  pub location: Location,
}

impl WorkletPayload {
  pub fn closure_names(&self) -> impl Iterator<Item = &str> {
    self.closure.iter().map(|binding| binding.name.as_str())
  }
}
