use swc_common::{Span, Spanned};

#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
  Arrow,
  FunctionDeclaration,
  FunctionExpression,
  ObjectMethod,
  ContextObject,
}

/// A function-like node that may become a worklet.
#[derive(Clone, Copy)]
pub enum Functionish<'a> {
  Arrow(&'a swc_ecma_ast::ArrowExpr),
  Decl(&'a swc_ecma_ast::FnDecl),
  Expr(&'a swc_ecma_ast::FnExpr),
  Method {
    key: &'a swc_ecma_ast::PropName,
    function: &'a swc_ecma_ast::Function,
  },
  /// `export default function name() {}`. Rewritten together with its export
  /// so that `name` stays bound in the module.
  DefaultExport {
    export: &'a swc_ecma_ast::ExportDefaultDecl,
    function: &'a swc_ecma_ast::FnExpr,
  },
}

pub enum FunctionBody<'a> {
  Block(&'a swc_ecma_ast::BlockStmt),
  Expr(&'a swc_ecma_ast::Expr),
  Missing,
}

impl<'a> Functionish<'a> {
  pub fn kind(&self) -> NodeKind {
    match *self {
      Functionish::Arrow(_) => NodeKind::Arrow,
      Functionish::Decl(_) | Functionish::DefaultExport { .. } => NodeKind::FunctionDeclaration,
      Functionish::Expr(_) => NodeKind::FunctionExpression,
      Functionish::Method { .. } => NodeKind::ObjectMethod,
    }
  }

  pub fn is_arrow(&self) -> bool {
    matches!(self, Functionish::Arrow(_))
  }

  /// The span this node occupies in its parent. For methods that includes the
  /// key and any modifiers.
  pub fn span(&self) -> Span {
    match *self {
      Functionish::Arrow(arrow) => arrow.span,
      Functionish::Decl(fn_decl) => fn_decl.function.span,
      Functionish::Expr(fn_expr) => fn_expr.function.span,
      Functionish::Method { key, function } => {
        let key_span = key.span();

        Span::new(
          std::cmp::min(key_span.lo, function.span.lo),
          function.span.hi,
          Default::default(),
        )
      }
      Functionish::DefaultExport { export, .. } => export.span,
    }
  }

  /// The name bound inside the function's own scope.
  pub fn own_name(&self) -> Option<&'a swc_ecma_ast::Ident> {
    match *self {
      Functionish::Decl(fn_decl) => Some(&fn_decl.ident),
      Functionish::Expr(fn_expr) | Functionish::DefaultExport { function: fn_expr, .. } => {
        fn_expr.ident.as_ref()
      }
      Functionish::Arrow(_) | Functionish::Method { .. } => None,
    }
  }

  /// Name used for the emitted function expression.
  pub fn code_name(&self) -> Option<String> {
    match *self {
      Functionish::Method { key, .. } => match key {
        swc_ecma_ast::PropName::Ident(ident) => Some(ident.sym.to_string()),
        _ => None,
      },
      _ => self.own_name().map(|ident| ident.sym.to_string()),
    }
  }

  pub fn param_pats(&self) -> Vec<&'a swc_ecma_ast::Pat> {
    match *self {
      Functionish::Arrow(arrow) => arrow.params.iter().collect(),
      Functionish::Decl(fn_decl) => fn_decl.function.params.iter().map(|p| &p.pat).collect(),
      Functionish::Expr(fn_expr) => fn_expr.function.params.iter().map(|p| &p.pat).collect(),
      Functionish::Method { function, .. } => function.params.iter().map(|p| &p.pat).collect(),
      Functionish::DefaultExport { function, .. } => {
        function.function.params.iter().map(|p| &p.pat).collect()
      }
    }
  }

  pub fn param_spans(&self) -> Vec<Span> {
    match *self {
      Functionish::Arrow(arrow) => arrow.params.iter().map(|p| p.span()).collect(),
      Functionish::Decl(fn_decl) => fn_decl.function.params.iter().map(|p| p.span).collect(),
      Functionish::Expr(fn_expr) => fn_expr.function.params.iter().map(|p| p.span).collect(),
      Functionish::Method { function, .. } => function.params.iter().map(|p| p.span).collect(),
      Functionish::DefaultExport { function, .. } => {
        function.function.params.iter().map(|p| p.span).collect()
      }
    }
  }

  pub fn body(&self) -> FunctionBody<'a> {
    let function = match *self {
      Functionish::Arrow(arrow) => {
        return match &arrow.body {
          swc_ecma_ast::BlockStmtOrExpr::BlockStmt(block) => FunctionBody::Block(block),
          swc_ecma_ast::BlockStmtOrExpr::Expr(expr) => FunctionBody::Expr(expr),
        };
      }
      Functionish::Decl(fn_decl) => &fn_decl.function,
      Functionish::Expr(fn_expr) => &fn_expr.function,
      Functionish::Method { function, .. } => function,
      Functionish::DefaultExport { function, .. } => &function.function,
    };

    match &function.body {
      Some(block) => FunctionBody::Block(block),
      None => FunctionBody::Missing,
    }
  }

  pub fn is_async(&self) -> bool {
    match *self {
      Functionish::Arrow(arrow) => arrow.is_async,
      Functionish::Decl(fn_decl) => fn_decl.function.is_async,
      Functionish::Expr(fn_expr) => fn_expr.function.is_async,
      Functionish::Method { function, .. } => function.is_async,
      Functionish::DefaultExport { function, .. } => function.function.is_async,
    }
  }

  pub fn is_generator(&self) -> bool {
    match *self {
      Functionish::Arrow(arrow) => arrow.is_generator,
      Functionish::Decl(fn_decl) => fn_decl.function.is_generator,
      Functionish::Expr(fn_expr) => fn_expr.function.is_generator,
      Functionish::Method { function, .. } => function.is_generator,
      Functionish::DefaultExport { function, .. } => function.function.is_generator,
    }
  }

  /// The statement carrying the `'worklet'` directive, if the body starts with
  /// one.
  pub fn worklet_directive(&self) -> Option<&'a swc_ecma_ast::Stmt> {
    let block = match self.body() {
      FunctionBody::Block(block) => block,
      FunctionBody::Expr(_) | FunctionBody::Missing => return None,
    };

    let first = block.stmts.first()?;

    match first {
      swc_ecma_ast::Stmt::Expr(expr_stmt) => match &*expr_stmt.expr {
        swc_ecma_ast::Expr::Lit(swc_ecma_ast::Lit::Str(str_)) if &*str_.value == WORKLET_DIRECTIVE => {
          Some(first)
        }
        _ => None,
      },
      _ => None,
    }
  }
}

pub const WORKLET_DIRECTIVE: &str = "worklet";
