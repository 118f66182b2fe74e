//! Variable resolution and scope/loop validation (`spec.md` §4.3).

use crate::scope::ScopeStack;
use nanoc_par::ast::*;
use nanoc_util::{Handler, Span, Symbol};

struct Resolver<'h> {
    scopes: ScopeStack,
    handler: &'h Handler,
    counter: u32,
    loop_depth: u32,
}

impl<'h> Resolver<'h> {
    fn new(handler: &'h Handler) -> Self {
        Self { scopes: ScopeStack::new(), handler, counter: 0, loop_depth: 0 }
    }

    /// Mint a fresh globally-unique name for a newly declared variable, and
    /// record the redeclaration-in-current-scope check along the way.
    fn declare(&mut self, name: Symbol, span: Span) -> Symbol {
        if self.scopes.declared_in_current_scope(name) {
            self.handler.error(format!("redeclaration of '{name}'"), span);
        }
        let resolved = name.with_suffix(self.counter);
        self.counter += 1;
        self.scopes.bind(name, resolved);
        resolved
    }

    fn resolve_use(&self, name: Symbol, span: Span) -> Symbol {
        match self.scopes.lookup(name) {
            Some(resolved) => resolved,
            None => {
                self.handler.error(format!("use of undeclared variable '{name}'"), span);
                name
            }
        }
    }

    fn resolve_function(&mut self, function: &mut Function) {
        self.scopes.push();
        self.resolve_block(&mut function.body);
        self.scopes.pop();
    }

    fn resolve_block(&mut self, block: &mut Block) {
        for item in block.iter_mut() {
            self.resolve_block_item(item);
        }
    }

    fn resolve_block_item(&mut self, item: &mut BlockItem) {
        match item {
            BlockItem::Decl(decl) => self.resolve_declaration(decl),
            BlockItem::Stmt(stmt) => self.resolve_statement(stmt),
        }
    }

    fn resolve_declaration(&mut self, decl: &mut Declaration) {
        // The initializer is resolved in the *enclosing* scope, before the
        // name it may shadow becomes visible (`int x = x;` refers to an
        // outer `x`, matching C's declaration semantics).
        if let Some(init) = &mut decl.init {
            self.resolve_expr(init);
        }
        decl.name = self.declare(decl.name, decl.span);
    }

    fn resolve_statement(&mut self, stmt: &mut Statement) {
        match stmt {
            Statement::Return(e) | Statement::Expr(e) => self.resolve_expr(e),
            Statement::Null => {}
            Statement::Break(span) => {
                if self.loop_depth == 0 {
                    self.handler.error("'break' used outside of a loop", *span);
                }
            }
            Statement::Continue(span) => {
                if self.loop_depth == 0 {
                    self.handler.error("'continue' used outside of a loop", *span);
                }
            }
            Statement::Compound(block) => {
                self.scopes.push();
                self.resolve_block(block);
                self.scopes.pop();
            }
            Statement::If { cond, then_branch, else_branch } => {
                self.resolve_expr(cond);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Statement::While { cond, body } => {
                self.resolve_expr(cond);
                self.loop_depth += 1;
                self.resolve_statement(body);
                self.loop_depth -= 1;
            }
            Statement::DoWhile { body, cond } => {
                self.loop_depth += 1;
                self.resolve_statement(body);
                self.loop_depth -= 1;
                self.resolve_expr(cond);
            }
            Statement::For { init, cond, post, body } => {
                self.scopes.push();
                if let Some(init) = init {
                    match init {
                        ForInit::Decl(decl) => self.resolve_declaration(decl),
                        ForInit::Expr(e) => self.resolve_expr(e),
                    }
                }
                if let Some(cond) = cond {
                    self.resolve_expr(cond);
                }
                self.loop_depth += 1;
                self.resolve_statement(body);
                self.loop_depth -= 1;
                if let Some(post) = post {
                    self.resolve_expr(post);
                }
                self.scopes.pop();
            }
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expression) {
        match &mut expr.kind {
            ExprKind::Constant(_) => {}
            ExprKind::Variable(name) => {
                *name = self.resolve_use(*name, expr.span);
            }
            ExprKind::Assign(lhs, rhs) => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
                if !matches!(lhs.kind, ExprKind::Variable(_)) {
                    self.handler.error("invalid lvalue in assignment", expr.span);
                }
            }
            ExprKind::Conditional(cond, then_e, else_e) => {
                self.resolve_expr(cond);
                self.resolve_expr(then_e);
                self.resolve_expr(else_e);
            }
            ExprKind::Unary(_, operand) => self.resolve_expr(operand),
            ExprKind::Binary(_, lhs, rhs) => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
        }
    }
}

/// Resolve `program` in place, renaming every local variable to a
/// globally-unique name and validating scope/lvalue/loop rules.
///
/// The returned [`Handler`] holds every diagnostic found; callers should
/// check [`Handler::has_errors`] before trusting the renamed AST.
pub fn resolve(mut program: Program) -> (Program, Handler) {
    let handler = Handler::new();
    let mut resolver = Resolver::new(&handler);
    resolver.resolve_function(&mut program.function);
    (program, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoc_par::parse;

    fn resolve_src(src: &str) -> (Program, Handler) {
        let program = parse(src).unwrap();
        resolve(program)
    }

    #[test]
    fn distinct_declarations_get_distinct_names() {
        let (program, handler) = resolve_src(
            "int main(void) { int x = 1; int y = 2; return x + y; }",
        );
        assert!(!handler.has_errors());
        let names: Vec<_> = program
            .function
            .body
            .iter()
            .filter_map(|item| match item {
                BlockItem::Decl(d) => Some(d.name),
                _ => None,
            })
            .collect();
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn redeclaration_in_same_scope_is_an_error() {
        let (_, handler) = resolve_src("int main(void) { int x = 1; int x = 2; return x; }");
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("redeclaration"));
    }

    #[test]
    fn shadowing_in_nested_scope_is_allowed() {
        let (_, handler) =
            resolve_src("int main(void) { int x = 1; { int x = 2; return x; } return x; }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn undeclared_variable_is_an_error() {
        let (_, handler) = resolve_src("int main(void) { return y; }");
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("undeclared"));
    }

    #[test]
    fn non_variable_assignment_target_is_an_error() {
        let (_, handler) = resolve_src("int main(void) { return 1 = 2; }");
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("invalid lvalue"));
    }

    #[test]
    fn break_outside_loop_is_an_error() {
        let (_, handler) = resolve_src("int main(void) { break; return 0; }");
        assert!(handler.has_errors());
        assert!(handler.diagnostics()[0].message.contains("outside of a loop"));
    }

    #[test]
    fn continue_inside_while_is_allowed() {
        let (_, handler) =
            resolve_src("int main(void) { while (1) { continue; } return 0; }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn break_inside_for_body_is_allowed() {
        let (_, handler) =
            resolve_src("int main(void) { for (int i = 0; i < 3; i = i + 1) break; return 0; }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn for_loop_variable_is_scoped_to_the_loop() {
        let (_, handler) = resolve_src(
            "int main(void) { for (int i = 0; i < 3; i = i + 1) { } return i; }",
        );
        assert!(handler.has_errors());
    }

    #[test]
    fn init_expression_sees_outer_x_not_the_new_declaration() {
        let (program, handler) = resolve_src("int main(void) { int x = 1; int y = x; return y; }");
        assert!(!handler.has_errors());
        let BlockItem::Decl(x_decl) = &program.function.body[0] else { panic!() };
        let BlockItem::Decl(y_decl) = &program.function.body[1] else { panic!() };
        let Some(init) = &y_decl.init else { panic!() };
        let ExprKind::Variable(used) = init.kind else { panic!() };
        assert_eq!(used, x_decl.name);
    }
}
