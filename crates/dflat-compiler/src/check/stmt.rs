//! Statement checking.

use dflat_ast::{AssignStmt, Block, ExprKind, IfStmt, Stmt, StmtKind, VarDeclStmt, WhileStmt};
use dflat_core::{CompilationError, Result, SemanticError, ValueType};

use super::{Checker, Located};

impl Checker<'_> {
    /// Check a statement. Statements have no type of their own.
    pub fn check_stmt(&mut self, stmt: &mut Stmt) -> Result<()> {
        let span = stmt.span;
        let result = match &mut stmt.kind {
            StmtKind::Block(block) => self.check_block(block),
            StmtKind::If(if_stmt) => self.check_if(if_stmt),
            StmtKind::While(while_stmt) => self.check_while(while_stmt),
            StmtKind::Assign(assign) => self.check_assign(assign),
            StmtKind::VarDecl(decl) => self.check_var_decl(decl),
            StmtKind::Return(value) => self.check_return(value.as_mut()),
            StmtKind::Print(value) => self.check_print(value),
            StmtKind::Expr(expr) => self.check_expr(expr).map(|_| ()),
        };
        result.at(span)
    }

    /// Check a block in a fresh scope.
    pub fn check_block(&mut self, block: &mut Block) -> Result<()> {
        self.env.enter_scope()?;
        for stmt in &mut block.stmts {
            self.check_stmt(stmt)?;
        }
        self.env.leave_scope()
    }

    fn check_if(&mut self, if_stmt: &mut IfStmt) -> Result<()> {
        self.check_condition(&mut if_stmt.cond)?;
        self.check_block(&mut if_stmt.then_branch)?;
        if let Some(else_branch) = &mut if_stmt.else_branch {
            self.check_block(else_branch)?;
        }
        Ok(())
    }

    fn check_while(&mut self, while_stmt: &mut WhileStmt) -> Result<()> {
        self.check_condition(&mut while_stmt.cond)?;
        self.check_block(&mut while_stmt.body)
    }

    fn check_condition(&mut self, cond: &mut dflat_ast::Expr) -> Result<()> {
        let span = cond.span;
        let ty = self.check_expr(cond)?;
        self.env.assert_type_is(&ty, &ValueType::Bool).at(span)
    }

    fn check_assign(&mut self, assign: &mut AssignStmt) -> Result<()> {
        if !matches!(assign.target.kind, ExprKind::Variable(_)) {
            return Err(SemanticError::TypeMismatch {
                message: format!("cannot assign to '{}'", assign.target),
            }
            .into());
        }

        let target = self.check_expr(&mut assign.target)?;
        let value = self.check_expr(&mut assign.value)?;
        self.env
            .assert_type_is_or_base(&value, &target)
            .at(assign.value.span)
    }

    fn check_var_decl(&mut self, decl: &mut VarDeclStmt) -> Result<()> {
        self.check_storage_type(&decl.ty, &decl.name)?;

        // The initializer cannot see the name being declared.
        if let Some(init) = &mut decl.init {
            let value = self.check_expr(init)?;
            self.env
                .assert_type_is_or_base(&value, &decl.ty)
                .at(init.span)?;
        }

        self.env.declare_local(&decl.name, decl.ty.clone())
    }

    fn check_return(&mut self, value: Option<&mut dflat_ast::Expr>) -> Result<()> {
        let expected = self.env.cur_method()?.name.ret().clone();

        match value {
            Some(value) => {
                if expected.is_void() {
                    return Err(SemanticError::TypeMismatch {
                        message: format!("void method cannot return '{value}'"),
                    }
                    .into());
                }
                let actual = self.check_expr(value)?;
                self.env
                    .assert_type_is_or_base(&actual, &expected)
                    .at(value.span)
            }
            None if expected.is_void() => Ok(()),
            None => Err(SemanticError::TypeMismatch {
                message: format!("method must return a value of type '{expected}'"),
            }
            .into()),
        }
    }

    fn check_print(&mut self, value: &mut dflat_ast::Expr) -> Result<()> {
        let ty = self.check_expr(value)?;
        if matches!(ty, ValueType::Int | ValueType::Bool) {
            return Ok(());
        }
        let err = CompilationError::from(SemanticError::TypeMismatch {
            message: format!("cannot print a value of type '{ty}'"),
        });
        Err(err.with_span(value.span))
    }
}
