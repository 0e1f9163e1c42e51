//! Code generation from a checked AST.
//!
//! The emitter renders C-like text in which every identifier is wrapped in a
//! macro (`$VAR`, `$MEMBER`, `$TYPE`, ...), leaving naming and layout
//! decisions to a later macro pass. It never resolves names itself: member
//! accesses, calls and `new` expressions are rendered from the bindings the
//! checker cached on the nodes.
//!
//! ## Layout
//!
//! ```text
//! $CLASS(Dog)
//! {
//!     $BASE(Animal);
//!     $TYPE(int) $MEMBER(loud);
//! };
//!
//! $TYPE(void) $METHOD(Dog, bark_<hash>)($TYPE(Dog)* $VAR(this), $TYPE(int) $VAR(n))
//! {
//!     $PRINT($VAR(n));
//! }
//! ```
//!
//! Booleans are lowered to `int`, with `true` as `1` and `false` as `0`.
//! Constructors render as `$CONS` initializers taking the receiver first;
//! `$NEW` allocates an instance and runs the selected initializer.

use dflat_ast::{
    Annotation, Block, ClassDecl, ConsDef, Expr, ExprKind, Member, MethodDef, Param, Program, Stmt,
    StmtKind, VarBinding,
};
use dflat_core::config::{CONSTRUCTOR_NAME, RECEIVER_NAME};
use dflat_core::{LogicError, Result, ValueType};
use dflat_registry::ClassRegistry;

/// Text emitter over a checked program.
pub struct CodeEmitter<'reg> {
    registry: &'reg ClassRegistry,
    out: String,
    indent: usize,
}

impl<'reg> CodeEmitter<'reg> {
    pub fn new(registry: &'reg ClassRegistry) -> Self {
        Self {
            registry,
            out: String::new(),
            indent: 0,
        }
    }

    /// Render a whole program.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit_program(mut self, program: &Program) -> Result<String> {
        for (i, class) in program.classes.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.emit_class(class)?;
        }
        Ok(self.finish())
    }

    /// The text emitted so far.
    pub fn finish(self) -> String {
        self.out
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Render a class layout followed by its methods and constructors.
    pub fn emit_class(&mut self, class: &ClassDecl) -> Result<()> {
        let registry = self.registry;
        let meta = registry
            .lookup(&class.name)
            .ok_or_else(|| LogicError::UnregisteredClass {
                operation: "emit_class",
                name: class.name.clone(),
            })?;

        self.line(&format!("$CLASS({})", meta.name));
        self.line("{");
        self.indent += 1;
        if let Some(parent) = &meta.parent {
            self.line(&format!("$BASE({parent});"));
        }
        for (name, ty) in meta.members_in_order() {
            if let Some(ty) = ty.as_value() {
                self.line(&format!("{} $MEMBER({name});", type_code(ty)));
            }
        }
        self.indent -= 1;
        self.line("};");

        for member in &class.members {
            match member {
                Member::Field(_) => {}
                Member::Method(method) => {
                    self.out.push('\n');
                    self.emit_method(&class.name, method)?;
                }
                Member::Constructor(cons) => {
                    self.out.push('\n');
                    self.emit_constructor(&class.name, cons)?;
                }
            }
        }
        Ok(())
    }

    fn emit_method(&mut self, class: &str, method: &MethodDef) -> Result<()> {
        let signature = method.signature.get().ok_or_else(|| unresolved(class, &method.name))?;
        let head = format!(
            "{} $METHOD({class}, {})({})",
            type_code(&method.ret),
            signature.mangled(),
            receiver_params(class, &method.params)
        );
        self.line(&head);
        self.emit_block(&method.body)
    }

    fn emit_constructor(&mut self, class: &str, cons: &ConsDef) -> Result<()> {
        let signature = cons
            .signature
            .get()
            .ok_or_else(|| unresolved(class, CONSTRUCTOR_NAME))?;
        let head = format!(
            "$CONS({class}, {})({})",
            signature.mangled(),
            receiver_params(class, &cons.params)
        );
        self.line(&head);
        self.emit_block(&cons.body)
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// Render a statement at the current indentation.
    pub fn emit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Block(block) => self.emit_block(block),
            StmtKind::If(if_stmt) => {
                let cond = self.expr(&if_stmt.cond)?;
                self.line(&format!("if ({cond})"));
                self.emit_block(&if_stmt.then_branch)?;
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.line("else");
                    self.emit_block(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While(while_stmt) => {
                let cond = self.expr(&while_stmt.cond)?;
                self.line(&format!("while ({cond})"));
                self.emit_block(&while_stmt.body)
            }
            StmtKind::Assign(assign) => {
                let target = self.expr(&assign.target)?;
                let value = self.expr(&assign.value)?;
                self.line(&format!("{target} = {value};"));
                Ok(())
            }
            StmtKind::VarDecl(decl) => {
                let head = format!("{} $VAR({})", type_code(&decl.ty), decl.name);
                match &decl.init {
                    Some(init) => {
                        let value = self.expr(init)?;
                        self.line(&format!("{head} = {value};"));
                    }
                    None => self.line(&format!("{head};")),
                }
                Ok(())
            }
            StmtKind::Return(Some(value)) => {
                let value = self.expr(value)?;
                self.line(&format!("return {value};"));
                Ok(())
            }
            StmtKind::Return(None) => {
                self.line("return;");
                Ok(())
            }
            StmtKind::Print(value) => {
                let value = self.expr(value)?;
                self.line(&format!("$PRINT({value});"));
                Ok(())
            }
            StmtKind::Expr(expr) => {
                let code = self.expr(expr)?;
                self.line(&format!("{code};"));
                Ok(())
            }
        }
    }

    fn emit_block(&mut self, block: &Block) -> Result<()> {
        self.line("{");
        self.indent += 1;
        for stmt in &block.stmts {
            self.emit_stmt(stmt)?;
        }
        self.indent -= 1;
        self.line("}");
        Ok(())
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Render an expression.
    pub fn expr(&self, expr: &Expr) -> Result<String> {
        let code = match &expr.kind {
            ExprKind::Number(n) => n.to_string(),
            ExprKind::Bool(b) => String::from(if *b { "1" } else { "0" }),
            ExprKind::This => var(RECEIVER_NAME),
            ExprKind::Variable(v) => match (&v.object, v.binding.get()) {
                (Some(object), _) => {
                    format!("{}->$MEMBER({})", object_code(object, &v.object_binding), v.name)
                }
                (None, Some(VarBinding::Member { .. })) => member(RECEIVER_NAME, &v.name),
                (None, _) => var(&v.name),
            },
            ExprKind::Binary(b) => {
                format!("({}{}{})", self.expr(&b.lhs)?, b.op, self.expr(&b.rhs)?)
            }
            ExprKind::Unary(u) => format!("({}{})", u.op, self.expr(&u.operand)?),
            ExprKind::Call(call) => {
                let binding = call.binding.get().ok_or_else(|| LogicError::UnresolvedCall {
                    method: call.name.clone(),
                })?;
                let receiver = match &call.object {
                    Some(object) => object_code(object, &call.object_binding),
                    None => var(RECEIVER_NAME),
                };
                let mut args = vec![receiver];
                for arg in &call.args {
                    args.push(self.expr(arg)?);
                }
                format!(
                    "$METHOD({}, {})({})",
                    binding.owner,
                    binding.method.mangled(),
                    args.join(", ")
                )
            }
            ExprKind::New(new) => {
                let binding = new.binding.get().ok_or_else(|| LogicError::UnresolvedCall {
                    method: format!("new {}", new.class),
                })?;
                let args = new
                    .args
                    .iter()
                    .map(|arg| self.expr(arg))
                    .collect::<Result<Vec<_>>>()?;
                format!(
                    "$NEW({}, {})({})",
                    binding.owner,
                    binding.method.mangled(),
                    args.join(", ")
                )
            }
        };
        Ok(code)
    }
}

/// `$TYPE(..)` for a value type. Classes are passed by pointer.
pub fn type_code(ty: &ValueType) -> String {
    match ty {
        ValueType::Int | ValueType::Bool => "$TYPE(int)".to_string(),
        ValueType::Void => "$TYPE(void)".to_string(),
        ValueType::Class(name) => format!("$TYPE({name})*"),
    }
}

fn unresolved(class: &str, method: &str) -> LogicError {
    LogicError::UnresolvedSignature {
        class: class.to_string(),
        method: method.to_string(),
    }
}

fn var(name: &str) -> String {
    format!("$VAR({name})")
}

fn member(object: &str, name: &str) -> String {
    format!("$VAR({object})->$MEMBER({name})")
}

/// The object of `object.name`: a local, or a field reached through the
/// receiver.
fn object_code(object: &str, binding: &Annotation<VarBinding>) -> String {
    match binding.get() {
        Some(VarBinding::Member { .. }) => member(RECEIVER_NAME, object),
        _ => var(object),
    }
}

fn receiver_params(class: &str, params: &[Param]) -> String {
    std::iter::once(format!("$TYPE({class})* {}", var(RECEIVER_NAME)))
        .chain(
            params
                .iter()
                .map(|p| format!("{} {}", type_code(&p.ty), var(&p.name))),
        )
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================
