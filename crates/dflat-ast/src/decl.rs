//! Class and method declarations.

use std::fmt;

use dflat_core::{CanonicalName, Span, ValueType};

use crate::annotation::Annotation;
use crate::stmt::{Block, Stmt};

/// A whole compilation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
}

impl Program {
    pub fn new(classes: Vec<ClassDecl>) -> Self {
        Self { classes }
    }
}

/// `class Name extends Parent { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub members: Vec<Member>,
    pub span: Span,
}

/// A class body item.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDef),
    Constructor(ConsDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub ty: ValueType,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: ValueType,
    pub name: String,
}

/// `ret name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub ret: ValueType,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
    /// Canonical name registered for this method.
    pub signature: Annotation<CanonicalName>,
}

/// `cons(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ConsDef {
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
    pub signature: Annotation<CanonicalName>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            members: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn field(mut self, ty: ValueType, name: impl Into<String>) -> Self {
        self.members.push(Member::Field(FieldDecl {
            ty,
            name: name.into(),
            span: Span::default(),
        }));
        self
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.members.push(Member::Method(method));
        self
    }

    pub fn constructor(mut self, cons: ConsDef) -> Self {
        self.members.push(Member::Constructor(cons));
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }
}

impl Param {
    pub fn new(ty: ValueType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

impl MethodDef {
    pub fn new(
        ret: ValueType,
        name: impl Into<String>,
        params: Vec<Param>,
        body: Vec<Stmt>,
    ) -> Self {
        Self {
            ret,
            name: name.into(),
            params,
            body: Block::new(body),
            span: Span::default(),
            signature: Annotation::empty(),
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn param_types(&self) -> Vec<ValueType> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}

impl ConsDef {
    pub fn new(params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            params,
            body: Block::new(body),
            span: Span::default(),
            signature: Annotation::empty(),
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn param_types(&self) -> Vec<ValueType> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{} {}", param.ty, param.name)?;
    }
    Ok(())
}

impl fmt::Display for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        write_params(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for ConsDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cons(")?;
        write_params(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name)?;
        if let Some(parent) = &self.parent {
            write!(f, " extends {parent}")?;
        }
        f.write_str(" {")?;
        for member in &self.members {
            match member {
                Member::Field(field) => write!(f, " {} {};", field.ty, field.name)?,
                Member::Method(method) => write!(f, " {method}")?,
                Member::Constructor(cons) => write!(f, " {cons}")?,
            }
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{class}")?;
        }
        Ok(())
    }
}
