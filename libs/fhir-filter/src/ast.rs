//! Abstract Syntax Tree (AST) representation
//!
//! The AST mirrors the filter grammar directly: one type per rule, built
//! once by the parser and never mutated afterwards.
//!
//! # Grammar Coverage
//!
//! - Expression: `baseExpression | logicalExpression`
//! - LogicalExpression: `baseExpression (('and' | 'or') baseExpression)+`
//! - BaseExpression: `notExpression | baseFilter`
//! - NotExpression: `'not' groupExpression`
//! - BaseFilter: `paramExp | groupExpression`
//! - GroupExpression: `'(' expression ')'`
//! - ParamExp: `paramValue COMPARE_OP compValue`
//! - CompValue: `NUMBER_OR_DATE | STRING | token`
//! - ParamValue: `hasSpecifier | paramPath`
//! - HasSpecifier: `'_has:' resource ':' index ':' index`
//! - ParamPath: `PARAM_NAME ('[' expression ']')? ('.' paramValue)?`
//!
//! `and` and `or` share one precedence level: `a and b or c` is a single
//! flat chain, not `(a and b) or c` nested as a tree.
//!
//! `Display` renders the canonical text of a node. The text of a
//! [`ParamValue`] is the key extraction groups constraints by.

use std::fmt;

/// Expression: baseExpression | logicalExpression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Base(BaseExpression),
    Logical(LogicalExpression),
}

/// Logical connective: 'and' | 'or'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And, // and
    Or,  // or
}

/// Logical expression: baseExpression (('and' | 'or') baseExpression)+
///
/// `rest` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalExpression {
    pub head: BaseExpression,
    pub rest: Vec<(Connective, BaseExpression)>,
}

/// Base expression: notExpression | baseFilter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseExpression {
    Not(NotExpression),
    Filter(BaseFilter),
}

/// Not expression: 'not' groupExpression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotExpression {
    pub group: GroupExpression,
}

/// Base filter: paramExp | groupExpression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseFilter {
    Param(ParamExp),
    Group(GroupExpression),
}

/// Group expression: '(' expression ')'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExpression {
    pub expression: Box<Expression>,
}

/// Param expression: paramValue COMPARE_OP compValue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExp {
    pub left: ParamValue,
    pub operator: CompareOp,
    pub right: CompValue,
}

/// Compare operator as written in the source (`eq`, `gt`, `sw`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompareOp(String);

impl CompareOp {
    pub fn new(op: impl Into<String>) -> Self {
        Self(op.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_eq(&self) -> bool {
        self.0 == "eq"
    }
}

/// Comparison value: NUMBER_OR_DATE | STRING | token
///
/// Each variant holds the raw token text; strings keep their quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompValue {
    NumberOrDate(String),
    StringLiteral(String),
    Token(String),
}

impl CompValue {
    /// Raw source text of the value
    pub fn raw(&self) -> &str {
        match self {
            CompValue::NumberOrDate(s) | CompValue::StringLiteral(s) | CompValue::Token(s) => s,
        }
    }
}

/// Param value: hasSpecifier | paramPath
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Has(HasSpecifier),
    Path(ParamPath),
}

/// Has specifier: '_has:' resource ':' index ':' index
///
/// Reverse reference into `resource`, e.g. `_has:Observation:patient:code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasSpecifier {
    pub resource: String,
    pub index_a: String,
    pub index_b: String,
}

/// Param path: PARAM_NAME ('[' expression ']')? ('.' paramValue)?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPath {
    pub name: String,
    /// Predicate scoping the element, `name[...]`
    pub index_expr: Option<Box<Expression>>,
    /// Path continuation after `.`
    pub child: Option<Box<ParamValue>>,
}

impl ParamPath {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_expr: None,
            child: None,
        }
    }
}

// Unlink the segment chain one box at a time; a path may be arbitrarily long
impl Drop for ParamPath {
    fn drop(&mut self) {
        let mut next = self.child.take();
        while let Some(mut value) = next {
            next = match &mut *value {
                ParamValue::Path(path) => path.child.take(),
                ParamValue::Has(_) => None,
            };
        }
    }
}

// ============================================
// Traversal
// ============================================

impl Expression {
    /// All comparisons in the tree, in pre-order
    ///
    /// Logical structure is ignored. A comparison comes before the
    /// comparisons nested in the bracket predicates of its own path.
    pub fn param_exps(&self) -> Vec<&ParamExp> {
        let mut out = Vec::new();
        collect_expression(self, &mut out);
        out
    }
}

fn collect_expression<'a>(expr: &'a Expression, out: &mut Vec<&'a ParamExp>) {
    match expr {
        Expression::Base(base) => collect_base(base, out),
        Expression::Logical(logical) => {
            collect_base(&logical.head, out);
            for (_, base) in &logical.rest {
                collect_base(base, out);
            }
        }
    }
}

fn collect_base<'a>(base: &'a BaseExpression, out: &mut Vec<&'a ParamExp>) {
    match base {
        BaseExpression::Not(not) => collect_expression(&not.group.expression, out),
        BaseExpression::Filter(BaseFilter::Group(group)) => {
            collect_expression(&group.expression, out)
        }
        BaseExpression::Filter(BaseFilter::Param(param)) => {
            out.push(param);
            collect_param_value(&param.left, out);
        }
    }
}

fn collect_param_value<'a>(value: &'a ParamValue, out: &mut Vec<&'a ParamExp>) {
    let mut next = Some(value);
    while let Some(ParamValue::Path(path)) = next {
        if let Some(index) = &path.index_expr {
            collect_expression(index, out);
        }
        next = path.child.as_deref();
    }
}

// ============================================
// Rendering
// ============================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Base(base) => base.fmt(f),
            Expression::Logical(logical) => logical.fmt(f),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => f.write_str("and"),
            Connective::Or => f.write_str("or"),
        }
    }
}

impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.head.fmt(f)?;
        for (connective, base) in &self.rest {
            write!(f, " {} {}", connective, base)?;
        }
        Ok(())
    }
}

impl fmt::Display for BaseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseExpression::Not(not) => write!(f, "not {}", not.group),
            BaseExpression::Filter(BaseFilter::Param(param)) => param.fmt(f),
            BaseExpression::Filter(BaseFilter::Group(group)) => group.fmt(f),
        }
    }
}

impl fmt::Display for GroupExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.expression)
    }
}

impl fmt::Display for ParamExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CompValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Has(has) => has.fmt(f),
            ParamValue::Path(path) => path.fmt(f),
        }
    }
}

impl fmt::Display for HasSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_has:{}:{}:{}", self.resource, self.index_a, self.index_b)
    }
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segment = self;
        loop {
            f.write_str(&segment.name)?;
            if let Some(index) = &segment.index_expr {
                write!(f, "[{}]", index)?;
            }
            match segment.child.as_deref() {
                Some(ParamValue::Path(next)) => {
                    f.write_str(".")?;
                    segment = next;
                }
                Some(ParamValue::Has(has)) => return write!(f, ".{}", has),
                None => return Ok(()),
            }
        }
    }
}
