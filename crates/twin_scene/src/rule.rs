//! Rules and rule statements
//!
//! A rule is an ordered list of statements. Each statement pairs an
//! expression string with a [`Target`] that the viewer maps to an icon or a
//! color when the expression evaluates to true.

/// Visual target of a rule statement or tag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Target {
    Info,
    Warning,
    Error,
    Video,
    Red,
    Green,
    Yellow,
    #[default]
    Empty,
}

/// A single expression/target pair inside a rule
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    expression: String,
    target: Target,
}

impl Statement {
    pub fn new(expression: impl Into<String>, target: Target) -> Self {
        Self {
            expression: expression.into(),
            target,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn target(&self) -> Target {
        self.target
    }
}

/// Ordered list of statements evaluated by the viewer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rule {
    statements: Vec<Statement>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn add_statements(&mut self, statements: impl IntoIterator<Item = Statement>) {
        for statement in statements {
            self.add_statement(statement);
        }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}
