use crate::error::CoreError;
use crate::id::ContentHash;
use serde::{Deserialize, Serialize};

/// Either an SVO triple or a logical composition of statements.
///
/// Statements are expression trees; arity is operator-specific and enforced
/// structurally by [`Statement::validate`] rather than by the type system,
/// since `LogicalClause` must hold an arbitrary-width operand list for the
/// n-ary operators (`AND`/`OR`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statementType", rename_all = "camelCase")]
pub enum Statement {
    /// Subject-verb-object triple of entity/action content-hash references.
    Svo {
        /// Reference to the subject entity's content hash.
        subject_ref: ContentHash,
        /// Reference to the verb action's content hash.
        verb_ref: ContentHash,
        /// Reference to the object entity's content hash.
        object_ref: ContentHash,
    },
    /// A tagged operator over an ordered list of operand statements.
    LogicalClause {
        /// The operator.
        operator: Operator,
        /// Ordered operand statements.
        operands: Vec<Statement>,
        /// Bound variable name, meaningful for `EXISTS`/`FORALL`.
        #[serde(skip_serializing_if = "Option::is_none")]
        variable: Option<String>,
        /// Quantifier domain, meaningful for `EXISTS`/`FORALL`.
        #[serde(skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
    },
}

impl Statement {
    /// Structurally validates operator arity throughout the expression tree.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Statement::Svo { .. } => Ok(()),
            Statement::LogicalClause {
                operator, operands, ..
            } => {
                operator.check_arity(operands.len())?;
                for operand in operands {
                    operand.validate()?;
                }
                Ok(())
            }
        }
    }
}

/// Operators available to [`Statement::LogicalClause`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Logical AND, n-ary (>= 2 operands).
    And,
    /// Logical OR, n-ary (>= 2 operands).
    Or,
    /// Logical NOT, unary.
    Not,
    /// Material implication, binary.
    Implies,
    /// Biconditional, binary.
    Iff,
    /// Exclusive or, binary.
    Xor,
    /// Set subset relation, binary.
    Subset,
    /// Set union, n-ary (>= 2 operands).
    Union,
    /// Set intersection, n-ary (>= 2 operands).
    Intersection,
    /// Existential quantifier, unary (quantifies its single operand).
    Exists,
    /// Universal quantifier, unary.
    Forall,
    /// Greater-than comparison, binary.
    Gt,
    /// Less-than comparison, binary.
    Lt,
    /// Equality comparison, binary.
    Eq,
    /// Inequality comparison, binary.
    Neq,
    /// Greater-than-or-equal comparison, binary.
    Gte,
    /// Less-than-or-equal comparison, binary.
    Lte,
    /// Temporal precedence, binary.
    Before,
    /// Temporal succession, binary.
    After,
    /// Temporal containment, binary.
    During,
    /// Temporal overlap, binary.
    Overlaps,
}

/// The arity class an operator requires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    /// Exactly one operand.
    Unary,
    /// Exactly two operands.
    Binary,
    /// Two or more operands.
    NAry,
}

impl Operator {
    /// Which arity class this operator belongs to.
    pub fn arity(&self) -> Arity {
        use Operator::*;
        match self {
            Not | Exists | Forall => Arity::Unary,
            Implies | Iff | Xor | Subset | Gt | Lt | Eq | Neq | Gte | Lte | Before | After
            | During | Overlaps => Arity::Binary,
            And | Or | Union | Intersection => Arity::NAry,
        }
    }

    fn check_arity(&self, operand_count: usize) -> Result<(), CoreError> {
        let ok = match self.arity() {
            Arity::Unary => operand_count == 1,
            Arity::Binary => operand_count == 2,
            Arity::NAry => operand_count >= 2,
        };
        if ok {
            Ok(())
        } else {
            Err(CoreError::InvalidStatement {
                reason: format!(
                    "operator {self:?} requires {:?} arity, got {operand_count} operand(s)",
                    self.arity()
                ),
            })
        }
    }
}
