//! Condition operators
//!
//! An operator is a base comparison function plus two optional qualifiers:
//! a set quantifier for multivalued keys and the `IfExists` suffix. The
//! rendered form is `[ForAllValues:|ForAnyValue:]<Base>[IfExists]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base comparison functions of the condition grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseOperator {
    StringEquals,
    StringNotEquals,
    StringEqualsIgnoreCase,
    StringNotEqualsIgnoreCase,
    StringLike,
    StringNotLike,
    NumericEquals,
    NumericNotEquals,
    NumericLessThan,
    NumericLessThanEquals,
    NumericGreaterThan,
    NumericGreaterThanEquals,
    DateEquals,
    DateNotEquals,
    DateLessThan,
    DateLessThanEquals,
    DateGreaterThan,
    DateGreaterThanEquals,
    Bool,
    BinaryEquals,
    IpAddress,
    NotIpAddress,
    ArnEquals,
    ArnNotEquals,
    ArnLike,
    ArnNotLike,
    Null,
}

impl BaseOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StringEquals => "StringEquals",
            Self::StringNotEquals => "StringNotEquals",
            Self::StringEqualsIgnoreCase => "StringEqualsIgnoreCase",
            Self::StringNotEqualsIgnoreCase => "StringNotEqualsIgnoreCase",
            Self::StringLike => "StringLike",
            Self::StringNotLike => "StringNotLike",
            Self::NumericEquals => "NumericEquals",
            Self::NumericNotEquals => "NumericNotEquals",
            Self::NumericLessThan => "NumericLessThan",
            Self::NumericLessThanEquals => "NumericLessThanEquals",
            Self::NumericGreaterThan => "NumericGreaterThan",
            Self::NumericGreaterThanEquals => "NumericGreaterThanEquals",
            Self::DateEquals => "DateEquals",
            Self::DateNotEquals => "DateNotEquals",
            Self::DateLessThan => "DateLessThan",
            Self::DateLessThanEquals => "DateLessThanEquals",
            Self::DateGreaterThan => "DateGreaterThan",
            Self::DateGreaterThanEquals => "DateGreaterThanEquals",
            Self::Bool => "Bool",
            Self::BinaryEquals => "BinaryEquals",
            Self::IpAddress => "IpAddress",
            Self::NotIpAddress => "NotIpAddress",
            Self::ArnEquals => "ArnEquals",
            Self::ArnNotEquals => "ArnNotEquals",
            Self::ArnLike => "ArnLike",
            Self::ArnNotLike => "ArnNotLike",
            Self::Null => "Null",
        }
    }
}

impl fmt::Display for BaseOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set quantifier for multivalued condition keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetQualifier {
    ForAllValues,
    ForAnyValue,
}

impl SetQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForAllValues => "ForAllValues",
            Self::ForAnyValue => "ForAnyValue",
        }
    }
}

/// A complete condition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    pub base: BaseOperator,
    pub set_qualifier: Option<SetQualifier>,
    pub if_exists: bool,
}

impl Operator {
    #[must_use]
    pub fn new(base: BaseOperator) -> Self {
        Self {
            base,
            set_qualifier: None,
            if_exists: false,
        }
    }

    #[must_use]
    pub fn for_all_values(mut self) -> Self {
        self.set_qualifier = Some(SetQualifier::ForAllValues);
        self
    }

    #[must_use]
    pub fn for_any_value(mut self) -> Self {
        self.set_qualifier = Some(SetQualifier::ForAnyValue);
        self
    }

    #[must_use]
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

impl From<BaseOperator> for Operator {
    fn from(base: BaseOperator) -> Self {
        Self::new(base)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = self.set_qualifier {
            write!(f, "{}:", qualifier.as_str())?;
        }
        f.write_str(self.base.as_str())?;
        if self.if_exists {
            f.write_str("IfExists")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operator::new(BaseOperator::StringLike), "StringLike")]
    #[case(Operator::new(BaseOperator::StringEquals).if_exists(), "StringEqualsIfExists")]
    #[case(
        Operator::new(BaseOperator::StringEquals).for_any_value(),
        "ForAnyValue:StringEquals"
    )]
    #[case(
        Operator::new(BaseOperator::ArnLike).for_all_values().if_exists(),
        "ForAllValues:ArnLikeIfExists"
    )]
    #[case(BaseOperator::Null.into(), "Null")]
    fn test_operator_rendering(#[case] operator: Operator, #[case] expected: &str) {
        assert_eq!(operator.to_string(), expected);
    }

    #[test]
    fn test_last_set_qualifier_wins() {
        let operator = Operator::new(BaseOperator::StringLike)
            .for_all_values()
            .for_any_value();
        assert_eq!(operator.set_qualifier, Some(SetQualifier::ForAnyValue));
    }
}
