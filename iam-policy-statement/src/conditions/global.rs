//! Default operators for the global `aws:*` condition keys.

use super::operator::{BaseOperator, Operator};

/// Global keys whose default operator differs from `StringLike`; the flag
/// adds the `ForAnyValue` qualifier.
const GLOBAL_KEY_OPERATORS: &[(&str, BaseOperator, bool)] = &[
    ("aws:CalledVia", BaseOperator::StringEquals, true),
    ("aws:CurrentTime", BaseOperator::DateLessThanEquals, false),
    ("aws:EpochTime", BaseOperator::DateLessThanEquals, false),
    ("aws:MultiFactorAuthAge", BaseOperator::NumericLessThan, false),
    ("aws:MultiFactorAuthPresent", BaseOperator::Bool, false),
    ("aws:PrincipalArn", BaseOperator::ArnLike, false),
    ("aws:SecureTransport", BaseOperator::Bool, false),
    ("aws:SourceArn", BaseOperator::ArnLike, false),
    ("aws:SourceIp", BaseOperator::IpAddress, false),
    ("aws:TokenIssueTime", BaseOperator::DateGreaterThanEquals, false),
    ("aws:ViaAWSService", BaseOperator::Bool, false),
    ("aws:VpcSourceIp", BaseOperator::IpAddress, false),
];

/// Look up the default operator of a global condition key, case-insensitively
pub fn default_operator(key: &str) -> Option<Operator> {
    GLOBAL_KEY_OPERATORS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(key))
        .map(|&(_, base, for_any_value)| {
            let operator = Operator::new(base);
            if for_any_value {
                operator.for_any_value()
            } else {
                operator
            }
        })
}
