use std::str::FromStr;

use crate::error::TriggerError;

/// Region and account of the function being invoked, taken from an ARN such as
/// `arn:aws:lambda:us-east-1:123456789012:function:myFn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArn {
    pub region: String,
    pub account_id: String,
}

impl InvocationArn {
    /// ARN of `table_name` in the same region and account as the invoked function.
    pub fn table_arn(&self, table_name: &str) -> String {
        format!(
            "arn:aws:dynamodb:{}:{}:table/{}",
            self.region, self.account_id, table_name
        )
    }
}

impl FromStr for InvocationArn {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TriggerError::MalformedIdentifier(s.to_string());

        // Region and account are the 4th and 5th segments; anything after is the resource.
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        let [prefix, _partition, _service, region, account_id, ..] = parts[..] else {
            return Err(malformed());
        };

        if prefix != "arn" || region.is_empty() || account_id.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            region: region.to_string(),
            account_id: account_id.to_string(),
        })
    }
}
