/// Payment routing details parsed from the newline-delimited `wiring_instructions` setting.
///
/// Line 0 is the account number, line 1 the SWIFT/routing code, line 2 the bank name.
/// Missing lines are left empty; extra lines are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiringInstructions {
    pub account_number: String,
    pub swift_code: String,
    pub bank_name: String,
}

impl WiringInstructions {
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines().map(|line| line.trim().to_string());

        Self {
            account_number: lines.next().unwrap_or_default(),
            swift_code: lines.next().unwrap_or_default(),
            bank_name: lines.next().unwrap_or_default(),
        }
    }
}
