//! AT command values and commands, in the shape a Hayes-compatible modem reads them.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, is_enum_variant)]
pub enum AtValue {
    /// A string-type value - text surrounded by "quotation marks".
    String(String),
    /// An integer.
    Integer(u32),
    /// A comma-separated list of values.
    Array(Vec<AtValue>)
}
impl fmt::Display for AtValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::AtValue::*;
        match *self {
            String(ref st) => write!(f, "\"{}\"", st)?,
            Integer(i) => write!(f, "{}", i)?,
            Array(ref val) => {
                for (i, val) in val.iter().enumerate() {
                    let c = if i == 0 { "" } else { "," };
                    write!(f, "{}{}", c, val)?;
                }
            }
        }
        Ok(())
    }
}
#[derive(Debug, Clone, PartialEq, Eq, is_enum_variant)]
pub enum AtCommand {
    /// Either execute a non-basic command named `param` with `value` as
    /// argument, or set the current value of `param` to `value`.
    ///
    /// Corresponds to `AT<param>=<value>`.
    Equals {
        param: String,
        value: AtValue,
    },
    /// Just send some raw text (e.g. PDU data after an `AT+CMGS` prompt).
    Text {
        text: String
    }
}
impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::AtCommand::*;
        match *self {
            Equals { ref param, ref value } => write!(f, "AT{}={}", param, value)?,
            Text { ref text } => write!(f, "{}", text)?
        }
        Ok(())
    }
}
