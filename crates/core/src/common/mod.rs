pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 证券代码的最大长度
const MAX_SYMBOL_LEN: usize = 15;

/// # Summary
/// 证券代码值对象，代表看板查询的特定股票。
///
/// # Invariants
/// - 内部字符串始终为大写，且非空。
/// - 仅包含字母、数字及 `.` `-` `^` `=` 符号 (例如: AAPL, BRK.B, ^GSPC)。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        if normalized.is_empty() {
            return Err("Symbol is required".to_string());
        }
        if normalized.len() > MAX_SYMBOL_LEN {
            return Err(format!("Symbol too long: {}", s.trim()));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(format!("Invalid character '{}' in symbol: {}", bad, s.trim()));
        }
        Ok(Symbol(normalized))
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_trimmed_and_uppercased() {
        let symbol: Symbol = "  aapl ".parse().unwrap();
        assert_eq!(symbol.as_str(), "AAPL");
        assert_eq!(symbol.to_string(), "AAPL");
    }

    #[test]
    fn test_symbol_accepts_class_and_index_notation() {
        assert_eq!("brk.b".parse::<Symbol>().unwrap().as_str(), "BRK.B");
        assert_eq!("^gspc".parse::<Symbol>().unwrap().as_str(), "^GSPC");
    }

    #[test]
    fn test_symbol_rejects_bad_input() {
        assert!("".parse::<Symbol>().is_err());
        assert!("   ".parse::<Symbol>().is_err());
        assert!("AA PL".parse::<Symbol>().is_err());
        assert!("../etc".parse::<Symbol>().is_err());
        assert!("ABCDEFGHIJKLMNOP".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_serde_validates() {
        let symbol: Symbol = serde_json::from_str("\"msft\"").unwrap();
        assert_eq!(symbol.as_str(), "MSFT");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"MSFT\"");
        assert!(serde_json::from_str::<Symbol>("\"a b\"").is_err());
    }
}
