use bigdecimal::{BigDecimal, ParseBigDecimalError, Zero};
use serde_json::Number;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 除算結果の小数部の桁数
pub const DIVISION_PRECISION: i64 = 16;

/// 入力文字列の最大長（DoS攻撃防止）
pub const MAX_INPUT_LEN: usize = 1000;

/// 扱える値の上限: 有効桁数と、正規化後のスケールの絶対値
pub const MAX_DIGITS: usize = 2000;
pub const MAX_SCALE: i64 = 1000;

#[derive(Debug, Error)]
pub enum DecimalError {
    #[error("input is too long")]
    TooLong,
    #[error("value is out of range")]
    OutOfRange,
    #[error(transparent)]
    Parse(#[from] ParseBigDecimalError),
}

/// 任意精度の10進数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// JSONの数値から変換する。文字列を経由した再解析は行わない
    pub fn from_number(number: &Number) -> Option<Self> {
        if let Some(i) = number.as_i64() {
            return Some(Self(BigDecimal::from(i)));
        }
        if let Some(u) = number.as_u64() {
            return Some(Self(BigDecimal::from(u)));
        }
        // 浮動小数点はクライアントが送った最短表現の桁をそのまま使う（2進展開しない）
        number
            .as_f64()
            .filter(|f| f.is_finite())
            .and_then(|_| BigDecimal::from_str(&number.to_string()).ok())
            .map(Self)
    }

    /// 文字列を解析する。桁やスケールが上限を超える値は拒否する
    pub fn parse(raw: &str) -> Result<Self, DecimalError> {
        let raw = raw.trim();
        if raw.len() > MAX_INPUT_LEN {
            return Err(DecimalError::TooLong);
        }

        // 指数部は BigDecimal に渡す前に確認する（巨大な指数で桁展開やオーバーフローが起きる）
        if let Some((_, exponent)) = raw.split_once(['e', 'E']) {
            match exponent.parse::<i64>() {
                Ok(e) if e.unsigned_abs() <= (MAX_SCALE as u64) + (MAX_INPUT_LEN as u64) => {}
                _ => return Err(DecimalError::OutOfRange),
            }
        }

        let value = Self(BigDecimal::from_str(raw)?);
        if !value.in_range() {
            return Err(DecimalError::OutOfRange);
        }
        Ok(value)
    }

    /// 正規化後の有効桁数とスケールが上限内か
    pub fn in_range(&self) -> bool {
        let (digits, scale) = self.0.normalized().as_bigint_and_exponent();
        let digit_count = digits.to_string().trim_start_matches('-').len();
        digit_count <= MAX_DIGITS && scale.abs() <= MAX_SCALE
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    /// 呼び出し側でゼロ除算を弾いておくこと
    pub fn div(&self, other: &Self) -> Self {
        Self((&self.0 / &other.0).round(DIVISION_PRECISION))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl fmt::Display for Decimal {
    // 末尾の0を落とし、指数表記は使わない（"10.0" -> "10"）
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.normalized().to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(value: serde_json::Value) -> Number {
        match value {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        }
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(Decimal::parse("2.5").unwrap().to_string(), "2.5");
        assert_eq!(Decimal::parse("10.0").unwrap().to_string(), "10");
        assert_eq!(Decimal::parse("1.50").unwrap().to_string(), "1.5");
        assert_eq!(Decimal::parse("-0.0").unwrap().to_string(), "0");
        assert_eq!(Decimal::parse("1200").unwrap().to_string(), "1200");
        assert_eq!(Decimal::parse(" 4 ").unwrap().to_string(), "4");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["abc", "", "1.2.3", "12abc", "--1"] {
            assert!(Decimal::parse(raw).is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn test_parse_rejects_huge_exponents() {
        for raw in [
            "1e9223372036854775807",
            "1e2000000000",
            "1e-2000000000",
            "1e99999999999999999999",
            "1e-9223372036854775808",
            "1e2001",
            "1e-1001",
        ] {
            assert!(
                matches!(Decimal::parse(raw), Err(DecimalError::OutOfRange)),
                "{raw} should be out of range"
            );
        }
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(Decimal::parse("1e1000").unwrap().to_string().len(), 1001);
        assert!(Decimal::parse("1e-1000").is_ok());
        assert!(Decimal::parse("1.5E+3").is_ok());

        let long = "1".repeat(MAX_INPUT_LEN + 1);
        assert!(matches!(Decimal::parse(&long), Err(DecimalError::TooLong)));
        assert!(Decimal::parse(&"9".repeat(MAX_INPUT_LEN)).is_ok());
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Decimal::from_number(&number(json!(2))).unwrap().to_string(), "2");
        assert_eq!(Decimal::from_number(&number(json!(-7))).unwrap().to_string(), "-7");
        assert_eq!(Decimal::from_number(&number(json!(u64::MAX))).unwrap().to_string(), u64::MAX.to_string());
        // 0.1 は 2進展開の誤差を含まない
        assert_eq!(Decimal::from_number(&number(json!(0.1))).unwrap().to_string(), "0.1");
        assert_eq!(Decimal::from_number(&number(json!(2.5))).unwrap().to_string(), "2.5");
        assert_eq!(Decimal::from_number(&number(json!(3.0))).unwrap().to_string(), "3");
    }

    #[test]
    fn test_division_precision() {
        let one = Decimal::from(1);
        let three = Decimal::from(3);
        assert_eq!(one.div(&three).to_string(), "0.3333333333333333");
        assert_eq!(Decimal::from(2).div(&three).to_string(), "0.6666666666666667");
        assert_eq!(Decimal::from(10).div(&Decimal::from(4)).to_string(), "2.5");
    }
}
