use crate::decimal::Decimal;
use crate::error::CalcError;
use crate::operation::Operation;

/// `op` を `x` と `y` に適用する。
///
/// 失敗するのはゼロ除算と、結果が扱える範囲（[`Decimal::in_range`]）を超えた場合のみ。
pub fn evaluate(op: Operation, x: &Decimal, y: &Decimal) -> Result<Decimal, CalcError> {
    let result = match op {
        Operation::Add => x.add(y),
        Operation::Subtract => x.sub(y),
        Operation::Multiply => x.mul(y),
        Operation::Divide => {
            if y.is_zero() {
                return Err(CalcError::DivisionByZero);
            }
            x.div(y)
        }
    };

    if !result.in_range() {
        return Err(CalcError::OutOfRange);
    }
    Ok(result)
}
