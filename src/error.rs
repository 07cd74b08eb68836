use std::fmt;

/// エンジンが返す唯一のエラー種。
///
/// N < 2、k < 1、あるいは添字 i・プレフィックス長 m が範囲外のときに返す。
/// エンジン側は黙って丸めず必ず拒否する。スライダー等の入力値を有効域に
/// 収めるのは呼び出し側（CLI / GUI）の責任。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidParameter {
    /// パラメータ名 ("N", "k", "i", "m")
    pub name: &'static str,
    /// 渡された値
    pub value: u64,
    /// 満たすべき制約（表示用）
    pub constraint: &'static str,
}

impl InvalidParameter {
    pub(crate) fn new(name: &'static str, value: u64, constraint: &'static str) -> Self {
        InvalidParameter { name, value, constraint }
    }
}

impl fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid parameter {} = {} (required: {})",
            self.name, self.value, self.constraint
        )
    }
}

impl std::error::Error for InvalidParameter {}

/// N ≥ 2 の検査。
pub(crate) fn check_n(n: u64) -> Result<(), InvalidParameter> {
    if n < 2 {
        return Err(InvalidParameter::new("N", n, "N >= 2"));
    }
    Ok(())
}

/// k ≥ 1 の検査。
pub(crate) fn check_k(k: u64) -> Result<(), InvalidParameter> {
    if k < 1 {
        return Err(InvalidParameter::new("k", k, "k >= 1"));
    }
    Ok(())
}
