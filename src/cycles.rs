use num_integer::gcd;

use crate::error::{check_k, check_n, InvalidParameter};

/// 焦点ループ数 gcd(N, k−1) を計算する。
///
/// 完成した弦集合が分解する閉ループの個数で、(N, k) だけの関数。
/// どこまで描画したかには依存しない。
/// k = 1 のときは gcd(N, 0) = N（全節点が自己ループ）。
pub fn compute_cycle_count(n: u64, k: u64) -> Result<u64, InvalidParameter> {
    check_n(n)?;
    check_k(k)?;
    Ok(gcd(n, k - 1))
}

/// 写像 f(i) = (i·k) mod N の不動点（自己ループになる節点）を列挙する。
///
/// i·(k−1) ≡ 0 (mod N) の解は N/g 間隔でちょうど g = gcd(N, k−1) 個並ぶ。
/// 列の長さは常に `compute_cycle_count` と一致する。
pub fn fixed_points(n: u64, k: u64) -> Result<Vec<u64>, InvalidParameter> {
    check_n(n)?;
    check_k(k)?;
    let g = gcd(n, k - 1);
    let step = n / g;
    Ok((0..g).map(|j| j * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_count_examples() {
        assert_eq!(compute_cycle_count(60, 7).unwrap(), 6); // gcd(60, 6)
        assert_eq!(compute_cycle_count(37, 9).unwrap(), 1); // gcd(37, 8)
        assert_eq!(compute_cycle_count(2, 2).unwrap(), 1); // gcd(2, 1)
    }

    #[test]
    fn test_k1_degenerate() {
        // k=1: gcd(N, 0) = N
        for n in 2..=50 {
            assert_eq!(compute_cycle_count(n, 1).unwrap(), n);
        }
    }

    #[test]
    fn test_fixed_points_are_fixed() {
        for &(n, k) in &[(60u64, 7u64), (37, 9), (12, 5), (100, 21)] {
            let pts = fixed_points(n, k).unwrap();
            assert_eq!(pts.len() as u64, compute_cycle_count(n, k).unwrap());
            for &i in &pts {
                assert_eq!((i as u128 * k as u128 % n as u128) as u64, i);
            }
        }
    }

    #[test]
    fn test_fixed_points_spacing() {
        let pts = fixed_points(60, 7).unwrap();
        assert_eq!(pts, vec![0, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_reject_invalid() {
        assert!(compute_cycle_count(1, 7).is_err());
        assert!(compute_cycle_count(60, 0).is_err());
        assert!(fixed_points(0, 1).is_err());
    }
}
