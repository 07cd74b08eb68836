use crate::error::{check_k, check_n, InvalidParameter};

/// 有向弦 (start, end)、end = (start × k) mod N。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub start: u64,
    pub end: u64,
}

/// 弦の終点 (i × k) mod N を計算する。
///
/// 乗算は u128 経由で行うため u64 全域でオーバーフローしない。
/// 純粋・O(1)。i ≥ N は `InvalidParameter`。
pub fn compute_chord(i: u64, n: u64, k: u64) -> Result<u64, InvalidParameter> {
    check_n(n)?;
    check_k(k)?;
    if i >= n {
        return Err(InvalidParameter::new("i", i, "i < N"));
    }
    Ok(chord_end(i, n, k))
}

/// 検証済み入力用の内部版。
#[inline]
fn chord_end(i: u64, n: u64, k: u64) -> u64 {
    (i as u128 * k as u128 % n as u128) as u64
}

/// 弦列の遅延イテレータ。
///
/// 各要素は自分の添字だけの純粋関数なので、状態を持たず何度でも
/// 同じ列を生成し直せる。任意のプレフィックスは再計算なしで
/// `take(m)` で得られる（フレーム描画の基盤）。
#[derive(Debug, Clone)]
pub struct ChordIter {
    n: u64,
    k: u64,
    front: u64,
    back: u64, // 排他的上端
}

impl Iterator for ChordIter {
    type Item = Chord;

    fn next(&mut self) -> Option<Chord> {
        if self.front >= self.back {
            return None;
        }
        let i = self.front;
        self.front += 1;
        Some(Chord {
            start: i,
            end: chord_end(i, self.n, self.k),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = (self.back - self.front) as usize;
        (rem, Some(rem))
    }
}

impl DoubleEndedIterator for ChordIter {
    fn next_back(&mut self) -> Option<Chord> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(Chord {
            start: self.back,
            end: chord_end(self.back, self.n, self.k),
        })
    }
}

impl ExactSizeIterator for ChordIter {}

/// i = 0..N の全弦を添字昇順で生成する遅延列を返す。
pub fn generate_all_chords(n: u64, k: u64) -> Result<ChordIter, InvalidParameter> {
    check_n(n)?;
    check_k(k)?;
    Ok(ChordIter { n, k, front: 0, back: n })
}

/// フレーム m における提示層向けの弦分割。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    /// 描画済みの弦 0..m
    pub completed: Vec<Chord>,
    /// アクティブ弦（m < N のとき start = m の弦）
    pub active: Option<Chord>,
}

/// プレフィックス長 m (0 ≤ m ≤ N) でフレーム分割を返す。
///
/// アクティブ弦の始点は規約として start = m そのもの。m は検証済みで
/// あること（% N による黙った縮約はしない）。m > N は `InvalidParameter`。
pub fn frame_view(n: u64, k: u64, m: u64) -> Result<FrameView, InvalidParameter> {
    check_n(n)?;
    check_k(k)?;
    if m > n {
        return Err(InvalidParameter::new("m", m, "m <= N"));
    }
    let completed: Vec<Chord> = generate_all_chords(n, k)?.take(m as usize).collect();
    let active = if m < n {
        Some(Chord {
            start: m,
            end: chord_end(m, n, k),
        })
    } else {
        None
    };
    Ok(FrameView { completed, active })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_end_basic() {
        assert_eq!(compute_chord(1, 60, 7).unwrap(), 7);
        assert_eq!(compute_chord(10, 60, 7).unwrap(), 10);
        assert_eq!(compute_chord(0, 60, 7).unwrap(), 0);
    }

    #[test]
    fn test_reject_out_of_range_index() {
        assert!(compute_chord(60, 60, 7).is_err());
        assert!(compute_chord(0, 1, 7).is_err());
        assert!(compute_chord(0, 60, 0).is_err());
    }

    #[test]
    fn test_no_overflow_near_u64_max() {
        // (N-1)·k が u64 を超える組でも u128 経由で正しく還元される
        let n = u64::MAX;
        let k = u64::MAX - 1;
        let end = compute_chord(n - 1, n, k).unwrap();
        assert!(end < n);
    }

    #[test]
    fn test_iter_len_and_order() {
        let chords: Vec<Chord> = generate_all_chords(5, 3).unwrap().collect();
        assert_eq!(chords.len(), 5);
        for (i, c) in chords.iter().enumerate() {
            assert_eq!(c.start, i as u64);
            assert_eq!(c.end, (i as u64 * 3) % 5);
        }
    }

    #[test]
    fn test_iter_double_ended() {
        let mut it = generate_all_chords(4, 2).unwrap();
        assert_eq!(it.next_back().unwrap().start, 3);
        assert_eq!(it.next().unwrap().start, 0);
        assert_eq!(it.len(), 2);
    }

    #[test]
    fn test_frame_view_split() {
        let fv = frame_view(6, 5, 2).unwrap();
        assert_eq!(fv.completed.len(), 2);
        assert_eq!(fv.active, Some(Chord { start: 2, end: 4 }));

        // m = N: 全弦描画済み、アクティブなし
        let fv = frame_view(6, 5, 6).unwrap();
        assert_eq!(fv.completed.len(), 6);
        assert_eq!(fv.active, None);

        assert!(frame_view(6, 5, 7).is_err());
    }
}
