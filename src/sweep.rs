use num_integer::gcd;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::InvalidParameter;

/// ヒストグラムの上限（これ以上のループ数は最終ビンに合算）
pub const HIST_BINS: usize = 256;

/// パラメータ格子掃引の集計。
#[derive(Debug, Clone)]
pub struct SweepStats {
    /// 走査したセル (N, k) の総数
    pub cells: u64,
    /// ループ数 1（弦集合が単一の閉ループ）のセル数
    pub single_loop_cells: u64,
    /// 最大ループ数
    pub max_cycles: u64,
    /// 最大ループ数を与えたセル (N, k)
    pub max_cycles_cell: (u64, u64),
    /// ループ数のヒストグラム (index = ループ数, 末尾ビンは合算)
    pub cycle_hist: Vec<u64>,
}

impl SweepStats {
    pub fn new() -> Self {
        SweepStats {
            cells: 0,
            single_loop_cells: 0,
            max_cycles: 0,
            max_cycles_cell: (0, 0),
            cycle_hist: vec![0u64; HIST_BINS],
        }
    }

    /// 1セルの結果を集計する。
    #[inline]
    pub fn accumulate(&mut self, n: u64, k: u64, cycles: u64) {
        self.cells += 1;
        if cycles == 1 {
            self.single_loop_cells += 1;
        }
        let idx = (cycles as usize).min(HIST_BINS - 1);
        self.cycle_hist[idx] += 1;
        // 同値の場合は辞書順で小さいセルを採る（並列と逐次で結果を揃える）
        if cycles > self.max_cycles
            || (cycles == self.max_cycles && self.max_cycles > 0 && (n, k) < self.max_cycles_cell)
        {
            self.max_cycles = cycles;
            self.max_cycles_cell = (n, k);
        }
    }

    /// 並列処理用: 他の SweepStats をマージ。
    pub fn merge(&mut self, other: &SweepStats) {
        self.cells += other.cells;
        self.single_loop_cells += other.single_loop_cells;
        for i in 0..HIST_BINS {
            self.cycle_hist[i] += other.cycle_hist[i];
        }
        if other.max_cycles > self.max_cycles
            || (other.max_cycles == self.max_cycles
                && other.max_cycles > 0
                && other.max_cycles_cell < self.max_cycles_cell)
        {
            self.max_cycles = other.max_cycles;
            self.max_cycles_cell = other.max_cycles_cell;
        }
    }
}

impl Default for SweepStats {
    fn default() -> Self {
        Self::new()
    }
}

fn check_bounds(n_lo: u64, n_hi: u64, k_lo: u64, k_hi: u64) -> Result<(), InvalidParameter> {
    if n_lo < 2 {
        return Err(InvalidParameter::new("N", n_lo, "N >= 2"));
    }
    if k_lo < 1 {
        return Err(InvalidParameter::new("k", k_lo, "k >= 1"));
    }
    if n_hi < n_lo {
        return Err(InvalidParameter::new("N", n_hi, "N_hi >= N_lo"));
    }
    if k_hi < k_lo {
        return Err(InvalidParameter::new("k", k_hi, "k_hi >= k_lo"));
    }
    Ok(())
}

/// [n_lo, n_hi] × [k_lo, k_hi] の全セルでループ数を集計する（シングルスレッド版）。
/// progress_callback: (完了セル数, 総セル数) を定期的に呼ぶ。
pub fn sweep_grid(
    n_lo: u64,
    n_hi: u64,
    k_lo: u64,
    k_hi: u64,
    progress_callback: impl Fn(u64, u64),
) -> Result<SweepStats, InvalidParameter> {
    check_bounds(n_lo, n_hi, k_lo, k_hi)?;

    let k_count = k_hi - k_lo + 1;
    let total = (n_hi - n_lo + 1) * k_count;
    let mut stats = SweepStats::new();
    let mut done = 0u64;

    for n in n_lo..=n_hi {
        for k in k_lo..=k_hi {
            stats.accumulate(n, k, gcd(n, k - 1));
        }
        done += k_count;
        progress_callback(done, total);
    }

    Ok(stats)
}

/// 並列版。Rayon で N の行ごとに分割して処理する。
/// progress_callback: (完了セル数, 総セル数) を定期的に呼ぶ（スレッドセーフ）。
pub fn sweep_grid_parallel(
    n_lo: u64,
    n_hi: u64,
    k_lo: u64,
    k_hi: u64,
    progress_callback: impl Fn(u64, u64) + Sync,
) -> Result<SweepStats, InvalidParameter> {
    let never = AtomicBool::new(false);
    sweep_grid_parallel_cancellable(n_lo, n_hi, k_lo, k_hi, &never, progress_callback)
}

/// キャンセル可能な並列版。cancel が true になると途中集計を返す。
pub fn sweep_grid_parallel_cancellable(
    n_lo: u64,
    n_hi: u64,
    k_lo: u64,
    k_hi: u64,
    cancel: &AtomicBool,
    progress_callback: impl Fn(u64, u64) + Sync,
) -> Result<SweepStats, InvalidParameter> {
    check_bounds(n_lo, n_hi, k_lo, k_hi)?;

    let k_count = k_hi - k_lo + 1;
    let total = (n_hi - n_lo + 1) * k_count;

    let global_done = AtomicU64::new(0);
    let global_stats: Mutex<SweepStats> = Mutex::new(SweepStats::new());

    (n_lo..=n_hi).into_par_iter().for_each(|n| {
        if cancel.load(Ordering::Relaxed) {
            return;
        }

        let mut local = SweepStats::new();
        for k in k_lo..=k_hi {
            local.accumulate(n, k, gcd(n, k - 1));
        }

        let done = global_done.fetch_add(k_count, Ordering::Relaxed) + k_count;
        progress_callback(done, total);

        global_stats.lock().unwrap().merge(&local);
    });

    let stats = global_stats.into_inner().unwrap();
    progress_callback(stats.cells, total);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_grid_totals() {
        // N ∈ [2,5], k ∈ [1,4]: 16セル。k=1 の列は常に cycles = N。
        let stats = sweep_grid(2, 5, 1, 4, |_, _| {}).unwrap();
        assert_eq!(stats.cells, 16);
        assert_eq!(stats.cycle_hist[5], 1); // (5, 1) のみ
        assert_eq!(stats.max_cycles, 5);
        assert_eq!(stats.max_cycles_cell, (5, 1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let seq = sweep_grid(2, 50, 1, 30, |_, _| {}).unwrap();
        let par = sweep_grid_parallel(2, 50, 1, 30, |_, _| {}).unwrap();
        assert_eq!(seq.cells, par.cells);
        assert_eq!(seq.single_loop_cells, par.single_loop_cells);
        assert_eq!(seq.max_cycles, par.max_cycles);
        assert_eq!(seq.max_cycles_cell, par.max_cycles_cell);
        assert_eq!(seq.cycle_hist, par.cycle_hist);
    }

    #[test]
    fn test_reject_bad_bounds() {
        assert!(sweep_grid(1, 5, 1, 4, |_, _| {}).is_err());
        assert!(sweep_grid(2, 5, 0, 4, |_, _| {}).is_err());
        assert!(sweep_grid(5, 2, 1, 4, |_, _| {}).is_err());
        assert!(sweep_grid(2, 5, 4, 1, |_, _| {}).is_err());
    }

    #[test]
    fn test_cancelled_returns_partial() {
        let cancel = AtomicBool::new(true);
        let stats =
            sweep_grid_parallel_cancellable(2, 200, 1, 50, &cancel, |_, _| {}).unwrap();
        assert_eq!(stats.cells, 0);
    }
}
