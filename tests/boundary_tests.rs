use modmul_threadart::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// UI 下限 N=2 と上限 N=200 で全列が完全・範囲内であること
#[test]
fn test_ui_bounds_full_sequences() {
    for n in [2u64, 200] {
        for k in [1u64, 50] {
            let chords: Vec<Chord> = generate_all_chords(n, k).unwrap().collect();
            assert_eq!(chords.len() as u64, n);
            for c in &chords {
                assert!(c.start < n);
                assert!(c.end < n);
            }
            // 全フレームが有効
            for m in 0..=n {
                let view = frame_view(n, k, m).unwrap();
                assert_eq!(view.completed.len() as u64, m);
            }
        }
    }
}

#[test]
fn test_frame_state_walk_covers_all_frames() {
    // 状態機械で 0 → N−1 → 0 を往復しても常に有効域に収まる
    let n = 200u64;
    let mut s = FrameState::new();
    for _ in 0..(n + 10) {
        s.next(n);
        assert!(s.frame < n);
        assert!(frame_view(n, 7, s.frame).is_ok());
    }
    assert_eq!(s.frame, n - 1);
    for _ in 0..(n + 10) {
        s.previous();
        assert!(frame_view(n, 7, s.frame).is_ok());
    }
    assert_eq!(s.frame, 0);
}

#[test]
fn test_frame_reclamp_after_n_shrink() {
    // N を 200 → 60 に縮めた後の再クランプでフレームは有効域に戻る
    let mut s = FrameState { frame: 199, auto_play: false };
    s.clamp(60);
    assert_eq!(s.frame, 59);
    assert!(frame_view(60, 7, s.frame).is_ok());
}

// ===== 掃引 =====

#[test]
fn test_sweep_full_ui_grid() {
    // UI 全域 [2,200]×[1,50]: 199×50 セル
    let stats = sweep_grid_parallel(2, 200, 1, 50, |_, _| {}).unwrap();
    assert_eq!(stats.cells, 199 * 50);
    // k=1 の列では cycles = N なので最大は (200, 1)
    assert_eq!(stats.max_cycles, 200);
    assert_eq!(stats.max_cycles_cell, (200, 1));
}

#[test]
fn test_sweep_sequential_parallel_cancellable_agree() {
    let seq = sweep_grid(2, 100, 1, 50, |_, _| {}).unwrap();
    let par = sweep_grid_parallel(2, 100, 1, 50, |_, _| {}).unwrap();
    let never = AtomicBool::new(false);
    let canc = sweep_grid_parallel_cancellable(2, 100, 1, 50, &never, |_, _| {}).unwrap();

    for stats in [&par, &canc] {
        assert_eq!(stats.cells, seq.cells);
        assert_eq!(stats.single_loop_cells, seq.single_loop_cells);
        assert_eq!(stats.max_cycles, seq.max_cycles);
        assert_eq!(stats.max_cycles_cell, seq.max_cycles_cell);
        assert_eq!(stats.cycle_hist, seq.cycle_hist);
    }
}

#[test]
fn test_sweep_progress_reaches_total() {
    let max_done = AtomicU64::new(0);
    let total_seen = AtomicU64::new(0);
    let stats = sweep_grid(2, 20, 1, 10, |done, total| {
        max_done.fetch_max(done, Ordering::Relaxed);
        total_seen.store(total, Ordering::Relaxed);
    })
    .unwrap();
    assert_eq!(max_done.load(Ordering::Relaxed), stats.cells);
    assert_eq!(total_seen.load(Ordering::Relaxed), 19 * 10);
}

#[test]
fn test_sweep_cancel_before_start_gives_empty() {
    let cancel = AtomicBool::new(true);
    let stats = sweep_grid_parallel_cancellable(2, 200, 1, 50, &cancel, |_, _| {}).unwrap();
    assert_eq!(stats.cells, 0);
    assert_eq!(stats.max_cycles, 0);
}

#[test]
fn test_sweep_single_cell() {
    let stats = sweep_grid(60, 60, 7, 7, |_, _| {}).unwrap();
    assert_eq!(stats.cells, 1);
    assert_eq!(stats.max_cycles, 6);
    assert_eq!(stats.max_cycles_cell, (60, 7));
    assert_eq!(stats.cycle_hist[6], 1);
}

// ===== 大きい N =====

#[test]
fn test_large_n_beyond_ui() {
    // エンジン自体は UI 上限に縛られない
    let n = 1_000_000u64;
    let k = 999_983u64;
    assert_eq!(compute_chord(n - 1, n, k).unwrap(), (n - 1) * k % n);
    let cycles = compute_cycle_count(n, k).unwrap();
    assert!(cycles >= 1);
    assert_eq!(n % cycles, 0);
}
